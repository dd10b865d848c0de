use thiserror::Error;

/// Failure of the submit flow against the external grader.
///
/// A grader failure leaves the session in progress so the user can retry;
/// only the caller-facing alert sees this error. Invalid in-session mutator
/// calls are silent no-ops and never show up here.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("session has not been started")]
    NotInProgress,
    #[error("grader request failed: {0}")]
    Grader(anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grader_failure_renders_the_cause() {
        let err = SubmitError::Grader(anyhow::anyhow!("connection refused"));
        assert_eq!(
            err.to_string(),
            "grader request failed: connection refused"
        );
    }
}
