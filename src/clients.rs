use crate::error::SubmitError;
use crate::models::{
    GradeResponse, QuestionSet, QuizSubmission, SaveQuestionRequest, SaveQuestionResponse,
    SaveStatus,
};
use crate::parser::{parse, Discard};
use crate::session::{score_submission, QuizSession, SessionState};
use futures::future::BoxFuture;
use std::sync::Arc;
use tracing::warn;

/// Collaborator that produces the encoded question-set string for a quiz,
/// whether freshly generated from study material or loaded from storage.
pub trait QuestionSetSource: Send + Sync {
    fn fetch_encoded(&self, quiz_id: &str) -> BoxFuture<'static, anyhow::Result<String>>;
}

/// Collaborator that grades a submission. Its score is trusted for display;
/// it recomputes independently of the session's own count.
pub trait QuizGrader: Send + Sync {
    fn grade(&self, submission: QuizSubmission) -> BoxFuture<'static, anyhow::Result<GradeResponse>>;
}

/// Collaborator that persists questions one at a time.
pub trait QuestionStore: Send + Sync {
    fn save_question(
        &self,
        request: SaveQuestionRequest,
    ) -> BoxFuture<'static, anyhow::Result<SaveQuestionResponse>>;
}

/// A source backed by one canned encoded string, for offline use and tests.
#[derive(Clone)]
pub struct StaticSource {
    pub encoded: String,
}

impl QuestionSetSource for StaticSource {
    fn fetch_encoded(&self, _quiz_id: &str) -> BoxFuture<'static, anyhow::Result<String>> {
        let encoded = self.encoded.clone();
        Box::pin(async move { Ok(encoded) })
    }
}

/// Grader for client-only use: no network, same scoring rules as the
/// session's local path, so both paths agree by construction.
#[derive(Clone)]
pub struct LocalGrader {
    pub questions: Arc<QuestionSet>,
}

impl QuizGrader for LocalGrader {
    fn grade(&self, submission: QuizSubmission) -> BoxFuture<'static, anyhow::Result<GradeResponse>> {
        let questions = Arc::clone(&self.questions);
        Box::pin(async move {
            let score = score_submission(&questions, &submission.answers);
            Ok(GradeResponse { score })
        })
    }
}

/// Store that accepts everything and keeps nothing, for flows where
/// persistence is switched off.
#[derive(Clone)]
pub struct NullStore;

impl QuestionStore for NullStore {
    fn save_question(
        &self,
        _request: SaveQuestionRequest,
    ) -> BoxFuture<'static, anyhow::Result<SaveQuestionResponse>> {
        Box::pin(async move {
            Ok(SaveQuestionResponse {
                status: SaveStatus::Success,
                message: None,
            })
        })
    }
}

/// Fetches and parses a question set, returning a started session plus the
/// parse diagnostics. Discards only shorten the quiz; they never fail the
/// load.
pub async fn load_session(
    source: &dyn QuestionSetSource,
    quiz_id: &str,
) -> anyhow::Result<(QuizSession, Vec<Discard>)> {
    let encoded = source.fetch_encoded(quiz_id).await?;
    let outcome = parse(&encoded);
    if outcome.questions.is_empty() {
        warn!(quiz_id, "loaded question set is empty");
    }
    let mut session = QuizSession::new(quiz_id, Arc::new(outcome.questions));
    session.start();
    Ok((session, outcome.discards))
}

/// Submits a session to the grader and applies the authoritative score.
///
/// On grader failure the session stays in progress so the user may retry.
/// Submitting an already-submitted session returns the cached score instead
/// of grading twice.
pub async fn submit_session(
    session: &mut QuizSession,
    grader: &dyn QuizGrader,
) -> Result<usize, SubmitError> {
    match session.state() {
        SessionState::Submitted => return Ok(session.score().unwrap_or(0)),
        SessionState::NotStarted => return Err(SubmitError::NotInProgress),
        SessionState::InProgress => {}
    }

    let response = grader
        .grade(session.submission())
        .await
        .map_err(SubmitError::Grader)?;
    session.submit_with_score(response.score);
    Ok(response.score)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn local_grader_matches_session_scoring() {
        let outcome = parse("Q1; a*, b, c, d|Q2; a, b*, c, d");
        let questions = Arc::new(outcome.questions);
        let grader = LocalGrader {
            questions: Arc::clone(&questions),
        };

        let mut session = QuizSession::new("q", questions);
        session.start();
        session.select_answer(0, 0);
        session.select_answer(1, 3);
        let local = {
            let mut clone = session.clone();
            clone.submit().unwrap_or(0)
        };

        let graded = grader.grade(session.submission()).await.unwrap();
        assert_eq!(graded.score, local);
        assert_eq!(graded.score, 1);
    }

    #[tokio::test]
    async fn submit_before_start_is_rejected() {
        let outcome = parse("Q1; a*, b, c, d");
        let mut session = QuizSession::new("q", Arc::new(outcome.questions));
        let grader = LocalGrader {
            questions: Arc::new(QuestionSet::default()),
        };
        let err = submit_session(&mut session, &grader).await.unwrap_err();
        assert!(matches!(err, SubmitError::NotInProgress));
        assert_eq!(session.state(), SessionState::NotStarted);
    }

    #[tokio::test]
    async fn null_store_reports_success() {
        let outcome = parse("Q1; a*, b, c, d");
        let question = outcome.questions.get(0).unwrap().clone();
        let response = NullStore
            .save_question(SaveQuestionRequest::for_question(Some(1), &question))
            .await
            .unwrap();
        assert!(response.is_success());
    }
}
