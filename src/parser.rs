use crate::models::{Question, QuestionSet, ANSWER_COUNT};
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

/// Why one entry of the encoded string was dropped.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Error)]
pub enum DiscardReason {
    #[error("expected question and answer list separated by ';', found {found} fields")]
    FieldCount { found: usize },
    #[error("expected {ANSWER_COUNT} answers, found {found}")]
    AnswerCount { found: usize },
    #[error("no correct answer marked")]
    NoCorrectMarker,
}

/// Diagnostic for one discarded entry. `entry_number` is the 1-based
/// position in the original entry sequence, before any discards.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Discard {
    pub entry_number: usize,
    pub reason: DiscardReason,
}

/// Result of parsing one encoded question set: the surviving questions in
/// original relative order, plus one diagnostic per discarded entry.
#[derive(Debug, Clone, Default)]
pub struct ParseOutcome {
    pub questions: QuestionSet,
    pub discards: Vec<Discard>,
}

/// Parses the compact encoded format into a [`QuestionSet`].
///
/// The raw string is a `|`-separated list of entries. Each entry is
/// `question text; a1, a2, a3, a4` where exactly one answer token ends with
/// a `*` marking it correct. Entries that are blank after trimming are
/// skipped; entries that fail a structural check are discarded with a
/// diagnostic so one bad entry never aborts the batch. Question ids are the
/// entry's 0-based position assigned before validation, so a set with
/// discards has non-contiguous ids.
pub fn parse(raw: &str) -> ParseOutcome {
    let mut questions = Vec::new();
    let mut discards = Vec::new();

    let entries = raw.split('|').map(str::trim).filter(|e| !e.is_empty());
    for (index, entry) in entries.enumerate() {
        match parse_entry(index, entry) {
            Ok(question) => questions.push(question),
            Err(reason) => {
                warn!(entry = index + 1, %reason, "discarding malformed quiz entry");
                discards.push(Discard {
                    entry_number: index + 1,
                    reason,
                });
            }
        }
    }

    ParseOutcome {
        questions: QuestionSet::new(questions),
        discards,
    }
}

fn parse_entry(id: usize, entry: &str) -> Result<Question, DiscardReason> {
    let fields: Vec<&str> = entry.split(';').map(str::trim).collect();
    let [text, answer_list] = fields[..] else {
        return Err(DiscardReason::FieldCount {
            found: fields.len(),
        });
    };

    let tokens: Vec<&str> = answer_list.split(',').map(str::trim).collect();
    let tokens: [&str; ANSWER_COUNT] = tokens[..].try_into().map_err(|_| {
        DiscardReason::AnswerCount {
            found: tokens.len(),
        }
    })?;

    let mut correct = None;
    let mut answers: [String; ANSWER_COUNT] = Default::default();
    for (i, token) in tokens.into_iter().enumerate() {
        answers[i] = match token.strip_suffix('*') {
            // When several tokens carry the marker, the last one wins.
            Some(stripped) => {
                correct = Some(i);
                stripped.to_string()
            }
            None => token.to_string(),
        };
    }

    let Some(correct_index) = correct else {
        return Err(DiscardReason::NoCorrectMarker);
    };

    Ok(Question {
        id,
        text: text.to_string(),
        answers,
        correct_index,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_entry_roundtrip() {
        let outcome = parse("What is 2+2?; 3, 4*, 5, 22");
        assert!(outcome.discards.is_empty());
        assert_eq!(outcome.questions.len(), 1);
        let q = outcome.questions.get(0).unwrap();
        assert_eq!(q.id, 0);
        assert_eq!(q.text, "What is 2+2?");
        assert_eq!(q.answers, ["3", "4", "5", "22"]);
        assert_eq!(q.correct_index, 1);
    }

    #[test]
    fn marker_position_is_independent_of_token_order() {
        let outcome = parse("Q; a1, a2, a3*, a4");
        let q = outcome.questions.get(0).unwrap();
        assert_eq!(q.answers, ["a1", "a2", "a3", "a4"]);
        assert_eq!(q.correct_index, 2);
    }

    #[test]
    fn entry_without_separator_is_discarded() {
        let outcome = parse("no semicolon here");
        assert!(outcome.questions.is_empty());
        assert_eq!(
            outcome.discards,
            vec![Discard {
                entry_number: 1,
                reason: DiscardReason::FieldCount { found: 1 },
            }]
        );
    }

    #[test]
    fn entry_with_extra_separator_is_discarded() {
        let outcome = parse("Q; huh; a, b*, c, d");
        assert_eq!(
            outcome.discards[0].reason,
            DiscardReason::FieldCount { found: 3 }
        );
    }

    #[test]
    fn wrong_answer_count_is_discarded_with_actual_count() {
        let outcome = parse("Q; a, b*, c");
        assert!(outcome.questions.is_empty());
        assert_eq!(
            outcome.discards[0].reason,
            DiscardReason::AnswerCount { found: 3 }
        );

        let outcome = parse("Q; a, b*, c, d, e");
        assert_eq!(
            outcome.discards[0].reason,
            DiscardReason::AnswerCount { found: 5 }
        );
    }

    #[test]
    fn missing_marker_is_discarded() {
        let outcome = parse("Q; a, b, c, d");
        assert!(outcome.questions.is_empty());
        assert_eq!(outcome.discards[0].reason, DiscardReason::NoCorrectMarker);
    }

    #[test]
    fn bad_entry_does_not_abort_the_batch() {
        let outcome = parse("A; 1, 2*, 3, 4|BAD|B; 5*, 6, 7, 8");
        assert_eq!(outcome.questions.len(), 2);
        assert_eq!(outcome.discards.len(), 1);
        assert_eq!(outcome.discards[0].entry_number, 2);

        // Ids keep the pre-discard positions.
        let ids: Vec<usize> = outcome.questions.iter().map(|q| q.id).collect();
        assert_eq!(ids, vec![0, 2]);
        assert_eq!(outcome.questions.get(1).unwrap().text, "B");
    }

    #[test]
    fn blank_entries_are_skipped_without_consuming_ids() {
        let outcome = parse("A; 1*, 2, 3, 4| |B; 5, 6*, 7, 8|");
        assert!(outcome.discards.is_empty());
        let ids: Vec<usize> = outcome.questions.iter().map(|q| q.id).collect();
        assert_eq!(ids, vec![0, 1]);
    }

    #[test]
    fn last_marker_wins_when_several_are_present() {
        let outcome = parse("Q; a*, b, c*, d");
        let q = outcome.questions.get(0).unwrap();
        assert_eq!(q.correct_index, 2);
        // Both markers are stripped from the stored text.
        assert_eq!(q.answers, ["a", "b", "c", "d"]);
    }

    #[test]
    fn marker_strip_removes_exactly_one_char() {
        let outcome = parse("Q; a, b, c, d**");
        let q = outcome.questions.get(0).unwrap();
        assert_eq!(q.correct_index, 3);
        assert_eq!(q.answers[3], "d*");
    }

    #[test]
    fn empty_input_yields_empty_set() {
        let outcome = parse("");
        assert!(outcome.questions.is_empty());
        assert!(outcome.discards.is_empty());

        let outcome = parse("| | |");
        assert!(outcome.questions.is_empty());
        assert!(outcome.discards.is_empty());
    }

    #[test]
    fn discard_reasons_render_for_diagnostics() {
        assert_eq!(
            DiscardReason::AnswerCount { found: 6 }.to_string(),
            "expected 4 answers, found 6"
        );
        assert_eq!(
            DiscardReason::NoCorrectMarker.to_string(),
            "no correct answer marked"
        );
    }
}
