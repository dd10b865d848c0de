use crate::models::{Question, QuestionSet, QuizSubmission};
use serde::Serialize;
use std::sync::Arc;

/// Lifecycle of one quiz-taking attempt. `Submitted` is terminal.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    NotStarted,
    InProgress,
    Submitted,
}

/// Mutable state for one user working through one question set.
///
/// The question set itself is shared read-only; the session owns the answer
/// slots, the cursor, and the submission status. Mutators called in the
/// wrong state are silent no-ops rather than errors, since they reflect UI
/// races (a double click after submit) and not programmer mistakes.
#[derive(Debug, Clone)]
pub struct QuizSession {
    quiz_id: String,
    questions: Arc<QuestionSet>,
    answers: Vec<Option<usize>>,
    current_index: usize,
    state: SessionState,
    score: Option<usize>,
}

impl QuizSession {
    pub fn new(quiz_id: impl Into<String>, questions: Arc<QuestionSet>) -> Self {
        Self {
            quiz_id: quiz_id.into(),
            questions,
            answers: Vec::new(),
            current_index: 0,
            state: SessionState::NotStarted,
            score: None,
        }
    }

    pub fn quiz_id(&self) -> &str {
        &self.quiz_id
    }

    pub fn questions(&self) -> &QuestionSet {
        &self.questions
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Begins the attempt: one unset answer slot per question, cursor on the
    /// first question. Only valid from `NotStarted`.
    pub fn start(&mut self) {
        if self.state != SessionState::NotStarted {
            return;
        }
        self.answers = vec![None; self.questions.len()];
        self.current_index = 0;
        self.state = SessionState::InProgress;
    }

    /// Records an answer choice. Ignored outside `InProgress` and for
    /// question indexes beyond the set. The answer index is stored verbatim
    /// without a range check, matching what the grader will see.
    pub fn select_answer(&mut self, question_index: usize, answer_index: usize) {
        if self.state != SessionState::InProgress {
            return;
        }
        if let Some(slot) = self.answers.get_mut(question_index) {
            *slot = Some(answer_index);
        }
    }

    pub fn selected_answer(&self, question_index: usize) -> Option<usize> {
        self.answers.get(question_index).copied().flatten()
    }

    pub fn is_selected(&self, question_index: usize, answer_index: usize) -> bool {
        self.selected_answer(question_index) == Some(answer_index)
    }

    /// Moves the cursor back one question, stopping at the first.
    pub fn previous(&mut self) {
        if self.current_index > 0 {
            self.current_index -= 1;
        }
    }

    /// Moves the cursor forward one question, stopping at the last.
    pub fn next(&mut self) {
        if self.current_index + 1 < self.questions.len() {
            self.current_index += 1;
        }
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_index)
    }

    pub fn answered_count(&self) -> usize {
        self.answers.iter().filter(|slot| slot.is_some()).count()
    }

    /// How many slots are still unset. Callers use this to decide whether to
    /// confirm with the user before submitting.
    pub fn unanswered_count(&self) -> usize {
        self.answers.iter().filter(|slot| slot.is_none()).count()
    }

    /// Share of questions answered so far, in `[0, 100]`. An empty question
    /// set reports 0 rather than dividing by zero.
    pub fn progress_percentage(&self) -> f64 {
        let total = self.questions.len();
        if total == 0 {
            return 0.0;
        }
        self.answered_count() as f64 * 100.0 / total as f64
    }

    /// Submits the attempt with local scoring, freezing all answer slots.
    /// Returns the score, or `None` if the session was not in progress.
    pub fn submit(&mut self) -> Option<usize> {
        if self.state != SessionState::InProgress {
            return None;
        }
        let score = score_submission(&self.questions, &self.answers);
        self.score = Some(score);
        self.state = SessionState::Submitted;
        Some(score)
    }

    /// Submits the attempt with a score the external grader computed. The
    /// grader's number is authoritative for display even if it disagrees
    /// with the local count. Returns false if the session was not in
    /// progress.
    pub fn submit_with_score(&mut self, score: usize) -> bool {
        if self.state != SessionState::InProgress {
            return false;
        }
        self.score = Some(score);
        self.state = SessionState::Submitted;
        true
    }

    /// The cached score. Absent until the session is submitted.
    pub fn score(&self) -> Option<usize> {
        self.score
    }

    pub fn score_percentage(&self) -> Option<f64> {
        let score = self.score?;
        let total = self.questions.len();
        if total == 0 {
            return Some(0.0);
        }
        Some(score as f64 * 100.0 / total as f64)
    }

    pub fn feedback_message(&self) -> Option<&'static str> {
        self.score_percentage().map(feedback_for_percentage)
    }

    /// Builds the grader payload: one slot per question in original order,
    /// unanswered slots staying unset.
    pub fn submission(&self) -> QuizSubmission {
        QuizSubmission {
            quiz_id: self.quiz_id.clone(),
            answers: self.answers.clone(),
        }
    }
}

/// Counts questions whose selected index equals the correct index. Both the
/// local submit path and [`crate::clients::LocalGrader`] go through here so
/// the two scoring paths cannot drift apart.
pub fn score_submission(questions: &QuestionSet, answers: &[Option<usize>]) -> usize {
    questions
        .iter()
        .zip(answers)
        .filter(|(question, selected)| **selected == Some(question.correct_index))
        .count()
}

/// The tier table for result feedback. Tiers are evaluated top-down with
/// inclusive lower bounds: exactly 90 is "Excellent", exactly 80 is "Great
/// job", and so on.
pub fn feedback_for_percentage(percentage: f64) -> &'static str {
    if percentage >= 90.0 {
        "Excellent! You've mastered this material!"
    } else if percentage >= 80.0 {
        "Great job! You have a strong understanding of the material."
    } else if percentage >= 70.0 {
        "Good work! You're on the right track."
    } else if percentage >= 60.0 {
        "Not bad! With a bit more study, you'll improve your score."
    } else {
        "Keep studying! Review the material and try again."
    }
}
