use serde::{Deserialize, Serialize};

/// Every question carries exactly this many answer options.
pub const ANSWER_COUNT: usize = 4;

/// One validated multiple-choice item.
///
/// The fixed-size answer array makes the four-option invariant structural,
/// and `correct_index` always points into `answers`: only the parser (or a
/// test that upholds the same rules) builds these.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Question {
    pub id: usize,
    pub text: String,
    pub answers: [String; ANSWER_COUNT],
    pub correct_index: usize,
}

/// An ordered, immutable collection of questions produced by one parse call
/// (or handed over by a storage collaborator). Ids are not necessarily
/// contiguous: malformed entries are dropped without renumbering.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuestionSet {
    questions: Vec<Question>,
}

impl QuestionSet {
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Question> {
        self.questions.iter()
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }
}

/// Payload sent to the external grader when a session is submitted.
/// Unanswered slots serialize as JSON `null`, one slot per question in
/// original order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizSubmission {
    pub quiz_id: String,
    pub answers: Vec<Option<usize>>,
}

/// The grader's verdict. Its score is authoritative for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradeResponse {
    pub score: usize,
}

/// Payload for saving a single question to the persistence collaborator.
/// A missing quiz id means "the default quiz".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveQuestionRequest {
    pub quiz_id: Option<i64>,
    pub question: String,
    pub answers: [String; ANSWER_COUNT],
    pub correct_index: usize,
}

impl SaveQuestionRequest {
    pub fn for_question(quiz_id: Option<i64>, question: &Question) -> Self {
        Self {
            quiz_id,
            question: question.text.clone(),
            answers: question.answers.clone(),
            correct_index: question.correct_index,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SaveStatus {
    Success,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveQuestionResponse {
    pub status: SaveStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SaveQuestionResponse {
    pub fn is_success(&self) -> bool {
        self.status == SaveStatus::Success
    }
}
