pub mod clients;
pub mod error;
pub mod models;
pub mod parser;
pub mod session;

pub use clients::{load_session, submit_session, QuestionSetSource, QuestionStore, QuizGrader};
pub use error::SubmitError;
pub use models::{Question, QuestionSet, QuizSubmission, ANSWER_COUNT};
pub use parser::{parse, Discard, DiscardReason, ParseOutcome};
pub use session::{feedback_for_percentage, QuizSession, SessionState};
