pub mod question;
pub mod session;

pub use question::{
    AnswerConfidence, OptionLetter, QuestionOptions, QuestionRecord, EXPLANATION_PLACEHOLDER,
};
pub use session::{QuestionResult, QuizSession, SessionResults};
