pub mod quiz_service;
pub mod warn_writer;

pub use quiz_service::QuizService;
pub use warn_writer::WarnWriter;
