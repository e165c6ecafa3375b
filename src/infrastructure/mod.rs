//! 基础设施层
//!
//! 只有这一层碰文件系统和数据库：
//! - `page_source`: 读取分页原文
//! - `question_store`: SQLite 题库与答题会话

pub mod page_source;
pub mod question_store;

pub use page_source::TextFileSource;
pub use question_store::{QuestionFilter, QuestionRepository, QuestionStore};
