//! # Quiz Simulator
//!
//! 把题目原文（按页抽取好的文本）解析成结构化题目，存入 SQLite，
//! 再进行 50 题限时练习的 Rust 应用程序
//!
//! ## 架构设计
//!
//! ### ① 解析层（Parser）
//! - `parser/` - 纯函数流水线：清洗 → 切块 → 字段抽取 → 校验
//! - `QuestionParser` - 分页文本 → `ParseOutcome`
//!
//! ### ② 基础设施层（Infrastructure）
//! - `TextFileSource` - 读取分页原文
//! - `QuestionStore` - 唯一的数据库连接持有者
//!
//! ### ③ 业务能力层（Services）
//! - `WarnWriter` - 写 warn.txt 能力
//! - `QuizService` - 开考、作答、交卷、成绩
//!
//! ### ④ 流程层（Workflow）
//! - `LoadFlow` - 一次导入的完整流程（解析 → 校验 → 替换题库 → 告警）
//!
//! ### ⑤ 编排层（Orchestration）
//! - `orchestrator::App` - 命令分发与终端输出
//!
//! ## 模块结构

pub mod cli;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod parser;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::{Config, ParserConfig};
pub use error::{AppError, AppResult};
pub use infrastructure::{QuestionFilter, QuestionRepository, QuestionStore, TextFileSource};
pub use models::{AnswerConfidence, OptionLetter, QuestionOptions, QuestionRecord, QuizSession};
pub use orchestrator::App;
pub use parser::{parse, ParseOutcome, ParseStats, QuestionParser, SegmentStrategy};
pub use workflow::{LoadFlow, LoadReport};
