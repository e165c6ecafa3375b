//! 命令行层
//!
//! 只负责解析参数，具体工作交给编排层 `orchestrator::App`

pub mod commands;

use clap::Parser;

pub use commands::{Commands, ListArgs, LoadArgs, ResultsArgs};

/// 限时选择题练习工具
#[derive(Parser, Debug)]
#[command(
    name = "quiz-simulator",
    version,
    about = "把题目原文导入题库，并进行 50 题限时练习"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}
