//! 警告写入服务 - 业务能力层
//!
//! 只负责"写 warn.txt"能力，不关心流程

use crate::error::{AppResult, LoadError};
use crate::models::QuestionRecord;
use crate::utils::logging::truncate_text;
use std::fs::OpenOptions;
use std::io::Write;
use tracing::debug;

/// 警告写入服务
///
/// 职责：
/// - 把正确答案按默认值补齐的题目追加到 warn.txt，方便人工复核
/// - 只处理单个题目的警告
/// - 不关心流程顺序
pub struct WarnWriter {
    warn_file_path: String,
}

impl WarnWriter {
    /// 使用自定义文件路径创建
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            warn_file_path: path.into(),
        }
    }

    pub fn path(&self) -> &str {
        &self.warn_file_path
    }

    /// 写入一条低置信度警告
    pub fn write(&self, record: &QuestionRecord) -> AppResult<()> {
        debug!(
            "写入警告: 题号 {} | 题干长度: {}",
            record.number,
            record.prompt.len()
        );

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.warn_file_path)
            .map_err(|source| self.write_failed(source))?;

        let warn_msg = format_warning(record);
        file.write_all(warn_msg.as_bytes())
            .map_err(|source| self.write_failed(source))?;

        Ok(())
    }

    fn write_failed(&self, source: std::io::Error) -> LoadError {
        LoadError::WarnWriteFailed {
            path: self.warn_file_path.clone(),
            source,
        }
    }
}

fn format_warning(record: &QuestionRecord) -> String {
    format!(
        "题号 {} | 正确答案未识别，默认 {} | 题干: {}\n",
        record.number,
        record.correct_option,
        truncate_text(&record.prompt, 80)
    )
}
