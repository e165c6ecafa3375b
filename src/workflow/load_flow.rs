//! 题目导入流程 - 流程层
//!
//! 核心职责：定义"一次导入"的完整处理流程
//!
//! 流程顺序：
//! 1. 解析分页文本
//! 2. 一道题都没解析出来 → 报错，题库不动
//! 3. 题号重复 → 报错，题库不动
//! 4. 整体替换题库
//! 5. 低置信度题目写入 warn.txt（兜底）

use std::collections::HashSet;

use tracing::{info, warn};

use crate::config::Config;
use crate::error::{AppResult, LoadError};
use crate::infrastructure::QuestionRepository;
use crate::models::QuestionRecord;
use crate::parser::{ParseStats, QuestionParser};
use crate::services::WarnWriter;
use crate::utils::logging::{log_load_complete, log_parse_summary};

/// 导入结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub stats: ParseStats,
    /// 写入题库的题目数
    pub saved: usize,
    /// 正确答案按默认值补齐的题号
    pub low_confidence: Vec<u32>,
}

/// 题目导入流程
///
/// - 编排解析、校验、落库、告警的先后顺序
/// - 不持有任何资源（数据库连接由调用方传入）
/// - 题库只在最后一步被整体替换
pub struct LoadFlow {
    parser: QuestionParser,
    warn_writer: WarnWriter,
}

impl LoadFlow {
    /// 创建新的导入流程
    pub fn new(config: &Config) -> AppResult<Self> {
        Ok(Self {
            parser: QuestionParser::new(&config.parser)?,
            warn_writer: WarnWriter::with_path(config.warn_file_path.as_str()),
        })
    }

    pub fn run<R: QuestionRepository>(
        &self,
        pages: &[String],
        repo: &mut R,
    ) -> AppResult<LoadReport> {
        info!("🔍 正在解析 {} 页文本...", pages.len());
        let outcome = self.parser.parse(pages);
        log_parse_summary(&outcome.stats, outcome.records.len());

        if outcome.is_empty() {
            warn!("⚠️ 没有解析出任何题目，题库保持不变");
            return Err(LoadError::NoQuestionsParsed {
                blocks: outcome.stats.blocks_found,
            }
            .into());
        }

        if let Some(number) = first_duplicate(&outcome.records) {
            warn!("⚠️ 题号 {} 重复，题库保持不变", number);
            return Err(LoadError::DuplicateNumber { number }.into());
        }

        let saved = repo.replace_all(&outcome.records)?;

        let low_confidence: Vec<u32> = outcome.low_confidence().map(|r| r.number).collect();
        for record in outcome.low_confidence() {
            warn!("⚠️ 第 {} 题未识别到正确答案，默认 A", record.number);
            self.warn_writer.write(record)?;
        }

        let warn_path = (!low_confidence.is_empty()).then(|| self.warn_writer.path());
        log_load_complete(saved, warn_path);

        Ok(LoadReport {
            stats: outcome.stats,
            saved,
            low_confidence,
        })
    }
}

fn first_duplicate(records: &[QuestionRecord]) -> Option<u32> {
    let mut seen = HashSet::new();
    records
        .iter()
        .map(|r| r.number)
        .find(|number| !seen.insert(*number))
}
