//! 题目解析流水线
//!
//! ```text
//! 原始分页文本
//!     ↓ sanitizer  去掉页码、页眉页脚、水印
//!     ↓ segmenter  切成一题一块
//!     ↓ extractor  逐行归类到题干 / 选项 / 答案 / 解析
//!     ↓ validator  校验完整性、补默认值
//! Vec<QuestionRecord>
//! ```
//!
//! 整条流水线是同步、无状态的纯函数：同样的输入永远得到同样的输出。

pub mod extractor;
pub mod patterns;
pub mod sanitizer;
pub mod segmenter;
pub mod validator;

pub use extractor::{extract, ExtractState, ExtractedFields};
pub use sanitizer::LineSanitizer;
pub use segmenter::{BlockSegmenter, QuestionBlock, SegmentStrategy, Segmentation};
pub use validator::validate;

use crate::config::ParserConfig;
use crate::error::AppResult;
use crate::models::QuestionRecord;
use crate::utils::logging::truncate_text;
use tracing::debug;

/// 解析统计
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseStats {
    /// 实际使用的切分策略
    pub strategy: SegmentStrategy,
    pub blocks_found: usize,
    pub blocks_dropped: usize,
    /// 正确答案按默认值补齐的题目数
    pub answers_defaulted: usize,
}

/// 解析结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOutcome {
    /// 按题块顺序排列（不一定按题号排序）
    pub records: Vec<QuestionRecord>,
    pub stats: ParseStats,
}

impl ParseOutcome {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 正确答案是默认值的题目
    pub fn low_confidence(&self) -> impl Iterator<Item = &QuestionRecord> {
        self.records.iter().filter(|r| r.is_low_confidence())
    }
}

/// 题目解析器
#[derive(Debug, Clone)]
pub struct QuestionParser {
    sanitizer: LineSanitizer,
    segmenter: BlockSegmenter,
}

impl QuestionParser {
    pub fn new(config: &ParserConfig) -> AppResult<Self> {
        Ok(Self {
            sanitizer: LineSanitizer::new(config)?,
            segmenter: BlockSegmenter::new(config),
        })
    }

    /// 解析分页文本
    ///
    /// 没有页面或清洗后什么都不剩时返回空结果，不视为错误
    pub fn parse<S: AsRef<str>>(&self, pages: &[S]) -> ParseOutcome {
        let full_text = pages
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join("\n");

        let clean_text = self.sanitizer.sanitize(&full_text).join("\n");
        let segmentation = self.segmenter.segment(&clean_text);

        let mut records: Vec<QuestionRecord> = Vec::new();
        let mut blocks_dropped = 0;

        for block in &segmentation.blocks {
            let fields = extract(block);
            match validate(fields, records.len()) {
                Some(record) => {
                    debug!(
                        "✓ 题块 {} → 第 {} 题: {}",
                        block.ordinal,
                        record.number,
                        truncate_text(&record.prompt, 40)
                    );
                    records.push(record);
                }
                None => {
                    debug!("题块 {} 不完整，已丢弃", block.ordinal);
                    blocks_dropped += 1;
                }
            }
        }

        let answers_defaulted = records.iter().filter(|r| r.is_low_confidence()).count();

        ParseOutcome {
            stats: ParseStats {
                strategy: segmentation.strategy,
                blocks_found: segmentation.blocks.len(),
                blocks_dropped,
                answers_defaulted,
            },
            records,
        }
    }
}

/// 便捷入口：按配置解析分页文本
pub fn parse<S: AsRef<str>>(pages: &[S], config: &ParserConfig) -> AppResult<ParseOutcome> {
    Ok(QuestionParser::new(config)?.parse(pages))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pages_are_joined_before_segmenting() {
        // 一道题跨两页，页码落在中间
        let pages = [
            "***\nWhich colour is the sky?\nA: Blue\nB: Green",
            "17\nC: Red\nD: Black\nCorrect Answer: A\n***",
        ];
        let outcome = parse(&pages, &ParserConfig::default()).unwrap();

        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].options.c, "Red");
        assert_eq!(outcome.stats.blocks_dropped, 0);
    }

    #[test]
    fn test_stats_count_drops_and_defaults() {
        let text = "***\nFirst question text here\nA: a\nB: b\nC: c\nD: d\n***\nSecond question missing D\nA: a\nB: b\nC: c\n***";
        let outcome = parse(&[text], &ParserConfig::default()).unwrap();

        assert_eq!(outcome.stats.blocks_found, 2);
        assert_eq!(outcome.stats.blocks_dropped, 1);
        assert_eq!(outcome.stats.answers_defaulted, 1);
        assert_eq!(outcome.low_confidence().count(), 1);
    }

    #[test]
    fn test_no_pages() {
        let pages: [&str; 0] = [];
        let outcome = parse(&pages, &ParserConfig::default()).unwrap();
        assert!(outcome.is_empty());
        assert_eq!(outcome.stats.blocks_found, 0);
    }
}
