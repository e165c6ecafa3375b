//! 题块切分
//!
//! 支持两种切分方式：
//! - `Delimiter`：按三个及以上连续星号切分
//! - `Marker`：按行首的 "Question N" 切分，并带上题号
//!
//! `Auto` 会两种都试一遍，取"像样"题块更多的那一种。

use crate::config::ParserConfig;
use crate::error::ConfigError;
use crate::models::OptionLetter;
use crate::parser::patterns::{self, DELIMITER_RUN, QUESTION_MARKER};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// 切分策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentStrategy {
    /// 自动选择
    #[default]
    Auto,
    /// 星号分隔
    Delimiter,
    /// "Question N" 标记
    Marker,
}

impl fmt::Display for SegmentStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SegmentStrategy::Auto => "auto",
            SegmentStrategy::Delimiter => "delimiter",
            SegmentStrategy::Marker => "marker",
        };
        f.write_str(name)
    }
}

impl FromStr for SegmentStrategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(SegmentStrategy::Auto),
            "delimiter" => Ok(SegmentStrategy::Delimiter),
            "marker" => Ok(SegmentStrategy::Marker),
            _ => Err(ConfigError::InvalidStrategy {
                value: s.to_string(),
            }),
        }
    }
}

/// 一道题对应的原文片段
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionBlock {
    /// 在保留下来的题块中的位置（从 0 开始）
    pub ordinal: usize,
    /// 非空行（已去掉首尾空白）
    pub lines: Vec<String>,
    /// "Question N" 中的题号
    pub number_hint: Option<u32>,
}

impl QuestionBlock {
    /// 同时包含 A 和 D 选项行，才算像一道题
    fn is_plausible(&self) -> bool {
        let has = |letter: OptionLetter| {
            self.lines
                .iter()
                .any(|line| patterns::option_label(line).is_some_and(|(l, _)| l == letter))
        };
        has(OptionLetter::A) && has(OptionLetter::D)
    }
}

/// 切分结果
#[derive(Debug, Clone)]
pub struct Segmentation {
    /// 实际使用的策略（不会是 `Auto`）
    pub strategy: SegmentStrategy,
    pub blocks: Vec<QuestionBlock>,
}

/// 题块切分器
#[derive(Debug, Clone)]
pub struct BlockSegmenter {
    strategy: SegmentStrategy,
    min_block_length: usize,
    min_marker_lines: usize,
}

impl BlockSegmenter {
    pub fn new(config: &ParserConfig) -> Self {
        Self {
            strategy: config.strategy,
            min_block_length: config.min_block_length,
            min_marker_lines: config.min_marker_lines,
        }
    }

    /// 切分已清洗的文本
    pub fn segment(&self, text: &str) -> Segmentation {
        match self.strategy {
            SegmentStrategy::Delimiter => Segmentation {
                strategy: SegmentStrategy::Delimiter,
                blocks: self.split_by_delimiter(text),
            },
            SegmentStrategy::Marker => Segmentation {
                strategy: SegmentStrategy::Marker,
                blocks: self.split_by_marker(text),
            },
            SegmentStrategy::Auto => self.auto_detect(text),
        }
    }

    fn auto_detect(&self, text: &str) -> Segmentation {
        let by_delimiter = self.split_by_delimiter(text);
        let by_marker = self.split_by_marker(text);

        // 全文没有分隔符时，星号切分只是把整篇当成一块
        let delimiter_score = if patterns::has_delimiter_run(text) {
            by_delimiter.iter().filter(|b| b.is_plausible()).count()
        } else {
            0
        };
        let marker_score = by_marker.iter().filter(|b| b.is_plausible()).count();

        debug!(
            "自动选择切分方式: delimiter={} marker={}",
            delimiter_score, marker_score
        );

        if marker_score > delimiter_score {
            Segmentation {
                strategy: SegmentStrategy::Marker,
                blocks: by_marker,
            }
        } else {
            Segmentation {
                strategy: SegmentStrategy::Delimiter,
                blocks: by_delimiter,
            }
        }
    }

    fn split_by_delimiter(&self, text: &str) -> Vec<QuestionBlock> {
        let mut blocks = Vec::new();
        for chunk in DELIMITER_RUN.split(text) {
            if self.is_too_short(chunk) {
                continue;
            }
            blocks.push(QuestionBlock {
                ordinal: blocks.len(),
                lines: non_blank_lines(chunk),
                number_hint: None,
            });
        }
        blocks
    }

    fn split_by_marker(&self, text: &str) -> Vec<QuestionBlock> {
        let markers: Vec<(usize, usize, Option<u32>)> = QUESTION_MARKER
            .captures_iter(text)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let number = caps.get(1).and_then(|m| m.as_str().parse().ok());
                Some((whole.start(), whole.end(), number))
            })
            .collect();

        let mut blocks = Vec::new();
        for (i, &(_, body_start, number)) in markers.iter().enumerate() {
            let body_end = markers.get(i + 1).map_or(text.len(), |next| next.0);
            let body = &text[body_start..body_end];

            let lines = non_blank_lines(body);
            if self.is_too_short(body) || lines.len() < self.min_marker_lines {
                debug!(
                    "丢弃过短的题块 Question {:?} ({} 行)",
                    number,
                    lines.len()
                );
                continue;
            }

            blocks.push(QuestionBlock {
                ordinal: blocks.len(),
                lines,
                number_hint: number.filter(|n| *n > 0),
            });
        }
        blocks
    }

    fn is_too_short(&self, chunk: &str) -> bool {
        chunk.trim().chars().count() < self.min_block_length
    }
}

fn non_blank_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
