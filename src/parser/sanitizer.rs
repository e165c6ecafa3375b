//! 行清洗
//!
//! 去掉页码、页眉页脚、水印和空行；只删不改，保持原有顺序

use crate::config::ParserConfig;
use crate::error::{AppError, AppResult};
use crate::parser::patterns;
use regex::{Regex, RegexBuilder};

/// 行清洗器
#[derive(Debug, Clone)]
pub struct LineSanitizer {
    /// 小写后的水印短语
    watermarks: Vec<String>,
    extra_patterns: Vec<Regex>,
}

impl LineSanitizer {
    /// 按配置创建，额外规则编译失败时报错
    pub fn new(config: &ParserConfig) -> AppResult<Self> {
        let extra_patterns = config
            .extra_boilerplate_patterns
            .iter()
            .map(|pattern| {
                RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| AppError::invalid_pattern(pattern, e))
            })
            .collect::<AppResult<Vec<_>>>()?;

        let watermarks = config
            .watermarks
            .iter()
            .map(|w| w.trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();

        Ok(Self {
            watermarks,
            extra_patterns,
        })
    }

    /// 是否为样板行（调用方传入已去掉首尾空白的行）
    pub fn is_boilerplate(&self, line: &str) -> bool {
        if line.is_empty() || patterns::is_numeric_only(line) || patterns::is_page_header(line) {
            return true;
        }

        let lowered = line.to_lowercase();
        if self.watermarks.iter().any(|w| *w == lowered) {
            return true;
        }

        self.extra_patterns.iter().any(|re| re.is_match(line))
    }

    /// 清洗整段文本，返回保留下来的行（已去掉首尾空白）
    pub fn sanitize<'a>(&self, text: &'a str) -> Vec<&'a str> {
        text.lines()
            .map(str::trim)
            .filter(|line| !self.is_boilerplate(line))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sanitizer() -> LineSanitizer {
        LineSanitizer::new(&ParserConfig::default()).unwrap()
    }

    #[test]
    fn test_drops_page_numbers_and_headers() {
        let text = "What is 2+2?\n12\nPage 5\n\n   \nA: 3\nWWW.Crystal.Consulting\nB: 4";
        assert_eq!(
            sanitizer().sanitize(text),
            vec!["What is 2+2?", "A: 3", "B: 4"]
        );
    }

    #[test]
    fn test_keeps_lines_that_only_mention_watermark() {
        let text = "See www.crystal.consulting for details";
        assert_eq!(sanitizer().sanitize(text), vec![text]);
    }

    #[test]
    fn test_default_header_footer_lines() {
        let text = "www.pmi.org\nLogo\nheader: exam prep\nFOOTER text\nWhich role approves?";
        assert_eq!(sanitizer().sanitize(text), vec!["Which role approves?"]);
    }

    #[test]
    fn test_watermark_glued_to_content_survives() {
        let text = "What is a charter?www.crystal.consulting";
        assert_eq!(sanitizer().sanitize(text), vec![text]);
    }

    #[test]
    fn test_all_boilerplate_yields_nothing() {
        assert!(sanitizer().sanitize("1\n2\nPage 3\n\n").is_empty());
    }

    #[test]
    fn test_extra_patterns() {
        let config = ParserConfig {
            extra_boilerplate_patterns: vec![r"^www\.".to_string(), r"^logo".to_string()],
            ..ParserConfig::default()
        };
        let sanitizer = LineSanitizer::new(&config).unwrap();
        assert_eq!(
            sanitizer.sanitize("LOGO\nwww.example.com\nkeep me"),
            vec!["keep me"]
        );
    }

    #[test]
    fn test_invalid_extra_pattern_is_config_error() {
        let config = ParserConfig {
            extra_boilerplate_patterns: vec!["(unclosed".to_string()],
            ..ParserConfig::default()
        };
        assert!(matches!(
            LineSanitizer::new(&config),
            Err(AppError::Config(_))
        ));
    }
}
