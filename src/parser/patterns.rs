//! 字段识别规则
//!
//! 所有用来识别题目结构的正则都集中在这里，每条规则对应一个具名函数。
//! 原文格式有变化时只需要改这一个文件。

use crate::models::OptionLetter;
use regex::Regex;
use std::sync::LazyLock;

static NUMERIC_ONLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+$").expect("NUMERIC_ONLY"));

static PAGE_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^Page\s*\d+").expect("PAGE_HEADER"));

pub(crate) static DELIMITER_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*{3,}").expect("DELIMITER_RUN"));

pub(crate) static QUESTION_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^[ \t]*Question[ \t]*(\d+)[ \t]*[:.]?").expect("QUESTION_MARKER")
});

static OPTION_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^([A-D])\s*[:.)]\s*(.*)$").expect("OPTION_LABEL"));

static ANSWER_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:Correct\s*Answer|Answer)\s*:\s*(.*)$").expect("ANSWER_LABEL")
});

static ANY_LETTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Da-d]").expect("ANY_LETTER"));

static EXPLANATION_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:Explanation|Exp)\s*:\s*(.*)$").expect("EXPLANATION_LABEL")
});

static SECTION_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^ECO\s+Domain\s+Task\s*:").expect("SECTION_BREAK"));

/// 纯数字行（页码）
pub fn is_numeric_only(line: &str) -> bool {
    NUMERIC_ONLY.is_match(line)
}

/// 以 "Page N" 开头的行
pub fn is_page_header(line: &str) -> bool {
    PAGE_HEADER.is_match(line)
}

/// 含有三个及以上连续星号（题目分隔符）
pub fn has_delimiter_run(text: &str) -> bool {
    DELIMITER_RUN.is_match(text)
}

/// 选项行，返回 (字母, 选项正文)
pub fn option_label(line: &str) -> Option<(OptionLetter, &str)> {
    let caps = OPTION_LABEL.captures(line)?;
    let letter = caps
        .get(1)
        .and_then(|m| m.as_str().chars().next())
        .and_then(OptionLetter::from_char)?;
    let rest = caps.get(2).map_or("", |m| m.as_str());
    Some((letter, rest))
}

/// "Correct Answer:" / "Answer:" 行，返回冒号后的内容
pub fn answer_label(line: &str) -> Option<&str> {
    ANSWER_LABEL
        .captures(line)
        .map(|caps| caps.get(1).map_or("", |m| m.as_str()))
}

/// 答案行剩余部分中的第一个 A-D 字符（忽略大小写）
pub fn answer_letter(rest: &str) -> Option<OptionLetter> {
    ANY_LETTER
        .find(rest)
        .and_then(|m| m.as_str().chars().next())
        .and_then(OptionLetter::from_char)
}

/// "Explanation:" / "Exp:" 行，返回冒号后的内容
pub fn explanation_label(line: &str) -> Option<&str> {
    EXPLANATION_LABEL
        .captures(line)
        .map(|caps| caps.get(1).map_or("", |m| m.as_str()))
}

/// 管理性分节行（"ECO Domain Task:"），遇到即结束当前题块
pub fn is_section_break(line: &str) -> bool {
    SECTION_BREAK.is_match(line)
}

/// 题干开头的题号，返回 (题号, 去掉题号后的题干)
///
/// 题号后必须是 `.` `)` `:`、空白或结尾，`2+2` 和 `7.5` 这类不算题号
pub fn leading_number(prompt: &str) -> Option<(u32, &str)> {
    let digits_end = prompt
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(prompt.len(), |(i, _)| i);
    if digits_end == 0 {
        return None;
    }

    let after = &prompt[digits_end..];
    let mut chars = after.chars();
    let separated = match chars.next() {
        None => true,
        Some(c) if c.is_whitespace() || c == ')' || c == ':' => true,
        Some('.') => !chars.next().is_some_and(|c| c.is_ascii_digit()),
        Some(_) => false,
    };
    if !separated {
        return None;
    }

    let number = prompt[..digits_end].parse().ok()?;
    let rest =
        after.trim_start_matches(|c: char| c.is_whitespace() || matches!(c, '.' | ')' | ':'));
    Some((number, rest))
}

/// 连续空白压缩为单个空格并去掉首尾空白
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boilerplate_predicates() {
        assert!(is_numeric_only("12"));
        assert!(!is_numeric_only("12a"));
        assert!(is_page_header("Page 3"));
        assert!(is_page_header("page 14 of 80"));
        assert!(!is_page_header("Pages are numbered"));
        assert!(has_delimiter_run("text\n*****\nmore"));
        assert!(!has_delimiter_run("a ** b"));
    }

    #[test]
    fn test_option_label() {
        assert_eq!(option_label("A: 3"), Some((OptionLetter::A, "3")));
        assert_eq!(option_label("b) four"), Some((OptionLetter::B, "four")));
        assert_eq!(option_label("C. five"), Some((OptionLetter::C, "five")));
        assert_eq!(option_label("D :six"), Some((OptionLetter::D, "six")));
        assert_eq!(option_label("A:"), Some((OptionLetter::A, "")));
        assert_eq!(option_label("E: seven"), None);
        assert_eq!(option_label("Answer: B"), None);
        assert_eq!(option_label("Apple"), None);
    }

    #[test]
    fn test_answer_label_and_letter() {
        assert_eq!(answer_label("Correct Answer: B"), Some("B"));
        assert_eq!(answer_label("CorrectAnswer:c"), Some("c"));
        assert_eq!(answer_label("answer : D"), Some("D"));
        assert_eq!(answer_label("Answers vary"), None);

        assert_eq!(answer_letter("B"), Some(OptionLetter::B));
        assert_eq!(answer_letter("c"), Some(OptionLetter::C));
        assert_eq!(answer_letter("Option D"), Some(OptionLetter::D));
        assert_eq!(answer_letter("b (not A)"), Some(OptionLetter::B));
        assert_eq!(answer_letter(" (c)"), Some(OptionLetter::C));
        assert_eq!(answer_letter("none"), None);
    }

    #[test]
    fn test_explanation_and_section_break() {
        assert_eq!(explanation_label("Explanation: Basic."), Some("Basic."));
        assert_eq!(explanation_label("Exp: short"), Some("short"));
        assert_eq!(explanation_label("Expected value"), None);
        assert!(is_section_break("ECO Domain Task: People 1"));
        assert!(!is_section_break("The ECO domain"));
    }

    #[test]
    fn test_leading_number() {
        assert_eq!(leading_number("7. What is it?"), Some((7, "What is it?")));
        assert_eq!(leading_number("12) Which"), Some((12, "Which")));
        assert_eq!(leading_number("3 Which"), Some((3, "Which")));
        assert_eq!(leading_number("2+2 equals?"), None);
        assert_eq!(leading_number("7.5 percent of"), None);
        assert_eq!(leading_number("What is 2+2?"), None);
    }

    #[test]
    fn test_question_marker() {
        let text = "intro\nQuestion 4: body\nquestion 5\nnot a Question 6 marker";
        let numbers: Vec<&str> = QUESTION_MARKER
            .captures_iter(text)
            .filter_map(|c| c.get(1).map(|m| m.as_str()))
            .collect();
        assert_eq!(numbers, vec!["4", "5"]);
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  a \t b\n\nc  "), "a b c");
        assert_eq!(normalize_whitespace("   "), "");
    }
}
