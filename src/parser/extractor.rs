//! 字段抽取
//!
//! 自上而下逐行扫描一个题块，把每一行归入题干、选项、答案或解析。
//! 不会报错：格式不完整的题块也会交给校验层处理。

use crate::models::{OptionLetter, QuestionOptions};
use crate::parser::patterns;
use crate::parser::segmenter::QuestionBlock;

/// 扫描状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractState {
    /// 收集题干（初始状态）
    CollectingPrompt,
    /// 已出现选项 A
    Options,
    /// 四个选项都已出现
    AnswerExpected,
    /// 收集解析，直到题块结束
    CollectingExplanation,
}

/// 从题块中抽出的原始字段，任何一项都可能为空
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedFields {
    pub prompt: String,
    pub options: QuestionOptions,
    pub correct_option: Option<OptionLetter>,
    pub explanation: String,
    /// 题干开头的题号
    pub prompt_number: Option<u32>,
    /// 切分阶段带来的题号
    pub block_number: Option<u32>,
}

/// 逐行抽取字段
pub fn extract(block: &QuestionBlock) -> ExtractedFields {
    let mut fields = ExtractedFields {
        block_number: block.number_hint,
        ..ExtractedFields::default()
    };

    let mut state = ExtractState::CollectingPrompt;
    let mut prompt_parts: Vec<&str> = Vec::new();
    let mut explanation_parts: Vec<&str> = Vec::new();
    let mut seen = [false; 4];
    // 未标注的行续接到这个选项后面（选项换行）
    let mut continuing: Option<OptionLetter> = None;

    for line in block.lines.iter().map(String::as_str) {
        if patterns::is_section_break(line) {
            break;
        }

        if state == ExtractState::CollectingExplanation {
            if patterns::option_label(line).is_some() {
                continue;
            }
            if let Some(rest) = patterns::answer_label(line) {
                if fields.correct_option.is_none() {
                    fields.correct_option = patterns::answer_letter(rest);
                }
                continue;
            }
            explanation_parts.push(line);
            continue;
        }

        if let Some((letter, rest)) = patterns::option_label(line) {
            if letter == OptionLetter::A || state != ExtractState::CollectingPrompt {
                *fields.options.get_mut(letter) = rest.to_string();
                seen[letter as usize] = true;
                continuing = Some(letter);
                state = if seen.iter().all(|s| *s) {
                    ExtractState::AnswerExpected
                } else {
                    ExtractState::Options
                };
                continue;
            }
        }

        if let Some(rest) = patterns::answer_label(line) {
            if let Some(letter) = patterns::answer_letter(rest) {
                fields.correct_option = Some(letter);
            }
            continuing = None;
            continue;
        }

        if let Some(rest) = patterns::explanation_label(line) {
            state = ExtractState::CollectingExplanation;
            explanation_parts.push(rest);
            continue;
        }

        match state {
            ExtractState::CollectingPrompt => prompt_parts.push(line),
            ExtractState::Options | ExtractState::AnswerExpected => {
                if let Some(letter) = continuing {
                    let option = fields.options.get_mut(letter);
                    option.push(' ');
                    option.push_str(line);
                }
            }
            ExtractState::CollectingExplanation => {}
        }
    }

    let prompt = prompt_parts.join(" ");
    match patterns::leading_number(prompt.trim_start()) {
        Some((number, rest)) => {
            fields.prompt_number = Some(number).filter(|n| *n > 0);
            fields.prompt = rest.to_string();
        }
        None => fields.prompt = prompt,
    }
    fields.explanation = explanation_parts.join(" ");

    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(lines: &[&str]) -> QuestionBlock {
        QuestionBlock {
            ordinal: 0,
            lines: lines.iter().map(|l| l.to_string()).collect(),
            number_hint: None,
        }
    }

    #[test]
    fn test_complete_block() {
        let fields = extract(&block(&[
            "What is",
            "2+2?",
            "A: 3",
            "B: 4",
            "C: 5",
            "D: 6",
            "Correct Answer: B",
            "Explanation: Basic",
            "arithmetic.",
        ]));

        assert_eq!(fields.prompt, "What is 2+2?");
        assert_eq!(fields.options.get(OptionLetter::B), "4");
        assert_eq!(fields.options.get(OptionLetter::D), "6");
        assert_eq!(fields.correct_option, Some(OptionLetter::B));
        assert_eq!(fields.explanation, "Basic arithmetic.");
        assert_eq!(fields.prompt_number, None);
    }

    #[test]
    fn test_leading_number_is_stripped() {
        let fields = extract(&block(&["7. What is it?", "A: a", "B: b", "C: c", "D: d"]));
        assert_eq!(fields.prompt_number, Some(7));
        assert_eq!(fields.prompt, "What is it?");
    }

    #[test]
    fn test_later_options_before_a_stay_in_prompt() {
        let fields = extract(&block(&["Pick one", "B: early", "A: a", "C: c", "D: d"]));
        assert_eq!(fields.prompt, "Pick one B: early");
        assert!(fields.options.get(OptionLetter::B).is_empty());
    }

    #[test]
    fn test_wrapped_option_text_is_joined() {
        let fields = extract(&block(&[
            "Prompt",
            "A: first half",
            "second half",
            "B: b",
            "C: c",
            "D: d",
            "Answer: C",
            "stray line",
        ]));
        assert_eq!(fields.options.get(OptionLetter::A), "first half second half");
        assert_eq!(fields.options.get(OptionLetter::D), "d");
    }

    #[test]
    fn test_explanation_skips_labels_and_stops_at_section_break() {
        let fields = extract(&block(&[
            "Prompt",
            "A: a",
            "B: b",
            "C: c",
            "D: d",
            "Exp: First",
            "B) not an option any more",
            "Answer: D",
            "second",
            "ECO Domain Task: People",
            "trailing admin text",
        ]));
        assert_eq!(fields.explanation, "First second");
        assert_eq!(fields.correct_option, Some(OptionLetter::D));
        assert_eq!(fields.options.get(OptionLetter::B), "b");
    }

    #[test]
    fn test_answer_before_explanation_wins() {
        let fields = extract(&block(&[
            "Prompt",
            "A: a",
            "B: b",
            "C: c",
            "D: d",
            "Correct Answer: A",
            "Explanation: text",
            "Answer: C",
        ]));
        assert_eq!(fields.correct_option, Some(OptionLetter::A));
    }

    #[test]
    fn test_block_number_carried() {
        let mut b = block(&["Prompt", "A: a"]);
        b.number_hint = Some(42);
        let fields = extract(&b);
        assert_eq!(fields.block_number, Some(42));
        assert_eq!(fields.prompt_number, None);
    }
}
