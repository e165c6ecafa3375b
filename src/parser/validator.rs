//! 记录校验
//!
//! 规范化空白、丢弃不完整的题目、补齐默认答案和默认解析

use crate::models::{
    AnswerConfidence, OptionLetter, QuestionOptions, QuestionRecord, EXPLANATION_PLACEHOLDER,
};
use crate::parser::extractor::ExtractedFields;
use crate::parser::patterns::normalize_whitespace;

/// 校验并生成题目
///
/// `accepted` 是已经通过校验的题目数，用于在没有题号时顺序编号。
/// 题干为空或任一选项为空时返回 `None`。
pub fn validate(fields: ExtractedFields, accepted: usize) -> Option<QuestionRecord> {
    let prompt = normalize_whitespace(&fields.prompt);
    let options = QuestionOptions {
        a: normalize_whitespace(&fields.options.a),
        b: normalize_whitespace(&fields.options.b),
        c: normalize_whitespace(&fields.options.c),
        d: normalize_whitespace(&fields.options.d),
    };

    if prompt.is_empty() || !options.is_complete() {
        return None;
    }

    let (correct_option, answer_confidence) = match fields.correct_option {
        Some(letter) => (letter, AnswerConfidence::Detected),
        None => (OptionLetter::A, AnswerConfidence::Defaulted),
    };

    let explanation = match normalize_whitespace(&fields.explanation) {
        text if text.is_empty() => EXPLANATION_PLACEHOLDER.to_string(),
        text => text,
    };

    let number = fields
        .prompt_number
        .or(fields.block_number)
        .unwrap_or(accepted as u32 + 1);

    Some(QuestionRecord {
        number,
        prompt,
        options,
        correct_option,
        answer_confidence,
        explanation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> ExtractedFields {
        ExtractedFields {
            prompt: "  What   is 2+2? ".into(),
            options: QuestionOptions {
                a: "3".into(),
                b: " 4 ".into(),
                c: "5".into(),
                d: "6".into(),
            },
            correct_option: Some(OptionLetter::B),
            explanation: "Basic\tarithmetic.".into(),
            prompt_number: None,
            block_number: None,
        }
    }

    #[test]
    fn test_normalizes_fields() {
        let record = validate(fields(), 0).unwrap();
        assert_eq!(record.prompt, "What is 2+2?");
        assert_eq!(record.options.b, "4");
        assert_eq!(record.explanation, "Basic arithmetic.");
        assert_eq!(record.answer_confidence, AnswerConfidence::Detected);
        assert_eq!(record.number, 1);
    }

    #[test]
    fn test_rejects_blank_option() {
        let mut f = fields();
        f.options.c = "   ".into();
        assert!(validate(f, 0).is_none());
    }

    #[test]
    fn test_rejects_blank_prompt() {
        let mut f = fields();
        f.prompt = "\n".into();
        assert!(validate(f, 0).is_none());
    }

    #[test]
    fn test_defaults() {
        let mut f = fields();
        f.correct_option = None;
        f.explanation = String::new();

        let record = validate(f, 4).unwrap();
        assert_eq!(record.correct_option, OptionLetter::A);
        assert!(record.is_low_confidence());
        assert_eq!(record.explanation, EXPLANATION_PLACEHOLDER);
        assert_eq!(record.number, 5);
    }

    #[test]
    fn test_number_precedence() {
        let mut f = fields();
        f.block_number = Some(30);
        assert_eq!(validate(f.clone(), 0).unwrap().number, 30);

        f.prompt_number = Some(12);
        assert_eq!(validate(f, 0).unwrap().number, 12);
    }
}
