use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 没有解析到解析说明时使用的占位文本
pub const EXPLANATION_PLACEHOLDER: &str = "No explanation provided.";

/// 选项字母
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OptionLetter {
    A,
    B,
    C,
    D,
}

impl OptionLetter {
    pub const ALL: [OptionLetter; 4] = [
        OptionLetter::A,
        OptionLetter::B,
        OptionLetter::C,
        OptionLetter::D,
    ];

    /// 从字符解析（忽略大小写）
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'A' => Some(OptionLetter::A),
            'B' => Some(OptionLetter::B),
            'C' => Some(OptionLetter::C),
            'D' => Some(OptionLetter::D),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            OptionLetter::A => 'A',
            OptionLetter::B => 'B',
            OptionLetter::C => 'C',
            OptionLetter::D => 'D',
        }
    }
}

impl fmt::Display for OptionLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for OptionLetter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::from_char(c).ok_or_else(|| s.to_string()),
            _ => Err(s.to_string()),
        }
    }
}

/// 四个选项的文本
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOptions {
    pub a: String,
    pub b: String,
    pub c: String,
    pub d: String,
}

impl QuestionOptions {
    pub fn get(&self, letter: OptionLetter) -> &str {
        match letter {
            OptionLetter::A => &self.a,
            OptionLetter::B => &self.b,
            OptionLetter::C => &self.c,
            OptionLetter::D => &self.d,
        }
    }

    pub fn get_mut(&mut self, letter: OptionLetter) -> &mut String {
        match letter {
            OptionLetter::A => &mut self.a,
            OptionLetter::B => &mut self.b,
            OptionLetter::C => &mut self.c,
            OptionLetter::D => &mut self.d,
        }
    }

    /// 按字母顺序遍历
    pub fn iter(&self) -> impl Iterator<Item = (OptionLetter, &str)> {
        OptionLetter::ALL.into_iter().map(move |l| (l, self.get(l)))
    }

    /// 四个选项是否都非空
    pub fn is_complete(&self) -> bool {
        self.iter().all(|(_, text)| !text.is_empty())
    }
}

/// 正确答案的来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnswerConfidence {
    /// 原文中明确标注
    Detected,
    /// 原文中没有找到，按规则默认为 A
    Defaulted,
}

/// 一道完整的题目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub number: u32,
    pub prompt: String,
    pub options: QuestionOptions,
    pub correct_option: OptionLetter,
    pub answer_confidence: AnswerConfidence,
    pub explanation: String,
}

impl QuestionRecord {
    /// 正确答案是否为默认值（低置信度）
    pub fn is_low_confidence(&self) -> bool {
        self.answer_confidence == AnswerConfidence::Defaulted
    }

    pub fn correct_text(&self) -> &str {
        self.options.get(self.correct_option)
    }
}

impl fmt::Display for QuestionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}. {}", self.number, self.prompt)?;
        for (letter, text) in self.options.iter() {
            writeln!(f, "   {}: {}", letter, text)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_letter_parse() {
        assert_eq!("b".parse::<OptionLetter>(), Ok(OptionLetter::B));
        assert_eq!(" D ".parse::<OptionLetter>(), Ok(OptionLetter::D));
        assert!("E".parse::<OptionLetter>().is_err());
        assert!("AB".parse::<OptionLetter>().is_err());
        assert!("".parse::<OptionLetter>().is_err());
    }

    #[test]
    fn test_options_completeness() {
        let mut options = QuestionOptions {
            a: "3".into(),
            b: "4".into(),
            c: "5".into(),
            d: String::new(),
        };
        assert!(!options.is_complete());

        options.get_mut(OptionLetter::D).push('6');
        assert!(options.is_complete());
        assert_eq!(options.get(OptionLetter::D), "6");
    }
}
