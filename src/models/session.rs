//! 答题会话
//!
//! 记录一次限时答题：抽中的题目、作答、得分与结束状态

use crate::error::SessionError;
use crate::models::question::{OptionLetter, QuestionRecord};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// 一次答题会话
#[derive(Debug, Clone, PartialEq)]
pub struct QuizSession {
    pub id: i64,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    /// 抽中的题号（按作答顺序）
    pub question_numbers: Vec<u32>,
    /// 题号 -> 作答
    pub answers: BTreeMap<u32, OptionLetter>,
    pub score: u32,
    pub is_completed: bool,
    pub current_index: usize,
}

impl QuizSession {
    pub fn new(id: i64, started_at: DateTime<Utc>, question_numbers: Vec<u32>) -> Self {
        Self {
            id,
            started_at,
            ended_at: None,
            question_numbers,
            answers: BTreeMap::new(),
            score: 0,
            is_completed: false,
            current_index: 0,
        }
    }

    pub fn total(&self) -> usize {
        self.question_numbers.len()
    }

    pub fn contains(&self, number: u32) -> bool {
        self.question_numbers.contains(&number)
    }

    /// 剩余秒数，不小于 0
    pub fn time_remaining(&self, now: DateTime<Utc>, limit_secs: i64) -> i64 {
        let elapsed = (now - self.started_at).num_seconds();
        (limit_secs - elapsed).max(0)
    }

    pub fn is_expired(&self, now: DateTime<Utc>, limit_secs: i64) -> bool {
        self.time_remaining(now, limit_secs) == 0
    }

    /// 记录（或覆盖）某题的作答
    pub fn record_answer(&mut self, number: u32, answer: OptionLetter) -> Result<(), SessionError> {
        if self.is_completed {
            return Err(SessionError::AlreadyCompleted { id: self.id });
        }
        if !self.contains(number) {
            return Err(SessionError::QuestionNotInSession {
                id: self.id,
                number,
            });
        }
        self.answers.insert(number, answer);
        Ok(())
    }

    /// 结束会话并计分
    pub fn complete(&mut self, now: DateTime<Utc>, questions: &[QuestionRecord]) {
        self.ended_at = Some(now);
        self.is_completed = true;
        self.score = self.calculate_score(questions);
    }

    /// 统计答对的题数（只统计本会话内的题目）
    pub fn calculate_score(&self, questions: &[QuestionRecord]) -> u32 {
        questions
            .iter()
            .filter(|q| self.contains(q.number))
            .filter(|q| self.answers.get(&q.number) == Some(&q.correct_option))
            .count() as u32
    }

    /// 逐题结果，按题号排序
    pub fn results(&self, questions: &[QuestionRecord]) -> SessionResults {
        let mut items: Vec<QuestionResult> = questions
            .iter()
            .filter(|q| self.contains(q.number))
            .map(|q| {
                let user_answer = self.answers.get(&q.number).copied();
                QuestionResult {
                    is_correct: user_answer == Some(q.correct_option),
                    user_answer,
                    question: q.clone(),
                }
            })
            .collect();
        items.sort_by_key(|r| r.question.number);

        let total = self.total();
        let percentage = if total == 0 {
            0.0
        } else {
            self.score as f64 / total as f64 * 100.0
        };

        SessionResults {
            session_id: self.id,
            score: self.score,
            total,
            percentage,
            items,
        }
    }

    /// 答错或未作答的题目
    pub fn wrong_answers(&self, questions: &[QuestionRecord]) -> Vec<QuestionResult> {
        self.results(questions)
            .items
            .into_iter()
            .filter(|r| !r.is_correct)
            .collect()
    }
}

/// 单题结果
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionResult {
    pub question: QuestionRecord,
    pub user_answer: Option<OptionLetter>,
    pub is_correct: bool,
}

/// 会话成绩
#[derive(Debug, Clone, PartialEq)]
pub struct SessionResults {
    pub session_id: i64,
    pub score: u32,
    pub total: usize,
    pub percentage: f64,
    pub items: Vec<QuestionResult>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::{AnswerConfidence, QuestionOptions};
    use chrono::Duration;

    fn question(number: u32, correct: OptionLetter) -> QuestionRecord {
        QuestionRecord {
            number,
            prompt: format!("Question body {}", number),
            options: QuestionOptions {
                a: "a".into(),
                b: "b".into(),
                c: "c".into(),
                d: "d".into(),
            },
            correct_option: correct,
            answer_confidence: AnswerConfidence::Detected,
            explanation: "because".into(),
        }
    }

    #[test]
    fn test_time_remaining_clamps_at_zero() {
        let start = Utc::now();
        let session = QuizSession::new(1, start, vec![1, 2]);

        assert_eq!(session.time_remaining(start + Duration::seconds(600), 3600), 3000);
        assert_eq!(session.time_remaining(start + Duration::seconds(4000), 3600), 0);
        assert!(session.is_expired(start + Duration::seconds(3600), 3600));
    }

    #[test]
    fn test_answers_are_scored() {
        let questions = vec![
            question(1, OptionLetter::A),
            question(2, OptionLetter::C),
            question(3, OptionLetter::D),
        ];
        let mut session = QuizSession::new(7, Utc::now(), vec![1, 2, 3]);

        session.record_answer(1, OptionLetter::A).unwrap();
        session.record_answer(2, OptionLetter::B).unwrap();
        session.record_answer(2, OptionLetter::C).unwrap();
        session.complete(Utc::now(), &questions);

        assert!(session.is_completed);
        assert_eq!(session.score, 2);

        let wrong = session.wrong_answers(&questions);
        assert_eq!(wrong.len(), 1);
        assert_eq!(wrong[0].question.number, 3);
        assert_eq!(wrong[0].user_answer, None);
    }

    #[test]
    fn test_completed_session_rejects_answers() {
        let mut session = QuizSession::new(3, Utc::now(), vec![1]);
        session.complete(Utc::now(), &[]);

        assert!(matches!(
            session.record_answer(1, OptionLetter::B),
            Err(SessionError::AlreadyCompleted { id: 3 })
        ));
    }

    #[test]
    fn test_foreign_question_rejected() {
        let mut session = QuizSession::new(4, Utc::now(), vec![1, 2]);
        assert!(matches!(
            session.record_answer(9, OptionLetter::A),
            Err(SessionError::QuestionNotInSession { number: 9, .. })
        ));
    }

    #[test]
    fn test_results_percentage() {
        let questions = vec![question(2, OptionLetter::B), question(1, OptionLetter::A)];
        let mut session = QuizSession::new(5, Utc::now(), vec![1, 2]);
        session.record_answer(2, OptionLetter::B).unwrap();
        session.complete(Utc::now(), &questions);

        let results = session.results(&questions);
        assert_eq!(results.total, 2);
        assert_eq!(results.score, 1);
        assert!((results.percentage - 50.0).abs() < f64::EPSILON);
        assert_eq!(results.items[0].question.number, 1);
    }
}
