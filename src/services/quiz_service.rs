//! 答题服务 - 业务能力层
//!
//! 负责一次限时答题的全部规则：开考、作答、超时、交卷、看结果。
//! 时间由调用方传入，方便测试。

use crate::config::Config;
use crate::error::{AppResult, SessionError};
use crate::infrastructure::{QuestionRepository, QuestionStore};
use crate::models::{OptionLetter, QuestionRecord, QuestionResult, QuizSession, SessionResults};
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

/// 答题服务
pub struct QuizService {
    session_size: usize,
    time_limit_secs: i64,
}

impl QuizService {
    pub fn new(config: &Config) -> Self {
        Self::with_limits(config.session_size, config.time_limit_secs)
    }

    pub fn with_limits(session_size: usize, time_limit_secs: i64) -> Self {
        Self {
            session_size,
            time_limit_secs,
        }
    }

    /// 开考：按题号取前 `session_size` 道题
    pub fn begin(&self, store: &mut QuestionStore, now: DateTime<Utc>) -> AppResult<QuizSession> {
        let available = store.count()?;
        if available < self.session_size {
            return Err(SessionError::NotEnoughQuestions {
                available,
                required: self.session_size,
            }
            .into());
        }

        let numbers = store.first_numbers(self.session_size)?;
        let session = store.create_session(now, numbers)?;
        info!(
            "📝 会话 {} 开始，共 {} 题，限时 {} 秒",
            session.id,
            session.total(),
            self.time_limit_secs
        );
        Ok(session)
    }

    /// 会话内的题目，按题号排序
    pub fn questions(
        &self,
        store: &QuestionStore,
        session: &QuizSession,
    ) -> AppResult<Vec<QuestionRecord>> {
        store.questions_by_numbers(&session.question_numbers)
    }

    pub fn time_remaining(&self, session: &QuizSession, now: DateTime<Utc>) -> i64 {
        session.time_remaining(now, self.time_limit_secs)
    }

    /// 读取会话；超时未交卷的会话在这里自动交卷
    pub fn resume(
        &self,
        store: &mut QuestionStore,
        id: i64,
        now: DateTime<Utc>,
    ) -> AppResult<QuizSession> {
        let mut session = store.load_session(id)?;
        self.expire_if_due(store, &mut session, now)?;
        Ok(session)
    }

    /// 作答
    ///
    /// `input` 是用户输入的选项字母；会话已超时时不记录作答，直接交卷
    pub fn answer(
        &self,
        store: &mut QuestionStore,
        id: i64,
        number: u32,
        input: &str,
        now: DateTime<Utc>,
    ) -> AppResult<QuizSession> {
        let mut session = store.load_session(id)?;
        if self.expire_if_due(store, &mut session, now)? {
            return Ok(session);
        }

        let letter: OptionLetter = input
            .parse()
            .map_err(|input| SessionError::InvalidAnswer { input })?;
        session.record_answer(number, letter)?;

        if let Some(pos) = session.question_numbers.iter().position(|n| *n == number) {
            session.current_index = (pos + 1).min(session.total());
        }
        store.save_session(&session)?;
        debug!("会话 {} 第 {} 题作答: {}", id, number, letter);
        Ok(session)
    }

    /// 交卷并计分；已交卷的会话原样返回结果
    pub fn submit(
        &self,
        store: &mut QuestionStore,
        id: i64,
        now: DateTime<Utc>,
    ) -> AppResult<SessionResults> {
        let mut session = store.load_session(id)?;
        let questions = self.questions(store, &session)?;

        if !session.is_completed {
            session.complete(now, &questions);
            store.save_session(&session)?;
            info!(
                "✅ 会话 {} 已交卷: {}/{}",
                session.id,
                session.score,
                session.total()
            );
        }
        Ok(session.results(&questions))
    }

    /// 成绩单，只对已结束的会话开放
    pub fn results(
        &self,
        store: &mut QuestionStore,
        id: i64,
        now: DateTime<Utc>,
    ) -> AppResult<SessionResults> {
        let session = self.completed_session(store, id, now)?;
        let questions = self.questions(store, &session)?;
        Ok(session.results(&questions))
    }

    /// 答错或未作答的题目，附正确答案与解析
    pub fn wrong_answers(
        &self,
        store: &mut QuestionStore,
        id: i64,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<QuestionResult>> {
        let session = self.completed_session(store, id, now)?;
        let questions = self.questions(store, &session)?;
        Ok(session.wrong_answers(&questions))
    }

    fn completed_session(
        &self,
        store: &mut QuestionStore,
        id: i64,
        now: DateTime<Utc>,
    ) -> AppResult<QuizSession> {
        let session = self.resume(store, id, now)?;
        if !session.is_completed {
            return Err(SessionError::NotCompleted { id }.into());
        }
        Ok(session)
    }

    /// 超时则交卷，返回是否发生了超时交卷
    fn expire_if_due(
        &self,
        store: &mut QuestionStore,
        session: &mut QuizSession,
        now: DateTime<Utc>,
    ) -> AppResult<bool> {
        if session.is_completed || !session.is_expired(now, self.time_limit_secs) {
            return Ok(false);
        }

        warn!("⏰ 会话 {} 已超时，自动交卷", session.id);
        let questions = self.questions(store, session)?;
        session.complete(now, &questions);
        store.save_session(session)?;
        Ok(true)
    }
}
