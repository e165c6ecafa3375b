//! 题库存储 - 基础设施层
//!
//! 唯一持有 SQLite 连接的地方，对外只暴露"存题、查题、存会话"的能力

use crate::error::{AppError, AppResult, SessionError, StoreError};
use crate::models::{AnswerConfidence, OptionLetter, QuestionOptions, QuestionRecord, QuizSession};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS quiz_question (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    question_number INTEGER UNIQUE NOT NULL,
    question_text TEXT NOT NULL,
    option_a TEXT NOT NULL,
    option_b TEXT NOT NULL,
    option_c TEXT NOT NULL,
    option_d TEXT NOT NULL,
    correct_option TEXT NOT NULL CHECK (correct_option IN ('A', 'B', 'C', 'D')),
    answer_defaulted INTEGER NOT NULL DEFAULT 0,
    explanation TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS quiz_session (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    start_time TEXT NOT NULL,
    end_time TEXT,
    selected_questions TEXT NOT NULL,
    user_answers TEXT NOT NULL DEFAULT '{}',
    score INTEGER NOT NULL DEFAULT 0,
    is_completed INTEGER NOT NULL DEFAULT 0,
    current_question_index INTEGER NOT NULL DEFAULT 0
);
"#;

const QUESTION_COLUMNS: &str = "question_number, question_text, option_a, option_b, option_c, \
     option_d, correct_option, answer_defaulted, explanation";

/// 题库查询条件
#[derive(Debug, Clone, Default)]
pub struct QuestionFilter {
    /// 题干包含的文本（忽略大小写）
    pub search: Option<String>,
    /// 正确答案
    pub correct_option: Option<OptionLetter>,
}

/// 题库能力
///
/// `replace_all` 是整体替换：删除全部旧题后写入新题
pub trait QuestionRepository {
    fn replace_all(&mut self, records: &[QuestionRecord]) -> AppResult<usize>;
    fn list(&self, filter: &QuestionFilter) -> AppResult<Vec<QuestionRecord>>;
    fn count(&self) -> AppResult<usize>;
    fn get(&self, number: u32) -> AppResult<Option<QuestionRecord>>;
}

/// SQLite 题库
pub struct QuestionStore {
    conn: Connection,
}

impl QuestionStore {
    /// 打开（必要时创建）数据库文件
    pub fn open(db_path: &Path) -> AppResult<Self> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|source| StoreError::CreateDirFailed {
                    path: parent.display().to_string(),
                    source,
                })?;
            }
        }

        let conn = Connection::open(db_path)?;
        debug!("已打开数据库: {}", db_path.display());
        Self::with_connection(conn)
    }

    /// 内存数据库（测试用）
    pub fn open_in_memory() -> AppResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> AppResult<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// 题号最小的 `limit` 道题的题号
    pub fn first_numbers(&self, limit: usize) -> AppResult<Vec<u32>> {
        let mut stmt = self.conn.prepare(
            "SELECT question_number FROM quiz_question ORDER BY question_number LIMIT ?1",
        )?;
        let numbers = stmt
            .query_map(params![limit as i64], |row| row.get::<_, u32>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(numbers)
    }

    /// 按给定题号取题，结果按题号排序，不存在的题号跳过
    pub fn questions_by_numbers(&self, numbers: &[u32]) -> AppResult<Vec<QuestionRecord>> {
        let mut records = Vec::with_capacity(numbers.len());
        for number in numbers {
            if let Some(record) = self.get(*number)? {
                records.push(record);
            }
        }
        records.sort_by_key(|r| r.number);
        Ok(records)
    }

    // ========== 答题会话 ==========

    /// 新建会话
    pub fn create_session(
        &mut self,
        started_at: DateTime<Utc>,
        question_numbers: Vec<u32>,
    ) -> AppResult<QuizSession> {
        self.conn.execute(
            "INSERT INTO quiz_session (start_time, selected_questions) VALUES (?1, ?2)",
            params![
                started_at.to_rfc3339(),
                serde_json::to_string(&question_numbers)?
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        Ok(QuizSession::new(id, started_at, question_numbers))
    }

    /// 读取会话
    pub fn load_session(&self, id: i64) -> AppResult<QuizSession> {
        let row = self
            .conn
            .query_row(
                "SELECT id, start_time, end_time, selected_questions, user_answers, score, \
                 is_completed, current_question_index FROM quiz_session WHERE id = ?1",
                params![id],
                SessionRow::from_row,
            )
            .optional()?;

        match row {
            Some(row) => row.into_session(),
            None => Err(SessionError::NotFound { id }.into()),
        }
    }

    /// 保存会话的当前状态
    pub fn save_session(&self, session: &QuizSession) -> AppResult<()> {
        let updated = self.conn.execute(
            "UPDATE quiz_session SET end_time = ?1, user_answers = ?2, score = ?3, \
             is_completed = ?4, current_question_index = ?5 WHERE id = ?6",
            params![
                session.ended_at.map(|t| t.to_rfc3339()),
                serde_json::to_string(&session.answers)?,
                session.score,
                session.is_completed,
                session.current_index as i64,
                session.id,
            ],
        )?;

        if updated == 0 {
            return Err(SessionError::NotFound { id: session.id }.into());
        }
        Ok(())
    }
}

impl QuestionRepository for QuestionStore {
    /// 在同一个事务里删除旧题、写入新题；任一步失败旧题保持不变
    fn replace_all(&mut self, records: &[QuestionRecord]) -> AppResult<usize> {
        let tx = self.conn.transaction()?;
        let deleted = tx.execute("DELETE FROM quiz_question", [])?;
        info!("🗑️ 删除旧题 {} 道", deleted);

        {
            let sql = format!(
                "INSERT INTO quiz_question ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                QUESTION_COLUMNS
            );
            let mut stmt = tx.prepare(&sql)?;
            for record in records {
                stmt.execute(params![
                    record.number,
                    record.prompt,
                    record.options.a,
                    record.options.b,
                    record.options.c,
                    record.options.d,
                    record.correct_option.to_string(),
                    record.is_low_confidence(),
                    record.explanation,
                ])?;
                debug!("已保存第 {} 题", record.number);
            }
        }

        tx.commit()?;
        Ok(records.len())
    }

    fn list(&self, filter: &QuestionFilter) -> AppResult<Vec<QuestionRecord>> {
        let sql = format!(
            "SELECT {} FROM quiz_question \
             WHERE (?1 IS NULL OR question_text LIKE '%' || ?1 || '%') \
             AND (?2 IS NULL OR correct_option = ?2) \
             ORDER BY question_number",
            QUESTION_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(
                params![
                    filter.search.as_deref(),
                    filter.correct_option.map(|l| l.to_string())
                ],
                QuestionRow::from_row,
            )?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter().map(QuestionRecord::try_from).collect()
    }

    fn count(&self) -> AppResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM quiz_question", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn get(&self, number: u32) -> AppResult<Option<QuestionRecord>> {
        let sql = format!(
            "SELECT {} FROM quiz_question WHERE question_number = ?1",
            QUESTION_COLUMNS
        );
        let row = self
            .conn
            .query_row(&sql, params![number], QuestionRow::from_row)
            .optional()?;
        row.map(QuestionRecord::try_from).transpose()
    }
}

// ========== 行映射 ==========

struct QuestionRow {
    number: u32,
    prompt: String,
    options: QuestionOptions,
    correct_option: String,
    answer_defaulted: bool,
    explanation: String,
}

impl QuestionRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            number: row.get(0)?,
            prompt: row.get(1)?,
            options: QuestionOptions {
                a: row.get(2)?,
                b: row.get(3)?,
                c: row.get(4)?,
                d: row.get(5)?,
            },
            correct_option: row.get(6)?,
            answer_defaulted: row.get(7)?,
            explanation: row.get(8)?,
        })
    }
}

impl TryFrom<QuestionRow> for QuestionRecord {
    type Error = AppError;

    fn try_from(row: QuestionRow) -> Result<Self, Self::Error> {
        let correct_option: OptionLetter = row
            .correct_option
            .parse()
            .map_err(|value: String| AppError::corrupted("correct_option", value))?;

        Ok(QuestionRecord {
            number: row.number,
            prompt: row.prompt,
            options: row.options,
            correct_option,
            answer_confidence: if row.answer_defaulted {
                AnswerConfidence::Defaulted
            } else {
                AnswerConfidence::Detected
            },
            explanation: row.explanation,
        })
    }
}

struct SessionRow {
    id: i64,
    start_time: String,
    end_time: Option<String>,
    selected_questions: String,
    user_answers: String,
    score: u32,
    is_completed: bool,
    current_index: i64,
}

impl SessionRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            start_time: row.get(1)?,
            end_time: row.get(2)?,
            selected_questions: row.get(3)?,
            user_answers: row.get(4)?,
            score: row.get(5)?,
            is_completed: row.get(6)?,
            current_index: row.get(7)?,
        })
    }

    fn into_session(self) -> AppResult<QuizSession> {
        let answers: BTreeMap<u32, OptionLetter> = serde_json::from_str(&self.user_answers)?;
        Ok(QuizSession {
            id: self.id,
            started_at: parse_time("start_time", &self.start_time)?,
            ended_at: self
                .end_time
                .as_deref()
                .map(|t| parse_time("end_time", t))
                .transpose()?,
            question_numbers: serde_json::from_str(&self.selected_questions)?,
            answers,
            score: self.score,
            is_completed: self.is_completed,
            current_index: self.current_index.max(0) as usize,
        })
    }
}

fn parse_time(field: &'static str, value: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| AppError::corrupted(field, value))
}
