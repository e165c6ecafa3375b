//! 应用主结构 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：打开题库
//! 2. **命令分发**：load / list / quiz / results
//! 3. **资源管理**：唯一持有 `QuestionStore` 的模块
//!
//! 具体规则都在 workflow 和 services 里，这里只做调度和输出

use crate::cli::{Commands, ListArgs, LoadArgs};
use crate::config::Config;
use crate::error::{AppError, SessionError};
use crate::infrastructure::{QuestionFilter, QuestionRepository, QuestionStore, TextFileSource};
use crate::models::{QuestionRecord, QuestionResult, SessionResults};
use crate::services::QuizService;
use crate::utils::logging::{log_startup, truncate_text};
use crate::workflow::{LoadFlow, LoadReport};
use anyhow::{Context, Result};
use chrono::Utc;
use std::path::Path;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{info, warn};

/// 应用主结构
pub struct App {
    config: Config,
    store: QuestionStore,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> Result<Self> {
        let store = QuestionStore::open(Path::new(&config.database_path))
            .with_context(|| format!("无法打开题库: {}", config.database_path))?;
        Ok(Self { config, store })
    }

    pub fn store(&self) -> &QuestionStore {
        &self.store
    }

    /// 运行一条命令
    pub async fn run(&mut self, command: Commands) -> Result<()> {
        log_startup(command_name(&command), &self.config.database_path);

        match command {
            Commands::Load(args) => {
                self.load(args).await?;
            }
            Commands::List(args) => self.list(args)?,
            Commands::Quiz => {
                let stdin = BufReader::new(tokio::io::stdin());
                self.quiz(stdin).await?;
            }
            Commands::Results(args) => self.results(args.session_id)?,
        }
        Ok(())
    }

    /// 读取原文并整体替换题库
    pub async fn load(&mut self, args: LoadArgs) -> Result<LoadReport> {
        let mut config = self.config.clone();
        if let Some(strategy) = args.strategy {
            config.parser.strategy = strategy;
        }
        let source_path = args.source.unwrap_or_else(|| config.source_path.clone());

        let pages = TextFileSource::new(&source_path).read_pages().await?;
        let flow = LoadFlow::new(&config)?;
        let report = flow
            .run(&pages, &mut self.store)
            .with_context(|| format!("导入失败: {}", source_path))?;
        Ok(report)
    }

    /// 列出题库
    pub fn list(&self, args: ListArgs) -> Result<()> {
        let filter = QuestionFilter::from(args);
        let questions = self.store.list(&filter)?;
        let total = self.store.count()?;

        for question in &questions {
            println!("{}", format_list_row(question));
        }
        info!("共 {} 道（题库总数 {}）", questions.len(), total);
        Ok(())
    }

    /// 交互式答题，返回会话编号
    ///
    /// 每题输入 A-D 作答，直接回车跳过，输入 q 提前交卷
    pub async fn quiz<R: AsyncBufRead + Unpin>(&mut self, input: R) -> Result<i64> {
        let service = QuizService::new(&self.config);
        let session = service.begin(&mut self.store, Utc::now())?;
        let questions = service.questions(&self.store, &session)?;

        let mut lines = input.lines();
        let mut index = 0;

        while index < questions.len() {
            let question = &questions[index];
            let remaining = service.time_remaining(&session, Utc::now());
            print_question(question, index + 1, questions.len(), remaining);

            let Some(line) = lines.next_line().await? else {
                break;
            };
            let answer = line.trim();
            if answer.eq_ignore_ascii_case("q") {
                break;
            }
            if answer.is_empty() {
                index += 1;
                continue;
            }

            match service.answer(&mut self.store, session.id, question.number, answer, Utc::now()) {
                Ok(updated) if updated.is_completed => {
                    println!("⏰ 时间到，已自动交卷");
                    break;
                }
                Ok(_) => index += 1,
                Err(AppError::Session(SessionError::InvalidAnswer { input })) => {
                    println!("无法识别的选项 \"{}\"，请输入 A、B、C 或 D", input);
                }
                Err(e) => return Err(e.into()),
            }
        }

        let results = service.submit(&mut self.store, session.id, Utc::now())?;
        print_results(&results);
        print_wrong_answers(results.items.iter().filter(|r| !r.is_correct));
        Ok(session.id)
    }

    /// 查看成绩与错题
    pub fn results(&mut self, session_id: i64) -> Result<()> {
        let service = QuizService::new(&self.config);
        let now = Utc::now();

        let results = service
            .results(&mut self.store, session_id, now)
            .with_context(|| format!("无法读取会话 {} 的成绩", session_id))?;
        let wrong = service.wrong_answers(&mut self.store, session_id, now)?;

        print_results(&results);
        print_wrong_answers(&wrong);
        Ok(())
    }
}

fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Load(_) => "导入题目",
        Commands::List(_) => "题库列表",
        Commands::Quiz => "限时答题",
        Commands::Results(_) => "查看成绩",
    }
}

// ========== 输出辅助函数 ==========

fn format_list_row(question: &QuestionRecord) -> String {
    let flag = if question.is_low_confidence() { " ⚠" } else { "" };
    format!(
        "#{:<5} [{}]{} {}",
        question.number,
        question.correct_option,
        flag,
        truncate_text(&question.prompt, 70)
    )
}

fn print_question(question: &QuestionRecord, position: usize, total: usize, remaining_secs: i64) {
    println!("\n{}", "─".repeat(60));
    println!(
        "第 {}/{} 题 (题号 {})    剩余时间 {:02}:{:02}",
        position,
        total,
        question.number,
        remaining_secs / 60,
        remaining_secs % 60
    );
    println!("{}", question.prompt);
    for (letter, text) in question.options.iter() {
        println!("  {}. {}", letter, text);
    }
    println!("请输入答案 (A-D，回车跳过，q 交卷):");
}

fn print_results(results: &SessionResults) {
    println!("\n{}", "=".repeat(60));
    println!("📊 会话 {} 成绩", results.session_id);
    println!(
        "得分: {}/{} ({:.1}%)",
        results.score, results.total, results.percentage
    );
    println!("{}", "=".repeat(60));
}

fn print_wrong_answers<'a>(wrong: impl IntoIterator<Item = &'a QuestionResult>) {
    let wrong: Vec<&QuestionResult> = wrong.into_iter().collect();
    if wrong.is_empty() {
        println!("🎉 全部答对");
        return;
    }

    println!("错题 {} 道:", wrong.len());
    for item in wrong {
        let question = &item.question;
        println!("\n#{} {}", question.number, question.prompt);
        match item.user_answer {
            Some(letter) => println!(
                "  你的答案: {}. {}",
                letter,
                question.options.get(letter)
            ),
            None => println!("  你的答案: 未作答"),
        }
        println!(
            "  正确答案: {}. {}",
            question.correct_option,
            question.correct_text()
        );
        if question.is_low_confidence() {
            warn!("第 {} 题的正确答案为默认值，请人工复核", question.number);
        }
        println!("  解析: {}", question.explanation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnswerConfidence, OptionLetter, QuestionOptions};

    #[test]
    fn test_list_row_flags_low_confidence() {
        let record = QuestionRecord {
            number: 12,
            prompt: "Which of these is a deliverable?".into(),
            options: QuestionOptions::default(),
            correct_option: OptionLetter::A,
            answer_confidence: AnswerConfidence::Defaulted,
            explanation: String::new(),
        };
        let row = format_list_row(&record);
        assert!(row.starts_with("#12"));
        assert!(row.contains("[A] ⚠"));
    }
}
