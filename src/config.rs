use crate::error::{AppResult, ConfigError};
use crate::parser::SegmentStrategy;
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;

/// 题目解析配置
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// 题块最少字符数，低于此值视为噪声
    pub min_block_length: usize,
    /// "Question N" 切分时题块最少非空行数
    pub min_marker_lines: usize,
    /// 水印短语（整行匹配，忽略大小写）；和正文粘在同一行的水印不会被去掉
    pub watermarks: Vec<String>,
    /// 额外的页眉页脚过滤规则（正则，忽略大小写）
    pub extra_boilerplate_patterns: Vec<String>,
    /// 题块切分策略
    pub strategy: SegmentStrategy,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            min_block_length: 30,
            min_marker_lines: 7,
            watermarks: vec!["www.crystal.consulting".to_string()],
            extra_boilerplate_patterns: [r"^www\.", r"^Logo", r"^Header", r"^Footer"]
                .iter()
                .map(|p| p.to_string())
                .collect(),
            strategy: SegmentStrategy::Auto,
        }
    }
}

/// 程序配置文件
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// SQLite 数据库路径
    pub database_path: String,
    /// 题目原文（已抽取的分页文本）路径
    pub source_path: String,
    /// 低置信度题目写入的文件
    pub warn_file_path: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    // --- 答题会话 ---
    pub session_size: usize,
    pub time_limit_secs: i64,
    // --- 解析 ---
    pub parser: ParserConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: "quiz.sqlite3".to_string(),
            source_path: "questions.txt".to_string(),
            warn_file_path: "warn.txt".to_string(),
            verbose_logging: false,
            session_size: 50,
            time_limit_secs: 3600,
            parser: ParserConfig::default(),
        }
    }
}

impl Config {
    /// 加载配置：先读 `QUIZ_CONFIG` 指向的 TOML 文件（如有），再叠加环境变量
    pub fn load() -> AppResult<Self> {
        let base = match std::env::var("QUIZ_CONFIG") {
            Ok(path) => Self::from_toml_file(Path::new(&path))?,
            Err(_) => Self::default(),
        };
        base.with_overrides(|key| std::env::var(key).ok())
    }

    /// 从 TOML 文件加载，缺省字段使用默认值
    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileReadFailed {
            path: path.display().to_string(),
            source,
        })?;

        let config = toml::from_str(&content).map_err(|source| ConfigError::TomlParseFailed {
            path: path.display().to_string(),
            source,
        })?;

        Ok(config)
    }

    /// 用 `lookup` 提供的键值覆盖配置
    ///
    /// 数值解析失败时保留原值；策略名称无效时报错
    pub fn with_overrides(self, lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let strategy = match lookup("SEGMENT_STRATEGY") {
            Some(value) => value.parse()?,
            None => self.parser.strategy,
        };

        let watermarks = match lookup("WATERMARKS") {
            Some(value) => value
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            None => self.parser.watermarks,
        };

        Ok(Self {
            database_path: lookup("DATABASE_PATH").unwrap_or(self.database_path),
            source_path: lookup("SOURCE_PATH").unwrap_or(self.source_path),
            warn_file_path: lookup("WARN_FILE").unwrap_or(self.warn_file_path),
            verbose_logging: parse_var(&lookup, "VERBOSE_LOGGING").unwrap_or(self.verbose_logging),
            session_size: parse_var(&lookup, "SESSION_SIZE").unwrap_or(self.session_size),
            time_limit_secs: parse_var(&lookup, "TIME_LIMIT_SECS").unwrap_or(self.time_limit_secs),
            parser: ParserConfig {
                min_block_length: parse_var(&lookup, "MIN_BLOCK_LENGTH")
                    .unwrap_or(self.parser.min_block_length),
                min_marker_lines: parse_var(&lookup, "MIN_MARKER_LINES")
                    .unwrap_or(self.parser.min_marker_lines),
                watermarks,
                extra_boilerplate_patterns: self.parser.extra_boilerplate_patterns,
                strategy,
            },
        })
    }
}

/// 读取并解析一个环境变量，缺失或格式错误时返回 `None`
fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|v| v.trim().parse().ok())
}
