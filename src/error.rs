use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 文本源错误（无法取得题目原文）
    #[error("文本源错误: {0}")]
    Source(#[from] SourceError),
    /// 题库存储错误
    #[error("存储错误: {0}")]
    Store(#[from] StoreError),
    /// 题目导入错误
    #[error("导入错误: {0}")]
    Load(#[from] LoadError),
    /// 答题会话错误
    #[error("会话错误: {0}")]
    Session(#[from] SessionError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// 文本源错误
///
/// 只有"完全拿不到原文"才算这一类，解析层面的问题都在本地兜底
#[derive(Debug, Error)]
pub enum SourceError {
    /// 文件不存在
    #[error("文件不存在: {path}")]
    NotFound { path: String },
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// 题库存储错误
#[derive(Debug, Error)]
pub enum StoreError {
    /// SQLite 调用失败
    #[error("SQLite 调用失败: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// JSON 编解码失败
    #[error("JSON 编解码失败: {0}")]
    Json(#[from] serde_json::Error),
    /// 数据库中的字段无法还原
    #[error("数据损坏 ({field}): {value}")]
    Corrupted { field: &'static str, value: String },
    /// 无法创建数据库目录
    #[error("无法创建数据库目录 ({path}): {source}")]
    CreateDirFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// 题目导入错误
#[derive(Debug, Error)]
pub enum LoadError {
    /// 一道题都没有解析出来
    #[error("没有解析出任何题目 (共切分 {blocks} 个题块)，请检查原文格式")]
    NoQuestionsParsed { blocks: usize },
    /// 题号重复
    #[error("题号 {number} 重复出现，拒绝写入题库")]
    DuplicateNumber { number: u32 },
    /// 写入告警文件失败
    #[error("写入告警文件失败 ({path}): {source}")]
    WarnWriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// 答题会话错误
#[derive(Debug, Error)]
pub enum SessionError {
    /// 题库题目数量不足
    #[error("题库题目不足: 现有 {available} 道，需要 {required} 道")]
    NotEnoughQuestions { available: usize, required: usize },
    /// 会话不存在
    #[error("会话 {id} 不存在")]
    NotFound { id: i64 },
    /// 会话已结束
    #[error("会话 {id} 已结束")]
    AlreadyCompleted { id: i64 },
    /// 会话尚未结束
    #[error("会话 {id} 尚未结束")]
    NotCompleted { id: i64 },
    /// 题目不属于该会话
    #[error("题目 {number} 不在会话 {id} 中")]
    QuestionNotInSession { id: i64, number: u32 },
    /// 无法识别的选项
    #[error("无法识别的选项: {input}")]
    InvalidAnswer { input: String },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 切分策略名称无效
    #[error("未知的切分策略: {value} (可选 auto / delimiter / marker)")]
    InvalidStrategy { value: String },
    /// 过滤规则不是合法的正则表达式
    #[error("无效的过滤规则 '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    /// 读取配置文件失败
    #[error("读取配置文件失败 ({path}): {source}")]
    FileReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

// ========== 从常见错误类型转换 ==========

impl From<rusqlite::Error> for AppError {
    fn from(err: rusqlite::Error) -> Self {
        AppError::Store(StoreError::Sqlite(err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Store(StoreError::Json(err))
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建文件读取错误
    pub fn source_read_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            AppError::Source(SourceError::NotFound { path })
        } else {
            AppError::Source(SourceError::ReadFailed { path, source })
        }
    }

    /// 创建正则规则错误
    pub fn invalid_pattern(pattern: impl Into<String>, source: regex::Error) -> Self {
        AppError::Config(ConfigError::InvalidPattern {
            pattern: pattern.into(),
            source,
        })
    }

    /// 创建数据损坏错误
    pub fn corrupted(field: &'static str, value: impl Into<String>) -> Self {
        AppError::Store(StoreError::Corrupted {
            field,
            value: value.into(),
        })
    }

    /// 是否属于"拿不到原文"这一类致命错误
    pub fn is_catastrophic(&self) -> bool {
        matches!(self, AppError::Source(_))
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
