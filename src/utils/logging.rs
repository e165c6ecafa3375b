/// 日志工具模块
///
/// 提供日志初始化、格式化和输出的辅助函数
use crate::parser::ParseStats;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化日志
///
/// 默认级别 `quiz_simulator=info`，`verbose` 为真时提升到 debug；
/// 设置了 `RUST_LOG` 时以环境变量为准
pub fn init(verbose: bool) {
    let default_level = if verbose {
        "quiz_simulator=debug"
    } else {
        "quiz_simulator=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(command: &str, database_path: &str) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - {}", command);
    info!("🗄️ 题库: {}", database_path);
    info!(
        "🕒 时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
}

/// 记录解析统计
pub fn log_parse_summary(stats: &ParseStats, parsed: usize) {
    info!("\n{}", "─".repeat(60));
    info!("📄 切分方式: {}", stats.strategy);
    info!("📦 题块总数: {}", stats.blocks_found);
    info!("✓ 解析成功: {}", parsed);
    info!("✗ 不完整丢弃: {}", stats.blocks_dropped);
    if stats.answers_defaulted > 0 {
        info!("⚠️ 答案默认为 A: {}", stats.answers_defaulted);
    }
    info!("{}", "─".repeat(60));
}

/// 记录导入完成信息
pub fn log_load_complete(saved: usize, warn_file_path: Option<&str>) {
    info!("\n{}", "=".repeat(60));
    info!("✅ 成功导入 {} 道题目", saved);
    if let Some(path) = warn_file_path {
        info!("⚠️ 低置信度题目已写入: {}", path);
    }
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
