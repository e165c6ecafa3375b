//! 分页文本源 - 基础设施层
//!
//! 读取外部工具（如 `pdftotext`）抽取出来的文本，按换页符拆成页面。
//! 拿不到原文是唯一需要向上抛出的致命错误。

use crate::error::{AppError, AppResult};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 页与页之间的分隔符（换页符）
pub const PAGE_BREAK: char = '\x0c';

/// 文本文件形式的分页原文
pub struct TextFileSource {
    path: PathBuf,
}

impl TextFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 读取全部页面
    pub async fn read_pages(&self) -> AppResult<Vec<String>> {
        info!("📖 正在读取原文: {}", self.path.display());

        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| AppError::source_read_failed(self.path.display().to_string(), e))?;

        let pages = split_pages(&content);
        debug!("共 {} 页", pages.len());
        Ok(pages)
    }
}

/// 按换页符拆分页面；全文为空白时返回空列表
pub fn split_pages(content: &str) -> Vec<String> {
    if content.trim().is_empty() {
        return Vec::new();
    }

    let mut pages: Vec<String> = content.split(PAGE_BREAK).map(str::to_string).collect();
    // pdftotext 在最后一页后面也会输出换页符
    if pages.last().is_some_and(|p| p.trim().is_empty()) {
        pages.pop();
    }
    pages
}
