//! Library Commands - 声音库维护命令

use std::path::PathBuf;

/// 预生成命令（`seed`）
#[derive(Debug, Clone)]
pub struct SeedCommand {
    /// 覆盖已存在的文件
    pub force: bool,
    /// 并发合成数
    pub threads: usize,
    /// 自定义短语文件
    pub phrases_file: Option<PathBuf>,
}

/// 单条预生成失败
#[derive(Debug, Clone)]
pub struct SeedFailure {
    pub file: PathBuf,
    pub text: String,
    pub error: String,
}

/// 预生成响应
#[derive(Debug, Clone, Default)]
pub struct SeedResponse {
    pub generated: usize,
    pub skipped: usize,
    pub failed: Vec<SeedFailure>,
}

/// 缓存清理命令（`cache clean`）
#[derive(Debug, Clone, Default)]
pub struct CleanCacheCommand {
    /// 删除全部条目，而不是按策略淘汰
    pub all: bool,
}

/// 缓存清理响应
#[derive(Debug, Clone, Default)]
pub struct CleanCacheResponse {
    pub removed: usize,
    pub failed: usize,
    pub remaining: usize,
}
