//! Clip Cache Port - 合成片段缓存存储
//!
//! 目录列表即数据库；通过此端口访问，可替换为嵌入式 KV 存储

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use thiserror::Error;

/// Clip Cache 错误
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache entry not found: {0}")]
    NotFound(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("IO error: {0}")]
    IoError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// 缓存条目
///
/// 按 `(created_at, seq, key)` 升序即为创建顺序（FIFO）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// 规范化文本生成的文件名（不含扩展名）
    pub key: String,
    /// 音频文件路径
    pub path: PathBuf,
    pub size_bytes: u64,
    pub created_at: DateTime<Utc>,
    /// 同一时间戳内的写入序号
    pub seq: u64,
}

impl CacheEntry {
    /// FIFO 排序键
    pub fn fifo_order(&self) -> (DateTime<Utc>, u64, &str) {
        (self.created_at, self.seq, self.key.as_str())
    }
}

/// Clip Cache Port
#[async_trait]
pub trait ClipCachePort: Send + Sync {
    /// 根据 key 获取条目（不更新访问时间）
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>, CacheError>;

    /// 写入条目，同 key 时后写者覆盖
    async fn write_entry(&self, key: &str, audio_data: &[u8]) -> Result<CacheEntry, CacheError>;

    /// 列出全部条目
    async fn list_entries(&self) -> Result<Vec<CacheEntry>, CacheError>;

    /// 删除条目及其音频文件
    async fn remove_entry(&self, key: &str) -> Result<(), CacheError>;
}
