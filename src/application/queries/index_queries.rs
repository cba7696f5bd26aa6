//! Index Queries - 声音索引查询

use std::path::PathBuf;

use crate::domain::sound::{IndexCollision, SoundSource};

/// 索引报告查询（`index`）
#[derive(Debug, Clone, Default)]
pub struct GetIndexReport {
    pub include_collisions: bool,
}

/// 索引条目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub key: String,
    pub path: PathBuf,
    pub source: SoundSource,
}

/// 索引报告
#[derive(Debug, Clone, Default)]
pub struct IndexReport {
    /// 按 key 排序
    pub entries: Vec<IndexEntry>,
    pub collisions: Vec<IndexCollision>,
    pub base_count: usize,
    pub custom_count: usize,
}
