//! Cache Queries - 缓存查询

use crate::application::ports::CacheEntry;

/// 列出缓存条目（`cache list`）
#[derive(Debug, Clone, Default)]
pub struct ListCacheEntries;

/// 缓存列表，按创建顺序
#[derive(Debug, Clone, Default)]
pub struct CacheListing {
    /// 合成片段
    pub clips: Vec<CacheEntry>,
    /// 拼接输出
    pub rendered: Vec<CacheEntry>,
}

impl CacheListing {
    pub fn total_bytes(&self) -> u64 {
        self.clips
            .iter()
            .chain(self.rendered.iter())
            .map(|e| e.size_bytes)
            .sum()
    }
}
