//! Cache Manager - 合成片段缓存的淘汰策略
//!
//! 先按年龄淘汰，再按数量淘汰；顺序为创建顺序（FIFO），读取不影响顺序

use chrono::{DateTime, Duration, Utc};
use std::sync::{Arc, Mutex};

use crate::application::ports::{CacheEntry, CacheError, ClipCachePort};

/// 淘汰策略
///
/// `-1` 表示不限制
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    pub max_files: i64,
    pub max_age_days: i64,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            max_files: 100,
            max_age_days: -1,
        }
    }
}

impl CachePolicy {
    pub fn max_files(&self) -> Option<usize> {
        (self.max_files >= 0).then_some(self.max_files as usize)
    }

    pub fn max_age(&self) -> Option<Duration> {
        (self.max_age_days >= 0).then(|| Duration::days(self.max_age_days))
    }
}

/// 一次淘汰的统计
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvictionReport {
    /// 超龄删除数
    pub expired: usize,
    /// 超量删除数
    pub overflow: usize,
    /// 删除失败数
    pub failed: usize,
    /// 剩余条目数
    pub remaining: usize,
}

impl EvictionReport {
    pub fn removed(&self) -> usize {
        self.expired + self.overflow
    }
}

/// Cache Manager
///
/// 本进程登记过的条目按登记顺序排在同一时间戳的其他条目之后
pub struct CacheManager {
    store: Arc<dyn ClipCachePort>,
    policy: CachePolicy,
    admitted: Mutex<Vec<String>>,
}

impl CacheManager {
    pub fn new(store: Arc<dyn ClipCachePort>, policy: CachePolicy) -> Self {
        Self {
            store,
            policy,
            admitted: Mutex::new(Vec::new()),
        }
    }

    pub fn store(&self) -> &Arc<dyn ClipCachePort> {
        &self.store
    }

    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    /// 登记新写入的条目，记录创建顺序
    ///
    /// 不立即淘汰：超出上限的条目在 `evict` 时删除，
    /// 保证当前调用引用的片段在拼接前仍然存在
    pub fn admit(&self, entry: &CacheEntry) {
        let pending = match self.admitted.lock() {
            Ok(mut admitted) => {
                admitted.retain(|key| key != &entry.key);
                admitted.push(entry.key.clone());
                admitted.len()
            }
            Err(_) => {
                tracing::warn!(key = %entry.key, "Admission ledger poisoned");
                0
            }
        };
        tracing::debug!(
            key = %entry.key,
            size_bytes = entry.size_bytes,
            pending = pending,
            "Cache entry admitted"
        );
    }

    /// 本进程登记过的 key，按登记顺序
    pub fn admitted(&self) -> Vec<String> {
        self.admitted
            .lock()
            .map(|admitted| admitted.clone())
            .unwrap_or_default()
    }

    /// 按创建顺序列出全部条目
    pub async fn entries(&self) -> Result<Vec<CacheEntry>, CacheError> {
        let mut entries = self.store.list_entries().await?;
        let admitted = self.admitted();
        let rank = |entry: &CacheEntry| admitted.iter().position(|key| key == &entry.key);
        entries.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| rank(a).cmp(&rank(b)))
                .then_with(|| a.fifo_order().cmp(&b.fifo_order()))
        });
        Ok(entries)
    }

    /// 执行淘汰
    pub async fn evict(&self) -> Result<EvictionReport, CacheError> {
        self.evict_at(Utc::now()).await
    }

    /// 以指定时间为基准执行淘汰
    pub async fn evict_at(&self, now: DateTime<Utc>) -> Result<EvictionReport, CacheError> {
        let mut entries = self.entries().await?;
        let mut report = EvictionReport::default();

        if let Some(max_age) = self.policy.max_age() {
            let cutoff = now - max_age;
            let (expired, kept): (Vec<_>, Vec<_>) =
                entries.into_iter().partition(|e| e.created_at < cutoff);
            for entry in expired {
                if self.remove(&entry).await {
                    report.expired += 1;
                } else {
                    report.failed += 1;
                }
            }
            entries = kept;
        }

        if let Some(max_files) = self.policy.max_files() {
            if entries.len() > max_files {
                let excess = entries.len() - max_files;
                let kept = entries.split_off(excess);
                for entry in entries {
                    if self.remove(&entry).await {
                        report.overflow += 1;
                    } else {
                        report.failed += 1;
                    }
                }
                entries = kept;
            }
        }

        report.remaining = entries.len();

        if report.removed() > 0 || report.failed > 0 {
            tracing::info!(
                expired = report.expired,
                overflow = report.overflow,
                failed = report.failed,
                remaining = report.remaining,
                "Cache eviction finished"
            );
        }

        Ok(report)
    }

    /// 删除全部条目
    pub async fn clear(&self) -> Result<usize, CacheError> {
        let entries = self.store.list_entries().await?;
        let mut removed = 0;
        for entry in entries {
            if self.remove(&entry).await {
                removed += 1;
            }
        }
        tracing::info!(removed = removed, "Cache cleared");
        Ok(removed)
    }

    async fn remove(&self, entry: &CacheEntry) -> bool {
        match self.store.remove_entry(&entry.key).await {
            Ok(()) => {
                if let Ok(mut admitted) = self.admitted.lock() {
                    admitted.retain(|key| key != &entry.key);
                }
                tracing::debug!(key = %entry.key, "Cache entry removed");
                true
            }
            Err(e) => {
                tracing::warn!(key = %entry.key, error = %e, "Failed to remove cache entry");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::persistence::fs::FileClipCache;
    use tempfile::TempDir;

    async fn write_in_order(store: &FileClipCache, keys: &[&str]) {
        for key in keys {
            store.write_entry(key, b"\x7f\x7f").await.unwrap();
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        }
    }

    fn manager(dir: &TempDir, policy: CachePolicy) -> (Arc<FileClipCache>, CacheManager) {
        let store = Arc::new(FileClipCache::new(dir.path()).unwrap());
        let manager = CacheManager::new(store.clone(), policy);
        (store, manager)
    }

    #[tokio::test]
    async fn test_count_eviction_is_fifo() {
        let dir = TempDir::new().unwrap();
        let (store, manager) = manager(
            &dir,
            CachePolicy {
                max_files: 2,
                max_age_days: -1,
            },
        );
        write_in_order(&store, &["b-clip", "a-clip", "c-clip"]).await;

        // 读取不会刷新顺序
        assert!(store.get("b-clip").await.unwrap().is_some());

        let report = manager.evict().await.unwrap();
        assert_eq!(report.overflow, 1);
        assert_eq!(report.remaining, 2);

        let keys: Vec<String> = manager
            .entries()
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.key)
            .collect();
        assert_eq!(keys, vec!["a-clip", "c-clip"]);
    }

    /// 所有条目共享同一时间戳的存储
    struct FrozenClockCache {
        at: DateTime<Utc>,
        entries: Mutex<Vec<CacheEntry>>,
    }

    #[async_trait::async_trait]
    impl ClipCachePort for FrozenClockCache {
        async fn get(&self, key: &str) -> Result<Option<CacheEntry>, CacheError> {
            Ok(self.entries.lock().unwrap().iter().find(|e| e.key == key).cloned())
        }

        async fn write_entry(&self, key: &str, audio_data: &[u8]) -> Result<CacheEntry, CacheError> {
            let entry = CacheEntry {
                key: key.to_string(),
                path: std::path::PathBuf::from(format!("/frozen/{}.ul", key)),
                size_bytes: audio_data.len() as u64,
                created_at: self.at,
                seq: 0,
            };
            self.entries.lock().unwrap().push(entry.clone());
            Ok(entry)
        }

        async fn list_entries(&self) -> Result<Vec<CacheEntry>, CacheError> {
            Ok(self.entries.lock().unwrap().clone())
        }

        async fn remove_entry(&self, key: &str) -> Result<(), CacheError> {
            self.entries.lock().unwrap().retain(|e| e.key != key);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_admission_order_breaks_timestamp_ties() {
        let store = Arc::new(FrozenClockCache {
            at: Utc::now(),
            entries: Mutex::new(Vec::new()),
        });
        let manager = CacheManager::new(
            store.clone(),
            CachePolicy {
                max_files: 2,
                max_age_days: -1,
            },
        );
        for key in ["zulu", "alpha", "mike"] {
            let entry = store.write_entry(key, b"x").await.unwrap();
            manager.admit(&entry);
        }

        manager.evict().await.unwrap();

        let keys: Vec<String> = manager.entries().await.unwrap().into_iter().map(|e| e.key).collect();
        assert_eq!(keys, vec!["alpha", "mike"]);
        assert_eq!(manager.admitted(), vec!["alpha", "mike"]);
    }

    #[tokio::test]
    async fn test_age_eviction_runs_first() {
        let dir = TempDir::new().unwrap();
        let (store, manager) = manager(
            &dir,
            CachePolicy {
                max_files: 5,
                max_age_days: 1,
            },
        );
        write_in_order(&store, &["old", "new"]).await;

        let report = manager
            .evict_at(Utc::now() + Duration::hours(25))
            .await
            .unwrap();
        assert_eq!(report.expired, 2);
        assert_eq!(report.remaining, 0);

        let report = manager.evict().await.unwrap();
        assert_eq!(report, EvictionReport::default());
    }

    #[tokio::test]
    async fn test_unlimited_policy_keeps_everything() {
        let dir = TempDir::new().unwrap();
        let (store, manager) = manager(
            &dir,
            CachePolicy {
                max_files: -1,
                max_age_days: -1,
            },
        );
        write_in_order(&store, &["one", "two", "three"]).await;

        let report = manager.evict().await.unwrap();
        assert_eq!(report.removed(), 0);
        assert_eq!(report.remaining, 3);
    }

    #[tokio::test]
    async fn test_clear_removes_files() {
        let dir = TempDir::new().unwrap();
        let (store, manager) = manager(&dir, CachePolicy::default());
        write_in_order(&store, &["one", "two"]).await;
        let path = store.get("one").await.unwrap().unwrap().path;

        assert_eq!(manager.clear().await.unwrap(), 2);
        assert!(!path.exists());
        assert!(manager.entries().await.unwrap().is_empty());
    }
}
