//! Cache Handlers - 缓存清理

use std::sync::Arc;

use crate::application::cache_manager::CacheManager;
use crate::application::commands::{CleanCacheCommand, CleanCacheResponse};
use crate::application::error::ApplicationError;

/// Clean Cache Handler
///
/// 同时处理合成片段缓存和拼接输出缓存
pub struct CleanCacheHandler {
    caches: Vec<Arc<CacheManager>>,
}

impl CleanCacheHandler {
    pub fn new(clips: Arc<CacheManager>, rendered: Arc<CacheManager>) -> Self {
        Self {
            caches: vec![clips, rendered],
        }
    }

    pub async fn handle(&self, cmd: CleanCacheCommand) -> Result<CleanCacheResponse, ApplicationError> {
        let mut response = CleanCacheResponse::default();

        for cache in &self.caches {
            if cmd.all {
                let before = cache.entries().await?.len();
                let removed = cache.clear().await?;
                let remaining = cache.entries().await?.len();
                response.removed += removed;
                response.failed += before.saturating_sub(removed);
                response.remaining += remaining;
            } else {
                let report = cache.evict().await?;
                response.removed += report.removed();
                response.failed += report.failed;
                response.remaining += report.remaining;
            }
        }

        tracing::info!(
            all = cmd.all,
            removed = response.removed,
            failed = response.failed,
            remaining = response.remaining,
            "Cache cleanup finished"
        );
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::cache_manager::CachePolicy;
    use crate::infrastructure::persistence::fs::FileClipCache;
    use tempfile::TempDir;

    fn manager(dir: &std::path::Path, max_files: i64) -> Arc<CacheManager> {
        Arc::new(CacheManager::new(
            Arc::new(FileClipCache::new(dir).unwrap()),
            CachePolicy {
                max_files,
                max_age_days: -1,
            },
        ))
    }

    async fn fill(cache: &CacheManager, keys: &[&str]) {
        for key in keys {
            cache.store().write_entry(key, &[1, 2]).await.unwrap();
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        }
    }

    #[tokio::test]
    async fn test_clean_applies_policy() {
        let dir = TempDir::new().unwrap();
        let clips = manager(&dir.path().join("clips"), 2);
        let rendered = manager(&dir.path().join("rendered"), 2);
        fill(&clips, &["a", "b", "c", "d"]).await;
        fill(&rendered, &["x"]).await;

        let handler = CleanCacheHandler::new(clips.clone(), rendered);
        let response = handler.handle(CleanCacheCommand { all: false }).await.unwrap();

        assert_eq!(response.removed, 2);
        assert_eq!(response.remaining, 3);
        let keys: Vec<String> = clips.entries().await.unwrap().into_iter().map(|e| e.key).collect();
        assert_eq!(keys, vec!["c", "d"]);
    }

    #[tokio::test]
    async fn test_clean_all_empties_both_caches() {
        let dir = TempDir::new().unwrap();
        let clips = manager(&dir.path().join("clips"), -1);
        let rendered = manager(&dir.path().join("rendered"), -1);
        fill(&clips, &["a", "b"]).await;
        fill(&rendered, &["x"]).await;

        let handler = CleanCacheHandler::new(clips.clone(), rendered.clone());
        let response = handler.handle(CleanCacheCommand { all: true }).await.unwrap();

        assert_eq!(response.removed, 3);
        assert_eq!(response.failed, 0);
        assert_eq!(response.remaining, 0);
        assert!(clips.entries().await.unwrap().is_empty());
        assert!(rendered.entries().await.unwrap().is_empty());
    }
}
