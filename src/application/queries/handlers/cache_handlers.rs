//! Cache Query Handlers

use std::sync::Arc;

use crate::application::cache_manager::CacheManager;
use crate::application::error::ApplicationError;
use crate::application::queries::{CacheListing, ListCacheEntries};

/// ListCacheEntries Handler
pub struct ListCacheHandler {
    clips: Arc<CacheManager>,
    rendered: Arc<CacheManager>,
}

impl ListCacheHandler {
    pub fn new(clips: Arc<CacheManager>, rendered: Arc<CacheManager>) -> Self {
        Self { clips, rendered }
    }

    pub async fn handle(&self, _query: ListCacheEntries) -> Result<CacheListing, ApplicationError> {
        Ok(CacheListing {
            clips: self.clips.entries().await?,
            rendered: self.rendered.entries().await?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::cache_manager::CachePolicy;
    use crate::application::ports::ClipCachePort;
    use crate::infrastructure::persistence::fs::FileClipCache;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_lists_both_stores() {
        let dir = TempDir::new().unwrap();
        let clips_store = Arc::new(FileClipCache::new(dir.path()).unwrap());
        let rendered_store = Arc::new(FileClipCache::new(dir.path().join("rendered")).unwrap());
        clips_store.write_entry("hello", b"12").await.unwrap();
        rendered_store.write_entry("hello-world", b"1234").await.unwrap();

        let handler = ListCacheHandler::new(
            Arc::new(CacheManager::new(clips_store, CachePolicy::default())),
            Arc::new(CacheManager::new(rendered_store, CachePolicy::default())),
        );
        let listing = handler.handle(ListCacheEntries).await.unwrap();

        assert_eq!(listing.clips.len(), 1);
        assert_eq!(listing.rendered.len(), 1);
        assert_eq!(listing.total_bytes(), 6);
    }
}
