//! Sled-based Clip Cache Implementation
//!
//! 元数据存放在 sled，音频数据作为独立文件存放在 blob 目录，
//! 以便直接交给 sox / app_rpt 播放

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use sled::Db;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::ports::{CacheEntry, CacheError, ClipCachePort};
use crate::infrastructure::persistence::fs::FileClipCache;

const RECORD_PREFIX: &str = "clip:";

/// Sled 缓存配置
#[derive(Debug, Clone)]
pub struct SledClipCacheConfig {
    /// 数据库路径
    pub db_path: PathBuf,
    /// 音频文件目录
    pub blob_dir: PathBuf,
}

impl SledClipCacheConfig {
    /// 在缓存目录下使用默认布局
    pub fn in_dir(cache_dir: impl AsRef<Path>) -> Self {
        let cache_dir = cache_dir.as_ref();
        Self {
            db_path: cache_dir.join("cache.sled"),
            blob_dir: cache_dir.join("clips"),
        }
    }
}

/// 内部记录
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ClipRecord {
    file_name: String,
    size_bytes: u64,
    created_at_ms: i64,
    seq: u64,
}

/// Sled 片段缓存
pub struct SledClipCache {
    db: Db,
    blob_dir: PathBuf,
}

impl SledClipCache {
    pub fn new(config: &SledClipCacheConfig) -> Result<Self, CacheError> {
        std::fs::create_dir_all(&config.blob_dir).map_err(|e| CacheError::IoError(e.to_string()))?;
        let db = sled::open(&config.db_path).map_err(|e| CacheError::DatabaseError(e.to_string()))?;

        tracing::info!(
            db_path = %config.db_path.display(),
            entries = db.scan_prefix(RECORD_PREFIX).count(),
            "SledClipCache initialized"
        );

        Ok(Self {
            db,
            blob_dir: config.blob_dir.clone(),
        })
    }

    fn record_key(key: &str) -> String {
        format!("{}{}", RECORD_PREFIX, key)
    }

    fn to_entry(&self, key: String, record: ClipRecord) -> CacheEntry {
        let created_at: DateTime<Utc> = Utc
            .timestamp_millis_opt(record.created_at_ms)
            .single()
            .unwrap_or_default();
        CacheEntry {
            key,
            path: self.blob_dir.join(&record.file_name),
            size_bytes: record.size_bytes,
            created_at,
            seq: record.seq,
        }
    }

    fn decode(bytes: &[u8]) -> Result<ClipRecord, CacheError> {
        bincode::deserialize(bytes).map_err(|e| CacheError::SerializationError(e.to_string()))
    }

    /// 刷新数据库
    pub fn flush(&self) -> Result<(), CacheError> {
        self.db
            .flush()
            .map_err(|e| CacheError::DatabaseError(e.to_string()))?;
        Ok(())
    }
}

/// 打开 Sled 片段缓存
///
/// sled 对数据库加独占锁，另一个进程持有时退回到 blob 目录上的 [`FileClipCache`]，
/// 两者共享同一批音频文件
pub fn open_shared(config: &SledClipCacheConfig) -> Result<Arc<dyn ClipCachePort>, CacheError> {
    match SledClipCache::new(config) {
        Ok(cache) => Ok(Arc::new(cache)),
        Err(e) => {
            tracing::warn!(
                db_path = %config.db_path.display(),
                error = %e,
                "Sled clip cache unavailable, falling back to file cache"
            );
            Ok(Arc::new(FileClipCache::new(&config.blob_dir)?))
        }
    }
}

#[async_trait]
impl ClipCachePort for SledClipCache {
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>, CacheError> {
        match self.db.get(Self::record_key(key)) {
            Ok(Some(data)) => {
                let record = Self::decode(&data)?;
                Ok(Some(self.to_entry(key.to_string(), record)))
            }
            Ok(None) => Ok(None),
            Err(e) => Err(CacheError::DatabaseError(e.to_string())),
        }
    }

    async fn write_entry(&self, key: &str, audio_data: &[u8]) -> Result<CacheEntry, CacheError> {
        let file_name = format!("{}.ul", key);
        let path = self.blob_dir.join(&file_name);
        let tmp = self.blob_dir.join(format!(".{}.{}.tmp", key, Uuid::new_v4()));

        let written = match tokio::fs::write(&tmp, audio_data).await {
            Ok(()) => tokio::fs::rename(&tmp, &path).await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(CacheError::IoError(format!("{}: {}", path.display(), e)));
        }

        let seq = self
            .db
            .generate_id()
            .map_err(|e| CacheError::DatabaseError(e.to_string()))?;
        let record = ClipRecord {
            file_name,
            size_bytes: audio_data.len() as u64,
            created_at_ms: Utc::now().timestamp_millis(),
            seq,
        };
        let bytes =
            bincode::serialize(&record).map_err(|e| CacheError::SerializationError(e.to_string()))?;
        self.db
            .insert(Self::record_key(key), bytes)
            .map_err(|e| CacheError::DatabaseError(e.to_string()))?;

        tracing::debug!(key = %key, size_bytes = record.size_bytes, seq = seq, "Clip cached");

        Ok(self.to_entry(key.to_string(), record))
    }

    async fn list_entries(&self) -> Result<Vec<CacheEntry>, CacheError> {
        let mut entries = Vec::new();
        for item in self.db.scan_prefix(RECORD_PREFIX) {
            let (key, value) = item.map_err(|e| CacheError::DatabaseError(e.to_string()))?;
            let key = String::from_utf8(key[RECORD_PREFIX.len()..].to_vec())
                .map_err(|e| CacheError::SerializationError(e.to_string()))?;
            match Self::decode(&value) {
                Ok(record) => entries.push(self.to_entry(key, record)),
                Err(e) => tracing::warn!(key = %key, error = %e, "Skipping unreadable cache record"),
            }
        }
        Ok(entries)
    }

    async fn remove_entry(&self, key: &str) -> Result<(), CacheError> {
        let removed = self
            .db
            .remove(Self::record_key(key))
            .map_err(|e| CacheError::DatabaseError(e.to_string()))?
            .ok_or_else(|| CacheError::NotFound(key.to_string()))?;
        let record = Self::decode(&removed)?;

        match tokio::fs::remove_file(self.blob_dir.join(&record.file_name)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CacheError::IoError(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open(dir: &TempDir) -> SledClipCache {
        SledClipCache::new(&SledClipCacheConfig::in_dir(dir.path())).unwrap()
    }

    #[tokio::test]
    async fn test_write_and_get() {
        let dir = TempDir::new().unwrap();
        let cache = open(&dir);

        let entry = cache.write_entry("good-morning", b"abc").await.unwrap();
        assert_eq!(entry.path, dir.path().join("clips/good-morning.ul"));
        assert_eq!(std::fs::read(&entry.path).unwrap(), b"abc");

        let fetched = cache.get("good-morning").await.unwrap().unwrap();
        assert_eq!(fetched, entry);
        assert!(cache.get("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_sequence_orders_same_millisecond_writes() {
        let dir = TempDir::new().unwrap();
        let cache = open(&dir);

        for key in ["c", "a", "b"] {
            cache.write_entry(key, b"x").await.unwrap();
        }

        let mut entries = cache.list_entries().await.unwrap();
        entries.sort_by(|a, b| a.fifo_order().cmp(&b.fifo_order()));
        let keys: Vec<&str> = entries.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["c", "a", "b"]);
    }

    #[tokio::test]
    async fn test_remove_deletes_blob() {
        let dir = TempDir::new().unwrap();
        let cache = open(&dir);

        let entry = cache.write_entry("hello", b"x").await.unwrap();
        cache.remove_entry("hello").await.unwrap();

        assert!(!entry.path.exists());
        assert!(cache.get("hello").await.unwrap().is_none());
        assert!(matches!(
            cache.remove_entry("hello").await,
            Err(CacheError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_failed_write_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let cache = open(&dir);
        let blocked = dir.path().join("clips/blocked.ul");
        std::fs::create_dir_all(blocked.join("inner")).unwrap();

        assert!(cache.write_entry("blocked", b"x").await.is_err());

        let leftovers: Vec<String> = std::fs::read_dir(dir.path().join("clips"))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|name| name.ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty(), "left behind: {:?}", leftovers);
        assert!(cache.get("blocked").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_locked_database_falls_back_to_files() {
        let dir = TempDir::new().unwrap();
        let config = SledClipCacheConfig::in_dir(dir.path());
        let owner = SledClipCache::new(&config).unwrap();
        let owned = owner.write_entry("net-control", b"abc").await.unwrap();

        let shared = open_shared(&config).unwrap();
        let seen = shared.get("net-control").await.unwrap().unwrap();
        assert_eq!(seen.path, owned.path);

        let written = shared.write_entry("repeater", b"xy").await.unwrap();
        assert_eq!(written.path, dir.path().join("clips/repeater.ul"));
    }

    #[tokio::test]
    async fn test_entries_survive_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let cache = open(&dir);
            cache.write_entry("persisted", b"x").await.unwrap();
            cache.flush().unwrap();
        }

        let cache = open(&dir);
        assert_eq!(cache.list_entries().await.unwrap().len(), 1);
    }
}
