//! File Clip Cache - 目录即数据库
//!
//! 每个条目是缓存目录下的一个 `<key>.ul` 文件，创建时间取文件修改时间。
//! 写入时修改时间严格晚于目录中已有的全部条目，同一时刻写入的片段也保持创建顺序

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tokio::fs;
use uuid::Uuid;

use crate::application::ports::{CacheEntry, CacheError, ClipCachePort};

const CLIP_EXTENSION: &str = "ul";

/// 相邻两次写入的最小时间间隔
const MTIME_STEP: Duration = Duration::from_millis(1);

/// 文件系统片段缓存
pub struct FileClipCache {
    base_dir: PathBuf,
}

impl FileClipCache {
    /// 创建缓存，确保目录存在
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self, CacheError> {
        let base_dir = base_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&base_dir).map_err(|e| CacheError::IoError(e.to_string()))?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn clip_path(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{}.{}", key, CLIP_EXTENSION))
    }

    async fn entry_for(key: String, path: PathBuf) -> Result<Option<CacheEntry>, CacheError> {
        let metadata = match fs::metadata(&path).await {
            Ok(m) if m.is_file() => m,
            Ok(_) => return Ok(None),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(CacheError::IoError(e.to_string())),
        };

        let created_at: DateTime<Utc> = metadata
            .modified()
            .map(DateTime::<Utc>::from)
            .map_err(|e| CacheError::IoError(e.to_string()))?;

        Ok(Some(CacheEntry {
            key,
            path,
            size_bytes: metadata.len(),
            created_at,
            seq: 0,
        }))
    }

    /// 新条目的修改时间：当前时间，且晚于已有条目
    async fn next_mtime(&self) -> Result<SystemTime, CacheError> {
        let now = SystemTime::now();
        let newest = self
            .list_entries()
            .await?
            .into_iter()
            .map(|entry| SystemTime::from(entry.created_at))
            .max();

        Ok(match newest {
            Some(newest) if newest >= now => newest + MTIME_STEP,
            _ => now,
        })
    }
}

fn write_stamped(path: &Path, data: &[u8], mtime: SystemTime) -> std::io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    file.write_all(data)?;
    file.set_modified(mtime)?;
    file.sync_all()
}

#[async_trait]
impl ClipCachePort for FileClipCache {
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>, CacheError> {
        Self::entry_for(key.to_string(), self.clip_path(key)).await
    }

    async fn write_entry(&self, key: &str, audio_data: &[u8]) -> Result<CacheEntry, CacheError> {
        let path = self.clip_path(key);
        // 先写临时文件再重命名，并发写同一 key 时后写者胜出
        let tmp = self.base_dir.join(format!(".{}.{}.tmp", key, Uuid::new_v4()));

        let mtime = self.next_mtime().await?;

        let data = audio_data.to_vec();
        let tmp_path = tmp.clone();
        let written = tokio::task::spawn_blocking(move || write_stamped(&tmp_path, &data, mtime))
            .await
            .map_err(|e| CacheError::IoError(e.to_string()))?;
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp).await;
            return Err(CacheError::IoError(format!("{}: {}", tmp.display(), e)));
        }
        if let Err(e) = fs::rename(&tmp, &path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(CacheError::IoError(format!("{}: {}", path.display(), e)));
        }

        tracing::debug!(key = %key, size_bytes = audio_data.len(), "Clip written");

        Self::entry_for(key.to_string(), path)
            .await?
            .ok_or_else(|| CacheError::NotFound(key.to_string()))
    }

    async fn list_entries(&self) -> Result<Vec<CacheEntry>, CacheError> {
        let mut dir = match fs::read_dir(&self.base_dir).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(CacheError::IoError(e.to_string())),
        };

        let mut entries = Vec::new();
        while let Some(item) = dir
            .next_entry()
            .await
            .map_err(|e| CacheError::IoError(e.to_string()))?
        {
            let path = item.path();
            let name = item.file_name().to_string_lossy().into_owned();
            if name.starts_with('.')
                || path.extension().and_then(|e| e.to_str()) != Some(CLIP_EXTENSION)
            {
                continue;
            }
            let Some(key) = path.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
                continue;
            };
            if let Some(entry) = Self::entry_for(key, path).await? {
                entries.push(entry);
            }
        }

        Ok(entries)
    }

    async fn remove_entry(&self, key: &str) -> Result<(), CacheError> {
        match fs::remove_file(self.clip_path(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(CacheError::NotFound(key.to_string()))
            }
            Err(e) => Err(CacheError::IoError(e.to_string())),
        }
    }
}
