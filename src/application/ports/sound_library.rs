//! Sound Library Port - 声音目录扫描

use async_trait::async_trait;

use crate::domain::sound::{IndexError, SoundDirectory, SoundIndex};

/// Sound Library Port
///
/// 按给定顺序扫描目录构建索引；先发现的素材在冲突中胜出
#[async_trait]
pub trait SoundLibraryPort: Send + Sync {
    async fn build_index(&self, directories: &[SoundDirectory]) -> Result<SoundIndex, IndexError>;
}
