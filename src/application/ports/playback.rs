//! Playback Port - 电台节点播放

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("Playback command failed: {0}")]
    CommandFailed(String),

    #[error("Invalid node: {0}")]
    InvalidNode(String),
}

/// Playback Port
///
/// 将音频文件交给节点播放；传输本身由外部系统完成
#[async_trait]
pub trait PlaybackPort: Send + Sync {
    async fn play(&self, node: &str, audio_path: &Path) -> Result<(), PlaybackError>;
}
