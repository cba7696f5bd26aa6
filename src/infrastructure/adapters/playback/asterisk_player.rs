//! Asterisk Player - 通过 app_rpt 在节点上播放
//!
//! `asterisk -rx "rpt localplay <node> <path without extension>"`

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::application::ports::{PlaybackError, PlaybackPort};
use crate::infrastructure::adapters::process::run_tool;

/// Asterisk 播放器
pub struct AsteriskPlayer {
    program: String,
}

impl AsteriskPlayer {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// app_rpt 期望不带扩展名的绝对路径
    pub fn bare_sound_path(audio_path: &Path) -> PathBuf {
        let absolute = std::fs::canonicalize(audio_path).unwrap_or_else(|_| audio_path.to_path_buf());
        absolute.with_extension("")
    }

    /// `-rx` 的 CLI 命令
    pub fn localplay_command(node: &str, audio_path: &Path) -> String {
        format!(
            "rpt localplay {} {}",
            node,
            Self::bare_sound_path(audio_path).display()
        )
    }
}

impl Default for AsteriskPlayer {
    fn default() -> Self {
        Self::new("asterisk")
    }
}

#[async_trait]
impl PlaybackPort for AsteriskPlayer {
    async fn play(&self, node: &str, audio_path: &Path) -> Result<(), PlaybackError> {
        if node.is_empty() || !node.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(PlaybackError::InvalidNode(node.to_string()));
        }

        let command = Self::localplay_command(node, audio_path);
        tracing::info!(node = %node, command = %command, "Playing audio on node");

        run_tool(&self.program, ["-rx", command.as_str()])
            .await
            .map_err(|e| PlaybackError::CommandFailed(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_localplay_command_strips_extension() {
        let command = AsteriskPlayer::localplay_command("2000", Path::new("/nonexistent/out.ul"));
        assert_eq!(command, "rpt localplay 2000 /nonexistent/out");
    }

    #[tokio::test]
    async fn test_invalid_node_rejected() {
        let err = AsteriskPlayer::default()
            .play("20; rm", Path::new("/tmp/out.ul"))
            .await
            .unwrap_err();
        assert!(matches!(err, PlaybackError::InvalidNode(_)));
    }
}
