//! Command TTS Client - 调用 `asl-tts` 命令行合成
//!
//! `asl-tts -n 1 -t <text> -f <base>` 会写出 `<base>.ul`

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::application::ports::{TtsEnginePort, TtsError};
use crate::infrastructure::adapters::process::{run_tool, ProcessError};

/// Command TTS Client
pub struct CommandTtsClient {
    program: String,
    work_dir: PathBuf,
}

impl CommandTtsClient {
    /// 输出文件写入系统临时目录
    pub fn new(program: impl Into<String>) -> Self {
        Self::with_work_dir(program, std::env::temp_dir())
    }

    pub fn with_work_dir(program: impl Into<String>, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            work_dir: work_dir.into(),
        }
    }

    /// 命令行参数
    pub fn command_args(text: &str, base: &Path) -> Vec<String> {
        vec![
            "-n".to_string(),
            "1".to_string(),
            "-t".to_string(),
            text.to_string(),
            "-f".to_string(),
            base.display().to_string(),
        ]
    }
}

#[async_trait]
impl TtsEnginePort for CommandTtsClient {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, TtsError> {
        let base = self.work_dir.join(format!("asl-tts-{}", Uuid::new_v4()));
        let output = base.with_extension("ul");

        tracing::debug!(program = %self.program, base = %base.display(), "Running TTS command");

        run_tool(&self.program, Self::command_args(text, &base))
            .await
            .map_err(|e| match e {
                ProcessError::Spawn { .. } => TtsError::Unavailable(e.to_string()),
                ProcessError::Failed { .. } => TtsError::ServiceError(e.to_string()),
            })?;

        let audio = tokio::fs::read(&output).await.map_err(|e| {
            TtsError::InvalidResponse(format!("{} not written: {}", output.display(), e))
        })?;

        if let Err(e) = tokio::fs::remove_file(&output).await {
            tracing::debug!(path = %output.display(), error = %e, "Failed to remove TTS output");
        }

        Ok(audio)
    }

    async fn health_check(&self) -> bool {
        run_tool(&self.program, ["--help"]).await.is_ok()
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    fn fake_program(dir: &Path, body: &str) -> String {
        let path = dir.join("fake-asl-tts");
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path.display().to_string()
    }

    #[test]
    fn test_command_args() {
        let args = CommandTtsClient::command_args("hello world", Path::new("/tmp/x"));
        assert_eq!(args, vec!["-n", "1", "-t", "hello world", "-f", "/tmp/x"]);
    }

    #[tokio::test]
    async fn test_reads_generated_file() {
        let dir = TempDir::new().unwrap();
        // $4 = 文本, $6 = 输出前缀
        let program = fake_program(dir.path(), "printf '%s' \"$4\" > \"$6.ul\"");
        let client = CommandTtsClient::with_work_dir(program, dir.path());

        let audio = client.synthesize("node").await.unwrap();
        assert_eq!(audio, b"node");

        let leftovers = std::fs::read_dir(dir.path())
            .unwrap()
            .filter(|e| {
                e.as_ref()
                    .map(|e| e.path().extension().is_some_and(|x| x == "ul"))
                    .unwrap_or(false)
            })
            .count();
        assert_eq!(leftovers, 0);
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_service_error() {
        let dir = TempDir::new().unwrap();
        let program = fake_program(dir.path(), "echo 'voice missing' >&2; exit 1");
        let client = CommandTtsClient::with_work_dir(program, dir.path());

        let err = client.synthesize("node").await.unwrap_err();
        assert!(matches!(err, TtsError::ServiceError(msg) if msg.contains("voice missing")));
    }

    #[tokio::test]
    async fn test_missing_program_is_unavailable() {
        let client = CommandTtsClient::new("/nonexistent/asl-tts");
        let err = client.synthesize("node").await.unwrap_err();
        assert!(matches!(err, TtsError::Unavailable(_)));
    }
}
