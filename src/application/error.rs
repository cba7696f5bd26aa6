//! 应用层错误定义
//!
//! 统一的命令错误类型，并映射为进程退出码

use thiserror::Error;

use crate::application::ports::{AssembleError, CacheError, PlaybackError};
use crate::application::synthesizer::SynthesisError;
use crate::domain::sound::IndexError;
use crate::domain::speech::ResolveError;

/// 进程退出码
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const INVALID_ARGS: i32 = 1;
    pub const UNRESOLVED: i32 = 2;
    pub const AUDIO: i32 = 3;
    pub const CONFIG: i32 = 4;
    pub const FILE: i32 = 5;
    pub const PLAYBACK: i32 = 6;
}

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 输入无效
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// 文本无法解析
    #[error(transparent)]
    Unresolved(#[from] ResolveError),

    /// 音频合成或拼接错误
    #[error("Audio processing error: {0}")]
    Audio(String),

    /// 配置错误
    #[error("Configuration error: {0}")]
    Config(String),

    /// 文件错误
    #[error("File error: {0}")]
    File(String),

    /// 播放错误
    #[error("Playback error: {0}")]
    Playback(String),
}

impl ApplicationError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn file(message: impl Into<String>) -> Self {
        Self::File(message.into())
    }

    /// 对应的进程退出码
    pub fn exit_code(&self) -> i32 {
        match self {
            ApplicationError::InvalidInput(_) => exit_code::INVALID_ARGS,
            ApplicationError::Unresolved(_) => exit_code::UNRESOLVED,
            ApplicationError::Audio(_) => exit_code::AUDIO,
            ApplicationError::Config(_) => exit_code::CONFIG,
            ApplicationError::File(_) => exit_code::FILE,
            ApplicationError::Playback(_) => exit_code::PLAYBACK,
        }
    }
}

impl From<IndexError> for ApplicationError {
    fn from(err: IndexError) -> Self {
        match err {
            IndexError::MissingDirectory(_) | IndexError::Empty(_) => Self::Config(err.to_string()),
            IndexError::Io { .. } => Self::File(err.to_string()),
        }
    }
}

impl From<AssembleError> for ApplicationError {
    fn from(err: AssembleError) -> Self {
        Self::Audio(err.to_string())
    }
}

impl From<SynthesisError> for ApplicationError {
    fn from(err: SynthesisError) -> Self {
        match err {
            SynthesisError::Storage(_) => Self::File(err.to_string()),
            _ => Self::Audio(err.to_string()),
        }
    }
}

impl From<CacheError> for ApplicationError {
    fn from(err: CacheError) -> Self {
        Self::File(err.to_string())
    }
}

impl From<PlaybackError> for ApplicationError {
    fn from(err: PlaybackError) -> Self {
        Self::Playback(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_exit_codes() {
        let unresolved: ApplicationError = ResolveError::Unresolved {
            token: "xyz".to_string(),
        }
        .into();
        assert_eq!(unresolved.exit_code(), 2);

        let missing: ApplicationError = IndexError::MissingDirectory(PathBuf::from("/x")).into();
        assert_eq!(missing.exit_code(), exit_code::CONFIG);

        let audio: ApplicationError = AssembleError::NoInput.into();
        assert_eq!(audio.exit_code(), exit_code::AUDIO);

        let playback: ApplicationError = PlaybackError::CommandFailed("x".to_string()).into();
        assert_eq!(playback.exit_code(), exit_code::PLAYBACK);

        assert_eq!(ApplicationError::file("x").exit_code(), exit_code::FILE);
        assert_eq!(ApplicationError::invalid_input("x").exit_code(), 1);
    }
}
