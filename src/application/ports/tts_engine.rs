//! TTS Engine Port - TTS 合成引擎抽象
//!
//! 定义语音合成的抽象接口，具体实现在 infrastructure/adapters 层

use async_trait::async_trait;
use thiserror::Error;

/// TTS 错误
#[derive(Debug, Error)]
pub enum TtsError {
    #[error("TTS engine not available: {0}")]
    Unavailable(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// TTS Engine Port
///
/// 外部合成引擎被视为黑盒：`synthesize(text) -> 原始音频字节`。
/// 延迟可能是数秒，调用方逐个等待，不做重试
#[async_trait]
pub trait TtsEnginePort: Send + Sync {
    /// 合成文本，返回 `.ul` 格式的原始音频
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, TtsError>;

    /// 检查引擎是否可用
    async fn health_check(&self) -> bool {
        true // 默认实现
    }
}
