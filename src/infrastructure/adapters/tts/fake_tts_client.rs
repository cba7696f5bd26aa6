//! Fake TTS Client - 用于测试的 TTS 客户端
//!
//! 返回固定的音频数据，不实际调用 TTS 引擎；记录每次调用的文本

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::application::ports::{TtsEnginePort, TtsError};

/// Fake TTS Client 配置
#[derive(Debug, Clone)]
pub struct FakeTtsClientConfig {
    /// 固定返回的音频数据
    pub audio_data: Vec<u8>,
    /// 模拟合成延迟（毫秒）
    pub latency_ms: u64,
    /// 为 true 时每次调用都返回错误
    pub fail: bool,
}

impl Default for FakeTtsClientConfig {
    fn default() -> Self {
        Self {
            // 0.1 秒 μ-law 静音
            audio_data: vec![0xff; 800],
            latency_ms: 0,
            fail: false,
        }
    }
}

/// Fake TTS Client
pub struct FakeTtsClient {
    config: FakeTtsClientConfig,
    calls: AtomicUsize,
    texts: Mutex<Vec<String>>,
}

impl FakeTtsClient {
    pub fn with_config(config: FakeTtsClientConfig) -> Self {
        Self {
            config,
            calls: AtomicUsize::new(0),
            texts: Mutex::new(Vec::new()),
        }
    }

    /// 使用默认配置创建
    pub fn new() -> Self {
        Self::with_config(FakeTtsClientConfig::default())
    }

    /// 返回指定音频数据
    pub fn with_audio(audio_data: Vec<u8>) -> Self {
        Self::with_config(FakeTtsClientConfig {
            audio_data,
            ..Default::default()
        })
    }

    /// 每次调用都失败
    pub fn failing() -> Self {
        Self::with_config(FakeTtsClientConfig {
            fail: true,
            ..Default::default()
        })
    }

    /// 引擎被调用的次数
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// 按调用顺序记录的文本
    pub fn texts(&self) -> Vec<String> {
        self.texts
            .lock()
            .map(|texts| texts.clone())
            .unwrap_or_default()
    }
}

impl Default for FakeTtsClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TtsEnginePort for FakeTtsClient {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, TtsError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut texts) = self.texts.lock() {
            texts.push(text.to_string());
        }

        tracing::debug!(text = %text, "FakeTtsClient: returning fixed audio");

        if self.config.latency_ms > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(self.config.latency_ms)).await;
        }

        if self.config.fail {
            return Err(TtsError::ServiceError("fake engine failure".to_string()));
        }

        Ok(self.config.audio_data.clone())
    }

    async fn health_check(&self) -> bool {
        !self.config.fail
    }
}
