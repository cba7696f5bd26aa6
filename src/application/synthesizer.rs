//! Fallback Synthesizer - 合成或命中缓存
//!
//! 找不到录音的文本交给 TTS 引擎合成，结果写入片段缓存供后续复用

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::application::cache_manager::CacheManager;
use crate::application::ports::{TtsEnginePort, TtsError};
use crate::domain::phrase::{clip_file_stem, normalize_cache_text, PhraseKey};
use crate::domain::sound::{SoundAsset, SoundSource};

/// 合成错误
#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("TTS engine error: {0}")]
    Engine(#[from] TtsError),

    #[error("TTS engine returned no audio")]
    EmptyOutput,

    #[error("Failed to store synthesized audio: {0}")]
    Storage(String),
}

/// Fallback Synthesizer
///
/// 调用按顺序逐个等待，不重试
pub struct FallbackSynthesizer {
    engine: Arc<dyn TtsEnginePort>,
    cache: Arc<CacheManager>,
    max_words: usize,
    engine_calls: AtomicUsize,
    cache_hits: AtomicUsize,
}

impl FallbackSynthesizer {
    pub fn new(engine: Arc<dyn TtsEnginePort>, cache: Arc<CacheManager>, max_words: usize) -> Self {
        Self {
            engine,
            cache,
            max_words,
            engine_calls: AtomicUsize::new(0),
            cache_hits: AtomicUsize::new(0),
        }
    }

    /// 文本对应的缓存 key
    pub fn cache_key(&self, text: &str) -> String {
        clip_file_stem(&normalize_cache_text(text), self.max_words)
    }

    /// 引擎调用次数
    pub fn engine_calls(&self) -> usize {
        self.engine_calls.load(Ordering::Relaxed)
    }

    /// 缓存命中次数
    pub fn cache_hits(&self) -> usize {
        self.cache_hits.load(Ordering::Relaxed)
    }

    /// 返回缓存中的片段，不存在时调用引擎合成
    pub async fn synthesize_or_cached(&self, text: &str) -> Result<SoundAsset, SynthesisError> {
        let key = self.cache_key(text);
        let phrase = PhraseKey::from_text(text);

        match self.cache.store().get(&key).await {
            Ok(Some(entry)) if tokio::fs::try_exists(&entry.path).await.unwrap_or(false) => {
                self.cache_hits.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(key = %key, path = %entry.path.display(), "Synthesis cache hit");
                return Ok(SoundAsset::new(phrase, entry.path, SoundSource::Cache, 0));
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Failed to read clip cache, synthesizing");
            }
        }

        tracing::info!(text = %text, key = %key, "Synthesizing missing text");
        self.engine_calls.fetch_add(1, Ordering::Relaxed);
        let audio = self.engine.synthesize(text).await?;
        if audio.is_empty() {
            return Err(SynthesisError::EmptyOutput);
        }

        let path = match self.cache.store().write_entry(&key, &audio).await {
            Ok(entry) => {
                self.cache.admit(&entry);
                entry.path
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Failed to write clip cache, using scratch file");
                write_scratch(&audio).await?
            }
        };

        Ok(SoundAsset::new(phrase, path, SoundSource::Cache, 0))
    }
}

/// 缓存不可写时，把音频保存到系统临时目录
async fn write_scratch(audio: &[u8]) -> Result<PathBuf, SynthesisError> {
    let path = std::env::temp_dir().join(format!("asl-tts-{}.ul", Uuid::new_v4()));
    tokio::fs::write(&path, audio)
        .await
        .map_err(|e| SynthesisError::Storage(format!("{}: {}", path.display(), e)))?;
    Ok(path)
}
