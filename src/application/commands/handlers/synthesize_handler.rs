//! Synthesize Handler - 整段文本交给 TTS 合成
//!
//! 合成结果进入片段缓存；相同文本再次请求时直接复用

use std::path::PathBuf;
use std::sync::Arc;

use crate::application::cache_manager::CacheManager;
use crate::application::commands::{SynthesizeCommand, SynthesizeResponse};
use crate::application::error::ApplicationError;
use crate::application::ports::PlaybackPort;
use crate::application::synthesizer::FallbackSynthesizer;

/// Synthesize Handler
pub struct SynthesizeHandler {
    synthesizer: Arc<FallbackSynthesizer>,
    clip_cache: Arc<CacheManager>,
    player: Arc<dyn PlaybackPort>,
}

impl SynthesizeHandler {
    pub fn new(
        synthesizer: Arc<FallbackSynthesizer>,
        clip_cache: Arc<CacheManager>,
        player: Arc<dyn PlaybackPort>,
    ) -> Self {
        Self {
            synthesizer,
            clip_cache,
            player,
        }
    }

    pub async fn handle(&self, cmd: SynthesizeCommand) -> Result<SynthesizeResponse, ApplicationError> {
        if cmd.node.is_none() && cmd.output_file.is_none() {
            return Err(ApplicationError::invalid_input(
                "either a node or an output file must be specified",
            ));
        }
        let text = cmd.text.trim();
        if text.is_empty() {
            return Err(ApplicationError::invalid_input("no text to synthesize"));
        }

        let calls_before = self.synthesizer.engine_calls();
        let clip = self.synthesizer.synthesize_or_cached(text).await?;
        let cached = self.synthesizer.engine_calls() == calls_before;

        tracing::info!(
            text = %text,
            path = %clip.path().display(),
            cached = cached,
            "Text synthesized"
        );

        let output_path = match &cmd.output_file {
            Some(file) => Some(copy_with_extension(clip.path(), file).await?),
            None => None,
        };

        let played = match &cmd.node {
            Some(node) => {
                self.player.play(node, clip.path()).await?;
                true
            }
            None => false,
        };

        if let Err(e) = self.clip_cache.evict().await {
            tracing::warn!(error = %e, "Cache eviction failed");
        }

        Ok(SynthesizeResponse {
            clip_path: clip.path().to_path_buf(),
            output_path,
            cached,
            played,
        })
    }
}

/// 复制到 `<file>.ul`
async fn copy_with_extension(
    source: &std::path::Path,
    file: &std::path::Path,
) -> Result<PathBuf, ApplicationError> {
    let mut target = file.as_os_str().to_owned();
    target.push(".ul");
    let target = PathBuf::from(target);

    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| ApplicationError::file(format!("{}: {}", parent.display(), e)))?;
    }
    tokio::fs::copy(source, &target)
        .await
        .map_err(|e| ApplicationError::file(format!("{}: {}", target.display(), e)))?;

    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::cache_manager::CachePolicy;
    use crate::infrastructure::adapters::playback::AsteriskPlayer;
    use crate::infrastructure::adapters::tts::FakeTtsClient;
    use crate::infrastructure::persistence::fs::FileClipCache;
    use tempfile::TempDir;

    fn handler(cache_dir: &TempDir, engine: Arc<FakeTtsClient>) -> SynthesizeHandler {
        let cache = Arc::new(CacheManager::new(
            Arc::new(FileClipCache::new(cache_dir.path()).unwrap()),
            CachePolicy::default(),
        ));
        let synth = Arc::new(FallbackSynthesizer::new(engine, cache.clone(), 5));
        SynthesizeHandler::new(synth, cache, Arc::new(AsteriskPlayer::new("/nonexistent/asterisk")))
    }

    #[tokio::test]
    async fn test_copies_to_output_with_extension() {
        let cache_dir = TempDir::new().unwrap();
        let out_dir = TempDir::new().unwrap();
        let engine = Arc::new(FakeTtsClient::with_audio(vec![5, 6]));
        let handler = handler(&cache_dir, engine.clone());

        let cmd = SynthesizeCommand {
            text: "Net control, this is a test.".to_string(),
            node: None,
            output_file: Some(out_dir.path().join("announce")),
        };

        let first = handler.handle(cmd.clone()).await.unwrap();
        let output = first.output_path.clone().unwrap();
        assert_eq!(output, out_dir.path().join("announce.ul"));
        assert_eq!(std::fs::read(output).unwrap(), vec![5, 6]);
        assert!(!first.cached);

        let second = handler.handle(cmd).await.unwrap();
        assert!(second.cached);
        assert_eq!(engine.call_count(), 1);
    }

    #[tokio::test]
    async fn test_playback_failure_maps_to_playback_error() {
        let cache_dir = TempDir::new().unwrap();
        let handler = handler(&cache_dir, Arc::new(FakeTtsClient::new()));

        let err = handler
            .handle(SynthesizeCommand {
                text: "hello".to_string(),
                node: Some("2000".to_string()),
                output_file: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err.exit_code(), 6);
    }

    #[tokio::test]
    async fn test_engine_failure_is_audio_error() {
        let cache_dir = TempDir::new().unwrap();
        let handler = handler(&cache_dir, Arc::new(FakeTtsClient::failing()));

        let err = handler
            .handle(SynthesizeCommand {
                text: "hello".to_string(),
                node: Some("2000".to_string()),
                output_file: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }
}
