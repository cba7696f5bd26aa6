//! Speak Handler - 拼接录音朗读文本
//!
//! 流程：构建索引 -> 切分 -> 解析 -> 拼接 -> 输出/播放 -> 缓存淘汰

use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::cache_manager::CacheManager;
use crate::application::commands::{SpeakCommand, SpeakResponse};
use crate::application::error::ApplicationError;
use crate::application::ports::{AudioAssemblerPort, PlaybackPort, SoundLibraryPort};
use crate::application::resolver::PhraseResolver;
use crate::domain::sound::SoundDirectory;
use crate::domain::{clip_file_stem, normalize_cache_text, tokenize};

/// Speak Handler
pub struct SpeakHandler {
    library: Arc<dyn SoundLibraryPort>,
    directories: Vec<SoundDirectory>,
    resolver: Arc<PhraseResolver>,
    assembler: Arc<dyn AudioAssemblerPort>,
    player: Arc<dyn PlaybackPort>,
    clip_cache: Arc<CacheManager>,
    render_cache: Arc<CacheManager>,
}

impl SpeakHandler {
    pub fn new(
        library: Arc<dyn SoundLibraryPort>,
        directories: Vec<SoundDirectory>,
        resolver: Arc<PhraseResolver>,
        assembler: Arc<dyn AudioAssemblerPort>,
        player: Arc<dyn PlaybackPort>,
        clip_cache: Arc<CacheManager>,
        render_cache: Arc<CacheManager>,
    ) -> Self {
        Self {
            library,
            directories,
            resolver,
            assembler,
            player,
            clip_cache,
            render_cache,
        }
    }

    pub async fn handle(&self, cmd: SpeakCommand) -> Result<SpeakResponse, ApplicationError> {
        if cmd.node.is_none() && cmd.output_file.is_none() {
            return Err(ApplicationError::invalid_input(
                "either a node or an output file must be specified",
            ));
        }

        let tokens = tokenize(&cmd.text);
        if tokens.is_empty() {
            return Err(ApplicationError::invalid_input("no text to speak"));
        }

        let index = self.library.build_index(&self.directories).await?;
        let resolution = self.resolver.resolve(&tokens, &index).await?;

        tracing::info!(
            tokens = tokens.len(),
            clips = resolution.len(),
            synthesized = resolution.synthesized,
            skipped = resolution.skipped.len(),
            "Text resolved"
        );

        let inputs: Vec<PathBuf> = resolution
            .paths()
            .into_iter()
            .map(|p| p.to_path_buf())
            .collect();

        let output_path = match &cmd.output_file {
            Some(file) => {
                self.assembler.assemble(&inputs, file).await?;
                file.clone()
            }
            None => self.render(&cmd.text, &inputs).await?,
        };

        let played = match &cmd.node {
            Some(node) => {
                self.player.play(node, &output_path).await?;
                true
            }
            None => false,
        };

        self.evict().await;

        Ok(SpeakResponse {
            output_path,
            clip_count: resolution.len(),
            synthesized: resolution.synthesized,
            skipped: resolution.skipped,
            played,
        })
    }

    /// 拼接到临时文件后存入输出缓存
    async fn render(&self, text: &str, inputs: &[PathBuf]) -> Result<PathBuf, ApplicationError> {
        let scratch = std::env::temp_dir().join(format!("asl-tts-render-{}.ul", Uuid::new_v4()));
        self.assembler.assemble(inputs, &scratch).await?;

        let audio = tokio::fs::read(&scratch)
            .await
            .map_err(|e| ApplicationError::file(format!("{}: {}", scratch.display(), e)));
        let _ = tokio::fs::remove_file(&scratch).await;
        let audio = audio?;

        let key = render_key(text, self.resolver.options().max_phrase_words);
        let entry = self.render_cache.store().write_entry(&key, &audio).await?;
        self.render_cache.admit(&entry);

        Ok(entry.path)
    }

    /// 拼接完成后再淘汰，保证本次引用的片段在拼接前存在
    async fn evict(&self) {
        for (name, cache) in [("clips", &self.clip_cache), ("rendered", &self.render_cache)] {
            if let Err(e) = cache.evict().await {
                tracing::warn!(cache = name, error = %e, "Cache eviction failed");
            }
        }
    }
}

/// 输出缓存的键：可读前缀加原文 md5
///
/// 前缀会去掉标点，md5 按原文计算，"hello, world." 与 "hello world" 的停顿不同，不能共用文件
fn render_key(text: &str, max_words: usize) -> String {
    let digest = format!("{:x}", md5::compute(text.as_bytes()));
    format!(
        "{}-{}",
        clip_file_stem(&normalize_cache_text(text), max_words),
        &digest[..8]
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::cache_manager::CachePolicy;
    use crate::application::ports::{ClipCachePort, PlaybackError, PlaybackPort};
    use crate::application::resolver::ResolverOptions;
    use crate::application::synthesizer::FallbackSynthesizer;
    use crate::domain::sound::SoundSource;
    use crate::domain::speech::MissingPolicy;
    use crate::infrastructure::adapters::assembler::RawConcatAssembler;
    use crate::infrastructure::adapters::sounds::DirectorySoundLibrary;
    use crate::infrastructure::adapters::tts::FakeTtsClient;
    use crate::infrastructure::persistence::fs::FileClipCache;
    use async_trait::async_trait;
    use std::path::Path;
    use std::sync::Mutex;
    use tempfile::TempDir;

    #[derive(Default)]
    struct RecordingPlayer {
        plays: Mutex<Vec<(String, PathBuf)>>,
    }

    #[async_trait]
    impl PlaybackPort for RecordingPlayer {
        async fn play(&self, node: &str, audio_path: &Path) -> Result<(), PlaybackError> {
            self.plays
                .lock()
                .unwrap()
                .push((node.to_string(), audio_path.to_path_buf()));
            Ok(())
        }
    }

    struct Fixture {
        sounds: TempDir,
        cache: TempDir,
        player: Arc<RecordingPlayer>,
        engine: Arc<FakeTtsClient>,
    }

    impl Fixture {
        fn new() -> Self {
            let sounds = TempDir::new().unwrap();
            for (name, byte) in [("hello", 1u8), ("world", 2), ("node", 3), ("silence/1", 0)] {
                let path = sounds.path().join(format!("{}.ul", name));
                std::fs::create_dir_all(path.parent().unwrap()).unwrap();
                std::fs::write(path, [byte]).unwrap();
            }
            Self {
                sounds,
                cache: TempDir::new().unwrap(),
                player: Arc::new(RecordingPlayer::default()),
                engine: Arc::new(FakeTtsClient::with_audio(vec![9, 9])),
            }
        }

        fn handler(&self, options: ResolverOptions, max_cache_files: i64) -> SpeakHandler {
            let policy = CachePolicy {
                max_files: max_cache_files,
                max_age_days: -1,
            };
            let clip_cache = Arc::new(CacheManager::new(
                Arc::new(FileClipCache::new(self.cache.path()).unwrap()),
                policy,
            ));
            let render_cache = Arc::new(CacheManager::new(
                Arc::new(FileClipCache::new(self.cache.path().join("rendered")).unwrap()),
                policy,
            ));
            let synth = Arc::new(FallbackSynthesizer::new(
                self.engine.clone(),
                clip_cache.clone(),
                options.max_phrase_words,
            ));

            SpeakHandler::new(
                Arc::new(DirectorySoundLibrary::new()),
                vec![SoundDirectory::required(self.sounds.path(), SoundSource::Base)],
                Arc::new(PhraseResolver::new(options, Some(synth))),
                Arc::new(RawConcatAssembler::new()),
                self.player.clone(),
                clip_cache,
                render_cache,
            )
        }
    }

    #[tokio::test]
    async fn test_speak_to_file() {
        let fx = Fixture::new();
        let out = fx.cache.path().join("out/hello.ul");

        let response = fx
            .handler(ResolverOptions::default(), 100)
            .handle(SpeakCommand {
                text: "hello, world".to_string(),
                node: None,
                output_file: Some(out.clone()),
            })
            .await
            .unwrap();

        assert_eq!(std::fs::read(&out).unwrap(), vec![1, 0, 2]);
        assert_eq!(response.clip_count, 3);
        assert!(!response.played);
        assert_eq!(fx.engine.call_count(), 0);
    }

    #[tokio::test]
    async fn test_speak_to_node_uses_render_cache() {
        let fx = Fixture::new();

        let response = fx
            .handler(ResolverOptions::default(), 100)
            .handle(SpeakCommand {
                text: "node hello".to_string(),
                node: Some("2000".to_string()),
                output_file: None,
            })
            .await
            .unwrap();

        assert!(response.played);
        let key = render_key("node hello", ResolverOptions::default().max_phrase_words);
        assert!(key.starts_with("node-hello-"));
        assert_eq!(
            response.output_path,
            fx.cache.path().join(format!("rendered/{}.ul", key))
        );
        assert_eq!(std::fs::read(&response.output_path).unwrap(), vec![3, 1]);

        let plays = fx.player.plays.lock().unwrap();
        assert_eq!(plays.len(), 1);
        assert_eq!(plays[0].0, "2000");
        assert_eq!(plays[0].1, response.output_path);
    }

    #[tokio::test]
    async fn test_punctuation_variants_render_separately() {
        let fx = Fixture::new();
        let handler = fx.handler(ResolverOptions::default(), 100);

        let mut outputs = Vec::new();
        for text in ["hello, world.", "hello world"] {
            let response = handler
                .handle(SpeakCommand {
                    text: text.to_string(),
                    node: Some("2000".to_string()),
                    output_file: None,
                })
                .await
                .unwrap();
            outputs.push(response.output_path);
        }

        assert_ne!(outputs[0], outputs[1]);
        assert_eq!(std::fs::read(&outputs[1]).unwrap(), vec![1, 2]);
        assert_ne!(std::fs::read(&outputs[0]).unwrap(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_node_or_file_required() {
        let fx = Fixture::new();
        let err = fx
            .handler(ResolverOptions::default(), 100)
            .handle(SpeakCommand {
                text: "hello".to_string(),
                node: None,
                output_file: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err.exit_code(), 1);
    }

    #[tokio::test]
    async fn test_unresolved_text_fails() {
        let fx = Fixture::new();
        let options = ResolverOptions {
            auto_generate_words: false,
            on_missing: MissingPolicy::Error,
            ..Default::default()
        };
        let err = fx
            .handler(options, 100)
            .handle(SpeakCommand {
                text: "hello gibberish".to_string(),
                node: None,
                output_file: Some(fx.cache.path().join("out.ul")),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::Unresolved(_)));
        assert_eq!(err.exit_code(), 2);
    }

    #[tokio::test]
    async fn test_eviction_happens_after_assembly() {
        let fx = Fixture::new();
        let out = fx.cache.path().join("out/speech.ul");

        fx.handler(ResolverOptions::default(), 1)
            .handle(SpeakCommand {
                text: "node repeater simplex".to_string(),
                node: None,
                output_file: Some(out.clone()),
            })
            .await
            .unwrap();

        // 两个合成片段都参与了拼接
        assert_eq!(std::fs::read(&out).unwrap(), vec![3, 9, 9, 9, 9]);
        assert_eq!(fx.engine.call_count(), 2);

        let remaining = FileClipCache::new(fx.cache.path())
            .unwrap()
            .list_entries()
            .await
            .unwrap();
        assert_eq!(remaining.len(), 1);
    }
}
