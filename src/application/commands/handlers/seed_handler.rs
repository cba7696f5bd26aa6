//! Seed Handler - 预生成常用声音片段
//!
//! 内置目录加可选短语文件，合成结果写入自定义声音目录的分类子目录

use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures_util::future::join_all;
use tokio::sync::Semaphore;
use uuid::Uuid;

use crate::application::commands::{SeedCommand, SeedFailure, SeedResponse};
use crate::application::error::ApplicationError;
use crate::application::ports::TtsEnginePort;
use crate::domain::catalog::{builtin_catalog, parse_phrases, SeedItem};

/// 单条任务结果
enum SeedOutcome {
    Generated,
    Skipped,
    Failed(SeedFailure),
}

/// Seed Handler
pub struct SeedHandler {
    engine: Arc<dyn TtsEnginePort>,
    custom_dir: PathBuf,
    max_words: usize,
}

impl SeedHandler {
    pub fn new(engine: Arc<dyn TtsEnginePort>, custom_dir: impl Into<PathBuf>, max_words: usize) -> Self {
        Self {
            engine,
            custom_dir: custom_dir.into(),
            max_words,
        }
    }

    pub async fn handle(&self, cmd: SeedCommand) -> Result<SeedResponse, ApplicationError> {
        let mut items = builtin_catalog(self.max_words);

        if let Some(file) = &cmd.phrases_file {
            let content = tokio::fs::read_to_string(file)
                .await
                .map_err(|e| ApplicationError::file(format!("{}: {}", file.display(), e)))?;
            let custom = parse_phrases(&content, self.max_words);
            tracing::info!(file = %file.display(), count = custom.len(), "Loaded phrases file");
            items.extend(custom);
        }

        if !self.engine.health_check().await {
            tracing::warn!("TTS engine health check failed, seeding anyway");
        }

        let threads = cmd.threads.max(1);
        tracing::info!(
            items = items.len(),
            threads = threads,
            force = cmd.force,
            dir = %self.custom_dir.display(),
            "Seeding sound library"
        );

        let semaphore = Arc::new(Semaphore::new(threads));
        let mut handles = Vec::with_capacity(items.len());

        for item in items {
            let semaphore = semaphore.clone();
            let engine = self.engine.clone();
            let target = self.target_path(&item);
            let force = cmd.force;

            handles.push(tokio::spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(e) => {
                        return SeedOutcome::Failed(SeedFailure {
                            file: target,
                            text: item.text,
                            error: e.to_string(),
                        })
                    }
                };
                Self::seed_one(engine, item, target, force).await
            }));
        }

        let mut response = SeedResponse::default();
        for joined in join_all(handles).await {
            match joined {
                Ok(SeedOutcome::Generated) => response.generated += 1,
                Ok(SeedOutcome::Skipped) => response.skipped += 1,
                Ok(SeedOutcome::Failed(failure)) => response.failed.push(failure),
                Err(e) => {
                    tracing::error!(error = %e, "Seed task panicked");
                    response.failed.push(SeedFailure {
                        file: PathBuf::new(),
                        text: String::new(),
                        error: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            generated = response.generated,
            skipped = response.skipped,
            failed = response.failed.len(),
            "Seeding finished"
        );
        Ok(response)
    }

    /// `<custom_dir>/<category>/<stem>.ul`
    pub fn target_path(&self, item: &SeedItem) -> PathBuf {
        self.custom_dir
            .join(&item.category)
            .join(format!("{}.ul", item.file_stem))
    }

    async fn seed_one(
        engine: Arc<dyn TtsEnginePort>,
        item: SeedItem,
        target: PathBuf,
        force: bool,
    ) -> SeedOutcome {
        if !force && tokio::fs::try_exists(&target).await.unwrap_or(false) {
            tracing::debug!(file = %target.display(), "Already exists, skipping");
            return SeedOutcome::Skipped;
        }

        let failed = |error: String| {
            tracing::warn!(file = %target.display(), text = %item.text, error = %error, "Seed item failed");
            SeedOutcome::Failed(SeedFailure {
                file: target.clone(),
                text: item.text.clone(),
                error,
            })
        };

        let audio = match engine.synthesize(&item.text).await {
            Ok(audio) if audio.is_empty() => return failed("TTS engine returned no audio".to_string()),
            Ok(audio) => audio,
            Err(e) => return failed(e.to_string()),
        };

        if let Err(e) = write_atomic(&target, &audio).await {
            return failed(e.to_string());
        }

        tracing::debug!(file = %target.display(), size = audio.len(), "Generated");
        SeedOutcome::Generated
    }
}

/// 先写临时文件再重命名
async fn write_atomic(target: &Path, data: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = target.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let tmp = target.with_extension(format!("{}.tmp", Uuid::new_v4().simple()));
    tokio::fs::write(&tmp, data).await?;
    if let Err(e) = tokio::fs::rename(&tmp, target).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(e);
    }
    Ok(())
}
