//! Phrase Resolver - Token 到声音片段的解析
//!
//! 按优先级依次尝试匹配策略链，所有策略都不适用时交给 FallbackSynthesizer，
//! 仍无法解析的片段按缺失策略处理

mod matchers;

use std::sync::Arc;

pub use matchers::{default_chain, Match, MatchContext, Matcher, Piece};

use crate::application::synthesizer::FallbackSynthesizer;
use crate::domain::sound::SoundIndex;
use crate::domain::speech::{MissingPolicy, ResolutionResult, ResolveError, ResolvedClip, Token};

/// 解析选项
#[derive(Debug, Clone)]
pub struct ResolverOptions {
    /// 短语窗口最大 Token 数
    pub max_phrase_words: usize,
    /// 为 false 时只做单个 Token 匹配
    pub auto_phrase_matching: bool,
    /// 允许调用 TTS 合成缺失的单词
    pub auto_generate_words: bool,
    pub on_missing: MissingPolicy,
    pub beep_sound: String,
    pub silence_sound: String,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            max_phrase_words: 5,
            auto_phrase_matching: true,
            auto_generate_words: true,
            on_missing: MissingPolicy::Error,
            beep_sound: "beep".to_string(),
            silence_sound: "silence/1".to_string(),
        }
    }
}

/// Phrase Resolver
pub struct PhraseResolver {
    chain: Vec<Box<dyn Matcher>>,
    options: ResolverOptions,
    synthesizer: Option<Arc<FallbackSynthesizer>>,
}

impl PhraseResolver {
    pub fn new(options: ResolverOptions, synthesizer: Option<Arc<FallbackSynthesizer>>) -> Self {
        Self::with_chain(default_chain(), options, synthesizer)
    }

    pub fn with_chain(
        chain: Vec<Box<dyn Matcher>>,
        options: ResolverOptions,
        synthesizer: Option<Arc<FallbackSynthesizer>>,
    ) -> Self {
        Self {
            chain,
            options,
            synthesizer,
        }
    }

    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    /// 解析 Token 序列
    ///
    /// 输出顺序与输入一致；只有 `on_missing = error` 时会失败
    pub async fn resolve(
        &self,
        tokens: &[Token],
        index: &SoundIndex,
    ) -> Result<ResolutionResult, ResolveError> {
        let ctx = MatchContext {
            index,
            max_window: if self.options.auto_phrase_matching {
                self.options.max_phrase_words.max(1)
            } else {
                1
            },
            silence_sound: &self.options.silence_sound,
        };

        let mut result = ResolutionResult::default();
        let mut pos = 0;

        while pos < tokens.len() {
            let token = &tokens[pos];

            let matched = self
                .chain
                .iter()
                .find_map(|m| m.try_match(&ctx, tokens, pos).map(|found| (m.name(), found)));

            if let Some((name, found)) = matched {
                tracing::debug!(
                    token = %token,
                    matcher = name,
                    consumed = found.consumed,
                    pieces = found.pieces.len(),
                    "Token matched"
                );
                for piece in found.pieces {
                    match piece {
                        Piece::Found(asset) => result.clips.push(ResolvedClip::Sound(asset)),
                        Piece::Pause(asset) => result.clips.push(ResolvedClip::Silence(asset)),
                        Piece::Missing(text) => self.handle_missing(&text, None, index, &mut result)?,
                    }
                }
                pos += found.consumed.max(1);
                continue;
            }

            self.fallback(token, index, &mut result).await?;
            pos += 1;
        }

        tracing::debug!(
            clips = result.len(),
            skipped = result.skipped.len(),
            synthesized = result.synthesized,
            "Text resolved"
        );

        Ok(result)
    }

    /// 合成兜底
    async fn fallback(
        &self,
        token: &Token,
        index: &SoundIndex,
        result: &mut ResolutionResult,
    ) -> Result<(), ResolveError> {
        let synthesizer = match &self.synthesizer {
            Some(s) if self.options.auto_generate_words && token.is_synthesizable() => s,
            _ => return self.handle_missing(token.raw(), None, index, result),
        };

        match synthesizer.synthesize_or_cached(token.text()).await {
            Ok(asset) => {
                result.clips.push(ResolvedClip::Synthesized(asset));
                result.synthesized += 1;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(token = %token, error = %e, "Synthesis failed");
                self.handle_missing(token.raw(), Some(e.to_string()), index, result)
            }
        }
    }

    /// 按缺失策略处理
    fn handle_missing(
        &self,
        text: &str,
        cause: Option<String>,
        index: &SoundIndex,
        result: &mut ResolutionResult,
    ) -> Result<(), ResolveError> {
        match self.options.on_missing {
            MissingPolicy::Error => Err(match cause {
                Some(message) => ResolveError::Synthesis {
                    token: text.to_string(),
                    message,
                },
                None => ResolveError::Unresolved {
                    token: text.to_string(),
                },
            }),
            MissingPolicy::Beep => {
                match index.lookup_exact(&self.options.beep_sound) {
                    Some(beep) => result.clips.push(ResolvedClip::Beep(beep.clone())),
                    None => {
                        tracing::warn!(
                            beep_sound = %self.options.beep_sound,
                            token = %text,
                            "Beep sound not found, skipping"
                        );
                        result.skipped.push(text.to_string());
                    }
                }
                Ok(())
            }
            MissingPolicy::Skip => {
                tracing::debug!(token = %text, "Skipping unresolved text");
                result.skipped.push(text.to_string());
                Ok(())
            }
        }
    }
}
