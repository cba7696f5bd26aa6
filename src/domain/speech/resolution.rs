//! Speech Context - 解析结果

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::domain::sound::SoundAsset;

/// 无法解析的 Token 的处理策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingPolicy {
    /// 中止整个解析
    #[default]
    Error,
    /// 用提示音替代
    Beep,
    /// 静默跳过
    Skip,
}

impl std::fmt::Display for MissingPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MissingPolicy::Error => write!(f, "error"),
            MissingPolicy::Beep => write!(f, "beep"),
            MissingPolicy::Skip => write!(f, "skip"),
        }
    }
}

impl std::str::FromStr for MissingPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" => Ok(MissingPolicy::Error),
            "beep" => Ok(MissingPolicy::Beep),
            "skip" => Ok(MissingPolicy::Skip),
            _ => Err(format!("Invalid on_missing value: {}", s)),
        }
    }
}

/// 输出序列中的一个片段引用
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedClip {
    /// 已有录音
    Sound(SoundAsset),
    /// 合成得到的片段
    Synthesized(SoundAsset),
    /// 停顿
    Silence(SoundAsset),
    /// 缺失提示音
    Beep(SoundAsset),
}

impl ResolvedClip {
    pub fn asset(&self) -> &SoundAsset {
        match self {
            ResolvedClip::Sound(asset)
            | ResolvedClip::Synthesized(asset)
            | ResolvedClip::Silence(asset)
            | ResolvedClip::Beep(asset) => asset,
        }
    }

    pub fn path(&self) -> &Path {
        self.asset().path()
    }
}

/// 解析结果
///
/// 只持有素材引用，不持有音频数据；顺序与输入文本一致
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionResult {
    pub clips: Vec<ResolvedClip>,
    /// 被跳过的 Token 原文
    pub skipped: Vec<String>,
    /// 本次解析中新合成或命中缓存的合成片段数
    pub synthesized: usize,
}

impl ResolutionResult {
    pub fn paths(&self) -> Vec<&Path> {
        self.clips.iter().map(ResolvedClip::path).collect()
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }
}
