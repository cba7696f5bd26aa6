//! Sound Context - Value Objects

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::domain::phrase::PhraseKey;

/// 素材来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundSource {
    /// Asterisk 自带声音目录
    Base,
    /// 自定义（预生成）声音目录
    Custom,
    /// 合成缓存
    Cache,
}

impl std::fmt::Display for SoundSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SoundSource::Base => write!(f, "base"),
            SoundSource::Custom => write!(f, "custom"),
            SoundSource::Cache => write!(f, "cache"),
        }
    }
}

/// 声音素材
///
/// 不变量:
/// - key 在所属索引内唯一
/// - order 为发现顺序，越小越早
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoundAsset {
    key: PhraseKey,
    path: PathBuf,
    source: SoundSource,
    order: usize,
}

impl SoundAsset {
    pub fn new(key: PhraseKey, path: PathBuf, source: SoundSource, order: usize) -> Self {
        Self {
            key,
            path,
            source,
            order,
        }
    }

    pub fn key(&self) -> &PhraseKey {
        &self.key
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn source(&self) -> SoundSource {
        self.source
    }

    pub fn order(&self) -> usize {
        self.order
    }
}

/// 待扫描的声音目录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoundDirectory {
    pub path: PathBuf,
    pub source: SoundSource,
    /// 必需目录不存在或为空时报错；可选目录缺失视为零素材
    pub required: bool,
}

impl SoundDirectory {
    pub fn required(path: impl Into<PathBuf>, source: SoundSource) -> Self {
        Self {
            path: path.into(),
            source,
            required: true,
        }
    }

    pub fn optional(path: impl Into<PathBuf>, source: SoundSource) -> Self {
        Self {
            path: path.into(),
            source,
            required: false,
        }
    }
}
