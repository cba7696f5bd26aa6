//! Configuration Types
//!
//! 扁平配置结构，键名与 `/etc/asl-tts-tools/config.yaml` 一致

use serde::Deserialize;
use std::path::PathBuf;

use crate::application::cache_manager::CachePolicy;
use crate::application::resolver::ResolverOptions;
use crate::domain::sound::{SoundDirectory, SoundSource};
use crate::domain::speech::MissingPolicy;

/// TTS 后端
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TtsBackend {
    /// 调用 `asl-tts` 命令
    #[default]
    Command,
    /// 调用 TTS HTTP 服务
    Http,
}

/// 音频拼接方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssemblerKind {
    #[default]
    Sox,
    /// 无头格式直接字节拼接
    Raw,
}

/// 片段缓存存储
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// 目录列表即数据库
    #[default]
    Files,
    /// sled 元数据 + 文件
    Sled,
}

/// 应用主配置
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Asterisk 自带声音目录
    #[serde(default = "default_sounds_directory")]
    pub sounds_directory: PathBuf,

    /// 预生成声音目录
    #[serde(default = "default_custom_sounds_directory")]
    pub custom_sounds_directory: PathBuf,

    /// 合成缓存目录
    #[serde(default = "default_cache_directory")]
    pub cache_directory: PathBuf,

    #[serde(default)]
    pub on_missing: MissingPolicy,

    #[serde(default = "default_beep_sound")]
    pub beep_sound: String,

    #[serde(default = "default_silence_sound")]
    pub silence_sound: String,

    /// 短语窗口大小，同时决定缓存文件名保留的单词数
    #[serde(default = "default_max_phrase_words")]
    pub max_phrase_words_for_filenames: usize,

    #[serde(default = "default_true")]
    pub auto_phrase_matching: bool,

    #[serde(default = "default_true")]
    pub auto_generate_words: bool,

    /// 自定义目录先于 Asterisk 目录扫描
    #[serde(default)]
    pub prefer_custom_sounds: bool,

    #[serde(default = "default_asl_tts_bin")]
    pub asl_tts_bin: String,

    #[serde(default)]
    pub tts_backend: TtsBackend,

    #[serde(default = "default_tts_url")]
    pub tts_url: String,

    /// 请求超时时间（秒），仅 http 后端
    #[serde(default = "default_tts_timeout")]
    pub tts_timeout_secs: u64,

    #[serde(default)]
    pub assembler: AssemblerKind,

    #[serde(default = "default_sox_bin")]
    pub sox_bin: String,

    #[serde(default = "default_asterisk_bin")]
    pub asterisk_bin: String,

    #[serde(default)]
    pub cache_backend: CacheBackend,

    /// -1 表示不限制
    #[serde(default = "default_max_cache_files")]
    pub max_cache_files: i64,

    /// -1 表示不限制
    #[serde(default = "default_max_cache_age_days")]
    pub max_cache_age_days: i64,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_sounds_directory() -> PathBuf {
    PathBuf::from("/usr/share/asterisk/sounds/en")
}

fn default_custom_sounds_directory() -> PathBuf {
    PathBuf::from("/usr/share/asterisk/sounds/custom/generated")
}

fn default_cache_directory() -> PathBuf {
    PathBuf::from("/tmp/asl-tts-tools-cache")
}

fn default_beep_sound() -> String {
    "beep".to_string()
}

fn default_silence_sound() -> String {
    "silence/1".to_string()
}

fn default_max_phrase_words() -> usize {
    5
}

fn default_true() -> bool {
    true
}

fn default_asl_tts_bin() -> String {
    "asl-tts".to_string()
}

fn default_tts_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_tts_timeout() -> u64 {
    120
}

fn default_sox_bin() -> String {
    "sox".to_string()
}

fn default_asterisk_bin() -> String {
    "asterisk".to_string()
}

fn default_max_cache_files() -> i64 {
    100
}

fn default_max_cache_age_days() -> i64 {
    -1
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            sounds_directory: default_sounds_directory(),
            custom_sounds_directory: default_custom_sounds_directory(),
            cache_directory: default_cache_directory(),
            on_missing: MissingPolicy::default(),
            beep_sound: default_beep_sound(),
            silence_sound: default_silence_sound(),
            max_phrase_words_for_filenames: default_max_phrase_words(),
            auto_phrase_matching: true,
            auto_generate_words: true,
            prefer_custom_sounds: false,
            asl_tts_bin: default_asl_tts_bin(),
            tts_backend: TtsBackend::default(),
            tts_url: default_tts_url(),
            tts_timeout_secs: default_tts_timeout(),
            assembler: AssemblerKind::default(),
            sox_bin: default_sox_bin(),
            asterisk_bin: default_asterisk_bin(),
            cache_backend: CacheBackend::default(),
            max_cache_files: default_max_cache_files(),
            max_cache_age_days: default_max_cache_age_days(),
            log_level: default_log_level(),
        }
    }
}

impl AppConfig {
    /// 参与索引的声音目录，按扫描顺序排列
    ///
    /// 缓存目录不参与索引
    pub fn sound_directories(&self) -> Vec<SoundDirectory> {
        let base = SoundDirectory::required(&self.sounds_directory, SoundSource::Base);
        let custom = SoundDirectory::optional(&self.custom_sounds_directory, SoundSource::Custom);
        if self.prefer_custom_sounds {
            vec![custom, base]
        } else {
            vec![base, custom]
        }
    }

    pub fn resolver_options(&self) -> ResolverOptions {
        ResolverOptions {
            max_phrase_words: self.max_phrase_words_for_filenames,
            auto_phrase_matching: self.auto_phrase_matching,
            auto_generate_words: self.auto_generate_words,
            on_missing: self.on_missing,
            beep_sound: self.beep_sound.clone(),
            silence_sound: self.silence_sound.clone(),
        }
    }

    pub fn cache_policy(&self) -> CachePolicy {
        CachePolicy {
            max_files: self.max_cache_files,
            max_age_days: self.max_cache_age_days,
        }
    }

    /// 拼接输出的缓存目录
    pub fn rendered_directory(&self) -> PathBuf {
        self.cache_directory.join("rendered")
    }
}
