//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.yaml / config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::{AppConfig, TtsBackend};

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    #[error("Failed to create directory {path}: {message}")]
    DirectoryError { path: String, message: String },
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径（不含扩展名）
const CONFIG_FILE_NAMES: &[&str] = &["/etc/asl-tts-tools/config", "config", "config.local"];

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `ASL_TTS_`）
/// 2. 配置文件（/etc/asl-tts-tools/config.yaml、./config.yaml 等）
/// 3. 默认值
///
/// # 环境变量示例
/// - `ASL_TTS_ON_MISSING=beep`
/// - `ASL_TTS_MAX_CACHE_FILES=500`
/// - `ASL_TTS_TTS_BACKEND=http`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径；
///   指定的文件必须存在
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）
    builder = builder
        .set_default("sounds_directory", "/usr/share/asterisk/sounds/en")?
        .set_default(
            "custom_sounds_directory",
            "/usr/share/asterisk/sounds/custom/generated",
        )?
        .set_default("cache_directory", "/tmp/asl-tts-tools-cache")?
        .set_default("on_missing", "error")?
        .set_default("beep_sound", "beep")?
        .set_default("silence_sound", "silence/1")?
        .set_default("max_phrase_words_for_filenames", 5)?
        .set_default("auto_phrase_matching", true)?
        .set_default("auto_generate_words", true)?
        .set_default("prefer_custom_sounds", false)?
        .set_default("asl_tts_bin", "asl-tts")?
        .set_default("tts_backend", "command")?
        .set_default("tts_url", "http://localhost:8000")?
        .set_default("tts_timeout_secs", 120)?
        .set_default("assembler", "sox")?
        .set_default("sox_bin", "sox")?
        .set_default("asterisk_bin", "asterisk")?
        .set_default("cache_backend", "files")?
        .set_default("max_cache_files", 100)?
        .set_default("max_cache_age_days", -1)?
        .set_default("log_level", "info")?;

    // 2. 配置文件
    if let Some(path) = config_path {
        if !path.exists() {
            return Err(ConfigError::LoadError(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 环境变量（最高优先级），例如 ASL_TTS_ON_MISSING=skip
    builder = builder.add_source(
        Environment::with_prefix("ASL_TTS")
            .prefix_separator("_")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
pub fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.max_phrase_words_for_filenames == 0 {
        return Err(ConfigError::ValidationError(
            "max_phrase_words_for_filenames must be at least 1".to_string(),
        ));
    }

    if config.max_cache_files == 0 || config.max_cache_files < -1 {
        return Err(ConfigError::ValidationError(format!(
            "max_cache_files must be -1 (unlimited) or at least 1, got {}",
            config.max_cache_files
        )));
    }

    if config.max_cache_age_days < -1 {
        return Err(ConfigError::ValidationError(format!(
            "max_cache_age_days must be -1 (unlimited) or non-negative, got {}",
            config.max_cache_age_days
        )));
    }

    if config.beep_sound.trim().is_empty() || config.silence_sound.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "beep_sound and silence_sound cannot be empty".to_string(),
        ));
    }

    match config.tts_backend {
        TtsBackend::Command if config.asl_tts_bin.trim().is_empty() => {
            return Err(ConfigError::ValidationError(
                "asl_tts_bin cannot be empty".to_string(),
            ));
        }
        TtsBackend::Http if config.tts_url.trim().is_empty() => {
            return Err(ConfigError::ValidationError(
                "tts_url cannot be empty".to_string(),
            ));
        }
        TtsBackend::Http if config.tts_timeout_secs == 0 => {
            return Err(ConfigError::ValidationError(
                "tts_timeout_secs cannot be 0".to_string(),
            ));
        }
        _ => {}
    }

    Ok(())
}

/// 创建自定义声音目录和缓存目录
pub fn prepare_directories(config: &AppConfig) -> Result<(), ConfigError> {
    for dir in [
        &config.custom_sounds_directory,
        &config.cache_directory,
    ] {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::DirectoryError {
            path: dir.display().to_string(),
            message: e.to_string(),
        })?;
    }
    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::debug!("=== Application Configuration ===");
    tracing::debug!("Sounds Directory: {:?}", config.sounds_directory);
    tracing::debug!("Custom Sounds Directory: {:?}", config.custom_sounds_directory);
    tracing::debug!("Cache Directory: {:?}", config.cache_directory);
    tracing::debug!("Prefer Custom Sounds: {}", config.prefer_custom_sounds);
    tracing::debug!("On Missing: {}", config.on_missing);
    tracing::debug!("Max Phrase Words: {}", config.max_phrase_words_for_filenames);
    tracing::debug!("Auto Phrase Matching: {}", config.auto_phrase_matching);
    tracing::debug!("Auto Generate Words: {}", config.auto_generate_words);
    tracing::debug!("TTS Backend: {:?}", config.tts_backend);
    match config.tts_backend {
        TtsBackend::Command => tracing::debug!("TTS Binary: {}", config.asl_tts_bin),
        TtsBackend::Http => {
            tracing::debug!("TTS URL: {}", config.tts_url);
            tracing::debug!("TTS Timeout: {}s", config.tts_timeout_secs);
        }
    }
    tracing::debug!("Assembler: {:?}", config.assembler);
    tracing::debug!("Cache Backend: {:?}", config.cache_backend);
    tracing::debug!("Max Cache Files: {}", config.max_cache_files);
    tracing::debug!("Max Cache Age Days: {}", config.max_cache_age_days);
    tracing::debug!("Log Level: {}", config.log_level);
    tracing::debug!("=================================");
}
