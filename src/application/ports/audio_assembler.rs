//! Audio Assembler Port - 音频拼接抽象
//!
//! 将有序的素材路径拼接为一个可播放的文件；格式转换由实现负责

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// 拼接错误
#[derive(Debug, Error)]
pub enum AssembleError {
    #[error("No input clips to assemble")]
    NoInput,

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Mixed formats cannot be concatenated without conversion: {0}")]
    MixedFormats(String),

    #[error("Audio tool failed: {0}")]
    ToolFailed(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// 声音文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ClipFormat {
    /// G.711 μ-law
    #[default]
    Ulaw,
    /// G.711 A-law
    Alaw,
    Gsm,
    /// Signed Linear 16-bit
    Sln,
    G729,
    Wav,
    /// WAV 封装的 GSM (wav49)
    WavGsm,
}

impl ClipFormat {
    /// 根据扩展名判断格式
    ///
    /// Asterisk 的 `pcm` 即 μ-law；vox、ilbc、g723、g726 等 sox 无法按原始流读取的编码返回
    /// `UnsupportedFormat`
    pub fn from_path(path: &Path) -> Result<Self, AssembleError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "ul" | "ulaw" | "g711" | "pcm" => Ok(ClipFormat::Ulaw),
            "al" | "alaw" => Ok(ClipFormat::Alaw),
            "gsm" => Ok(ClipFormat::Gsm),
            "sln" => Ok(ClipFormat::Sln),
            "g729" => Ok(ClipFormat::G729),
            "wav" => Ok(ClipFormat::Wav),
            "wav_gsm" | "wav49" => Ok(ClipFormat::WavGsm),
            _ => Err(AssembleError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// 格式名
    pub fn name(&self) -> &'static str {
        match self {
            ClipFormat::Ulaw => "ul",
            ClipFormat::Alaw => "al",
            ClipFormat::Gsm => "gsm",
            ClipFormat::Sln => "sln",
            ClipFormat::G729 => "g729",
            ClipFormat::Wav => "wav",
            ClipFormat::WavGsm => "wav_gsm",
        }
    }

    /// sox 读取时的 `-t` 参数，带文件头的格式返回 `None` 由 sox 读取文件头识别
    pub fn sox_input_type(&self) -> Result<Option<&'static str>, AssembleError> {
        match self {
            ClipFormat::Ulaw => Ok(Some("ul")),
            ClipFormat::Alaw => Ok(Some("al")),
            ClipFormat::Gsm => Ok(Some("gsm")),
            ClipFormat::Sln => Ok(Some("sln")),
            ClipFormat::Wav | ClipFormat::WavGsm => Ok(None),
            ClipFormat::G729 => Err(AssembleError::UnsupportedFormat(
                "g729 is not readable by sox".to_string(),
            )),
        }
    }

    /// sox 写出时的格式参数
    pub fn sox_output_args(&self) -> Result<Vec<&'static str>, AssembleError> {
        match self {
            ClipFormat::Wav => Ok(vec!["-t", "wav"]),
            ClipFormat::WavGsm => Ok(vec!["-t", "wav", "-e", "gsm-full-rate"]),
            ClipFormat::G729 => Err(AssembleError::UnsupportedFormat(
                "g729 is not writable by sox".to_string(),
            )),
            raw => Ok(raw.sox_input_type()?.map(|t| vec!["-t", t]).unwrap_or_default()),
        }
    }

    /// 无文件头的原始格式可以直接按字节拼接
    pub fn is_headerless(&self) -> bool {
        !matches!(self, ClipFormat::Wav | ClipFormat::WavGsm)
    }
}

impl std::fmt::Display for ClipFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 拼接结果
#[derive(Debug, Clone)]
pub struct AssembleResult {
    pub output_path: PathBuf,
    pub format: ClipFormat,
    pub input_count: usize,
    pub size_bytes: u64,
}

/// Audio Assembler Port
#[async_trait]
pub trait AudioAssemblerPort: Send + Sync {
    /// 按顺序拼接 `inputs` 写入 `output`，自动创建输出目录
    async fn assemble(
        &self,
        inputs: &[PathBuf],
        output: &Path,
    ) -> Result<AssembleResult, AssembleError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn format(path: &str) -> Result<ClipFormat, AssembleError> {
        ClipFormat::from_path(Path::new(path))
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(format("a/b.ul").unwrap(), ClipFormat::Ulaw);
        assert_eq!(format("a/b.ULAW").unwrap(), ClipFormat::Ulaw);
        assert_eq!(format("b.g711").unwrap(), ClipFormat::Ulaw);
        assert_eq!(format("b.pcm").unwrap(), ClipFormat::Ulaw);
        assert_eq!(format("b.gsm").unwrap(), ClipFormat::Gsm);
        assert_eq!(format("b.wav").unwrap(), ClipFormat::Wav);
        assert_eq!(format("b.wav_gsm").unwrap(), ClipFormat::WavGsm);
        assert_eq!(format("b.WAV49").unwrap(), ClipFormat::WavGsm);
    }

    #[test]
    fn test_unreadable_codecs_rejected() {
        for path in ["b.vox", "b.ilbc", "b.g723", "b.g726", "b.mp3", "b"] {
            assert!(
                matches!(format(path), Err(AssembleError::UnsupportedFormat(_))),
                "{path} should be rejected"
            );
        }
    }

    #[test]
    fn test_header_formats_have_no_input_type() {
        assert_eq!(ClipFormat::Ulaw.sox_input_type().unwrap(), Some("ul"));
        assert_eq!(ClipFormat::Wav.sox_input_type().unwrap(), None);
        assert_eq!(ClipFormat::WavGsm.sox_input_type().unwrap(), None);
        assert!(ClipFormat::G729.sox_input_type().is_err());
        assert_eq!(
            ClipFormat::WavGsm.sox_output_args().unwrap(),
            vec!["-t", "wav", "-e", "gsm-full-rate"]
        );
        assert_eq!(ClipFormat::Alaw.sox_output_args().unwrap(), vec!["-t", "al"]);
    }

    #[test]
    fn test_headerless() {
        assert!(ClipFormat::Ulaw.is_headerless());
        assert!(ClipFormat::G729.is_headerless());
        assert!(!ClipFormat::Wav.is_headerless());
        assert!(!ClipFormat::WavGsm.is_headerless());
    }
}
