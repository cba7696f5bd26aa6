//! Raw Concat Assembler - 无文件头格式的直接拼接
//!
//! μ-law、A-law、sln 等原始格式按字节顺序拼接即为有效音频，
//! 不依赖外部程序

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::application::ports::{AssembleError, AssembleResult, AudioAssemblerPort, ClipFormat};

/// 原始字节拼接器
///
/// 要求所有输入与输出共享同一种无文件头格式
#[derive(Debug, Default)]
pub struct RawConcatAssembler;

impl RawConcatAssembler {
    pub fn new() -> Self {
        Self
    }

    fn check_formats(inputs: &[PathBuf], output: &Path) -> Result<ClipFormat, AssembleError> {
        let format = ClipFormat::from_path(output)?;
        if !format.is_headerless() {
            return Err(AssembleError::UnsupportedFormat(format.to_string()));
        }

        for input in inputs {
            if ClipFormat::from_path(input)? != format {
                return Err(AssembleError::MixedFormats(format!(
                    "{} is not {}",
                    input.display(),
                    format
                )));
            }
        }

        Ok(format)
    }
}

#[async_trait]
impl AudioAssemblerPort for RawConcatAssembler {
    async fn assemble(
        &self,
        inputs: &[PathBuf],
        output: &Path,
    ) -> Result<AssembleResult, AssembleError> {
        if inputs.is_empty() {
            return Err(AssembleError::NoInput);
        }
        let format = Self::check_formats(inputs, output)?;

        let mut data = Vec::new();
        for input in inputs {
            let bytes = fs::read(input)
                .await
                .map_err(|e| AssembleError::IoError(format!("{}: {}", input.display(), e)))?;
            data.extend_from_slice(&bytes);
        }

        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| AssembleError::IoError(e.to_string()))?;
        }
        fs::write(output, &data)
            .await
            .map_err(|e| AssembleError::IoError(format!("{}: {}", output.display(), e)))?;

        tracing::debug!(
            inputs = inputs.len(),
            size_bytes = data.len(),
            output = %output.display(),
            "Concatenated raw audio"
        );

        Ok(AssembleResult {
            output_path: output.to_path_buf(),
            format,
            input_count: inputs.len(),
            size_bytes: data.len() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_concatenates_in_order() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.ul");
        let b = dir.path().join("b.ulaw");
        std::fs::write(&a, [1u8, 2]).unwrap();
        std::fs::write(&b, [3u8]).unwrap();

        let out = dir.path().join("nested/out.ul");
        let result = RawConcatAssembler::new()
            .assemble(&[b.clone(), a.clone(), b], &out)
            .await
            .unwrap();

        assert_eq!(std::fs::read(&out).unwrap(), vec![3, 1, 2, 3]);
        assert_eq!(result.input_count, 3);
        assert_eq!(result.size_bytes, 4);
    }

    #[tokio::test]
    async fn test_mixed_formats_rejected() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.ul");
        let b = dir.path().join("b.gsm");
        std::fs::write(&a, [1u8]).unwrap();
        std::fs::write(&b, [2u8]).unwrap();

        let err = RawConcatAssembler::new()
            .assemble(&[a, b], &dir.path().join("out.ul"))
            .await
            .unwrap_err();
        assert!(matches!(err, AssembleError::MixedFormats(_)));
    }

    #[tokio::test]
    async fn test_wav_output_rejected() {
        let dir = TempDir::new().unwrap();
        let err = RawConcatAssembler::new()
            .assemble(&[dir.path().join("a.wav")], &dir.path().join("out.wav"))
            .await
            .unwrap_err();
        assert!(matches!(err, AssembleError::UnsupportedFormat(_)));
    }

    #[tokio::test]
    async fn test_unknown_input_extension_rejected() {
        let dir = TempDir::new().unwrap();
        let err = RawConcatAssembler::new()
            .assemble(&[dir.path().join("a.vox")], &dir.path().join("out.ul"))
            .await
            .unwrap_err();
        assert!(matches!(err, AssembleError::UnsupportedFormat(_)));
    }
}
