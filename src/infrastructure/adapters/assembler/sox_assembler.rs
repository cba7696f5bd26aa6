//! Sox Assembler - 调用 sox 拼接音频
//!
//! `sox -V0 -t <fmt> f1 ... -t <fmt> out`，格式由扩展名决定；
//! 带文件头的输入不加 `-t`，由 sox 读取文件头

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::application::ports::{AssembleError, AssembleResult, AudioAssemblerPort, ClipFormat};
use crate::infrastructure::adapters::process::run_tool;

/// Sox 拼接器
pub struct SoxAssembler {
    program: String,
}

impl SoxAssembler {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// 命令行参数
    pub fn command_args(inputs: &[PathBuf], output: &Path) -> Result<Vec<String>, AssembleError> {
        let mut args = vec!["-V0".to_string()];
        for input in inputs {
            if let Some(sox_type) = ClipFormat::from_path(input)?.sox_input_type()? {
                args.push("-t".to_string());
                args.push(sox_type.to_string());
            }
            args.push(input.display().to_string());
        }
        args.extend(
            ClipFormat::from_path(output)?
                .sox_output_args()?
                .into_iter()
                .map(String::from),
        );
        args.push(output.display().to_string());
        Ok(args)
    }
}

impl Default for SoxAssembler {
    fn default() -> Self {
        Self::new("sox")
    }
}

#[async_trait]
impl AudioAssemblerPort for SoxAssembler {
    async fn assemble(
        &self,
        inputs: &[PathBuf],
        output: &Path,
    ) -> Result<AssembleResult, AssembleError> {
        if inputs.is_empty() {
            return Err(AssembleError::NoInput);
        }
        let args = Self::command_args(inputs, output)?;
        let format = ClipFormat::from_path(output)?;

        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AssembleError::IoError(e.to_string()))?;
        }

        tracing::debug!(
            program = %self.program,
            inputs = inputs.len(),
            output = %output.display(),
            "Running sox"
        );

        run_tool(&self.program, args)
            .await
            .map_err(|e| AssembleError::ToolFailed(e.to_string()))?;

        let size_bytes = tokio::fs::metadata(output)
            .await
            .map_err(|e| AssembleError::IoError(e.to_string()))?
            .len();

        Ok(AssembleResult {
            output_path: output.to_path_buf(),
            format,
            input_count: inputs.len(),
            size_bytes,
        })
    }
}
