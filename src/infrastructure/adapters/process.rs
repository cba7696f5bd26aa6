//! 外部程序调用
//!
//! 适配器通过子进程调用 `asl-tts`、`sox`、`asterisk`

use std::ffi::OsStr;
use std::process::Stdio;
use thiserror::Error;
use tokio::process::Command;

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("Failed to run {program}. Is it installed? Error: {message}")]
    Spawn { program: String, message: String },

    #[error("{program} exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },
}

/// 运行外部程序并等待结束，返回标准输出
pub async fn run_tool<I, S>(program: &str, args: I) -> Result<String, ProcessError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|e| ProcessError::Spawn {
            program: program.to_string(),
            message: e.to_string(),
        })?;

    if !output.status.success() {
        return Err(ProcessError::Failed {
            program: program.to_string(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_tool_captures_stdout() {
        let out = run_tool("sh", ["-c", "echo hello"]).await.unwrap();
        assert_eq!(out.trim(), "hello");
    }

    #[tokio::test]
    async fn test_run_tool_reports_failure() {
        let err = run_tool("sh", ["-c", "echo boom >&2; exit 3"]).await.unwrap_err();
        match err {
            ProcessError::Failed { stderr, .. } => assert_eq!(stderr, "boom"),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[tokio::test]
    async fn test_run_tool_missing_program() {
        let err = run_tool("definitely-not-a-real-program-xyz", ["x"]).await.unwrap_err();
        assert!(matches!(err, ProcessError::Spawn { .. }));
    }
}
