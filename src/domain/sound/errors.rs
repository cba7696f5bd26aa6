//! Sound Context - Errors

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("Sounds directory not found: {0}")]
    MissingDirectory(PathBuf),

    #[error("No sound files found in directory: {0}")]
    Empty(PathBuf),

    #[error("Cannot read sounds directory {path}: {message}")]
    Io { path: PathBuf, message: String },
}
