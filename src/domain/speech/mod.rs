//! Speech Context - 文本到声音片段的解析上下文
//!
//! 职责:
//! - Token 类型定义
//! - 字符发音表
//! - 解析结果与缺失策略

pub mod alphabet;
mod errors;
mod resolution;
mod token;

pub use errors::ResolveError;
pub use resolution::{MissingPolicy, ResolutionResult, ResolvedClip};
pub use token::{Token, TokenKind};
