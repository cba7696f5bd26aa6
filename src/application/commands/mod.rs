//! 应用层 - 命令（写操作）
//!
//! CQRS 命令侧：朗读、合成、预生成、缓存清理

mod library_commands;
mod speech_commands;

pub mod handlers;

pub use library_commands::*;
pub use speech_commands::*;
