//! Sound Context - 声音素材限界上下文
//!
//! 职责:
//! - 声音目录描述
//! - 规范化短语到声音素材的索引
//! - 冲突检测与报告

mod errors;
mod index;
mod value_objects;

pub use errors::IndexError;
pub use index::{IndexCollision, SoundIndex};
pub use value_objects::{SoundAsset, SoundDirectory, SoundSource};
