//! Domain Layer - 领域层
//!
//! 包含两个限界上下文:
//! - Sound Context: 声音素材索引
//! - Speech Context: Token 与解析结果

pub mod catalog;
pub mod phrase;
pub mod sound;
pub mod speech;

// 共享的文本切分器
mod tokenizer;

pub use phrase::{clip_file_stem, normalize_cache_text, PhraseKey};
pub use tokenizer::tokenize;
