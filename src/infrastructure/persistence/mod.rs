//! Persistence Layer - 片段缓存存储
//!
//! 文件目录和 Sled 两种实现

pub mod fs;
pub mod sled;

pub use self::fs::FileClipCache;
pub use self::sled::{SledClipCache, SledClipCacheConfig};
