//! Sled 片段缓存

mod sled_clip_cache;

pub use sled_clip_cache::{open_shared, SledClipCache, SledClipCacheConfig};
