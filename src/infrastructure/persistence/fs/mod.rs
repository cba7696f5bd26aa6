//! 文件系统片段缓存

mod file_clip_cache;

pub use file_clip_cache::FileClipCache;
