//! 基础设施层
//!
//! - adapters: 端口的具体实现（TTS、拼接、播放、声音目录扫描、外部进程）
//! - persistence: 片段缓存存储（文件系统 / sled）

pub mod adapters;
pub mod persistence;
