//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod audio_assembler;
mod clip_cache;
mod playback;
mod sound_library;
mod tts_engine;

pub use audio_assembler::{AssembleError, AssembleResult, AudioAssemblerPort, ClipFormat};
pub use clip_cache::{CacheEntry, CacheError, ClipCachePort};
pub use playback::{PlaybackError, PlaybackPort};
pub use sound_library::SoundLibraryPort;
pub use tts_engine::{TtsEnginePort, TtsError};
