//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（TtsEngine、ClipCache、AudioAssembler、Playback、SoundLibrary）
//! - resolver: 短语解析（Token → 声音片段）
//! - synthesizer / cache_manager: TTS 兜底合成与缓存淘汰
//! - commands: CQRS 命令及处理器
//! - queries: CQRS 查询及处理器
//! - error: 应用层错误定义

pub mod cache_manager;
pub mod commands;
pub mod error;
pub mod ports;
pub mod queries;
pub mod resolver;
pub mod synthesizer;

// Re-exports
pub use cache_manager::{CacheManager, CachePolicy, EvictionReport};

pub use commands::{
    // Speech commands
    SpeakCommand,
    SpeakResponse,
    SynthesizeCommand,
    SynthesizeResponse,
    // Library commands
    CleanCacheCommand,
    CleanCacheResponse,
    SeedCommand,
    SeedFailure,
    SeedResponse,
    // Handlers
    handlers::{CleanCacheHandler, SeedHandler, SpeakHandler, SynthesizeHandler},
};

pub use error::{exit_code, ApplicationError};

pub use ports::{
    AssembleError, AssembleResult, AudioAssemblerPort, CacheEntry, CacheError, ClipCachePort,
    ClipFormat, PlaybackError, PlaybackPort, SoundLibraryPort, TtsEnginePort, TtsError,
};

pub use queries::{
    CacheListing,
    GetIndexReport,
    IndexEntry,
    IndexReport,
    ListCacheEntries,
    // Handlers
    handlers::{IndexReportHandler, ListCacheHandler},
};

pub use resolver::{PhraseResolver, ResolverOptions};
pub use synthesizer::{FallbackSynthesizer, SynthesisError};
