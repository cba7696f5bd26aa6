//! ASL TTS Tools - AllStarLink 文本转语音工具集
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Sound Context: 声音素材与索引
//! - Speech Context: Token 与解析结果
//! - Tokenizer / Catalog: 文本切分、预生成目录
//!
//! 应用层 (application/):
//! - Ports: 端口定义（TtsEngine, ClipCache, AudioAssembler, Playback, SoundLibrary）
//! - Resolver / Synthesizer / CacheManager: 解析引擎、兜底合成、缓存淘汰
//! - Commands: CQRS 命令处理器
//! - Queries: CQRS 查询处理器
//!
//! 基础设施层 (infrastructure/):
//! - Adapters: asl-tts / HTTP TTS Client, sox 拼接, asterisk 播放, 目录扫描
//! - Persistence: 文件 + Sled 片段缓存

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
