//! 命令处理器

mod cache_handlers;
mod seed_handler;
mod speak_handler;
mod synthesize_handler;

pub use cache_handlers::CleanCacheHandler;
pub use seed_handler::SeedHandler;
pub use speak_handler::SpeakHandler;
pub use synthesize_handler::SynthesizeHandler;
