//! Infrastructure Adapters
//!
//! 六边形架构的适配器实现

pub mod assembler;
pub mod playback;
pub mod process;
pub mod sounds;
pub mod tts;

pub use assembler::*;
pub use playback::*;
pub use sounds::*;
pub use tts::*;
