//! Sounds Adapter - 声音目录扫描

mod directory_library;

pub use directory_library::{DirectorySoundLibrary, SOUND_EXTENSIONS};
