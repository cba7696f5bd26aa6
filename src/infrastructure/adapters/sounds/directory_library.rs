//! Directory Sound Library - 扫描声音目录构建索引
//!
//! 目录按给定顺序扫描，目录内按文件名排序递归遍历，保证发现顺序确定

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::application::ports::SoundLibraryPort;
use crate::domain::sound::{IndexError, SoundDirectory, SoundIndex, SoundSource};

/// 可被拼接的 Asterisk 声音格式
///
/// vox、ilbc、g723、g726、g729 不能由 sox 读取，不进入索引
pub const SOUND_EXTENSIONS: &[&str] = &[
    "ul", "ulaw", "g711", "pcm", "al", "alaw", "gsm", "sln", "wav", "wav_gsm", "wav49",
];

const SKIPPED_PREFIXES: &[&str] = &["CREDITS", "LICENSE", "CHANGES", "README"];

/// 发现的声音文件：(相对路径不含扩展名, 完整路径)
type Discovered = Vec<(String, PathBuf)>;

/// 目录声音库
#[derive(Debug, Default)]
pub struct DirectorySoundLibrary;

impl DirectorySoundLibrary {
    pub fn new() -> Self {
        Self
    }

    /// 单个目录扫描
    fn scan(root: &Path) -> Result<Discovered, IndexError> {
        let mut found = Vec::new();
        walk(root, root, &mut found)?;
        Ok(found)
    }
}

fn is_ignored(name: &str) -> bool {
    name.starts_with('.')
        || name.ends_with(".txt")
        || SKIPPED_PREFIXES.iter().any(|p| name.starts_with(p))
}

fn walk(root: &Path, dir: &Path, found: &mut Discovered) -> Result<(), IndexError> {
    let io_err = |e: std::io::Error| IndexError::Io {
        path: dir.to_path_buf(),
        message: e.to_string(),
    };

    let mut entries = std::fs::read_dir(dir)
        .map_err(io_err)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(io_err)?;
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();
        if is_ignored(&name) {
            continue;
        }

        if path.is_dir() {
            walk(root, &path, found)?;
            continue;
        }

        let supported = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| SOUND_EXTENSIONS.contains(&e.to_lowercase().as_str()))
            .unwrap_or(false);
        if !supported {
            tracing::debug!(path = %path.display(), "Skipping unsupported sound file");
            continue;
        }

        let relative = path
            .strip_prefix(root)
            .unwrap_or(&path)
            .with_extension("")
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/");
        found.push((relative, path));
    }

    Ok(())
}

#[async_trait]
impl SoundLibraryPort for DirectorySoundLibrary {
    async fn build_index(&self, directories: &[SoundDirectory]) -> Result<SoundIndex, IndexError> {
        let directories = directories.to_vec();

        let scanned = tokio::task::spawn_blocking(move || {
            let mut scanned: Vec<(SoundSource, Discovered)> = Vec::new();
            for dir in &directories {
                if !dir.path.is_dir() {
                    if dir.required {
                        return Err(IndexError::MissingDirectory(dir.path.clone()));
                    }
                    tracing::debug!(path = %dir.path.display(), "Optional sounds directory not found");
                    continue;
                }

                let found = DirectorySoundLibrary::scan(&dir.path)?;
                if found.is_empty() && dir.required {
                    return Err(IndexError::Empty(dir.path.clone()));
                }
                scanned.push((dir.source, found));
            }
            Ok(scanned)
        })
        .await
        .map_err(|e| IndexError::Io {
            path: PathBuf::new(),
            message: e.to_string(),
        })??;

        let mut index = SoundIndex::new();
        for (source, found) in scanned {
            for (relative, path) in found {
                if let Err(collision) = index.insert(&relative, path, source) {
                    tracing::warn!(
                        key = %collision.key,
                        kept = %collision.kept.display(),
                        ignored = %collision.ignored.display(),
                        "Duplicate sound key, keeping first"
                    );
                }
            }
        }

        tracing::info!(
            sounds = index.len(),
            base = index.count_by_source(SoundSource::Base),
            custom = index.count_by_source(SoundSource::Custom),
            collisions = index.collisions().len(),
            "Sound index built"
        );

        Ok(index)
    }
}
