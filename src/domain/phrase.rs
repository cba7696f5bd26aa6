//! 短语规范化
//!
//! 索引 key、候选短语和缓存文件名共用的规范化规则

use serde::{Deserialize, Serialize};

/// 保留相对路径作为 key 的分类目录
///
/// 这些目录下的文件名（如 `digits/3`、`silence/1`）本身没有短语含义，
/// 只能通过完整的分类路径查找
pub const CATEGORY_DIRS: &[&str] = &["digits", "letters", "phonetic", "silence"];

/// 规范化后的短语 key
///
/// 不变量:
/// - 全部小写
/// - 普通短语中 `-`、`_` 替换为空格，空白折叠为单个空格
/// - 分类目录下的 key 保留 `category/name` 形式
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PhraseKey(String);

impl PhraseKey {
    /// 从自由文本构造（用于候选短语）
    pub fn from_text(text: &str) -> Self {
        Self(collapse_words(&text.to_lowercase()))
    }

    /// 从声音目录相对路径构造（不含扩展名）
    ///
    /// `rpt/connected-to` -> `connected to`，`digits/3` -> `digits/3`
    pub fn from_path(relative: &str) -> Self {
        let unified = relative.replace('\\', "/").to_lowercase();
        let parts: Vec<&str> = unified
            .split('/')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();

        if parts.len() > 1 && parts.iter().any(|p| CATEGORY_DIRS.contains(p)) {
            return Self(parts.join("/"));
        }

        let stem = parts.last().copied().unwrap_or_default();
        Self(collapse_words(stem))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for PhraseKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// `-`/`_` 替换为空格并折叠空白
fn collapse_words(text: &str) -> String {
    text.replace(['-', '_'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// 规范化待合成文本，作为缓存文件名的来源
///
/// 包含 `,` 或 `.` 的文本只转小写（标点影响合成的停顿，必须区分）；
/// 其余文本按单词清理，非数字单词中的非字母数字字符被丢弃
pub fn normalize_cache_text(text: &str) -> String {
    let lower = text.to_lowercase();
    if lower.contains([',', '.']) {
        return lower;
    }

    lower
        .replace(['-', '_'], " ")
        .split_whitespace()
        .map(|part| {
            if part.chars().all(|c| c.is_ascii_digit()) {
                part.to_string()
            } else {
                part.chars().filter(|c| c.is_alphanumeric()).collect()
            }
        })
        .filter(|part: &String| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// 生成安全的文件名（不含扩展名）
///
/// 只取前 `max_words` 个单词；发生截断时追加完整文本 md5 的前 8 位，
/// 避免不同长文本共享同一文件
pub fn clip_file_stem(text: &str, max_words: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    let needs_hash = words.len() > max_words;
    let shortened = words
        .iter()
        .take(max_words)
        .copied()
        .collect::<Vec<_>>()
        .join(" ");

    let mut sanitized = String::with_capacity(shortened.len());
    let mut last_dash = false;
    for ch in shortened.to_lowercase().chars() {
        if ch == ' ' || ch == '_' {
            if !last_dash {
                sanitized.push('-');
                last_dash = true;
            }
            continue;
        }
        last_dash = false;
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-' {
            sanitized.push(ch);
        }
    }

    let sanitized = sanitized.trim_end_matches('-');
    let sanitized = if sanitized.is_empty() {
        "text"
    } else {
        sanitized
    };

    if needs_hash {
        let digest = format!("{:x}", md5::compute(text.as_bytes()));
        format!("{}-{}", sanitized, &digest[..8])
    } else {
        sanitized.to_string()
    }
}
