//! Speech Commands - 朗读与合成命令

use std::path::PathBuf;

/// 拼接朗读命令（`speak`）
#[derive(Debug, Clone)]
pub struct SpeakCommand {
    pub text: String,
    /// 播放节点
    pub node: Option<String>,
    /// 输出文件，格式由扩展名决定
    pub output_file: Option<PathBuf>,
}

/// 拼接朗读响应
#[derive(Debug, Clone)]
pub struct SpeakResponse {
    pub output_path: PathBuf,
    pub clip_count: usize,
    pub synthesized: usize,
    pub skipped: Vec<String>,
    pub played: bool,
}

/// 整段合成命令（`tts`）
#[derive(Debug, Clone)]
pub struct SynthesizeCommand {
    pub text: String,
    pub node: Option<String>,
    /// 输出文件（会追加 `.ul`）
    pub output_file: Option<PathBuf>,
}

/// 整段合成响应
#[derive(Debug, Clone)]
pub struct SynthesizeResponse {
    /// 缓存中的片段
    pub clip_path: PathBuf,
    pub output_path: Option<PathBuf>,
    /// 是否命中缓存
    pub cached: bool,
    pub played: bool,
}
