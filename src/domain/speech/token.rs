//! Speech Context - Token

use serde::{Deserialize, Serialize};

/// Token 类型
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenKind {
    /// 普通单词（可含连字符）；`spell` 表示全大写缩写，需逐字母拼读
    Word { spell: bool },
    /// `[ABC]` 逐字符按音标字母表读出
    Phonetic(String),
    /// `{rpt/connected-to}` 只做索引精确匹配
    ExactRef(String),
    /// `(connected to)` 作为整体匹配的短语
    Phrase(String),
    /// 标点/符号
    Punctuation(char),
    /// 连续数字
    DigitRun,
    /// 字母数字混合
    MixedAlnum,
}

/// 输入文本切分出的 Token
///
/// 不可变；`raw` 为原始文本片段（含括号）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    kind: TokenKind,
    raw: String,
}

impl Token {
    pub fn new(kind: TokenKind, raw: impl Into<String>) -> Self {
        Self {
            kind,
            raw: raw.into(),
        }
    }

    pub fn word(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let letters: Vec<char> = raw.chars().filter(|c| c.is_alphabetic()).collect();
        let spell = letters.len() >= 2 && letters.iter().all(|c| c.is_uppercase());
        Self::new(TokenKind::Word { spell }, raw)
    }

    pub fn kind(&self) -> &TokenKind {
        &self.kind
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// 用于短语匹配的文本（括号短语取内部内容）
    pub fn text(&self) -> &str {
        match &self.kind {
            TokenKind::Phonetic(payload)
            | TokenKind::ExactRef(payload)
            | TokenKind::Phrase(payload) => payload,
            _ => &self.raw,
        }
    }

    /// 可参与最长短语匹配窗口
    pub fn is_phrase_part(&self) -> bool {
        matches!(self.kind, TokenKind::Word { .. } | TokenKind::Phrase(_))
    }

    /// 是否允许交给 TTS 合成
    ///
    /// 括号短语总是允许；单词需含小写字母且长度大于 1
    pub fn is_synthesizable(&self) -> bool {
        match &self.kind {
            TokenKind::Phrase(payload) => !payload.trim().is_empty(),
            TokenKind::Word { spell: false } => {
                self.raw.chars().count() > 1 && self.raw.chars().any(|c| c.is_lowercase())
            }
            _ => false,
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw)
    }
}
