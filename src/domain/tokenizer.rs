//! 文本切分器
//!
//! 将输入文本切分为带类型的 Token 序列。纯函数，不会失败

use crate::domain::speech::alphabet::is_pause_char;
use crate::domain::speech::{Token, TokenKind};

/// 括号分组类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Group {
    Phrase,
    Phonetic,
    ExactRef,
}

impl Group {
    fn open(ch: char) -> Option<Self> {
        match ch {
            '(' => Some(Group::Phrase),
            '[' => Some(Group::Phonetic),
            '{' => Some(Group::ExactRef),
            _ => None,
        }
    }

    fn close_char(self) -> char {
        match self {
            Group::Phrase => ')',
            Group::Phonetic => ']',
            Group::ExactRef => '}',
        }
    }

    fn token(self, raw: String, inner: &str) -> Token {
        let payload = inner.split_whitespace().collect::<Vec<_>>().join(" ");
        let kind = match self {
            Group::Phrase => TokenKind::Phrase(payload),
            Group::Phonetic => TokenKind::Phonetic(payload),
            Group::ExactRef => TokenKind::ExactRef(payload),
        };
        Token::new(kind, raw)
    }
}

/// 第一遍切分结果
enum Chunk {
    Group(Token),
    Plain(String),
}

/// 只包含字母数字和连字符，且至少有一个字母数字
#[inline]
fn is_word_like(s: &str) -> bool {
    s.chars().all(|c| c.is_alphanumeric() || c == '-') && s.chars().any(|c| c.is_alphanumeric())
}

/// 对字母数字片段分类
fn classify_run(run: &str) -> Token {
    let has_letters = run.chars().any(|c| c.is_alphabetic());
    let has_digits = run.chars().any(|c| c.is_numeric());

    if !has_letters && run.chars().all(|c| c.is_ascii_digit()) {
        Token::new(TokenKind::DigitRun, run)
    } else if has_letters && !has_digits {
        Token::word(run)
    } else {
        Token::new(TokenKind::MixedAlnum, run)
    }
}

/// 按空白和括号分组切分
fn split_chunks(text: &str) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut group: Option<(Group, String)> = None;

    for ch in text.chars() {
        if let Some((kind, raw)) = group.as_mut() {
            raw.push(ch);
            if ch == kind.close_char() {
                let inner = raw[1..raw.len() - ch.len_utf8()].to_string();
                let kind = *kind;
                let raw = std::mem::take(raw);
                chunks.push(Chunk::Group(kind.token(raw, &inner)));
                group = None;
            }
            continue;
        }

        if let Some(kind) = Group::open(ch) {
            if !current.is_empty() {
                chunks.push(Chunk::Plain(std::mem::take(&mut current)));
            }
            group = Some((kind, ch.to_string()));
            continue;
        }

        if ch.is_whitespace() {
            if !current.is_empty() {
                chunks.push(Chunk::Plain(std::mem::take(&mut current)));
            }
            continue;
        }

        current.push(ch);
    }

    // 未闭合的分组保留到结尾
    if let Some((kind, raw)) = group {
        let inner = raw[1..].to_string();
        chunks.push(Chunk::Group(kind.token(raw, &inner)));
    }
    if !current.is_empty() {
        chunks.push(Chunk::Plain(current));
    }

    chunks
}

/// 追加标点 Token，连续的相同停顿字符只保留一个
fn push_symbol(tokens: &mut Vec<Token>, ch: char) {
    if is_pause_char(ch) {
        if let Some(TokenKind::Punctuation(last)) = tokens.last().map(Token::kind) {
            if *last == ch {
                return;
            }
        }
    }
    tokens.push(Token::new(TokenKind::Punctuation(ch), ch.to_string()));
}

/// 拆分包含符号的片段
fn split_symbols(chunk: &str, tokens: &mut Vec<Token>) {
    let mut current = String::new();

    for ch in chunk.chars() {
        if ch.is_alphanumeric() {
            current.push(ch);
        } else if ch == '-' && current.chars().any(|c| c.is_alphanumeric()) {
            // 单词内部的连字符
            current.push(ch);
        } else {
            if !current.is_empty() {
                tokens.push(classify_run(&std::mem::take(&mut current)));
            }
            push_symbol(tokens, ch);
        }
    }

    if !current.is_empty() {
        tokens.push(classify_run(&current));
    }
}

/// 将文本切分为 Token 序列
///
/// 规则：
/// 1. `(...)` 整体为 Phrase，`[...]` 为 Phonetic，`{...}` 为 ExactRef，内部空白折叠
/// 2. 其余文本按空白切分
/// 3. 纯数字为 DigitRun，纯字母（可含连字符）为 Word，字母数字混合为 MixedAlnum
/// 4. 其他符号拆为单字符 Punctuation
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();

    for chunk in split_chunks(text) {
        match chunk {
            Chunk::Group(token) => tokens.push(token),
            Chunk::Plain(chunk) if is_word_like(&chunk) => tokens.push(classify_run(&chunk)),
            Chunk::Plain(chunk) => split_symbols(&chunk, &mut tokens),
        }
    }

    tracing::trace!(count = tokens.len(), "Tokenized text");
    tokens
}
