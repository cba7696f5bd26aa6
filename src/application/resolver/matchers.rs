//! 匹配策略链
//!
//! 每个策略是一个纯函数：`(ctx, tokens, pos) -> Option<Match>`。
//! 返回 `None` 表示该策略不适用，交给下一个策略

use crate::domain::phrase::PhraseKey;
use crate::domain::sound::{SoundAsset, SoundIndex};
use crate::domain::speech::alphabet::{
    digit_alias, digit_symbol, digit_word, is_pause_char, letter_symbol, nato_word,
};
use crate::domain::speech::{Token, TokenKind};

/// 匹配结果中的一个片段
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Piece {
    /// 找到的声音素材
    Found(SoundAsset),
    /// 停顿（静音素材）
    Pause(SoundAsset),
    /// 无法解析的文本，由缺失策略处理
    Missing(String),
}

/// 一次匹配
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    /// 消耗的 Token 数量，至少为 1
    pub consumed: usize,
    pub pieces: Vec<Piece>,
}

impl Match {
    fn single(piece: Piece) -> Self {
        Self {
            consumed: 1,
            pieces: vec![piece],
        }
    }
}

/// 匹配上下文
pub struct MatchContext<'a> {
    pub index: &'a SoundIndex,
    /// 短语窗口的最大 Token 数
    pub max_window: usize,
    /// 停顿字符使用的素材 key
    pub silence_sound: &'a str,
}

/// 匹配策略
pub trait Matcher: Send + Sync {
    /// 策略名称（用于日志）
    fn name(&self) -> &'static str;

    fn try_match(&self, ctx: &MatchContext<'_>, tokens: &[Token], pos: usize) -> Option<Match>;
}

/// 默认策略链，按优先级排列
pub fn default_chain() -> Vec<Box<dyn Matcher>> {
    vec![
        Box::new(PhraseMatcher),
        Box::new(ExactRefMatcher),
        Box::new(PhoneticMatcher),
        Box::new(SpelledMatcher),
        Box::new(DigitRunMatcher),
        Box::new(PunctuationMatcher),
        Box::new(MixedAlnumMatcher),
        Box::new(AliasMatcher),
    ]
}

// ============================================================================
// 字符级解析
// ============================================================================

/// 追加片段，相邻的缺失文本合并为一个
fn push_piece(pieces: &mut Vec<Piece>, piece: Piece) {
    if let Piece::Missing(text) = &piece {
        if let Some(Piece::Missing(last)) = pieces.last_mut() {
            last.push_str(text);
            return;
        }
    }
    pieces.push(piece);
}

/// 字母：`letters/c` -> `c` -> `alpha/c` -> `phonetic/c_p`
fn letter_piece(index: &SoundIndex, ch: char) -> Piece {
    let lower = ch.to_lowercase().to_string();
    [
        format!("letters/{}", lower),
        lower.clone(),
        format!("alpha/{}", lower),
        format!("phonetic/{}_p", lower),
    ]
    .iter()
    .find_map(|key| index.lookup_category(key))
    .map(|asset| Piece::Found(asset.clone()))
    .unwrap_or_else(|| Piece::Missing(ch.to_string()))
}

/// 数字：`digits/d` -> `d`（预生成的 numbers 目录）-> 数字单词
fn digit_piece(index: &SoundIndex, ch: char) -> Piece {
    index
        .lookup_category(&format!("digits/{}", ch))
        .or_else(|| index.lookup_phrase(&PhraseKey::from_text(&ch.to_string())))
        .or_else(|| digit_word(ch).and_then(|w| index.lookup_phrase(&PhraseKey::from_text(w))))
        .map(|asset| Piece::Found(asset.clone()))
        .unwrap_or_else(|| Piece::Missing(ch.to_string()))
}

/// 音标字母：`phonetic/c_p` -> `phonetic/<word>` -> NATO 单词
fn phonetic_piece(index: &SoundIndex, ch: char) -> Piece {
    let lower = ch.to_lowercase().to_string();
    let word = nato_word(ch);
    index
        .lookup_category(&format!("phonetic/{}_p", lower))
        .or_else(|| word.and_then(|w| index.lookup_category(&format!("phonetic/{}", w))))
        .or_else(|| word.and_then(|w| index.lookup_phrase(&PhraseKey::from_text(w))))
        .map(|asset| Piece::Found(asset.clone()))
        .unwrap_or_else(|| Piece::Missing(ch.to_string()))
}

/// 符号：停顿字符 -> 静音；有读音的符号 -> `digits/<name>` 或 `letters/<name>`
fn symbol_piece(ctx: &MatchContext<'_>, ch: char) -> Piece {
    if is_pause_char(ch) {
        return ctx
            .index
            .lookup_exact(ctx.silence_sound)
            .map(|asset| Piece::Pause(asset.clone()))
            .unwrap_or_else(|| Piece::Missing(ch.to_string()));
    }

    let key = digit_symbol(ch)
        .map(|name| format!("digits/{}", name))
        .or_else(|| letter_symbol(ch).map(|name| format!("letters/{}", name)));

    key.and_then(|key| ctx.index.lookup_category(&key))
        .map(|asset| Piece::Found(asset.clone()))
        .unwrap_or_else(|| Piece::Missing(ch.to_string()))
}

// ============================================================================
// 策略
// ============================================================================

/// 最长短语匹配
///
/// 从当前位置开始取连续的 Word/Phrase Token，窗口从最长到 1 依次尝试
pub struct PhraseMatcher;

impl Matcher for PhraseMatcher {
    fn name(&self) -> &'static str {
        "phrase"
    }

    fn try_match(&self, ctx: &MatchContext<'_>, tokens: &[Token], pos: usize) -> Option<Match> {
        let run = tokens[pos..]
            .iter()
            .take(ctx.max_window.max(1))
            .take_while(|t| t.is_phrase_part())
            .count();

        (1..=run).rev().find_map(|width| {
            let candidate = tokens[pos..pos + width]
                .iter()
                .map(Token::text)
                .collect::<Vec<_>>()
                .join(" ");
            let key = PhraseKey::from_text(&candidate);
            if key.is_empty() {
                return None;
            }
            ctx.index.lookup_phrase(&key).map(|asset| Match {
                consumed: width,
                pieces: vec![Piece::Found(asset.clone())],
            })
        })
    }
}

/// `{...}` 精确引用，只查索引，从不合成
pub struct ExactRefMatcher;

impl Matcher for ExactRefMatcher {
    fn name(&self) -> &'static str {
        "exact"
    }

    fn try_match(&self, ctx: &MatchContext<'_>, tokens: &[Token], pos: usize) -> Option<Match> {
        let TokenKind::ExactRef(payload) = tokens[pos].kind() else {
            return None;
        };
        let piece = ctx
            .index
            .lookup_exact(payload)
            .map(|asset| Piece::Found(asset.clone()))
            .unwrap_or_else(|| Piece::Missing(tokens[pos].raw().to_string()));
        Some(Match::single(piece))
    }
}

/// `[...]` 逐字符按音标字母表读出
pub struct PhoneticMatcher;

impl Matcher for PhoneticMatcher {
    fn name(&self) -> &'static str {
        "phonetic"
    }

    fn try_match(&self, ctx: &MatchContext<'_>, tokens: &[Token], pos: usize) -> Option<Match> {
        let TokenKind::Phonetic(payload) = tokens[pos].kind() else {
            return None;
        };

        let mut pieces = Vec::new();
        for ch in payload.chars().filter(|c| !c.is_whitespace()) {
            let piece = if ch.is_alphabetic() {
                phonetic_piece(ctx.index, ch)
            } else if ch.is_ascii_digit() {
                digit_piece(ctx.index, ch)
            } else {
                symbol_piece(ctx, ch)
            };
            push_piece(&mut pieces, piece);
        }

        Some(Match { consumed: 1, pieces })
    }
}

/// 全大写缩写或单个字母，逐字母拼读
pub struct SpelledMatcher;

impl Matcher for SpelledMatcher {
    fn name(&self) -> &'static str {
        "spelled"
    }

    fn try_match(&self, ctx: &MatchContext<'_>, tokens: &[Token], pos: usize) -> Option<Match> {
        let token = &tokens[pos];
        let spell = match token.kind() {
            TokenKind::Word { spell } => *spell || token.raw().chars().count() == 1,
            _ => false,
        };
        if !spell {
            return None;
        }

        let mut pieces = Vec::new();
        for ch in token.raw().chars().filter(|c| c.is_alphabetic()) {
            push_piece(&mut pieces, letter_piece(ctx.index, ch));
        }
        Some(Match { consumed: 1, pieces })
    }
}

/// 连续数字逐位读出，不组合成多位数
pub struct DigitRunMatcher;

impl Matcher for DigitRunMatcher {
    fn name(&self) -> &'static str {
        "digits"
    }

    fn try_match(&self, ctx: &MatchContext<'_>, tokens: &[Token], pos: usize) -> Option<Match> {
        let token = &tokens[pos];
        if token.kind() != &TokenKind::DigitRun {
            return None;
        }

        let mut pieces = Vec::new();
        for ch in token.raw().chars() {
            push_piece(&mut pieces, digit_piece(ctx.index, ch));
        }
        Some(Match { consumed: 1, pieces })
    }
}

/// 标点与符号
pub struct PunctuationMatcher;

impl Matcher for PunctuationMatcher {
    fn name(&self) -> &'static str {
        "punctuation"
    }

    fn try_match(&self, ctx: &MatchContext<'_>, tokens: &[Token], pos: usize) -> Option<Match> {
        let TokenKind::Punctuation(ch) = tokens[pos].kind() else {
            return None;
        };
        Some(Match::single(symbol_piece(ctx, *ch)))
    }
}

/// 字母数字混合：先尝试整词别名（`1st`），再逐字符解析
pub struct MixedAlnumMatcher;

impl Matcher for MixedAlnumMatcher {
    fn name(&self) -> &'static str {
        "mixed"
    }

    fn try_match(&self, ctx: &MatchContext<'_>, tokens: &[Token], pos: usize) -> Option<Match> {
        let token = &tokens[pos];
        if token.kind() != &TokenKind::MixedAlnum {
            return None;
        }

        if let Some(asset) = digit_alias(token.raw())
            .and_then(|alias| ctx.index.lookup_category(&format!("digits/{}", alias)))
        {
            return Some(Match::single(Piece::Found(asset.clone())));
        }

        let mut pieces = Vec::new();
        for ch in token.raw().chars() {
            let piece = if ch.is_ascii_digit() {
                digit_piece(ctx.index, ch)
            } else if ch.is_alphabetic() {
                letter_piece(ctx.index, ch)
            } else if ch == '-' {
                continue;
            } else {
                symbol_piece(ctx, ch)
            };
            push_piece(&mut pieces, piece);
        }
        Some(Match { consumed: 1, pieces })
    }
}

/// 日期、序数词、上下午等整词别名
pub struct AliasMatcher;

impl Matcher for AliasMatcher {
    fn name(&self) -> &'static str {
        "alias"
    }

    fn try_match(&self, ctx: &MatchContext<'_>, tokens: &[Token], pos: usize) -> Option<Match> {
        let token = &tokens[pos];
        if !matches!(token.kind(), TokenKind::Word { .. }) {
            return None;
        }

        digit_alias(token.raw())
            .and_then(|alias| ctx.index.lookup_category(&format!("digits/{}", alias)))
            .map(|asset| Match::single(Piece::Found(asset.clone())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::sound::SoundSource;
    use crate::domain::tokenize;
    use std::path::PathBuf;

    fn index_of(keys: &[&str]) -> SoundIndex {
        let mut index = SoundIndex::new();
        for key in keys {
            index
                .insert(key, PathBuf::from(format!("/s/{}.ul", key)), SoundSource::Base)
                .unwrap();
        }
        index
    }

    fn ctx(index: &SoundIndex) -> MatchContext<'_> {
        MatchContext {
            index,
            max_window: 5,
            silence_sound: "silence/1",
        }
    }

    fn found_paths(m: &Match) -> Vec<String> {
        m.pieces
            .iter()
            .map(|p| match p {
                Piece::Found(a) | Piece::Pause(a) => a.path().display().to_string(),
                Piece::Missing(t) => format!("missing:{}", t),
            })
            .collect()
    }

    #[test]
    fn test_phrase_matcher_prefers_longest_window() {
        let index = index_of(&["rpt/connected-to", "connected", "node"]);
        let tokens = tokenize("connected to node");

        let m = PhraseMatcher.try_match(&ctx(&index), &tokens, 0).unwrap();
        assert_eq!(m.consumed, 2);
        assert_eq!(found_paths(&m), vec!["/s/rpt/connected-to.ul"]);
    }

    #[test]
    fn test_phrase_matcher_window_limit() {
        let index = index_of(&["connected-to"]);
        let tokens = tokenize("connected to");
        let narrow = MatchContext {
            index: &index,
            max_window: 1,
            silence_sound: "silence/1",
        };
        assert!(PhraseMatcher.try_match(&narrow, &tokens, 0).is_none());
        assert!(PhraseMatcher.try_match(&ctx(&index), &tokens, 0).is_some());
    }

    #[test]
    fn test_phrase_matcher_stops_at_punctuation() {
        let index = index_of(&["hello-world", "hello"]);
        let tokens = tokenize("hello, world");
        let m = PhraseMatcher.try_match(&ctx(&index), &tokens, 0).unwrap();
        assert_eq!(m.consumed, 1);
        assert_eq!(found_paths(&m), vec!["/s/hello.ul"]);
    }

    #[test]
    fn test_exact_ref_miss_is_missing() {
        let index = index_of(&["rpt/connected-to"]);
        let tokens = tokenize("{rpt/gone}");
        let m = ExactRefMatcher.try_match(&ctx(&index), &tokens, 0).unwrap();
        assert_eq!(m.pieces, vec![Piece::Missing("{rpt/gone}".to_string())]);
    }

    #[test]
    fn test_phonetic_falls_back_to_nato_word() {
        let index = index_of(&["phonetic/a_p", "bravo", "digits/1"]);
        let tokens = tokenize("[AB 1]");
        let m = PhoneticMatcher.try_match(&ctx(&index), &tokens, 0).unwrap();
        assert_eq!(
            found_paths(&m),
            vec!["/s/phonetic/a_p.ul", "/s/bravo.ul", "/s/digits/1.ul"]
        );
    }

    #[test]
    fn test_spelled_letter_chain() {
        let index = index_of(&["letters/n", "phonetic/a_p", "letters/s"]);
        let tokens = tokenize("NASA");
        let m = SpelledMatcher.try_match(&ctx(&index), &tokens, 0).unwrap();
        assert_eq!(
            found_paths(&m),
            vec![
                "/s/letters/n.ul",
                "/s/phonetic/a_p.ul",
                "/s/letters/s.ul",
                "/s/phonetic/a_p.ul"
            ]
        );
    }

    #[test]
    fn test_spelled_ignores_lowercase_words() {
        let index = index_of(&["letters/h"]);
        let tokens = tokenize("Hello");
        assert!(SpelledMatcher.try_match(&ctx(&index), &tokens, 0).is_none());
    }

    #[test]
    fn test_digit_run_is_per_digit() {
        let index = index_of(&["digits/1", "digits/2", "digits/3", "digits/12"]);
        let tokens = tokenize("123");
        let m = DigitRunMatcher.try_match(&ctx(&index), &tokens, 0).unwrap();
        assert_eq!(
            found_paths(&m),
            vec!["/s/digits/1.ul", "/s/digits/2.ul", "/s/digits/3.ul"]
        );
    }

    #[test]
    fn test_punctuation_mapping() {
        let index = index_of(&["silence/1", "letters/slash", "digits/pound"]);
        let c = ctx(&index);

        let pause = PunctuationMatcher.try_match(&c, &tokenize(","), 0).unwrap();
        assert!(matches!(pause.pieces[0], Piece::Pause(_)));

        let slash = PunctuationMatcher.try_match(&c, &tokenize("/"), 0).unwrap();
        assert_eq!(found_paths(&slash), vec!["/s/letters/slash.ul"]);

        let pound = PunctuationMatcher.try_match(&c, &tokenize("#"), 0).unwrap();
        assert_eq!(found_paths(&pound), vec!["/s/digits/pound.ul"]);

        let caret = PunctuationMatcher.try_match(&c, &tokenize("^"), 0).unwrap();
        assert_eq!(caret.pieces, vec![Piece::Missing("^".to_string())]);
    }

    #[test]
    fn test_mixed_alias_then_characters() {
        let index = index_of(&["digits/h-1", "digits/1", "digits/2", "digits/3"]);
        let c = ctx(&index);

        let first = MixedAlnumMatcher.try_match(&c, &tokenize("1st"), 0).unwrap();
        assert_eq!(found_paths(&first), vec!["/s/digits/h-1.ul"]);

        let mixed = MixedAlnumMatcher.try_match(&c, &tokenize("xyz123"), 0).unwrap();
        assert_eq!(
            found_paths(&mixed),
            vec![
                "missing:xyz",
                "/s/digits/1.ul",
                "/s/digits/2.ul",
                "/s/digits/3.ul"
            ]
        );
    }

    #[test]
    fn test_alias_matcher() {
        let index = index_of(&["digits/mon-0", "digits/p-m"]);
        let c = ctx(&index);
        assert!(AliasMatcher.try_match(&c, &tokenize("January"), 0).is_some());
        assert!(AliasMatcher.try_match(&c, &tokenize("pm"), 0).is_some());
        assert!(AliasMatcher.try_match(&c, &tokenize("hello"), 0).is_none());
    }
}
