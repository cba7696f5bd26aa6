//! 预生成短语目录
//!
//! `seed` 命令预先合成的常用声音片段

use super::phrase::clip_file_stem;
use super::speech::alphabet::nato_word;

/// 一条预生成任务
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedItem {
    /// 子目录名
    pub category: String,
    /// 文件名（不含扩展名）
    pub file_stem: String,
    /// 交给 TTS 的文本
    pub text: String,
}

/// rpt 分类沿用 app_rpt 的原始文件名，不做清理
const RAW_NAME_CATEGORY: &str = "rpt";

const TIME_WORDS: &[(&str, &str)] = &[
    ("oclock", "o'clock"),
    ("morning", "morning"),
    ("afternoon", "afternoon"),
    ("evening", "evening"),
    ("night", "night"),
    ("day", "day"),
];

const CALENDAR_WORDS: &[&str] = &[
    "january", "february", "march", "april", "may", "june", "july", "august", "september",
    "october", "november", "december", "monday", "tuesday", "wednesday", "thursday", "friday",
    "saturday", "sunday",
];

const SYMBOL_WORDS: &[(&str, &str)] = &[
    ("exclamation", "exclamation"),
    ("question", "question"),
    ("asterisk", "asterisk"),
    ("at", "at"),
    ("ampersand", "and"),
    ("percent", "percent"),
    ("dollar", "dollar"),
    ("pound", "pound"),
    ("plus", "plus"),
    ("minus", "minus"),
    ("equals", "equals"),
    ("slash", "slash"),
];

const COMMON_PHRASES: &[(&str, &str)] = &[
    ("connected-to", "connected to"),
    ("disconnected-from", "disconnected from"),
    ("connecting", "connecting"),
    ("disconnecting", "disconnecting"),
    ("node", "node"),
    ("nodes", "nodes"),
    ("repeater", "repeater"),
    ("link", "link"),
    ("online", "online"),
    ("offline", "offline"),
    ("enabled", "enabled"),
    ("disabled", "disabled"),
    ("activated", "activated"),
    ("deactivated", "deactivated"),
    ("affirmative", "affirmative"),
    ("negative", "negative"),
    ("confirmed", "confirmed"),
    ("invalid", "invalid"),
    ("error", "error"),
    ("warning", "warning"),
    ("please-wait", "please wait"),
    ("thank-you", "thank you"),
    ("goodbye", "goodbye"),
    ("hello", "hello"),
    ("welcome", "welcome"),
    ("please-try-again", "please try again"),
];

const RPT_PHRASES: &[(&str, &str)] = &[
    ("act-timeout-warning", "activity timeout warning"),
    ("timeout-warning", "timeout warning"),
    ("timeout", "timeout"),
    ("unkeyedfor", "unkeyed for"),
    ("keyedfor", "keyed for"),
    ("alllinksdisconnected", "all links disconnected"),
    ("alllinksrestored", "all links restored"),
    ("connection_failed", "connection failed"),
    ("connected", "connected"),
    ("connected-to", "connected to"),
    ("node_enabled", "node enabled"),
    ("node", "node"),
    ("up", "up"),
    ("down", "down"),
    ("hipwr", "high power"),
    ("medpwr", "medium power"),
    ("lopwr", "low power"),
    ("remote_already", "remote already"),
    ("remote_busy", "remote busy"),
    ("remote_cmd", "remote command"),
    ("remote_disc", "remote disconnect"),
    ("remote_go", "remote go"),
    ("remote_monitor", "remote monitor"),
    ("remote_notfound", "remote not found"),
    ("remote_tx", "remote transmit"),
    ("goodmorning", "good morning"),
    ("goodafternoon", "good afternoon"),
    ("goodevening", "good evening"),
    ("frequency", "frequency"),
    ("latitude", "latitude"),
    ("longitude", "longitude"),
    ("thetemperatureis", "the temperature is"),
    ("thetimeis", "the time is"),
    ("thevoltageis", "the voltage is"),
    ("thewindis", "the wind is"),
    ("autopatch_on", "autopatch on"),
    ("revpatch-intro", "reverse patch introduction"),
    ("revpatch-noanswer", "reverse patch no answer"),
    ("functioncomplete", "function complete"),
    ("invalid-freq", "invalid frequency"),
    ("localmonitor", "local monitor"),
    ("memory_notfound", "memory not found"),
    ("repeat_only", "repeat only"),
    ("rxpl", "receive PL"),
    ("txpl", "transmit PL"),
    ("seconds", "seconds"),
    ("simplex", "simplex"),
    ("sitenorm", "site normal"),
    ("stop", "stop"),
    ("tranceive", "transceive"),
    ("version", "version"),
];

fn item(category: &str, name: &str, text: &str, max_words: usize) -> SeedItem {
    let file_stem = if category == RAW_NAME_CATEGORY {
        name.to_string()
    } else {
        clip_file_stem(name, max_words)
    };
    SeedItem {
        category: category.to_string(),
        file_stem,
        text: text.to_string(),
    }
}

/// 内置目录
pub fn builtin_catalog(max_words: usize) -> Vec<SeedItem> {
    let mut items = Vec::new();

    for letter in 'a'..='z' {
        if let Some(word) = nato_word(letter) {
            items.push(item("letters", &letter.to_string(), word, max_words));
        }
    }

    for num in 1..100 {
        let num = num.to_string();
        items.push(item("numbers", &num, &num, max_words));
    }

    for letter in 'a'..='z' {
        if let Some(word) = nato_word(letter) {
            items.push(item("phonetic", word, word, max_words));
        }
    }

    for (name, text) in TIME_WORDS {
        items.push(item("time", name, text, max_words));
    }

    for word in CALENDAR_WORDS {
        items.push(item("calendar", word, word, max_words));
    }

    for (name, text) in SYMBOL_WORDS {
        items.push(item("symbols", name, text, max_words));
    }

    for (name, text) in COMMON_PHRASES {
        items.push(item("phrases", name, text, max_words));
    }

    for (name, text) in RPT_PHRASES {
        items.push(item(RAW_NAME_CATEGORY, name, text, max_words));
    }

    items
}

/// 解析自定义短语文件
///
/// 每行一条，`filename->text` 或直接 `text`；空行和 `#` 开头的行被忽略
pub fn parse_phrases(content: &str, max_words: usize) -> Vec<SeedItem> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| match line.split_once("->") {
            Some((name, text)) => item("custom", name.trim(), text.trim(), max_words),
            None => item("custom", line, line, max_words),
        })
        .collect()
}
