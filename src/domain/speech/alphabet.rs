//! 字符发音表
//!
//! 字母、数字和符号到声音目录中分类素材的映射

/// 停顿字符，映射到静音素材
pub const PAUSE_CHARS: &[char] = &[',', '.', ';', ':', '-'];

#[inline]
pub fn is_pause_char(ch: char) -> bool {
    PAUSE_CHARS.contains(&ch)
}

/// NATO 音标字母表
const NATO_WORDS: [&str; 26] = [
    "alpha", "bravo", "charlie", "delta", "echo", "foxtrot", "golf", "hotel", "india",
    "juliet", "kilo", "lima", "mike", "november", "oscar", "papa", "quebec", "romeo",
    "sierra", "tango", "uniform", "victor", "whiskey", "x-ray", "yankee", "zulu",
];

const DIGIT_WORDS: [&str; 10] = [
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine",
];

/// 字母对应的 NATO 单词
pub fn nato_word(ch: char) -> Option<&'static str> {
    let lower = ch.to_ascii_lowercase();
    if lower.is_ascii_lowercase() {
        Some(NATO_WORDS[(lower as u8 - b'a') as usize])
    } else {
        None
    }
}

/// 数字对应的英文单词
pub fn digit_word(ch: char) -> Option<&'static str> {
    ch.to_digit(10).map(|d| DIGIT_WORDS[d as usize])
}

/// 有专门读音的符号，对应 `letters/<name>`
pub fn letter_symbol(ch: char) -> Option<&'static str> {
    let name = match ch {
        '=' => "equals",
        '*' => "asterisk",
        '"' => "ascii34",
        '?' => "ascii63",
        '`' => "ascii96",
        '|' => "ascii124",
        '&' => "ascii38",
        '\'' => "ascii39",
        '>' => "ascii62",
        '+' => "plus",
        '\\' => "ascii92",
        '!' => "exclaimation-point",
        '$' => "ascii36",
        '/' => "slash",
        '@' => "at",
        ')' => "ascii41",
        '~' => "ascii126",
        '^' => "ascii94",
        '_' => "ascii95",
        '(' => "ascii40",
        '%' => "ascii37",
        '<' => "ascii60",
        _ => return None,
    };
    Some(name)
}

/// 有专门读音的符号，对应 `digits/<name>`
pub fn digit_symbol(ch: char) -> Option<&'static str> {
    match ch {
        '#' => Some("pound"),
        _ => None,
    }
}

/// 整词别名，对应 `digits/<name>`（序数词、月份、星期、上下午）
pub fn digit_alias(word: &str) -> Option<&'static str> {
    let alias = match word.to_lowercase().as_str() {
        "1st" => "h-1",
        "2nd" => "h-2",
        "3rd" => "h-3",
        "4th" => "h-4",
        "5th" => "h-5",
        "6th" => "h-6",
        "7th" => "h-7",
        "8th" => "h-8",
        "9th" => "h-9",
        "10th" => "h-10",
        "11th" => "h-11",
        "12th" => "h-12",
        "13th" => "h-13",
        "14th" => "h-14",
        "15th" => "h-15",
        "16th" => "h-16",
        "17th" => "h-17",
        "18th" => "h-18",
        "19th" => "h-19",
        "20th" => "h-20",
        "30th" => "h-30",
        "40th" => "h-40",
        "50th" => "h-50",
        "60th" => "h-60",
        "70th" => "h-70",
        "80th" => "h-80",
        "90th" => "h-90",
        "100th" | "hundredth" => "h-hundred",
        "thousandth" => "h-thousand",
        "millionth" => "h-million",
        "january" => "mon-0",
        "february" => "mon-1",
        "march" => "mon-2",
        "april" => "mon-3",
        "may" => "mon-4",
        "june" => "mon-5",
        "july" => "mon-6",
        "august" => "mon-7",
        "september" => "mon-8",
        "october" => "mon-9",
        "november" => "mon-10",
        "december" => "mon-11",
        "sunday" => "day-0",
        "monday" => "day-1",
        "tuesday" => "day-2",
        "wednesday" => "day-3",
        "thursday" => "day-4",
        "friday" => "day-5",
        "saturday" => "day-6",
        "pm" => "p-m",
        "am" => "a-m",
        _ => return None,
    };
    Some(alias)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nato_word() {
        assert_eq!(nato_word('a'), Some("alpha"));
        assert_eq!(nato_word('X'), Some("x-ray"));
        assert_eq!(nato_word('1'), None);
    }

    #[test]
    fn test_digit_word() {
        assert_eq!(digit_word('0'), Some("zero"));
        assert_eq!(digit_word('3'), Some("three"));
        assert_eq!(digit_word('x'), None);
    }

    #[test]
    fn test_symbol_tables() {
        assert_eq!(letter_symbol('/'), Some("slash"));
        assert_eq!(letter_symbol('!'), Some("exclaimation-point"));
        assert_eq!(digit_symbol('#'), Some("pound"));
        assert_eq!(letter_symbol(','), None);
        assert!(is_pause_char(';'));
    }

    #[test]
    fn test_digit_alias_is_case_insensitive() {
        assert_eq!(digit_alias("January"), Some("mon-0"));
        assert_eq!(digit_alias("1ST"), Some("h-1"));
        assert_eq!(digit_alias("hello"), None);
    }
}
