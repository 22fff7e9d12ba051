//! # 辅助解析函数
//!
//! 手写的字符串解析辅助函数，无正则依赖。

/// 检查字符串是否以指定前缀开头（大小写不敏感）
pub fn starts_with_ignore_case(s: &str, prefix: &str) -> bool {
    s.len() >= prefix.len()
        && s.chars()
            .zip(prefix.chars())
            .all(|(a, b)| a.eq_ignore_ascii_case(&b))
}

/// 第一个空白分隔的词（空行返回空串）
pub fn first_word(s: &str) -> &str {
    s.split_whitespace().next().unwrap_or_default()
}

/// 第 `n` 个空白分隔的词（从 0 开始）
pub fn nth_word(s: &str, n: usize) -> Option<&str> {
    s.split_whitespace().nth(n)
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// 是否为场景声明行
///
/// `scene` 关键字大小写不敏感，且其后必须是词边界：
/// `scene A`、`SCENE`、`scene:x` 都算，`scenery` 不算。
pub fn is_scene_header(s: &str) -> bool {
    const KEYWORD: &str = "scene";

    if !starts_with_ignore_case(s, KEYWORD) {
        return false;
    }
    match s.get(KEYWORD.len()..) {
        Some(rest) => !rest.chars().next().is_some_and(is_word_char),
        None => false,
    }
}

/// 按前缀解析十进制整数
///
/// 可选的 `+` / `-` 号之后至少需要一位数字，之后的非数字字符被忽略：
/// `"18px"` → `Some(18)`，`"px"` → `None`。溢出同样返回 `None`。
pub fn parse_int_prefix(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let len = digits.bytes().take_while(u8::is_ascii_digit).count();
    if len == 0 {
        return None;
    }

    let magnitude: i64 = digits[..len].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_with_ignore_case() {
        assert!(starts_with_ignore_case("END", "end"));
        assert!(starts_with_ignore_case("endgame", "end"));
        assert!(starts_with_ignore_case("Else ; x", "else"));
        assert!(!starts_with_ignore_case("en", "end"));
        assert!(!starts_with_ignore_case("print", "end"));
    }

    #[test]
    fn test_words() {
        assert_eq!(first_word("  print   \"x\""), "print");
        assert_eq!(first_word(""), "");
        assert_eq!(nth_word("go  CH1 extra", 1), Some("CH1"));
        assert_eq!(nth_word("go", 1), None);
    }

    #[test]
    fn test_is_scene_header() {
        assert!(is_scene_header("scene CH0"));
        assert!(is_scene_header("SCENE intro"));
        assert!(is_scene_header("scene"));
        assert!(is_scene_header("scene:odd"));
        assert!(!is_scene_header("scenery is nice"));
        assert!(!is_scene_header("scene_2 x"));
        assert!(!is_scene_header("print \"scene\""));
        assert!(!is_scene_header("sce"));
    }

    #[test]
    fn test_parse_int_prefix() {
        assert_eq!(parse_int_prefix("18"), Some(18));
        assert_eq!(parse_int_prefix("18px"), Some(18));
        assert_eq!(parse_int_prefix("-4"), Some(-4));
        assert_eq!(parse_int_prefix("+7"), Some(7));
        assert_eq!(parse_int_prefix("px"), None);
        assert_eq!(parse_int_prefix("-"), None);
        assert_eq!(parse_int_prefix(""), None);
        assert_eq!(parse_int_prefix("99999999999999999999999"), None);
    }
}
