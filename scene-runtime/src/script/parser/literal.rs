//! # 字符串字面量读取

use crate::error::ParseError;

/// 从 `line[start]` 处的开引号开始读取一个字符串字面量
///
/// 支持的转义：`\n`、`\t`、`\"`、`\\`；其他被转义的字符原样保留。
///
/// # 返回
///
/// `(解码后的内容, 结束引号之后的下标)`
pub fn read_string_literal(
    line: &str,
    start: usize,
    line_number: usize,
) -> Result<(String, usize), ParseError> {
    let body_start = start + 1;
    let rest = line.get(body_start..).unwrap_or_default();
    let mut value = String::new();
    let mut chars = rest.char_indices();

    while let Some((offset, ch)) = chars.next() {
        match ch {
            '\\' => match chars.next() {
                Some((_, 'n')) => value.push('\n'),
                Some((_, 't')) => value.push('\t'),
                Some((_, escaped)) => value.push(escaped),
                None => break,
            },
            '"' => return Ok((value, body_start + offset + 1)),
            _ => value.push(ch),
        }
    }

    Err(ParseError::UnterminatedString { line: line_number })
}
