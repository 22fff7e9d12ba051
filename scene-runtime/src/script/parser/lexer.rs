//! # 行扫描
//!
//! 去除注释、修剪空白，把原始文本切成带行号的有效行。
//!
//! 注释从引号外的 `;` 开始到行尾。反斜杠只在这里用于判断引号边界，
//! 转义的真正含义由字符串字面量读取器解释。

/// 一行有效源码
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    /// 行号（从 1 开始）
    pub number: usize,
    /// 去除注释并修剪后的内容（非空）
    pub text: String,
}

/// 去除一行中的注释
///
/// 结果总是输入的前缀，不做任何其他变换。
///
/// ```text
/// print "a;b"            -> print "a;b"
/// print "a" ; comment    -> print "a" 
/// ```
pub fn strip_comment(line: &str) -> &str {
    let mut in_string = false;
    let mut chars = line.char_indices();

    while let Some((idx, ch)) = chars.next() {
        match ch {
            // 转义：连同下一个字符原样跳过
            '\\' => {
                chars.next();
            }
            '"' => in_string = !in_string,
            ';' if !in_string => return &line[..idx],
            _ => {}
        }
    }

    line
}

/// 扫描整段脚本，返回所有非空的有效行
pub fn scan_lines(text: &str) -> Vec<SourceLine> {
    text.lines()
        .enumerate()
        .filter_map(|(idx, raw)| {
            let trimmed = strip_comment(raw).trim();
            (!trimmed.is_empty()).then(|| SourceLine {
                number: idx + 1,
                text: trimmed.to_string(),
            })
        })
        .collect()
}
