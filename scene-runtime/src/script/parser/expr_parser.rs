//! # 条件表达式解析器
//!
//! 先分词，再对 token 序列做递归下降。
//!
//! ```text
//! or_expr  := and_expr ("or" and_expr)*
//! and_expr := not_expr ("and" not_expr)*
//! not_expr := "not" not_expr | atom
//! atom     := "(" or_expr ")" | "has" IDENT | IDENT | "true" | "false"
//! ```

use std::fmt;

use crate::error::ParseError;
use crate::script::BoolExpr;

/// 条件表达式 token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    LParen,
    RParen,
    And,
    Or,
    Not,
    Has,
    True,
    False,
    /// 普通标识符（保留原始大小写）
    Ident(String),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::And => write!(f, "and"),
            Token::Or => write!(f, "or"),
            Token::Not => write!(f, "not"),
            Token::Has => write!(f, "has"),
            Token::True => write!(f, "true"),
            Token::False => write!(f, "false"),
            Token::Ident(name) => write!(f, "{name}"),
        }
    }
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// 将单词分类为关键字或标识符
///
/// 关键字不区分大小写。
fn classify_word(word: &str) -> Token {
    match word.to_ascii_lowercase().as_str() {
        "and" => Token::And,
        "or" => Token::Or,
        "not" => Token::Not,
        "has" => Token::Has,
        "true" => Token::True,
        "false" => Token::False,
        _ => Token::Ident(word.to_string()),
    }
}

/// 条件表达式分词
pub fn tokenize(input: &str, line_number: usize) -> Result<Vec<Token>, ParseError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(start, ch)) = chars.peek() {
        if ch.is_whitespace() {
            chars.next();
            continue;
        }

        match ch {
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            c if is_word_char(c) => {
                let mut end = start;
                while let Some(&(idx, c)) = chars.peek() {
                    if !is_word_char(c) {
                        break;
                    }
                    end = idx + c.len_utf8();
                    chars.next();
                }
                tokens.push(classify_word(&input[start..end]));
            }
            other => {
                return Err(ParseError::InvalidCharacter {
                    line: line_number,
                    ch: other,
                });
            }
        }
    }

    Ok(tokens)
}

/// 解析条件表达式字符串
pub fn parse_condition(input: &str, line_number: usize) -> Result<BoolExpr, ParseError> {
    let tokens = tokenize(input, line_number)?;
    let mut parser = ExprParser::new(&tokens, line_number);
    let (expr, _) = parser.parse_or()?;

    if parser.pos < tokens.len() {
        let remaining = tokens[parser.pos..]
            .iter()
            .map(Token::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        return Err(ParseError::TrailingTokens {
            line: line_number,
            remaining,
        });
    }

    Ok(expr)
}

/// 条件表达式允许的最大嵌套深度
///
/// 括号、`not` 以及 `and`/`or` 链都计入深度；超过时报告解析错误，
/// 解析与求值的递归深度因此有界。
pub const MAX_EXPR_DEPTH: usize = 64;

/// 表达式解析器
struct ExprParser<'a> {
    tokens: &'a [Token],
    pos: usize,
    line_number: usize,
    /// 当前递归所在的括号与 `not` 层数
    nesting: usize,
}

/// 解析结果及其语法树高度
type Parsed = (BoolExpr, usize);

impl<'a> ExprParser<'a> {
    fn new(tokens: &'a [Token], line_number: usize) -> Self {
        Self {
            tokens,
            pos: 0,
            line_number,
            nesting: 0,
        }
    }

    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn too_deep(&self) -> ParseError {
        ParseError::malformed(
            self.line_number,
            format!("表达式嵌套超过 {MAX_EXPR_DEPTH} 层"),
        )
    }

    fn check_height(&self, height: usize) -> Result<usize, ParseError> {
        if height > MAX_EXPR_DEPTH {
            return Err(self.too_deep());
        }
        Ok(height)
    }

    /// 进入一层括号或 `not`
    fn descend(&mut self) -> Result<(), ParseError> {
        if self.nesting >= MAX_EXPR_DEPTH {
            return Err(self.too_deep());
        }
        self.nesting += 1;
        Ok(())
    }

    fn ascend(&mut self) {
        self.nesting -= 1;
    }

    /// 解析 or 表达式（最低优先级）
    fn parse_or(&mut self) -> Result<Parsed, ParseError> {
        let (mut left, mut height) = self.parse_and()?;
        while self.eat(&Token::Or) {
            let (right, right_height) = self.parse_and()?;
            left = BoolExpr::or(left, right);
            height = self.check_height(height.max(right_height) + 1)?;
        }
        Ok((left, height))
    }

    /// 解析 and 表达式
    fn parse_and(&mut self) -> Result<Parsed, ParseError> {
        let (mut left, mut height) = self.parse_not()?;
        while self.eat(&Token::And) {
            let (right, right_height) = self.parse_not()?;
            left = BoolExpr::and(left, right);
            height = self.check_height(height.max(right_height) + 1)?;
        }
        Ok((left, height))
    }

    /// 解析 not 表达式（右递归，支持 `not not x`）
    fn parse_not(&mut self) -> Result<Parsed, ParseError> {
        if self.eat(&Token::Not) {
            self.descend()?;
            let (inner, height) = self.parse_not()?;
            self.ascend();
            return Ok((BoolExpr::not(inner), self.check_height(height + 1)?));
        }
        self.parse_atom()
    }

    /// 解析原子表达式
    fn parse_atom(&mut self) -> Result<Parsed, ParseError> {
        let token = self
            .peek()
            .ok_or_else(|| ParseError::malformed(self.line_number, "表达式意外结束"))?;
        self.pos += 1;

        let expr = match token {
            Token::LParen => {
                self.descend()?;
                let parsed = self.parse_or()?;
                if !self.eat(&Token::RParen) {
                    return Err(ParseError::malformed(self.line_number, "缺少右括号 ')'"));
                }
                self.ascend();
                return Ok(parsed);
            }
            Token::Has => match self.peek() {
                Some(Token::Ident(name)) => {
                    self.pos += 1;
                    BoolExpr::has(name.clone())
                }
                _ => {
                    return Err(ParseError::malformed(
                        self.line_number,
                        "'has' 之后缺少标识符",
                    ));
                }
            },
            Token::Ident(name) => BoolExpr::ident(name.clone()),
            Token::True => BoolExpr::True,
            Token::False => BoolExpr::False,
            other => {
                return Err(ParseError::malformed(
                    self.line_number,
                    format!("意外的 token '{other}'"),
                ));
            }
        };
        Ok((expr, 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> BoolExpr {
        parse_condition(input, 1).unwrap()
    }

    #[test]
    fn test_tokenize_keywords_case_insensitive() {
        let tokens = tokenize("NOT Has Key AND (true Or FALSE)", 1).unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Not,
                Token::Has,
                Token::Ident("Key".to_string()),
                Token::And,
                Token::LParen,
                Token::True,
                Token::Or,
                Token::False,
                Token::RParen,
            ]
        );
    }

    #[test]
    fn test_tokenize_words_without_spaces_around_parens() {
        let tokens = tokenize("(a_1)or(b2)", 1).unwrap();
        assert_eq!(tokens.len(), 7);
        assert_eq!(tokens[1], Token::Ident("a_1".to_string()));
        assert_eq!(tokens[3], Token::Or);
    }

    #[test]
    fn test_tokenize_invalid_character() {
        assert_eq!(
            tokenize("a && b", 4),
            Err(ParseError::InvalidCharacter { line: 4, ch: '&' })
        );
        assert!(matches!(
            tokenize("chiave_è", 1),
            Err(ParseError::InvalidCharacter { ch: 'è', .. })
        ));
    }

    #[test]
    fn test_precedence() {
        insta::assert_snapshot!(parse("not a and b or c").to_string(), @"(((not a) and b) or c)");
        insta::assert_snapshot!(parse("a or b and c").to_string(), @"(a or (b and c))");
    }

    #[test]
    fn test_left_associative() {
        assert_eq!(
            parse("a and b and c"),
            BoolExpr::and(
                BoolExpr::and(BoolExpr::ident("a"), BoolExpr::ident("b")),
                BoolExpr::ident("c")
            )
        );
        assert_eq!(
            parse("a or b or c"),
            BoolExpr::or(
                BoolExpr::or(BoolExpr::ident("a"), BoolExpr::ident("b")),
                BoolExpr::ident("c")
            )
        );
    }

    #[test]
    fn test_parentheses_override_precedence() {
        assert_eq!(
            parse("a and (b or c)"),
            BoolExpr::and(
                BoolExpr::ident("a"),
                BoolExpr::or(BoolExpr::ident("b"), BoolExpr::ident("c"))
            )
        );
        assert_eq!(
            parse("not (a or b)"),
            BoolExpr::not(BoolExpr::or(BoolExpr::ident("a"), BoolExpr::ident("b")))
        );
    }

    #[test]
    fn test_atoms() {
        assert_eq!(parse("has key"), BoolExpr::has("key"));
        assert_eq!(parse("key"), BoolExpr::ident("key"));
        assert_eq!(parse("TRUE"), BoolExpr::True);
        assert_eq!(parse("false"), BoolExpr::False);
        assert_eq!(parse("not not x"), BoolExpr::not(BoolExpr::not(BoolExpr::ident("x"))));
    }

    #[test]
    fn test_malformed_expressions() {
        let cases = ["", "a and", "not", "(a or b", "has", "has (a)", "has true", "a and or b", ")"];
        for input in cases {
            assert!(
                matches!(
                    parse_condition(input, 2),
                    Err(ParseError::MalformedExpression { line: 2, .. })
                ),
                "输入 {input:?} 应当解析失败"
            );
        }
    }

    #[test]
    fn test_nesting_depth_limit() {
        let deep_parens = format!("{}a{}", "(".repeat(20_000), ")".repeat(20_000));
        let deep_not = format!("{}a", "not ".repeat(20_000));
        let long_chain = vec!["a"; 20_000].join(" and ");

        for input in [&deep_parens, &deep_not, &long_chain] {
            let err = parse_condition(input, 5).unwrap_err();
            assert!(matches!(err, ParseError::MalformedExpression { line: 5, .. }));
        }

        // 限制之内照常解析
        let nested = format!("{}a{}", "(".repeat(MAX_EXPR_DEPTH), ")".repeat(MAX_EXPR_DEPTH));
        assert_eq!(parse(&nested), BoolExpr::ident("a"));
        assert!(parse_condition(&vec!["a"; 10].join(" or "), 1).is_ok());
    }

    #[test]
    fn test_trailing_tokens() {
        assert_eq!(
            parse_condition("a b", 3),
            Err(ParseError::TrailingTokens {
                line: 3,
                remaining: "b".to_string()
            })
        );
        assert_eq!(
            parse_condition("(a))", 3),
            Err(ParseError::TrailingTokens {
                line: 3,
                remaining: ")".to_string()
            })
        );
    }
}
