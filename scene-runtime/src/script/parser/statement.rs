//! # 语句解析
//!
//! 在有效行序列上移动唯一的游标，把行解析成场景和语句。
//! 游标只前进不回退。

use crate::error::ParseError;
use crate::script::ast::{Program, Scene, Statement, StyleChange};

use super::expr_parser::parse_condition;
use super::helpers::{first_word, is_scene_header, nth_word, parse_int_prefix, starts_with_ignore_case};
use super::lexer::SourceLine;
use super::literal::read_string_literal;

/// 嵌套块的结束标记
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Terminator {
    Else,
    End,
}

impl Terminator {
    fn keyword(self) -> &'static str {
        match self {
            Terminator::Else => "else",
            Terminator::End => "end",
        }
    }

    /// 行首匹配（大小写不敏感）
    fn matches(self, line: &str) -> bool {
        starts_with_ignore_case(line, self.keyword())
    }
}

/// 语句解析器
pub(super) struct StatementParser {
    lines: Vec<SourceLine>,
    pos: usize,
    /// 解析警告（非致命）
    pub warnings: Vec<String>,
}

impl StatementParser {
    pub fn new(lines: Vec<SourceLine>) -> Self {
        Self {
            lines,
            pos: 0,
            warnings: Vec::new(),
        }
    }

    fn current(&self) -> Option<SourceLine> {
        self.lines.get(self.pos).cloned()
    }

    /// 解析整个程序
    ///
    /// 场景之外的行被忽略；同名场景以后者为准。
    pub fn parse_program(&mut self) -> Result<Program, ParseError> {
        let mut program = Program::default();

        while let Some(line) = self.current() {
            if !is_scene_header(&line.text) {
                self.warnings.push(format!(
                    "第 {} 行：场景之外的内容，已忽略: {}",
                    line.number, line.text
                ));
                self.pos += 1;
                continue;
            }

            let scene = self.parse_scene(&line)?;
            let id = scene.id.clone();
            if program.insert(scene) {
                self.warnings.push(format!(
                    "第 {} 行：场景 '{}' 重复定义，覆盖之前的定义",
                    line.number, id
                ));
            }
        }

        Ok(program)
    }

    /// 解析 `scene <id>` 及其语句，直到下一个场景或输入结束
    fn parse_scene(&mut self, header: &SourceLine) -> Result<Scene, ParseError> {
        let id = nth_word(&header.text, 1)
            .ok_or_else(|| ParseError::missing(header.number, "scene", "场景 id"))?
            .to_string();
        self.pos += 1;

        let (body, _) = self.parse_block(&[])?;

        Ok(Scene {
            id,
            line: header.number,
            body: body.into(),
        })
    }

    /// 解析语句序列，直到遇到 `terminators` 之一、场景声明或输入结束
    ///
    /// 结束标记行不会被消费，由调用方决定如何处理；
    /// 返回值中的 `None` 表示没有遇到任何结束标记。
    pub fn parse_block(
        &mut self,
        terminators: &[Terminator],
    ) -> Result<(Vec<Statement>, Option<Terminator>), ParseError> {
        let mut statements = Vec::new();

        while let Some(line) = self.current() {
            if is_scene_header(&line.text) {
                break;
            }
            if let Some(&hit) = terminators.iter().find(|t| t.matches(&line.text)) {
                return Ok((statements, Some(hit)));
            }
            if let Some(statement) = self.parse_statement(&line)? {
                statements.push(statement);
            }
        }

        Ok((statements, None))
    }

    /// 解析单条语句（游标至少前进一行）
    ///
    /// 无法识别的关键字返回 `Ok(None)`。
    fn parse_statement(&mut self, line: &SourceLine) -> Result<Option<Statement>, ParseError> {
        let text = line.text.as_str();
        let number = line.number;
        let keyword = first_word(text).to_ascii_lowercase();

        let statement = match keyword.as_str() {
            "print" => Statement::Print {
                text: quoted_argument(text, number, "print")?,
            },
            "image" => Statement::Image {
                source: quoted_argument(text, number, "image")?,
            },
            "go" => Statement::Goto {
                target: word_argument(text, number, "go", "场景 id")?,
                line: number,
            },
            "set" => Statement::SetFlag {
                id: word_argument(text, number, "set", "标识符")?,
            },
            "unset" => Statement::UnsetFlag {
                id: word_argument(text, number, "unset", "标识符")?,
            },
            "add" => Statement::AddItem {
                id: word_argument(text, number, "add", "标识符")?,
            },
            "remove" => Statement::RemoveItem {
                id: word_argument(text, number, "remove", "标识符")?,
            },
            "background" => Statement::StyleChange(StyleChange::Background(word_argument(
                text,
                number,
                "background",
                "颜色",
            )?)),
            "foreground" => Statement::StyleChange(StyleChange::Foreground(word_argument(
                text,
                number,
                "foreground",
                "颜色",
            )?)),
            "font" => Statement::StyleChange(StyleChange::Font(font_argument(text, number)?)),
            "fontsize" => {
                Statement::StyleChange(StyleChange::FontSize(font_size_argument(text, number)?))
            }
            "choice" => return self.parse_choice(line).map(Some),
            "if" => return self.parse_if(line).map(Some),
            "else" | "end" => {
                self.warnings.push(format!(
                    "第 {} 行：多余的 '{}'，已跳过",
                    number, keyword
                ));
                self.pos += 1;
                return Ok(None);
            }
            _ => {
                self.warnings.push(format!(
                    "第 {} 行：无法识别的指令，已跳过: {}",
                    number, text
                ));
                self.pos += 1;
                return Ok(None);
            }
        };

        self.pos += 1;
        Ok(Some(statement))
    }

    /// 解析 `choice "label"` ... `end`
    fn parse_choice(&mut self, line: &SourceLine) -> Result<Statement, ParseError> {
        let label = quoted_argument(&line.text, line.number, "choice")?;
        self.pos += 1;

        let (body, terminator) = self.parse_block(&[Terminator::End])?;
        self.finish_block(terminator, line.number, "choice");

        Ok(Statement::Choice {
            label,
            body: body.into(),
        })
    }

    /// 解析 `if <cond> then` ... [`else` ...] `end`
    fn parse_if(&mut self, line: &SourceLine) -> Result<Statement, ParseError> {
        let words: Vec<&str> = line.text.split_whitespace().collect();
        let then_pos = words
            .iter()
            .position(|w| w.eq_ignore_ascii_case("then"))
            .ok_or_else(|| ParseError::missing(line.number, "if", "then"))?;

        let condition = parse_condition(&words[1..then_pos].join(" "), line.number)?;
        if then_pos + 1 < words.len() {
            self.warnings.push(format!(
                "第 {} 行：'then' 之后的内容被忽略: {}",
                line.number,
                words[then_pos + 1..].join(" ")
            ));
        }
        self.pos += 1;

        let (then_body, terminator) = self.parse_block(&[Terminator::Else, Terminator::End])?;
        let else_body = match terminator {
            Some(Terminator::Else) => {
                self.pos += 1;
                let (else_body, terminator) = self.parse_block(&[Terminator::End])?;
                self.finish_block(terminator, line.number, "if");
                else_body
            }
            other => {
                self.finish_block(other, line.number, "if");
                Vec::new()
            }
        };

        Ok(Statement::If {
            condition,
            then_body: then_body.into(),
            else_body: else_body.into(),
        })
    }

    /// 消费块的结束行；没有结束行时只记录警告
    fn finish_block(&mut self, terminator: Option<Terminator>, start_line: usize, keyword: &str) {
        if terminator.is_some() {
            self.pos += 1;
        } else {
            self.warnings.push(format!(
                "第 {} 行：'{}' 块缺少 'end'，在场景或输入结束处自动闭合",
                start_line, keyword
            ));
        }
    }
}

/// 行内第一个双引号开始的字符串字面量
///
/// 结束引号之后的内容被忽略。
fn quoted_argument(text: &str, line: usize, keyword: &str) -> Result<String, ParseError> {
    let start = text
        .find('"')
        .ok_or_else(|| ParseError::missing(line, keyword, "字符串"))?;
    let (value, _) = read_string_literal(text, start, line)?;
    Ok(value)
}

/// 关键字之后的第一个词
fn word_argument(
    text: &str,
    line: usize,
    keyword: &str,
    argument: &str,
) -> Result<String, ParseError> {
    nth_word(text, 1)
        .map(str::to_string)
        .ok_or_else(|| ParseError::missing(line, keyword, argument))
}

/// `font` 接受带引号的字符串（可含空格）或一个词
fn font_argument(text: &str, line: usize) -> Result<String, ParseError> {
    if text.contains('"') {
        quoted_argument(text, line, "font")
    } else {
        word_argument(text, line, "font", "字体")
    }
}

fn font_size_argument(text: &str, line: usize) -> Result<i64, ParseError> {
    let raw = nth_word(text, 1).ok_or_else(|| ParseError::missing(line, "fontsize", "字号"))?;
    parse_int_prefix(raw).ok_or_else(|| ParseError::InvalidNumber {
        line,
        value: raw.to_string(),
    })
}
