//! # Parser 模块
//!
//! 面向行的脚本解析器实现（手写递归下降，无 regex 依赖）。
//!
//! ## 架构
//!
//! ```text
//! 原始文本 → [行扫描: 去注释] → Vec<SourceLine> → [语句解析] → Program
//!                                                     │
//!                                  字符串字面量 / 条件表达式解析
//! ```
//!
//! ## 设计原则
//!
//! - 解析错误快速失败，不产生部分可用的 `Program`
//! - 清晰的错误处理和行号追踪
//! - 容错解析：无法识别的行跳过，并记录警告
//!
//! ## 模块结构
//!
//! - `lexer`: 去注释与行扫描
//! - `literal`: 字符串字面量读取
//! - `expr_parser`: 条件表达式分词与解析
//! - `statement`: 场景与语句解析
//! - `helpers`: 辅助解析函数

mod expr_parser;
mod helpers;
mod lexer;
mod literal;
mod statement;

#[cfg(test)]
mod tests;

use crate::error::ParseError;
use crate::script::ast::Program;

use statement::StatementParser;

pub use expr_parser::{Token, parse_condition, tokenize};
pub use lexer::{SourceLine, scan_lines, strip_comment};
pub use literal::read_string_literal;

/// 脚本解析器
#[derive(Debug, Default)]
pub struct Parser {
    /// 最近一次解析产生的警告
    warnings: Vec<String>,
}

impl Parser {
    /// 创建新的解析器
    pub fn new() -> Self {
        Self::default()
    }

    /// 解析脚本文本
    ///
    /// 每次调用都会清空上一次的警告。
    pub fn parse(&mut self, text: &str) -> Result<Program, ParseError> {
        let mut statements = StatementParser::new(scan_lines(text));
        let result = statements.parse_program();
        self.warnings = statements.warnings;
        result
    }

    /// 获取解析过程中的警告
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }
}

/// 解析脚本文本（丢弃警告）
pub fn parse_program(text: &str) -> Result<Program, ParseError> {
    Parser::new().parse(text)
}
