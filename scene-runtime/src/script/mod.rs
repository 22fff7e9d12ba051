//! # Script 模块
//!
//! 脚本解析相关功能，包括 AST 定义、条件表达式和解析器实现。
//!
//! ## 模块结构
//!
//! - [`ast`]：脚本抽象语法树定义
//! - [`expr`]：条件表达式语法树与求值
//! - [`parser`]：面向行的递归下降解析器

pub mod ast;
pub mod expr;
pub mod parser;

pub use ast::*;
pub use expr::{BoolExpr, EvalContext, evaluate};
pub use parser::{Parser, parse_program};
