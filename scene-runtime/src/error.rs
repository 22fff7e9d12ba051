//! # Error 模块
//!
//! 定义 scene-runtime 中使用的错误类型。
//!
//! - 解析错误一律快速失败，整个脚本不产生可用的 `Program`
//! - 运行时错误只覆盖 Host 的误用（非法选择、状态不匹配等）；
//!   跳转到不存在的场景不是错误，由场景运行器输出诊断行后继续

use thiserror::Error;

/// 解析错误
///
/// 所有变体都带有出错的行号（从 1 开始）。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// 字符串字面量缺少结束引号
    #[error("第 {line} 行：字符串未闭合")]
    UnterminatedString { line: usize },

    /// 指令缺少必需参数
    #[error("第 {line} 行：指令 '{keyword}' 缺少参数 '{argument}'")]
    MissingArgument {
        line: usize,
        keyword: String,
        argument: String,
    },

    /// 无法解析为整数
    #[error("第 {line} 行：无效的整数 '{value}'")]
    InvalidNumber { line: usize, value: String },

    /// 条件表达式中出现非法字符
    #[error("第 {line} 行：条件表达式中的非法字符 '{ch}'")]
    InvalidCharacter { line: usize, ch: char },

    /// 条件表达式结构错误
    #[error("第 {line} 行：无效的条件表达式 - {message}")]
    MalformedExpression { line: usize, message: String },

    /// 完整表达式之后仍有多余的 token
    #[error("第 {line} 行：条件表达式末尾存在多余内容: '{remaining}'")]
    TrailingTokens { line: usize, remaining: String },
}

impl ParseError {
    /// 出错的行号
    pub fn line(&self) -> usize {
        match self {
            Self::UnterminatedString { line }
            | Self::MissingArgument { line, .. }
            | Self::InvalidNumber { line, .. }
            | Self::InvalidCharacter { line, .. }
            | Self::MalformedExpression { line, .. }
            | Self::TrailingTokens { line, .. } => *line,
        }
    }

    pub(crate) fn missing(line: usize, keyword: &str, argument: &str) -> Self {
        Self::MissingArgument {
            line,
            keyword: keyword.to_string(),
            argument: argument.to_string(),
        }
    }

    pub(crate) fn malformed(line: usize, message: impl Into<String>) -> Self {
        Self::MalformedExpression {
            line,
            message: message.into(),
        }
    }
}

/// 运行时错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuntimeError {
    /// 无效的选择索引
    #[error("无效的选择索引 {index}，有效范围是 0..{max}")]
    InvalidChoiceIndex { index: usize, max: usize },

    /// 状态不匹配
    #[error("当前状态不允许此操作：期望 {expected}，实际 {actual}")]
    StateMismatch { expected: String, actual: String },

    /// 尚未调用 `start`
    #[error("运行时尚未启动任何场景")]
    NotStarted,

    /// 场景之间无限跳转
    #[error("场景 '{scene}' 附近连续跳转超过 {limit} 次，疑似死循环")]
    TransferLoop { scene: String, limit: usize },
}

/// scene-runtime 统一错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    /// 解析错误
    #[error("解析错误: {0}")]
    Parse(#[from] ParseError),

    /// 运行时错误
    #[error("运行时错误: {0}")]
    Runtime(#[from] RuntimeError),
}

/// Result 类型别名
pub type SceneResult<T> = Result<T, SceneError>;
