//! # 表达式模块
//!
//! 定义条件表达式的语法树和求值器。
//!
//! ## 设计原则
//!
//! - 表达式是**无副作用**的纯函数
//! - 求值只依赖一个只读的 `has(name)` 能力
//! - 任何结构合法的表达式都能求值，没有错误路径
//!
//! ## 优先级（从低到高）
//!
//! `or` < `and` < `not` < 原子（`has x` / `x` / `true` / `false` / 括号）

use serde::{Deserialize, Serialize};
use std::fmt;

/// 条件表达式 AST 节点
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoolExpr {
    /// 逻辑与（左结合）
    And(Box<BoolExpr>, Box<BoolExpr>),

    /// 逻辑或（左结合）
    Or(Box<BoolExpr>, Box<BoolExpr>),

    /// 逻辑非
    Not(Box<BoolExpr>),

    /// `has name`
    Has(String),

    /// 裸标识符，语义与 `has name` 相同
    Ident(String),

    /// `true`
    True,

    /// `false`
    False,
}

impl BoolExpr {
    /// 创建逻辑与
    pub fn and(left: BoolExpr, right: BoolExpr) -> Self {
        Self::And(Box::new(left), Box::new(right))
    }

    /// 创建逻辑或
    pub fn or(left: BoolExpr, right: BoolExpr) -> Self {
        Self::Or(Box::new(left), Box::new(right))
    }

    /// 创建逻辑非
    #[allow(clippy::should_implement_trait)]
    pub fn not(expr: BoolExpr) -> Self {
        Self::Not(Box::new(expr))
    }

    /// 创建 `has name`
    pub fn has(name: impl Into<String>) -> Self {
        Self::Has(name.into())
    }

    /// 创建裸标识符
    pub fn ident(name: impl Into<String>) -> Self {
        Self::Ident(name.into())
    }
}

/// 以全括号形式输出，便于诊断和测试比对结构
impl fmt::Display for BoolExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::And(l, r) => write!(f, "({l} and {r})"),
            Self::Or(l, r) => write!(f, "({l} or {r})"),
            Self::Not(inner) => write!(f, "(not {inner})"),
            Self::Has(name) => write!(f, "has {name}"),
            Self::Ident(name) => write!(f, "{name}"),
            Self::True => write!(f, "true"),
            Self::False => write!(f, "false"),
        }
    }
}

/// 表达式求值上下文
///
/// 提供只读的"是否拥有"查询能力。
pub trait EvalContext {
    /// flag 或物品栏中是否存在 `name`
    fn has(&self, name: &str) -> bool;
}

/// 对表达式求值
///
/// `and` / `or` 短路求值。
pub fn evaluate(expr: &BoolExpr, ctx: &impl EvalContext) -> bool {
    match expr {
        BoolExpr::And(left, right) => evaluate(left, ctx) && evaluate(right, ctx),
        BoolExpr::Or(left, right) => evaluate(left, ctx) || evaluate(right, ctx),
        BoolExpr::Not(inner) => !evaluate(inner, ctx),
        BoolExpr::Has(name) | BoolExpr::Ident(name) => ctx.has(name),
        BoolExpr::True => true,
        BoolExpr::False => false,
    }
}
