//! # Scene Runtime
//!
//! 场景脚本（scene script）互动小说引擎的核心运行时库。
//!
//! ## 架构概述
//!
//! `scene-runtime` 是纯逻辑核心，不依赖任何 IO 或渲染引擎。
//! 它通过 **命令驱动模式** 与宿主层（Host）通信：
//!
//! ```text
//! Host                          Runtime
//!   │                              │
//!   │──── RuntimeInput ──────────►│
//!   │                              │ tick()
//!   │◄─── (Vec<Command>, WaitingReason) ──│
//!   │                              │
//! ```
//!
//! ## 核心类型
//!
//! - [`Program`]：解析后的脚本（场景 id → 语句序列）
//! - [`SceneRuntime`]：执行引擎
//! - [`Command`]：Runtime 向 Host 发出的指令
//! - [`RuntimeInput`]：Host 向 Runtime 传递的输入
//! - [`WaitingReason`]：Runtime 的等待状态
//! - [`RuntimeState`]：可序列化的运行时状态
//!
//! ## 使用示例
//!
//! ```ignore
//! use scene_runtime::{SceneRuntime, RuntimeInput, WaitingReason, parse_program};
//!
//! let program = parse_program(script_text)?;
//! let mut runtime = SceneRuntime::new(program);
//!
//! let (mut commands, mut waiting) = runtime.start("CH0")?;
//! loop {
//!     for cmd in commands {
//!         host.execute(cmd);
//!     }
//!
//!     match waiting {
//!         WaitingReason::None => break,
//!         WaitingReason::WaitForChoice { .. } => {
//!             let input = RuntimeInput::choice(wait_for_choice());
//!             (commands, waiting) = runtime.tick(Some(input))?;
//!         }
//!     }
//! }
//! ```
//!
//! 同步的 Host 也可以直接实现 [`SceneHost`] 并调用 [`play`]。
//!
//! ## 模块结构
//!
//! - [`command`]：Command 定义
//! - [`input`]：RuntimeInput 定义
//! - [`state`]：RuntimeState、GameState、StyleState 和 WaitingReason 定义
//! - [`error`]：错误类型定义
//! - [`script`]：脚本解析（AST、条件表达式和 Parser）
//! - [`runtime`]：执行引擎
//! - [`diagnostic`]：静态检查

pub mod command;
pub mod diagnostic;
pub mod error;
pub mod input;
pub mod runtime;
pub mod script;
pub mod state;

// 重导出核心类型
pub use command::{Choice, Command};
pub use diagnostic::{
    Diagnostic, DiagnosticLevel, DiagnosticResult, ImageReference, analyze_program,
    extract_image_references, get_jump_targets,
};
pub use error::{ParseError, RuntimeError, SceneError, SceneResult};
pub use input::RuntimeInput;
pub use runtime::{PlayOutcome, SceneHost, SceneRuntime, play};
pub use script::{BoolExpr, Parser, Program, Scene, Statement, StyleChange, parse_program};
pub use state::{GameState, RuntimeState, StyleState, WaitingReason};

/// 解析脚本并从入口场景开始运行
///
/// 解析错误和运行时错误统一为 [`SceneError`]。
pub fn load_and_start(
    text: &str,
    entry_scene: &str,
) -> SceneResult<(SceneRuntime, Vec<Command>, WaitingReason)> {
    let program = parse_program(text)?;
    let mut runtime = SceneRuntime::new(program);
    let (commands, waiting) = runtime.start(entry_scene)?;
    Ok((runtime, commands, waiting))
}
