//! # Runtime 模块
//!
//! 执行引擎核心，负责语句执行、场景跳转和选择菜单。
//!
//! ## 模块结构
//!
//! - [`engine`]：核心执行引擎（含场景运行器）
//! - [`executor`]：帧栈执行器与菜单聚合
//! - [`driver`]：同步 Host 的驱动循环

pub mod driver;
pub mod engine;
pub mod executor;

pub use driver::{PlayOutcome, SceneHost, play};
pub use engine::{MAX_SCENE_TRANSFERS, SceneRuntime};
pub use executor::{Executor, Flow, MenuItem, collect_menu};
