//! # State 模块
//!
//! 定义 Runtime 的运行时状态和等待模型。
//!
//! ## 设计原则
//!
//! - 所有状态必须**显式建模**
//! - 所有状态必须**可序列化**
//! - 不允许隐式全局状态：flag / 物品集合只能通过 `GameState` 的方法修改

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::script::{EvalContext, StyleChange};

/// 等待原因
///
/// 整个引擎只有一个挂起点：呈现选择菜单。
///
/// # 状态转换
///
/// ```text
/// None          -> 继续执行，不等待
/// WaitForChoice -> 等待用户选择，收到 ChoiceSelected 输入后继续
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum WaitingReason {
    /// 不等待
    #[default]
    None,

    /// 等待用户选择
    ///
    /// `choice_count` 记录选项数量，用于验证输入合法性
    WaitForChoice { choice_count: usize },
}

impl WaitingReason {
    /// 是否处于等待状态
    pub fn is_waiting(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// 创建等待选择状态
    pub fn choice(count: usize) -> Self {
        Self::WaitForChoice {
            choice_count: count,
        }
    }
}

/// 游戏状态：flag 集合与物品栏
///
/// 两者都是只关心"是否存在"的字符串集合。
/// 条件判断时 `has(name)` 同时查询两个集合。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GameState {
    flags: HashSet<String>,
    inventory: HashSet<String>,
}

impl GameState {
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置 flag（重复设置无影响）
    pub fn set_flag(&mut self, name: impl Into<String>) {
        self.flags.insert(name.into());
    }

    /// 清除 flag（不存在时无操作）
    pub fn unset_flag(&mut self, name: &str) {
        self.flags.remove(name);
    }

    /// 放入物品
    pub fn add_item(&mut self, name: impl Into<String>) {
        self.inventory.insert(name.into());
    }

    /// 移除物品（不存在时无操作）
    pub fn remove_item(&mut self, name: &str) {
        self.inventory.remove(name);
    }

    /// flag 或物品栏中任意一个包含 `name`
    pub fn has(&self, name: &str) -> bool {
        self.flags.contains(name) || self.inventory.contains(name)
    }

    pub fn flags(&self) -> &HashSet<String> {
        &self.flags
    }

    pub fn inventory(&self) -> &HashSet<String> {
        &self.inventory
    }
}

impl EvalContext for GameState {
    fn has(&self, name: &str) -> bool {
        GameState::has(self, name)
    }
}

/// 默认背景色
pub const DEFAULT_BACKGROUND: &str = "#000000";
/// 默认前景色（象牙白）
pub const DEFAULT_FOREGROUND: &str = "#f5f5dc";
/// 默认字体
pub const DEFAULT_FONT: &str = "'Garamond', serif";
/// 默认字号
pub const DEFAULT_FONT_SIZE: i64 = 16;

/// 当前样式
///
/// 由 `background` / `foreground` / `font` / `fontsize` 指令修改，
/// 通过 `Command::ApplyStyle` 交给 Host 应用。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleState {
    pub background: String,
    pub foreground: String,
    pub font: String,
    pub font_size: i64,
}

impl Default for StyleState {
    fn default() -> Self {
        Self {
            background: DEFAULT_BACKGROUND.to_string(),
            foreground: DEFAULT_FOREGROUND.to_string(),
            font: DEFAULT_FONT.to_string(),
            font_size: DEFAULT_FONT_SIZE,
        }
    }
}

impl StyleState {
    /// 应用一条样式修改
    pub fn apply(&mut self, change: &StyleChange) {
        match change {
            StyleChange::Background(color) => self.background = color.clone(),
            StyleChange::Foreground(color) => self.foreground = color.clone(),
            StyleChange::Font(family) => self.font = family.clone(),
            StyleChange::FontSize(size) => self.font_size = *size,
        }
    }
}

/// Runtime 状态
///
/// 这是 Runtime 的**唯一可变状态**（执行栈除外）。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RuntimeState {
    /// flag 与物品
    pub game: GameState,

    /// 当前样式
    pub style: StyleState,

    /// 最近一次进入的场景（可能是不存在的场景 id）
    pub current_scene: Option<String>,

    /// 当前等待状态
    pub waiting: WaitingReason,
}

impl RuntimeState {
    pub fn new() -> Self {
        Self::default()
    }

    /// 进入等待状态
    pub fn wait(&mut self, reason: WaitingReason) {
        self.waiting = reason;
    }

    /// 清除等待状态
    pub fn clear_wait(&mut self) {
        self.waiting = WaitingReason::None;
    }
}
