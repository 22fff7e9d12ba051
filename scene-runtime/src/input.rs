//! # Input 模块
//!
//! 定义 Host 向 Runtime 传递的输入事件。
//!
//! ## 设计说明
//!
//! - `RuntimeInput` 是 Host 采集用户操作后，传递给 Runtime 的抽象输入
//! - Runtime 不直接处理鼠标/键盘事件，只处理语义化的输入

use serde::{Deserialize, Serialize};

/// Host 向 Runtime 传递的输入
///
/// Runtime 通过 `tick(input)` 接收这些输入，并根据当前等待状态决定如何处理。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuntimeInput {
    /// 用户选择了某个选项（解除 `WaitForChoice`）
    ///
    /// `index` 是选项在合并后菜单中的索引（从 0 开始）
    ChoiceSelected { index: usize },
}

impl RuntimeInput {
    /// 创建选择输入
    pub fn choice(index: usize) -> Self {
        Self::ChoiceSelected { index }
    }
}
