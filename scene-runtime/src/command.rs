//! # Command 模块
//!
//! 定义 Runtime 向 Host 发出的所有指令。
//! Command 是 Runtime 与 Host 之间的**唯一通信方式**。
//!
//! ## 设计原则
//!
//! - **声明式**：Command 描述"做什么"，不描述"怎么做"
//! - **无副作用**：Command 本身不执行任何操作
//! - **表现无关**：文本/图片如何绘制、本地化键如何查表都由 Host 决定

use serde::{Deserialize, Serialize};

use crate::state::StyleState;

/// 选择项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    /// 选项显示文本（字面量或本地化键）
    pub text: String,
}

/// Runtime 向 Host 发出的指令
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// 输出一行文本
    ShowText {
        /// 文本内容（字面量或本地化键）
        content: String,
    },

    /// 显示图片
    ShowImage {
        /// 资源路径（不做解释）
        path: String,
    },

    /// 清除上一场景留下的文本与图片
    ClearTransient,

    /// 应用样式
    ApplyStyle {
        /// 修改后的完整样式
        style: StyleState,
    },

    /// 呈现选择菜单
    ///
    /// 菜单可能由多个 `choice` 语句（包括条件分支内的）合并而成。
    PresentChoices {
        /// 选项列表
        choices: Vec<Choice>,
    },
}

impl Command {
    /// 创建文本指令
    pub fn text(content: impl Into<String>) -> Self {
        Self::ShowText {
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_serialization() {
        let cmd = Command::PresentChoices {
            choices: vec![
                Choice {
                    text: "开门".to_string(),
                },
                Choice {
                    text: "离开".to_string(),
                },
            ],
        };
        let json = serde_json::to_string(&cmd).unwrap();
        let deserialized: Command = serde_json::from_str(&json).unwrap();
        assert_eq!(cmd, deserialized);
    }

    #[test]
    fn test_text_helper() {
        assert_eq!(
            Command::text("hello"),
            Command::ShowText {
                content: "hello".to_string()
            }
        );
    }
}
