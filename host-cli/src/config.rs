//! # Config 模块
//!
//! 播放器配置管理。
//!
//! ## 配置优先级
//!
//! 1. 命令行参数（最高）
//! 2. 配置文件 (config.json)
//! 3. 默认值（最低）

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// 播放器配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// 脚本文件路径
    #[serde(default = "default_script_path")]
    pub script_path: PathBuf,

    /// 入口场景
    #[serde(default = "default_start_scene")]
    pub start_scene: String,

    /// 是否输出样式变化
    #[serde(default)]
    pub show_style_changes: bool,

    /// 清除输出时打印的分隔线（空串表示不打印）
    #[serde(default = "default_clear_marker")]
    pub clear_marker: String,

    /// 选择菜单的输入提示
    #[serde(default = "default_choice_prompt")]
    pub choice_prompt: String,
}

fn default_script_path() -> PathBuf {
    PathBuf::from("scenes.csl")
}

fn default_start_scene() -> String {
    "CH0".to_string()
}

fn default_clear_marker() -> String {
    "────────────────".to_string()
}

fn default_choice_prompt() -> String {
    "> ".to_string()
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            script_path: default_script_path(),
            start_scene: default_start_scene(),
            show_style_changes: false,
            clear_marker: default_clear_marker(),
            choice_prompt: default_choice_prompt(),
        }
    }
}

impl PlayerConfig {
    /// 加载配置文件
    ///
    /// 如果文件不存在或解析失败，返回默认配置并记录警告。
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!(path = %path.display(), "配置文件不存在，使用默认配置");
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(config) => {
                    info!(path = %path.display(), "配置文件加载成功");
                    config
                }
                Err(e) => {
                    warn!(error = %e, "配置文件解析失败，使用默认配置");
                    Self::default()
                }
            },
            Err(e) => {
                warn!(error = %e, "配置文件读取失败，使用默认配置");
                Self::default()
            }
        }
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.script_path.as_os_str().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "必须配置 script_path（脚本路径）".to_string(),
            ));
        }

        if self.start_scene.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "必须配置 start_scene（入口场景）".to_string(),
            ));
        }

        if self.start_scene.split_whitespace().count() > 1 {
            return Err(ConfigError::ValidationFailed(format!(
                "入口场景不能包含空白: '{}'",
                self.start_scene
            )));
        }

        Ok(())
    }
}

/// 配置错误
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// 验证失败
    #[error("配置验证失败: {0}")]
    ValidationFailed(String),
}
