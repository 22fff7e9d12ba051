//! # Driver 模块
//!
//! 把 `SceneRuntime` 的命令流分发给一个同步的 Host 实现。
//!
//! 适合终端播放器和测试：Host 在 `present_choices` 中阻塞地取得选择，
//! 驱动循环再把选择交回 Runtime。

use tracing::debug;

use crate::command::Command;
use crate::error::RuntimeError;
use crate::input::RuntimeInput;
use crate::runtime::engine::SceneRuntime;
use crate::state::{StyleState, WaitingReason};

/// 同步 Host 的能力集合
pub trait SceneHost {
    /// 输出一行（已本地化的）文本
    fn render_text(&mut self, text: &str);

    /// 显示图片
    fn render_image(&mut self, path: &str);

    /// 清除上一场景留下的文本与图片
    fn clear_transient_output(&mut self);

    /// 应用样式
    fn apply_style(&mut self, style: &StyleState);

    /// 呈现菜单并返回所选下标（从 0 开始）
    ///
    /// 返回 `None` 表示玩家放弃，播放随之结束。
    fn present_choices(&mut self, labels: &[String]) -> Option<usize>;

    /// 本地化：把文本或本地化键解析为显示文本
    fn resolve(&self, key: &str) -> String {
        key.to_string()
    }
}

/// 播放结束的方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    /// 执行完毕
    Finished,
    /// 玩家在菜单处放弃
    Abandoned,
}

/// 从 `scene_id` 开始播放，直到执行完毕或玩家放弃
pub fn play<H: SceneHost>(
    runtime: &mut SceneRuntime,
    scene_id: &str,
    host: &mut H,
) -> Result<PlayOutcome, RuntimeError> {
    let (mut commands, mut waiting) = runtime.start(scene_id)?;

    loop {
        let selection = dispatch(commands, host);

        match waiting {
            WaitingReason::None => return Ok(PlayOutcome::Finished),
            WaitingReason::WaitForChoice { .. } => {
                let Some(index) = selection else {
                    debug!("玩家放弃选择，结束播放");
                    return Ok(PlayOutcome::Abandoned);
                };
                (commands, waiting) = runtime.tick(Some(RuntimeInput::choice(index)))?;
            }
        }
    }
}

/// 依次执行命令，返回菜单的选择结果
fn dispatch<H: SceneHost>(commands: Vec<Command>, host: &mut H) -> Option<usize> {
    let mut selection = None;

    for command in commands {
        match command {
            Command::ShowText { content } => {
                let text = host.resolve(&content);
                host.render_text(&text);
            }
            Command::ShowImage { path } => host.render_image(&path),
            Command::ClearTransient => host.clear_transient_output(),
            Command::ApplyStyle { style } => host.apply_style(&style),
            Command::PresentChoices { choices } => {
                let labels: Vec<String> = choices
                    .iter()
                    .map(|choice| host.resolve(&choice.text))
                    .collect();
                selection = host.present_choices(&labels);
            }
        }
    }

    selection
}
