//! # Engine 模块
//!
//! Scene Runtime 核心执行引擎。
//!
//! ## 执行模型
//!
//! ```text
//! start(scene) / tick(input) -> (Vec<Command>, WaitingReason)
//! ```
//!
//! 1. 检查当前等待状态
//! 2. 根据 input 决定是否解除等待
//! 3. 若不再等待，继续执行直到下一个选择菜单或执行完毕
//! 4. 执行中遇到 `go` 时进入目标场景并继续
//! 5. 返回执行过程中产生的 Command 和新的等待状态

use std::sync::Arc;

use tracing::{debug, warn};

use crate::command::Command;
use crate::error::RuntimeError;
use crate::input::RuntimeInput;
use crate::runtime::executor::{Executor, Flow};
use crate::script::Program;
use crate::state::{RuntimeState, WaitingReason};

/// 两次挂起之间允许的最大场景跳转次数
pub const MAX_SCENE_TRANSFERS: usize = 10_000;

/// Scene Runtime 执行引擎
///
/// # 使用示例
///
/// ```ignore
/// let program = parse_program(text)?;
/// let mut runtime = SceneRuntime::new(program);
///
/// let (mut commands, mut waiting) = runtime.start("CH0")?;
/// loop {
///     // Host 执行 commands...
///
///     match waiting {
///         WaitingReason::None => break,
///         WaitingReason::WaitForChoice { .. } => {
///             let index = ask_player();
///             (commands, waiting) = runtime.tick(Some(RuntimeInput::choice(index)))?;
///         }
///     }
/// }
/// ```
#[derive(Debug)]
pub struct SceneRuntime {
    /// 已解析的程序
    program: Program,
    /// 运行时状态
    state: RuntimeState,
    /// 语句执行器
    executor: Executor,
    /// 是否已调用过 `start`
    started: bool,
}

impl SceneRuntime {
    /// 创建新的 Runtime 实例
    pub fn new(program: Program) -> Self {
        Self {
            program,
            state: RuntimeState::new(),
            executor: Executor::new(),
            started: false,
        }
    }

    /// 进入指定场景并执行到第一个阻塞点
    ///
    /// 首先发出当前样式，让 Host 以默认样式初始化。
    /// flag 与物品栏跨调用保留。
    pub fn start(&mut self, scene_id: &str) -> Result<(Vec<Command>, WaitingReason), RuntimeError> {
        self.started = true;
        self.state.clear_wait();

        let mut commands = vec![Command::ApplyStyle {
            style: self.state.style.clone(),
        }];
        self.enter_scene(scene_id, &mut commands);
        self.drive(&mut commands)?;

        Ok((commands, self.state.waiting.clone()))
    }

    /// 核心驱动函数
    ///
    /// 根据输入推进执行，返回产生的 Command 和新的等待状态。
    /// 未处于等待状态时收到的输入被忽略。
    pub fn tick(
        &mut self,
        input: Option<RuntimeInput>,
    ) -> Result<(Vec<Command>, WaitingReason), RuntimeError> {
        if !self.started {
            return Err(RuntimeError::NotStarted);
        }

        let mut commands = Vec::new();

        if let Some(input) = input {
            self.handle_input(input)?;
        }

        if self.state.waiting.is_waiting() {
            return Ok((commands, self.state.waiting.clone()));
        }

        self.drive(&mut commands)?;
        Ok((commands, self.state.waiting.clone()))
    }

    /// 处理输入，解除等待状态
    fn handle_input(&mut self, input: RuntimeInput) -> Result<(), RuntimeError> {
        match (&self.state.waiting, input) {
            (
                WaitingReason::WaitForChoice { choice_count },
                RuntimeInput::ChoiceSelected { index },
            ) => {
                if index >= *choice_count {
                    return Err(RuntimeError::InvalidChoiceIndex {
                        index,
                        max: *choice_count,
                    });
                }
                self.executor.select(index)?;
                self.state.clear_wait();
                Ok(())
            }

            // 不等待时收到输入，忽略
            (WaitingReason::None, _) => Ok(()),
        }
    }

    /// 执行直到挂起或完成，沿途处理场景跳转
    fn drive(&mut self, commands: &mut Vec<Command>) -> Result<(), RuntimeError> {
        let mut transfers = 0;

        loop {
            match self.executor.run(&mut self.state, commands) {
                Flow::Completed => return Ok(()),
                Flow::Suspended { choice_count } => {
                    self.state.wait(WaitingReason::choice(choice_count));
                    return Ok(());
                }
                Flow::Transferred(target) => {
                    transfers += 1;
                    if transfers > MAX_SCENE_TRANSFERS {
                        return Err(RuntimeError::TransferLoop {
                            scene: target,
                            limit: MAX_SCENE_TRANSFERS,
                        });
                    }
                    self.enter_scene(&target, commands);
                }
            }
        }
    }

    /// 场景运行器：清除旧输出，查找场景并开始执行
    ///
    /// 场景不存在时只输出诊断文本，不视为错误。
    fn enter_scene(&mut self, scene_id: &str, commands: &mut Vec<Command>) {
        commands.push(Command::ClearTransient);
        self.state.current_scene = Some(scene_id.to_string());

        match self.program.scene(scene_id) {
            Some(scene) => {
                debug!(scene = scene_id, statements = scene.body.len(), "进入场景");
                self.executor.enter(Arc::clone(&scene.body));
            }
            None => {
                warn!(scene = scene_id, "场景未找到");
                self.executor.reset();
                commands.push(Command::text(format!("场景未找到: {scene_id}")));
            }
        }
    }

    /// 获取当前状态
    pub fn state(&self) -> &RuntimeState {
        &self.state
    }

    /// 获取当前等待状态
    pub fn waiting(&self) -> &WaitingReason {
        &self.state.waiting
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    /// 已启动且没有任何待执行的内容
    pub fn is_finished(&self) -> bool {
        self.started && !self.state.waiting.is_waiting() && self.executor.is_idle()
    }
}
