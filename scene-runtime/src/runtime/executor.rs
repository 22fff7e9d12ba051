//! # Executor 模块
//!
//! 在显式的帧栈上执行语句序列，产生 Command。
//!
//! ## 职责
//!
//! - 逐条执行语句，修改 `RuntimeState`
//! - `go` 时清空整个帧栈，保证之后的兄弟语句不再执行
//! - 遇到 `choice` 时聚合菜单并挂起，收到选择后压入所选分支

use std::sync::Arc;

use tracing::{debug, trace};

use crate::command::{Choice, Command};
use crate::error::RuntimeError;
use crate::script::{Block, EvalContext, Statement, evaluate};
use crate::state::RuntimeState;

/// 一次执行的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    /// 帧栈已执行完毕
    Completed,
    /// 执行了 `go`，帧栈已清空
    Transferred(String),
    /// 已呈现菜单，等待选择
    Suspended { choice_count: usize },
}

/// 执行帧：一个语句序列和其中的下一条位置
#[derive(Debug, Clone)]
pub struct Frame {
    body: Block,
    pc: usize,
}

impl Frame {
    pub fn new(body: impl Into<Block>) -> Self {
        Self {
            body: body.into(),
            pc: 0,
        }
    }
}

/// 帧栈
#[derive(Debug, Default, Clone)]
pub struct CallStack {
    frames: Vec<Frame>,
}

impl CallStack {
    /// 压入帧（空序列不压入）
    pub fn push(&mut self, frame: Frame) {
        if !frame.body.is_empty() {
            self.frames.push(frame);
        }
    }

    pub fn pop(&mut self) -> Option<Frame> {
        self.frames.pop()
    }

    pub fn top_mut(&mut self) -> Option<&mut Frame> {
        self.frames.last_mut()
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// 聚合后的菜单项
#[derive(Debug, Clone, PartialEq)]
pub struct MenuItem {
    pub label: String,
    pub body: Block,
}

impl MenuItem {
    fn from_choice(statement: &Statement) -> Option<Self> {
        match statement {
            Statement::Choice { label, body } => Some(Self {
                label: label.clone(),
                body: Arc::clone(body),
            }),
            _ => None,
        }
    }
}

/// 从 `start` 开始向前扫描，聚合连续的菜单区域
///
/// - `choice` 直接加入菜单
/// - `if` 的条件在扫描时求值；若选中的分支全部由 `choice` 组成，
///   其中的选项拼接进菜单
/// - 选中的分支为空时，仅当另一分支全部由 `choice` 组成（纯菜单条件）才跳过它；
///   普通的 `if` 终止扫描，留到选择之后按当时的状态执行
/// - 其他语句终止扫描，且不被消费
///
/// 返回菜单项和区域之后的位置。
pub fn collect_menu(
    body: &[Statement],
    start: usize,
    ctx: &impl EvalContext,
) -> (Vec<MenuItem>, usize) {
    let mut items = Vec::new();
    let mut pos = start;

    while let Some(statement) = body.get(pos) {
        match statement {
            Statement::Choice { .. } => items.extend(MenuItem::from_choice(statement)),
            Statement::If {
                condition,
                then_body,
                else_body,
            } => {
                let (branch, other) = if evaluate(condition, ctx) {
                    (then_body, else_body)
                } else {
                    (else_body, then_body)
                };
                if Statement::all_choices(branch) {
                    items.extend(branch.iter().filter_map(MenuItem::from_choice));
                } else if !(branch.is_empty() && Statement::all_choices(other)) {
                    break;
                }
            }
            _ => break,
        }
        pos += 1;
    }

    (items, pos)
}

/// 语句执行器
#[derive(Debug, Default)]
pub struct Executor {
    call_stack: CallStack,
    /// 已呈现、尚未选择的菜单
    pending_menu: Option<Vec<MenuItem>>,
}

impl Executor {
    /// 创建新的执行器
    pub fn new() -> Self {
        Self::default()
    }

    /// 丢弃所有执行中的帧和未决菜单
    pub fn reset(&mut self) {
        self.call_stack.clear();
        self.pending_menu = None;
    }

    /// 以一个新的语句序列开始执行
    pub fn enter(&mut self, body: impl Into<Block>) {
        self.reset();
        self.call_stack.push(Frame::new(body));
    }

    /// 没有可执行的帧，也没有未决菜单
    pub fn is_idle(&self) -> bool {
        self.call_stack.is_empty() && self.pending_menu.is_none()
    }

    /// 当前未决菜单
    pub fn pending_menu(&self) -> Option<&[MenuItem]> {
        self.pending_menu.as_deref()
    }

    /// 执行直到完成、跳转或挂起
    pub fn run(&mut self, state: &mut RuntimeState, commands: &mut Vec<Command>) -> Flow {
        if let Some(menu) = &self.pending_menu {
            return Flow::Suspended {
                choice_count: menu.len(),
            };
        }

        loop {
            let depth = self.call_stack.depth();
            let Some(frame) = self.call_stack.top_mut() else {
                return Flow::Completed;
            };
            let body = Arc::clone(&frame.body);
            let pc = frame.pc;
            let Some(statement) = body.get(pc) else {
                self.call_stack.pop();
                continue;
            };
            frame.pc += 1;

            trace!(depth, pc, ?statement, "执行语句");

            match statement {
                Statement::Print { text } => commands.push(Command::text(text.clone())),
                Statement::Image { source } => commands.push(Command::ShowImage {
                    path: source.clone(),
                }),
                Statement::SetFlag { id } => state.game.set_flag(id.clone()),
                Statement::UnsetFlag { id } => state.game.unset_flag(id),
                Statement::AddItem { id } => state.game.add_item(id.clone()),
                Statement::RemoveItem { id } => state.game.remove_item(id),
                Statement::StyleChange(change) => {
                    state.style.apply(change);
                    commands.push(Command::ApplyStyle {
                        style: state.style.clone(),
                    });
                }
                Statement::If {
                    condition,
                    then_body,
                    else_body,
                } => {
                    let branch = if evaluate(condition, &state.game) {
                        then_body
                    } else {
                        else_body
                    };
                    self.call_stack.push(Frame::new(Arc::clone(branch)));
                }
                Statement::Goto { target, .. } => {
                    self.reset();
                    return Flow::Transferred(target.clone());
                }
                Statement::Choice { .. } => {
                    let (items, end) = collect_menu(&body, pc, &state.game);
                    if let Some(frame) = self.call_stack.top_mut() {
                        frame.pc = end;
                    }

                    debug!(choice_count = items.len(), "呈现选择菜单");
                    commands.push(Command::PresentChoices {
                        choices: items
                            .iter()
                            .map(|item| Choice {
                                text: item.label.clone(),
                            })
                            .collect(),
                    });

                    let choice_count = items.len();
                    self.pending_menu = Some(items);
                    return Flow::Suspended { choice_count };
                }
            }
        }
    }

    /// 选择未决菜单中的一项，压入其分支
    ///
    /// 之后调用 `run` 会先执行所选分支，再从菜单区域之后继续。
    pub fn select(&mut self, index: usize) -> Result<(), RuntimeError> {
        let Some(menu) = &self.pending_menu else {
            return Err(RuntimeError::StateMismatch {
                expected: "未决的选择菜单".to_string(),
                actual: format!("选择 {index}"),
            });
        };
        let Some(item) = menu.get(index) else {
            return Err(RuntimeError::InvalidChoiceIndex {
                index,
                max: menu.len(),
            });
        };

        debug!(index, label = %item.label, "选择菜单项");
        let frame = Frame::new(Arc::clone(&item.body));
        self.call_stack.push(frame);
        self.pending_menu = None;
        Ok(())
    }
}
