//! # 诊断模块
//!
//! 提供脚本静态检查和诊断 API，不依赖 IO 或引擎。
//!
//! ## 设计原则
//!
//! - 纯函数 API，可在无 IO 环境下运行
//! - 诊断分级：Error（必须修复）、Warn（建议修复）、Info（信息提示）
//! - 复用 parser/AST，不重复解析逻辑

use std::collections::HashSet;

use crate::script::{Program, Statement};

/// 诊断级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticLevel {
    /// 信息提示
    Info,
    /// 警告（建议修复）
    Warn,
    /// 错误（必须修复）
    Error,
}

impl std::fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warn => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// 诊断条目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// 诊断级别
    pub level: DiagnosticLevel,
    /// 所在场景
    pub scene: String,
    /// 场景声明所在行（如果可定位）
    pub line: Option<usize>,
    /// 诊断消息
    pub message: String,
    /// 诊断详情（可选）
    pub detail: Option<String>,
}

impl Diagnostic {
    fn new(level: DiagnosticLevel, scene: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            scene: scene.into(),
            line: None,
            message: message.into(),
            detail: None,
        }
    }

    /// 创建错误诊断
    pub fn error(scene: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(DiagnosticLevel::Error, scene, message)
    }

    /// 创建警告诊断
    pub fn warn(scene: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(DiagnosticLevel::Warn, scene, message)
    }

    /// 创建信息诊断
    pub fn info(scene: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(DiagnosticLevel::Info, scene, message)
    }

    /// 设置行号（0 表示未知，忽略）
    pub fn with_line(mut self, line: usize) -> Self {
        self.line = (line > 0).then_some(line);
        self
    }

    /// 设置详情
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] scene {}", self.level, self.scene)?;
        if let Some(line) = self.line {
            write!(f, " (第 {} 行)", line)?;
        }
        write!(f, ": {}", self.message)?;
        if let Some(detail) = &self.detail {
            write!(f, "\n  | {}", detail)?;
        }
        Ok(())
    }
}

/// 诊断结果
#[derive(Debug, Clone, Default)]
pub struct DiagnosticResult {
    /// 诊断条目列表
    pub diagnostics: Vec<Diagnostic>,
}

impl DiagnosticResult {
    /// 创建空结果
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加诊断
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// 合并另一个结果
    pub fn merge(&mut self, other: DiagnosticResult) {
        self.diagnostics.extend(other.diagnostics);
    }

    /// 获取错误数量
    pub fn error_count(&self) -> usize {
        self.count(DiagnosticLevel::Error)
    }

    /// 获取警告数量
    pub fn warn_count(&self) -> usize {
        self.count(DiagnosticLevel::Warn)
    }

    fn count(&self, level: DiagnosticLevel) -> usize {
        self.diagnostics.iter().filter(|d| d.level == level).count()
    }

    /// 是否有错误
    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// 按级别过滤
    pub fn filter_by_level(&self, min_level: DiagnosticLevel) -> Vec<&Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.level >= min_level)
            .collect()
    }
}

/// 图片引用
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    /// 引用所在场景
    pub scene: String,
    /// 脚本中的原始路径
    pub path: String,
}

//=============================================================================
// 脚本分析 API
//=============================================================================

/// 分析程序，返回诊断结果
///
/// 执行以下检查：
/// - 入口场景或 `go` 目标不存在（Error）
/// - 同一语句序列中 `go` 之后的语句永远不会执行（Warn）
/// - 除入口外从未被 `go` 引用的场景（Info）
pub fn analyze_program(program: &Program, entry_scene: &str) -> DiagnosticResult {
    let mut result = DiagnosticResult::new();

    if !program.contains(entry_scene) {
        result.push(
            Diagnostic::error(entry_scene, format!("入口场景 '{}' 不存在", entry_scene))
                .with_detail(format!("已定义的场景: {}", program.scene_ids().join(", "))),
        );
    }

    for scene in program.scenes() {
        let mut targets = Vec::new();
        walk_block(&scene.body, &mut |statement, rest| {
            if let Statement::Goto { target, line } = statement {
                targets.push((target.as_str(), *line));
                if !rest.is_empty() {
                    result.push(
                        Diagnostic::warn(&scene.id, format!("'go {}' 之后的语句不可达", target))
                            .with_line(*line)
                            .with_detail(format!("{} 条语句永远不会执行", rest.len())),
                    );
                }
            }
        });

        for (target, line) in targets {
            if !program.contains(target) {
                result.push(
                    Diagnostic::error(&scene.id, format!("未定义的跳转目标: {}", target))
                        .with_line(line)
                        .with_detail(format!("go 引用了不存在的场景 '{}'", target)),
                );
            }
        }
    }

    let referenced = get_jump_targets(program);
    for scene in program.scenes() {
        if scene.id != entry_scene && !referenced.contains(&scene.id) {
            result.push(
                Diagnostic::info(&scene.id, "场景从未被 go 引用").with_line(scene.line),
            );
        }
    }

    result
}

/// 获取程序中所有 `go` 目标（去重）
pub fn get_jump_targets(program: &Program) -> HashSet<String> {
    let mut targets = HashSet::new();
    for scene in program.scenes() {
        walk_block(&scene.body, &mut |statement, _| {
            if let Statement::Goto { target, .. } = statement {
                targets.insert(target.clone());
            }
        });
    }
    targets
}

/// 提取程序中的所有图片引用（按出现顺序）
pub fn extract_image_references(program: &Program) -> Vec<ImageReference> {
    let mut refs = Vec::new();
    for scene in program.scenes() {
        walk_block(&scene.body, &mut |statement, _| {
            if let Statement::Image { source } = statement {
                refs.push(ImageReference {
                    scene: scene.id.clone(),
                    path: source.clone(),
                });
            }
        });
    }
    refs
}

/// 深度优先遍历语句，回调参数为语句本身和同一序列中其后的语句
fn walk_block<'a, F>(block: &'a [Statement], visit: &mut F)
where
    F: FnMut(&'a Statement, &'a [Statement]),
{
    for (index, statement) in block.iter().enumerate() {
        visit(statement, &block[index + 1..]);
        match statement {
            Statement::Choice { body, .. } => walk_block(body, visit),
            Statement::If {
                then_body,
                else_body,
                ..
            } => {
                walk_block(then_body, visit);
                walk_block(else_body, visit);
            }
            _ => {}
        }
    }
}
