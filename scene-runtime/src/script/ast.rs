//! # AST 模块
//!
//! 定义脚本的抽象语法树（Abstract Syntax Tree）。
//!
//! ## 设计说明
//!
//! AST 是解析器的输出：场景 id → 语句序列。
//! `Program` 构建后不再修改，执行引擎只读取它。

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use super::expr::BoolExpr;

/// 语句块
///
/// 执行帧与菜单项共享同一份语句，进入场景或分支时不复制。
pub type Block = Arc<[Statement]>;

/// 样式修改
///
/// 每种属性携带自己类型的值，`fontsize` 在解析期就必须是整数。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StyleChange {
    /// 背景色，如 `#202020` 或 `navy`
    Background(String),
    /// 前景（文字）色
    Foreground(String),
    /// 字体
    Font(String),
    /// 字号
    FontSize(i64),
}

impl StyleChange {
    /// 对应的脚本关键字
    pub fn property(&self) -> &'static str {
        match self {
            Self::Background(_) => "background",
            Self::Foreground(_) => "foreground",
            Self::Font(_) => "font",
            Self::FontSize(_) => "fontsize",
        }
    }
}

/// 脚本语句
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    /// `print "text"`
    Print { text: String },

    /// `image "path"`
    Image { source: String },

    /// `set id`
    SetFlag { id: String },

    /// `unset id`
    UnsetFlag { id: String },

    /// `add id`
    AddItem { id: String },

    /// `remove id`
    RemoveItem { id: String },

    /// `background` / `foreground` / `font` / `fontsize`
    StyleChange(StyleChange),

    /// `go scene_id`
    ///
    /// 目标场景不要求在解析期存在。`line` 为语句所在行号，供诊断使用。
    Goto { target: String, line: usize },

    /// `choice "label"` ... `end`
    Choice { label: String, body: Block },

    /// `if cond then` ... [`else` ...] `end`
    If {
        condition: BoolExpr,
        then_body: Block,
        else_body: Block,
    },
}

impl Statement {
    /// 是否为 `choice` 语句
    pub fn is_choice(&self) -> bool {
        matches!(self, Self::Choice { .. })
    }

    /// 非空且全部由 `choice` 组成
    pub fn all_choices(block: &[Statement]) -> bool {
        !block.is_empty() && block.iter().all(Self::is_choice)
    }
}

/// 场景
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// 场景标识符（大小写敏感）
    pub id: String,
    /// `scene` 声明所在行号
    pub line: usize,
    /// 语句序列
    pub body: Block,
}

impl Scene {
    pub fn new(id: impl Into<String>, body: impl Into<Block>) -> Self {
        Self {
            id: id.into(),
            line: 0,
            body: body.into(),
        }
    }
}

/// 解析后的脚本程序
///
/// 场景按声明顺序保存，另有 id → 下标索引用于精确查找。
/// 索引不参与序列化，反序列化时由场景列表重建。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "ProgramData")]
pub struct Program {
    scenes: Vec<Scene>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

/// `Program` 的反序列化形式
#[derive(Deserialize)]
struct ProgramData {
    scenes: Vec<Scene>,
}

impl From<ProgramData> for Program {
    fn from(data: ProgramData) -> Self {
        Self::new(data.scenes)
    }
}

impl Program {
    /// 由场景列表创建程序
    ///
    /// 同名场景以后出现者为准。
    pub fn new(scenes: Vec<Scene>) -> Self {
        let mut program = Self::default();
        for scene in scenes {
            program.insert(scene);
        }
        program
    }

    /// 插入场景；如已存在同名场景则替换并返回 `true`
    pub fn insert(&mut self, scene: Scene) -> bool {
        match self.index.get(&scene.id) {
            Some(&pos) => {
                self.scenes[pos] = scene;
                true
            }
            None => {
                self.index.insert(scene.id.clone(), self.scenes.len());
                self.scenes.push(scene);
                false
            }
        }
    }

    /// 按 id 精确查找场景
    pub fn scene(&self, id: &str) -> Option<&Scene> {
        self.index.get(id).map(|&pos| &self.scenes[pos])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// 按声明顺序遍历场景
    pub fn scenes(&self) -> &[Scene] {
        &self.scenes
    }

    /// 按声明顺序返回所有场景 id
    pub fn scene_ids(&self) -> Vec<&str> {
        self.scenes.iter().map(|s| s.id.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn print(text: &str) -> Statement {
        Statement::Print {
            text: text.to_string(),
        }
    }

    #[test]
    fn test_program_lookup_is_exact() {
        let program = Program::new(vec![
            Scene::new("CH0", vec![print("a")]),
            Scene::new("ch1", vec![]),
        ]);

        assert_eq!(program.len(), 2);
        assert!(program.contains("CH0"));
        assert!(!program.contains("ch0"));
        assert!(program.scene("CH1").is_none());
        assert_eq!(program.scene("CH0").unwrap().body.len(), 1);
        assert_eq!(program.scene_ids(), vec!["CH0", "ch1"]);
    }

    #[test]
    fn test_program_duplicate_scene_replaced() {
        let mut program = Program::new(vec![Scene::new("A", vec![print("old")])]);
        let replaced = program.insert(Scene::new("A", vec![print("new")]));

        assert!(replaced);
        assert_eq!(program.len(), 1);
        assert_eq!(&*program.scene("A").unwrap().body, &[print("new")]);
    }

    #[test]
    fn test_program_serialization_rebuilds_index() {
        let program = Program::new(vec![
            Scene::new("A", vec![print("x")]),
            Scene::new("B", vec![]),
        ]);
        let json = serde_json::to_string(&program).unwrap();
        let restored: Program = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, program);
        assert_eq!(&*restored.scene("A").unwrap().body, &[print("x")]);
        assert!(restored.contains("B"));
        assert_eq!(restored.scene_ids(), vec!["A", "B"]);
    }

    #[test]
    fn test_all_choices() {
        let choice = Statement::Choice {
            label: "a".to_string(),
            body: Block::from(vec![]),
        };

        assert!(Statement::all_choices(&[choice.clone(), choice.clone()]));
        assert!(!Statement::all_choices(&[choice, print("x")]));
        assert!(!Statement::all_choices(&[]));
    }

    #[test]
    fn test_style_change_property() {
        assert_eq!(StyleChange::FontSize(12).property(), "fontsize");
        assert_eq!(
            StyleChange::Background("red".to_string()).property(),
            "background"
        );
    }
}
