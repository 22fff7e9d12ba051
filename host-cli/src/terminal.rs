//! # Terminal 模块
//!
//! 基于文本流的 Host：文本写到输出流，选择从输入流读取编号。

use std::io::{self, BufRead, Write};

use scene_runtime::{SceneHost, StyleState};

use crate::config::PlayerConfig;

/// 终端 Host
pub struct TerminalHost<R, W> {
    input: R,
    output: W,
    show_style_changes: bool,
    clear_marker: String,
    choice_prompt: String,
    /// 第一个 IO 错误；出错后不再读写
    error: Option<io::Error>,
}

impl<R: BufRead, W: Write> TerminalHost<R, W> {
    pub fn new(input: R, output: W, config: &PlayerConfig) -> Self {
        Self {
            input,
            output,
            show_style_changes: config.show_style_changes,
            clear_marker: config.clear_marker.clone(),
            choice_prompt: config.choice_prompt.clone(),
            error: None,
        }
    }

    /// 取出播放过程中发生的 IO 错误
    pub fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn emit(&mut self, line: &str) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = writeln!(self.output, "{line}") {
            self.error = Some(e);
        }
    }

    fn prompt(&mut self) -> io::Result<Option<String>> {
        write!(self.output, "{}", self.choice_prompt)?;
        self.output.flush()?;

        let mut answer = String::new();
        if self.input.read_line(&mut answer)? == 0 {
            return Ok(None);
        }
        Ok(Some(answer.trim().to_string()))
    }
}

impl<R: BufRead, W: Write> SceneHost for TerminalHost<R, W> {
    fn render_text(&mut self, text: &str) {
        self.emit(text);
    }

    fn render_image(&mut self, path: &str) {
        self.emit(&format!("[图片] {path}"));
    }

    fn clear_transient_output(&mut self) {
        if !self.clear_marker.is_empty() {
            let marker = self.clear_marker.clone();
            self.emit(&marker);
        }
    }

    fn apply_style(&mut self, style: &StyleState) {
        if self.show_style_changes {
            self.emit(&format!(
                "[样式] 背景 {} / 前景 {} / 字体 {} / 字号 {}",
                style.background, style.foreground, style.font, style.font_size
            ));
        }
    }

    fn present_choices(&mut self, labels: &[String]) -> Option<usize> {
        for (number, label) in labels.iter().enumerate() {
            self.emit(&format!("  {}) {}", number + 1, label));
        }

        while self.error.is_none() {
            let answer = match self.prompt() {
                Ok(Some(answer)) => answer,
                Ok(None) => return None,
                Err(e) => {
                    self.error = Some(e);
                    return None;
                }
            };

            match answer.parse::<usize>() {
                Ok(number) if (1..=labels.len()).contains(&number) => return Some(number - 1),
                _ => self.emit(&format!("请输入 1 到 {} 之间的数字", labels.len())),
            }
        }

        None
    }
}
