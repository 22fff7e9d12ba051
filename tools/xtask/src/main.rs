//! # xtask - 开发辅助工具
//!
//! 提供本地质量门禁与开发辅助命令。
//!
//! ## 命令
//!
//! - `check-all`: 运行 fmt、clippy、test
//! - `cov-runtime`: 运行 scene-runtime 覆盖率
//! - `cov-workspace`: 运行 workspace 覆盖率
//! - `script-check`: 检查场景脚本（语法、跳转目标、图片引用）

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use scene_runtime::{
    DiagnosticLevel, Parser as ScriptParser, analyze_program, extract_image_references,
};
use walkdir::WalkDir;
use xshell::{Shell, cmd};

/// 场景脚本扩展名
const SCRIPT_EXTENSION: &str = "csl";

#[derive(Parser, Debug)]
#[command(name = "xtask", about = "开发辅助工具")]
struct Cli {
    #[command(subcommand)]
    command: Task,
}

#[derive(Subcommand, Debug)]
enum Task {
    /// 运行 fmt、clippy、test 门禁检查
    CheckAll,
    /// 运行 scene-runtime 覆盖率报告
    CovRuntime,
    /// 运行 workspace 覆盖率报告
    CovWorkspace,
    /// 检查场景脚本
    ///
    /// 不带路径时检查 scripts/ 下所有 .csl 文件。
    ScriptCheck {
        /// 脚本文件或目录
        path: Option<PathBuf>,
        /// 入口场景（不参与"未被引用"提示）
        #[arg(long, default_value = "CH0")]
        entry: String,
    },
}

fn main() -> ExitCode {
    if let Err(e) = real_main() {
        eprintln!("xtask error: {e:#}");
        return ExitCode::from(1);
    }
    ExitCode::from(0)
}

fn real_main() -> Result<()> {
    let cli = Cli::parse();
    let sh = Shell::new()?;

    match cli.command {
        Task::CheckAll => {
            step("cargo fmt --all -- --check");
            cmd!(sh, "cargo fmt --all -- --check").run()?;

            step("cargo clippy --workspace --all-targets");
            cmd!(sh, "cargo clippy --workspace --all-targets").run()?;

            step("cargo test --workspace");
            cmd!(sh, "cargo test --workspace").run()?;
        }
        Task::CovRuntime => {
            ensure_cargo_llvm_cov_available(&sh)?;

            step("cargo llvm-cov -p scene-runtime --html");
            cmd!(sh, "cargo llvm-cov -p scene-runtime --all-features --html").run()?;

            eprintln!("\nCoverage HTML: target/llvm-cov/html/index.html");
        }
        Task::CovWorkspace => {
            ensure_cargo_llvm_cov_available(&sh)?;

            // 排除 xtask，避免工具代码稀释覆盖率信号
            step("cargo llvm-cov --workspace --exclude xtask --html");
            cmd!(
                sh,
                "cargo llvm-cov --workspace --exclude xtask --all-features --html"
            )
            .run()?;

            eprintln!("\nCoverage HTML: target/llvm-cov/html/index.html");
        }
        Task::ScriptCheck { path, entry } => script_check(path, &entry)?,
    }

    Ok(())
}

fn step(name: &str) {
    eprintln!("\n==> {name}");
}

fn ensure_cargo_llvm_cov_available(sh: &Shell) -> Result<()> {
    if cmd!(sh, "cargo llvm-cov --version").quiet().run().is_err() {
        bail!(
            "cargo llvm-cov 不可用。\n\
请先安装：\n\
  - cargo install cargo-llvm-cov\n\
  - rustup component add llvm-tools-preview\n\
然后重试。"
        );
    }
    Ok(())
}

//=============================================================================
// script-check 命令实现
//=============================================================================

/// 缺失的图片
struct MissingImage {
    file: String,
    scene: String,
    path: String,
}

/// 脚本检查结果
#[derive(Default)]
struct ScriptCheckResult {
    /// 检查的脚本数量
    scripts_checked: usize,
    /// 解析失败的脚本数量
    parse_errors: usize,
    /// 诊断错误数量
    diagnostic_errors: usize,
    /// 诊断警告数量
    diagnostic_warnings: usize,
    /// 缺失的图片文件
    missing_images: Vec<MissingImage>,
}

/// 执行脚本检查
fn script_check(path: Option<PathBuf>, entry: &str) -> Result<()> {
    let root = path.unwrap_or_else(|| PathBuf::from("scripts"));

    let files = if root.is_file() {
        vec![root]
    } else if root.is_dir() {
        collect_script_files(&root)?
    } else {
        bail!(
            "路径不存在: {}\n请在 workspace 根目录运行，或指定脚本路径",
            root.display()
        );
    };

    if files.is_empty() {
        eprintln!("未找到脚本文件（.{SCRIPT_EXTENSION}）");
        return Ok(());
    }

    eprintln!("==> 检查 {} 个脚本文件...\n", files.len());

    let mut result = ScriptCheckResult::default();
    for file in &files {
        check_script_file(file, entry, &mut result);
    }

    print_summary(&result);

    if result.parse_errors > 0 || result.diagnostic_errors > 0 {
        bail!("脚本检查发现错误");
    }
    Ok(())
}

/// 收集目录下的所有脚本文件（排序后返回）
fn collect_script_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.with_context(|| format!("遍历目录失败: {}", dir.display()))?;
        let path = entry.path();
        if entry.file_type().is_file()
            && path.extension().is_some_and(|ext| ext == SCRIPT_EXTENSION)
        {
            files.push(path.to_path_buf());
        }
    }
    Ok(files)
}

/// 检查单个脚本文件
fn check_script_file(file: &Path, entry: &str, result: &mut ScriptCheckResult) {
    let file_id = file.display().to_string();
    result.scripts_checked += 1;

    let content = match std::fs::read_to_string(file) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("[ERROR] {}: 无法读取文件 - {}", file_id, e);
            result.parse_errors += 1;
            return;
        }
    };

    let mut parser = ScriptParser::new();
    let program = match parser.parse(&content) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("[ERROR] {}: {}", file_id, e);
            result.parse_errors += 1;
            return;
        }
    };

    for warning in parser.warnings() {
        eprintln!("[WARN] {}: {}", file_id, warning);
    }

    let diagnostics = analyze_program(&program, entry);
    for diag in diagnostics.filter_by_level(DiagnosticLevel::Info) {
        eprintln!("{}: {}", file_id, diag);
    }
    result.diagnostic_errors += diagnostics.error_count();
    result.diagnostic_warnings += diagnostics.warn_count() + parser.warnings().len();

    // 图片路径相对于脚本所在目录
    let base = file.parent().unwrap_or_else(|| Path::new(""));
    for image in extract_image_references(&program) {
        if !base.join(&image.path).exists() {
            result.missing_images.push(MissingImage {
                file: file_id.clone(),
                scene: image.scene,
                path: image.path,
            });
        }
    }
}

/// 输出检查结果
fn print_summary(result: &ScriptCheckResult) {
    eprintln!("─────────────────────────────────────────────────────");
    eprintln!("检查完成: {} 个脚本", result.scripts_checked);
    eprintln!();

    for missing in &result.missing_images {
        eprintln!(
            "[WARN] {}: scene {} 引用的图片不存在: {}",
            missing.file, missing.scene, missing.path
        );
    }

    let error_count = result.parse_errors + result.diagnostic_errors;
    let warn_count = result.diagnostic_warnings + result.missing_images.len();

    eprintln!();
    if error_count > 0 {
        eprintln!("❌ {} 个错误, {} 个警告", error_count, warn_count);
    } else if warn_count > 0 {
        eprintln!("⚠️  0 个错误, {} 个警告", warn_count);
    } else {
        eprintln!("✅ 检查通过，无错误");
    }
}
