//! Scene Player - 终端前端
//!
//! 读取场景脚本，在终端中播放：文本写到 stdout，选择从 stdin 读取。
//! 日志写到 stderr。

mod config;
mod terminal;

use std::fs;
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser};
use scene_runtime::{
    DiagnosticLevel, Parser as ScriptParser, PlayOutcome, SceneRuntime, analyze_program, play,
};
use tracing::{info, warn};

use config::PlayerConfig;
use terminal::TerminalHost;

#[derive(Parser, Debug)]
#[command(name = "scene-player", version, about = "在终端中播放场景脚本")]
struct Cli {
    /// 脚本文件路径（覆盖配置文件中的 script_path）
    script: Option<PathBuf>,

    /// 入口场景（覆盖配置文件中的 start_scene）
    #[arg(short, long)]
    start: Option<String>,

    /// 配置文件路径
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// 只做静态检查，不播放
    #[arg(long)]
    check: bool,

    /// 日志详细程度（-v info，-vv debug，-vvv trace）
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = PlayerConfig::load(&cli.config);
    if let Some(script) = cli.script {
        config.script_path = script;
    }
    if let Some(start) = cli.start {
        config.start_scene = start;
    }
    config.validate()?;

    let text = fs::read_to_string(&config.script_path)
        .with_context(|| format!("无法读取脚本: {}", config.script_path.display()))?;

    let mut parser = ScriptParser::new();
    let program = parser
        .parse(&text)
        .with_context(|| format!("脚本解析失败: {}", config.script_path.display()))?;
    for warning in parser.warnings() {
        warn!("{warning}");
    }
    info!(scenes = program.len(), "脚本加载成功");

    if cli.check {
        return check(&program, &config);
    }

    let mut runtime = SceneRuntime::new(program);
    let mut host = TerminalHost::new(io::stdin().lock(), io::stdout().lock(), &config);

    let outcome = play(&mut runtime, &config.start_scene, &mut host)?;
    if let Some(e) = host.take_error() {
        return Err(e).context("终端读写失败");
    }

    match outcome {
        PlayOutcome::Finished => info!("播放结束"),
        PlayOutcome::Abandoned => info!("玩家退出"),
    }
    Ok(())
}

/// 打印诊断；存在错误时以非零状态退出
fn check(program: &scene_runtime::Program, config: &PlayerConfig) -> Result<()> {
    let result = analyze_program(program, &config.start_scene);
    for diagnostic in result.filter_by_level(DiagnosticLevel::Info) {
        println!("{diagnostic}");
    }

    if result.has_errors() {
        bail!("检查发现 {} 个错误", result.error_count());
    }
    println!(
        "检查通过：{} 个场景，{} 个警告",
        program.len(),
        result.warn_count()
    );
    Ok(())
}
