//! mm-cli: replay a key script through an editor session and print the
//! resulting frame as JSON.
//!
//! Each KEY is a `KeyboardEvent.key` name (`Insert`, `Enter`, `ArrowDown`,
//! `F2`), optionally prefixed with modifiers (`ctrl+s`, `ctrl+shift+Tab`),
//! or `type:TEXT`, which replaces the text in the open label editor.
//!
//! Set `RUST_LOG=debug` to see what the session does.

mod host;

use host::HeadlessHost;
use mm_core::layout::LayoutConfig;
use mm_core::viewport::Viewport;
use mm_editor::session::{EditorError, Session, UNTITLED};
use mm_editor::shortcuts::KeyInput;
use mm_render::compositor::{FrameOutcome, FrameSpec, IncrementalRenderer};
use mm_render::plan::{RenderPlan, build_render_plan};
use mm_render::surface::{DrawOp, RecordingSurface};
use mm_render::theme::ThemeColors;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::{env, fs, process};
use thiserror::Error;

const USAGE: &str = "usage: mm-cli [--config FILE] [--dark] [--width W --height H] [--dpr R] [--ops] KEY...";

#[derive(Debug, Error)]
enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error("cannot read config {}: {source}", .path.display())]
    ReadConfig {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {}: {source}", .path.display())]
    ParseConfig {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error(transparent)]
    Editor(#[from] EditorError),
    #[error("cannot encode output: {0}")]
    Output(#[from] serde_json::Error),
}

// ─── Arguments ───────────────────────────────────────────────────────────

#[derive(Debug, Default, PartialEq)]
struct Args {
    config: Option<PathBuf>,
    dark: bool,
    width: Option<f32>,
    height: Option<f32>,
    dpr: Option<f32>,
    ops: bool,
    keys: Vec<String>,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Args, CliError> {
    let mut out = Args::default();
    let mut it = args.into_iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--config" => out.config = Some(PathBuf::from(value(&mut it, "--config")?)),
            "--dark" => out.dark = true,
            "--ops" => out.ops = true,
            "--width" => out.width = Some(number(&mut it, "--width")?),
            "--height" => out.height = Some(number(&mut it, "--height")?),
            "--dpr" => out.dpr = Some(number(&mut it, "--dpr")?),
            "-h" | "--help" => return Err(CliError::Usage(USAGE.to_string())),
            "--" => {
                out.keys.extend(it.by_ref());
                break;
            }
            flag if flag.starts_with("--") => {
                return Err(CliError::Usage(format!("unknown option {flag}\n{USAGE}")));
            }
            key => out.keys.push(key.to_string()),
        }
    }
    Ok(out)
}

fn value(it: &mut impl Iterator<Item = String>, flag: &str) -> Result<String, CliError> {
    it.next()
        .ok_or_else(|| CliError::Usage(format!("{flag} needs a value\n{USAGE}")))
}

fn number(it: &mut impl Iterator<Item = String>, flag: &str) -> Result<f32, CliError> {
    let raw = value(it, flag)?;
    raw.parse()
        .map_err(|_| CliError::Usage(format!("{flag}: `{raw}` is not a number")))
}

// ─── Key script ──────────────────────────────────────────────────────────

#[derive(Debug, PartialEq)]
enum Step {
    Key(KeyInput),
    Type(String),
}

/// `type:TEXT`, or a key name with optional `ctrl+`, `shift+`, `alt+`,
/// `meta+`/`cmd+` prefixes.
fn parse_step(raw: &str) -> Step {
    if let Some(text) = raw.strip_prefix("type:") {
        return Step::Type(text.to_string());
    }
    let mut input = KeyInput::default();
    let mut rest = raw;
    while let Some((modifier, tail)) = rest.split_once('+')
        && !tail.is_empty()
    {
        match modifier.to_ascii_lowercase().as_str() {
            "ctrl" => input.ctrl = true,
            "shift" => input.shift = true,
            "alt" => input.alt = true,
            "meta" | "cmd" => input.meta = true,
            _ => break,
        }
        rest = tail;
    }
    input.key = rest.to_string();
    Step::Key(input)
}

// ─── Config ──────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    layout: LayoutConfig,
    theme: ThemeColors,
    viewport: Viewport,
    dpr: Option<f32>,
}

fn load_config(path: &Path) -> Result<FileConfig, CliError> {
    let text = fs::read_to_string(path).map_err(|source| CliError::ReadConfig {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CliError::ParseConfig {
        path: path.to_path_buf(),
        source,
    })
}

// ─── Run ─────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct Report<'a> {
    title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    editing: Option<&'a str>,
    outcome: FrameOutcome,
    plan: RenderPlan,
    #[serde(skip_serializing_if = "Option::is_none")]
    ops: Option<&'a [DrawOp]>,
}

fn run(args: Args) -> Result<String, CliError> {
    let file = match &args.config {
        Some(path) => load_config(path)?,
        None => FileConfig::default(),
    };
    let theme = if args.dark { ThemeColors::dark() } else { file.theme };
    let viewport = Viewport::new(
        args.width.unwrap_or(file.viewport.width),
        args.height.unwrap_or(file.viewport.height),
    );
    let dpr = args.dpr.or(file.dpr).unwrap_or(1.0);

    let mut session = Session::new(HeadlessHost::default(), file.layout, viewport);
    session.new_tab(UNTITLED)?;
    for raw in &args.keys {
        match parse_step(raw) {
            Step::Type(text) => session.type_text(&text),
            Step::Key(input) => {
                session.handle_key(&input)?;
            }
        }
    }

    let command = session.render_command().ok_or(EditorError::NoActiveTab)?;
    let mut renderer = IncrementalRenderer::new(RecordingSurface::new());
    let mut target = RecordingSurface::new();
    let outcome = renderer.render(
        &mut target,
        &command.map,
        command.offset,
        FrameSpec::new(viewport, dpr),
        &theme,
        session.layout(),
    );
    log::debug!("frame {outcome:?}, {} op(s)", target.ops().len());

    let report = Report {
        title: session.host().title(),
        editing: session.editor().buffer(),
        outcome,
        plan: build_render_plan(&command.map, command.offset, session.layout()),
        ops: args.ops.then(|| target.ops()),
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

fn main() {
    env_logger::init();
    match parse_args(env::args().skip(1)).and_then(run) {
        Ok(json) => println!("{json}"),
        Err(err) => {
            eprintln!("mm-cli: {err}");
            process::exit(if matches!(err, CliError::Usage(_)) { 2 } else { 1 });
        }
    }
}
