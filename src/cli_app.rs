//! Top-level CLI definition and dispatch.

use std::fs;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell as CompletionShell, generate};
use colored::{Colorize, control};
use serde_json::{Value, json};
use thiserror::Error;

use material_feed::core::config::Config;
use material_feed::feed::glyph::GlyphStyle;
use material_feed::logger::jsonl::{JsonlSink, Severity, StderrSink, TeeSink};
use material_feed::render::{
    EMPTY_FEED_MESSAGE, FETCH_FAILED_MESSAGE, FeedRenderer, RenderOutcome,
};
use material_feed::view::Document;

/// Material Feed — renders a JSON feed of material news events.
#[derive(Debug, Parser)]
#[command(
    name = "mfeed",
    author,
    version,
    about = "Material Feed - event feed renderer",
    long_about = None,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Override config file path.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Force JSON output mode.
    #[arg(long, global = true)]
    json: bool,
    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,
    /// Increase verbosity.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,
    /// Quiet mode (errors only).
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Fetch the feed once and render it.
    Render(RenderArgs),
    /// View configuration state.
    Config(ConfigArgs),
    /// Generate shell completions.
    Completions(CompletionsArgs),
}

#[derive(Debug, Clone, Args, Default)]
struct RenderArgs {
    /// Feed URL or path (defaults to feed.source from config).
    #[arg(value_name = "SOURCE")]
    source: Option<String>,
    /// Directory that relative feed paths resolve against.
    #[arg(long, value_name = "DIR")]
    base_dir: Option<PathBuf>,
    /// Document serialization.
    #[arg(long, value_enum, default_value_t = PageFormat::Text)]
    format: PageFormat,
    /// Write the document to a file instead of stdout.
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,
    /// Confidence glyph characters (defaults to view.glyph_style from config).
    #[arg(long, value_enum, value_name = "STYLE")]
    glyph_style: Option<GlyphArg>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
enum PageFormat {
    /// One line per element.
    #[default]
    Text,
    /// Standalone HTML page.
    Html,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum GlyphArg {
    /// ▪ and ▫
    Small,
    /// ■ and □
    Block,
}

impl From<GlyphArg> for GlyphStyle {
    fn from(value: GlyphArg) -> Self {
        match value {
            GlyphArg::Small => Self::Small,
            GlyphArg::Block => Self::Block,
        }
    }
}

#[derive(Debug, Clone, Args, Default)]
struct ConfigArgs {
    #[command(subcommand)]
    command: Option<ConfigCommand>,
}

#[derive(Debug, Clone, Subcommand)]
enum ConfigCommand {
    /// Print the config file path in use.
    Path,
    /// Print the effective configuration.
    Show,
    /// Validate the configuration.
    Validate,
}

#[derive(Debug, Clone, Args)]
struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum)]
    shell: CompletionShell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Human,
    Json,
}

/// CLI error type with explicit exit-code mapping.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid user input at runtime.
    #[error("{0}")]
    User(String),
    /// Environment/runtime failure.
    #[error("{0}")]
    Runtime(String),
    /// JSON serialization failed.
    #[error("failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),
    /// Output write failed.
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
    /// The feed could not be loaded; the diagnostic sink already reported it.
    #[error("[{code}] feed could not be loaded")]
    FeedUnavailable { code: &'static str },
}

impl CliError {
    /// Process exit code contract for the CLI.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::User(_) => 1,
            Self::Runtime(_) | Self::Io(_) | Self::FeedUnavailable { .. } => 2,
            Self::Json(_) => 3,
        }
    }

    /// Whether stderr already carries this failure.
    pub const fn is_reported(&self) -> bool {
        matches!(self, Self::FeedUnavailable { .. })
    }
}

/// Dispatch CLI commands.
pub fn run(cli: &Cli) -> Result<(), CliError> {
    if cli.no_color {
        control::set_override(false);
    }

    match &cli.command {
        Command::Render(args) => run_render(cli, args),
        Command::Config(args) => run_config(cli, args),
        Command::Completions(args) => {
            let mut command = Cli::command();
            let binary_name = command.get_name().to_string();
            generate(args.shell, &mut command, binary_name, &mut io::stdout());
            Ok(())
        }
    }
}

fn run_render(cli: &Cli, args: &RenderArgs) -> Result<(), CliError> {
    let mut config = load_config(cli)?;
    if let Some(source) = &args.source {
        config.feed.source.clone_from(source);
    }
    if let Some(base_dir) = &args.base_dir {
        config.feed.base_dir.clone_from(base_dir);
    }
    if let Some(style) = args.glyph_style {
        config.view.glyph_style = style.into();
    }

    let renderer = FeedRenderer::from_config(&config);
    let mut doc = Document::page(&config.view.title, &config.view.ids());
    let mut sink = TeeSink::default()
        .with(JsonlSink::open(&config.paths.diagnostics_log))
        .with(StderrSink {
            min_severity: stderr_severity(cli),
        });

    let outcome = renderer
        .render(&mut doc, &mut sink)
        .map_err(|e| CliError::Runtime(e.to_string()))?;

    let page = match args.format {
        PageFormat::Text => {
            let mut text = doc.to_lines().join("\n");
            text.push('\n');
            text
        }
        PageFormat::Html => doc.to_html(),
    };
    if let Some(path) = &args.output {
        fs::write(path, &page)
            .map_err(|e| CliError::Runtime(format!("write {}: {e}", path.display())))?;
    }

    match render_output_mode(cli) {
        OutputMode::Human => {
            if let Some(path) = &args.output {
                if !cli.quiet {
                    println!("Wrote {} ({})", path.display(), outcome.label());
                }
            } else if args.format == PageFormat::Html {
                print!("{page}");
            } else {
                print_document_human(&doc, &outcome);
            }
        }
        OutputMode::Json => {
            let payload = render_payload(&renderer, &outcome, args.output.as_ref());
            write_json_line(&payload)?;
        }
    }

    match outcome {
        RenderOutcome::Failed(error) => Err(CliError::FeedUnavailable { code: error.code() }),
        RenderOutcome::Rendered { .. } | RenderOutcome::Empty => Ok(()),
    }
}

fn print_document_human(doc: &Document, outcome: &RenderOutcome) {
    let mut lines = doc.to_lines().into_iter();
    if let Some(title) = lines.next() {
        println!("{}", title.bold());
    }
    for line in lines {
        if line == FETCH_FAILED_MESSAGE && outcome.is_failed() {
            println!("{}", line.red());
        } else if line == EMPTY_FEED_MESSAGE && matches!(outcome, RenderOutcome::Empty) {
            println!("{}", line.dimmed());
        } else {
            println!("{line}");
        }
    }
}

fn render_payload(
    renderer: &FeedRenderer,
    outcome: &RenderOutcome,
    output: Option<&PathBuf>,
) -> Value {
    let mut payload = json!({
        "command": "render",
        "source": renderer.source().to_string(),
        "outcome": outcome.label(),
    });
    match outcome {
        RenderOutcome::Rendered {
            lines,
            last_updated,
        } => {
            payload["lines"] = json!(lines);
            payload["last_updated"] = json!(last_updated);
        }
        RenderOutcome::Empty => {
            payload["lines"] = json!([]);
        }
        RenderOutcome::Failed(error) => {
            payload["error"] = json!({
                "code": error.code(),
                "message": error.to_string(),
                "status": error.status(),
            });
        }
    }
    if let Some(path) = output {
        payload["output"] = json!(path.to_string_lossy());
    }
    payload
}

fn run_config(cli: &Cli, args: &ConfigArgs) -> Result<(), CliError> {
    match &args.command {
        None | Some(ConfigCommand::Path) => {
            let path = cli.config.clone().unwrap_or_else(Config::default_path);
            let exists = path.exists();

            match output_mode(cli) {
                OutputMode::Human => {
                    println!("{}", path.display());
                    if !exists {
                        println!("  (file does not exist; defaults will be used)");
                    }
                }
                OutputMode::Json => {
                    let payload = json!({
                        "command": "config path",
                        "path": path.to_string_lossy(),
                        "exists": exists,
                    });
                    write_json_line(&payload)?;
                }
            }
            Ok(())
        }
        Some(ConfigCommand::Show) => {
            let config = load_config(cli)?;

            match output_mode(cli) {
                OutputMode::Human => {
                    let toml_str = toml::to_string_pretty(&config)
                        .map_err(|e| CliError::Runtime(format!("serialize config: {e}")))?;
                    println!("{toml_str}");
                }
                OutputMode::Json => {
                    let payload = json!({
                        "command": "config show",
                        "config": serde_json::to_value(&config)?,
                    });
                    write_json_line(&payload)?;
                }
            }
            Ok(())
        }
        Some(ConfigCommand::Validate) => match Config::load(cli.config.as_deref()) {
            Ok(config) => {
                let hash = config
                    .stable_hash()
                    .map_err(|e| CliError::Runtime(e.to_string()))?;

                match output_mode(cli) {
                    OutputMode::Human => {
                        println!("Configuration is valid.");
                        println!("  Source: {}", config.paths.config_file.display());
                        println!("  Hash: {hash}");
                    }
                    OutputMode::Json => {
                        let payload = json!({
                            "command": "config validate",
                            "valid": true,
                            "path": config.paths.config_file.to_string_lossy(),
                            "hash": hash,
                        });
                        write_json_line(&payload)?;
                    }
                }
                Ok(())
            }
            Err(e) => {
                match output_mode(cli) {
                    OutputMode::Human => {
                        eprintln!("Configuration is INVALID: {e}");
                    }
                    OutputMode::Json => {
                        let payload = json!({
                            "command": "config validate",
                            "valid": false,
                            "error": e.to_string(),
                        });
                        write_json_line(&payload)?;
                    }
                }
                Err(CliError::User(format!("invalid config: {e}")))
            }
        },
    }
}

fn load_config(cli: &Cli) -> Result<Config, CliError> {
    Config::load(cli.config.as_deref()).map_err(|e| CliError::User(e.to_string()))
}

const fn stderr_severity(cli: &Cli) -> Severity {
    if cli.verbose {
        Severity::Info
    } else if cli.quiet {
        Severity::Critical
    } else {
        Severity::Warning
    }
}

fn write_json_line(payload: &Value) -> Result<(), CliError> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, payload)?;
    writeln!(stdout)?;
    Ok(())
}

fn output_mode(cli: &Cli) -> OutputMode {
    let env_mode = std::env::var("MFEED_OUTPUT_FORMAT").ok();
    resolve_output_mode(cli.json, env_mode.as_deref(), io::stdout().is_terminal())
}

// Render prints the page unless JSON is requested explicitly. No TTY fallback.
fn render_output_mode(cli: &Cli) -> OutputMode {
    let env_mode = std::env::var("MFEED_OUTPUT_FORMAT").ok();
    resolve_render_output_mode(cli.json, env_mode.as_deref())
}

fn resolve_render_output_mode(json_flag: bool, env_mode: Option<&str>) -> OutputMode {
    let env_json = env_mode.is_some_and(|mode| mode.trim().eq_ignore_ascii_case("json"));
    if json_flag || env_json {
        OutputMode::Json
    } else {
        OutputMode::Human
    }
}

fn resolve_output_mode(json_flag: bool, env_mode: Option<&str>, stdout_is_tty: bool) -> OutputMode {
    if json_flag {
        return OutputMode::Json;
    }

    let fallback = if stdout_is_tty {
        OutputMode::Human
    } else {
        OutputMode::Json
    };

    match env_mode
        .map(str::trim)
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("json") => OutputMode::Json,
        Some("human") => OutputMode::Human,
        _ => fallback,
    }
}
