use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::env;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;
use trends_patcher::{builtin, config, Patcher};

#[derive(Parser)]
#[command(name = "trends-patcher")]
#[command(about = "Restyle the reports trends tab with design-system cards", long_about = None)]
#[command(version)]
struct Cli {
    /// File to patch (defaults to $TRENDS_PATCHER_FILE, then the trends tab path)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// TOML rule set to apply instead of the built-in rules
    #[arg(short, long)]
    rules: Option<PathBuf>,

    /// Log per-rule match counts
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = run(cli) {
        eprintln!("{} {:#}", "error:".red().bold(), err);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let target = resolve_target(cli.file);

    let rules = match &cli.rules {
        Some(path) => config::load_from_path(path)?.into_rules(),
        None => builtin::rules().context("built-in rule set is invalid")?,
    };
    let patcher = Patcher::new(target, rules);
    debug!(
        target = %patcher.file().display(),
        rules = patcher.rules().len(),
        "resolved run"
    );

    let report = patcher
        .run()
        .with_context(|| format!("failed to patch {}", patcher.file().display()))?;

    for outcome in report.unmatched() {
        debug!(file = %report.file.display(), rule = %outcome.id, "rule matched nothing");
    }

    println!("{}", "Modification complete.".green());
    Ok(())
}

/// Resolve the target file.
///
/// Priority order:
/// 1. Explicit --file flag
/// 2. TRENDS_PATCHER_FILE environment variable
/// 3. Built-in trends tab path, relative to the working directory
fn resolve_target(cli_file: Option<PathBuf>) -> PathBuf {
    if let Some(path) = cli_file {
        return path;
    }

    match env::var(builtin::TARGET_ENV) {
        Ok(path) if !path.trim().is_empty() => return PathBuf::from(path),
        Ok(_) => warn!("{} is set but empty, ignoring", builtin::TARGET_ENV),
        Err(_) => {}
    }

    PathBuf::from(builtin::DEFAULT_TARGET)
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .init();
}
