//! Keyboard viewport trace replayer - Entry Point

use clap::Parser;
use keyboard_viewport::config::{
    apply_cli_overrides, apply_env_overrides, load_config_with_precedence, merge_config,
};
use keyboard_viewport::logging;
use keyboard_viewport::model::AppError;
use keyboard_viewport::publish::CssPropertyBag;
use keyboard_viewport::replay::{self, Replay, ReplayOptions};
use keyboard_viewport::source::trace::TraceReader;
use std::path::PathBuf;
use tracing::info;

/// Replay mobile viewport traces through the keyboard-aware layout core
#[derive(Parser, Debug)]
#[command(name = "kbvp")]
#[command(version)]
#[command(about = "Replay JSONL viewport/keyboard traces and print layout snapshots")]
pub struct Args {
    /// Path to JSONL trace file (reads from stdin if not provided)
    pub trace: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Keyboard noise threshold in px (overrides config and environment)
    #[arg(long, value_parser = parse_non_negative)]
    pub noise_threshold: Option<f64>,

    /// Include performance metrics in every snapshot
    #[arg(long)]
    pub metrics: bool,

    /// Include the published custom properties in every snapshot
    #[arg(long)]
    pub properties: bool,

    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long)]
    pub verbose: bool,
}

fn parse_non_negative(raw: &str) -> Result<f64, String> {
    let value: f64 = raw.parse().map_err(|_| format!("`{raw}` is not a number"))?;
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(format!("`{raw}` must be a non-negative number"))
    }
}

fn main() -> Result<(), AppError> {
    let args = Args::parse();

    // Defaults → Config File → Env Vars → CLI Args
    let config = {
        let config_file = load_config_with_precedence(args.config.clone())?;
        let merged = merge_config(config_file);
        let with_env = apply_env_overrides(merged);
        apply_cli_overrides(with_env, args.noise_threshold)
    };

    let directive = if args.verbose {
        logging::VERBOSE_DIRECTIVE
    } else {
        logging::DEFAULT_DIRECTIVE
    };
    logging::init_with_default(&config.log_file_path, directive)?;

    info!(config = ?config, "Configuration loaded and resolved");

    let trace = TraceReader::open(args.trace.clone())?;
    let options = ReplayOptions {
        metrics: args.metrics,
        properties: args.properties,
    };
    let mut replayer = Replay::new(CssPropertyBag::new(), &config, options);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let summary = replay::run(trace, &mut replayer, &mut out)?;

    info!(steps = summary.steps, skipped = summary.skipped, "Replay finished");
    Ok(())
}
