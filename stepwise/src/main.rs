//! Behavior-specification runner.
//!
//! Runs the bundled suites with a chosen strategy and worker count, printing
//! the indented pass/fail report to stdout. Defaults come from
//! `stepwise.toml` when present; flags override them.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use stepwise::config::{CONFIG_FILE, StepwiseConfig, load_config, write_config};
use stepwise::{Environment, Strategy, demo, exit_codes, logging};

#[derive(Parser)]
#[command(
    name = "stepwise",
    version,
    about = "Run given/when/then behavior trees with bounded concurrency"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the bundled suites.
    List,
    /// Run a bundled suite and print its report.
    Run {
        /// Suite name (see `stepwise list`).
        suite: String,
        /// Worker pool size.
        #[arg(short, long)]
        workers: Option<usize>,
        /// Execution strategy.
        #[arg(short, long, value_enum)]
        strategy: Option<Strategy>,
        /// JSON object file used as the initial environment.
        #[arg(long)]
        env: Option<PathBuf>,
        /// Config file with run defaults.
        #[arg(long, default_value = CONFIG_FILE)]
        config: PathBuf,
        /// Exit non-zero when any step fails.
        #[arg(long)]
        fail_on_error: bool,
    },
    /// Write a default `stepwise.toml` if missing.
    Init {
        /// Overwrite an existing file.
        #[arg(short, long)]
        force: bool,
    },
}

fn main() {
    logging::init();

    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::INVALID);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    match cli.command {
        Command::List => cmd_list(),
        Command::Run {
            suite,
            workers,
            strategy,
            env,
            config,
            fail_on_error,
        } => cmd_run(
            &suite,
            workers,
            strategy,
            env.as_deref(),
            &config,
            fail_on_error,
        ),
        Command::Init { force } => cmd_init(force),
    }
}

fn cmd_list() -> Result<i32> {
    for name in demo::NAMES {
        println!("{}", name);
    }
    Ok(exit_codes::OK)
}

fn cmd_run(
    name: &str,
    workers: Option<usize>,
    strategy: Option<Strategy>,
    env_path: Option<&Path>,
    config_path: &Path,
    fail_on_error: bool,
) -> Result<i32> {
    let cfg = load_config(config_path)?;
    let options = cfg.options(workers, strategy);
    let env = match env_path {
        Some(path) => Environment::load(path)?,
        None => Environment::new(),
    };
    let suite = demo::suite(name)?;

    let summary = suite
        .run_with(env, options)
        .with_context(|| format!("run suite {}", name))?;

    if fail_on_error && !summary.passed() {
        eprintln!(
            "{} of {} units failed ({} failed steps)",
            summary.failed_units, summary.units, summary.failed_steps
        );
        return Ok(exit_codes::STEP_FAILURES);
    }
    Ok(exit_codes::OK)
}

fn cmd_init(force: bool) -> Result<i32> {
    let path = Path::new(CONFIG_FILE);
    if !force && path.exists() {
        return Ok(exit_codes::OK);
    }
    write_config(path, &StepwiseConfig::default()).context("write stepwise.toml")?;
    Ok(exit_codes::OK)
}
