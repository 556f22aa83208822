//! # calbump
//!
//! Calendar versioning for project files, with reversible bumps.
//!
//! ## Startup sequence
//!
//! 1. Parse CLI arguments (clap handles `--help` / `--version` early-exit).
//! 2. Initialise the tracing subscriber (logging).
//! 3. Resolve the project root and load configuration (defaults, files, env).
//! 4. Build the [`OutputManager`].
//! 5. Dispatch to the appropriate command handler.
//! 6. Translate any [`CliError`] into a user-facing message and exit code.
//!
//! ## Exit codes
//!
//! | Code | Meaning                               |
//! |------|---------------------------------------|
//! |  0   | Success                               |
//! |  1   | Internal / I/O error                  |
//! |  2   | User / input error                    |
//! |  3   | File, variable or operation not found |
//! |  4   | Configuration error                   |
//! |  5   | Write failed, changes rolled back     |
//! |  6   | Completed with warnings               |

use std::io::IsTerminal as _;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, info, instrument};

use crate::{
    cli::{Cli, Commands},
    commands::Outcome,
    config::AppConfig,
    error::{CliError, CliResult},
    logging::init_logging,
    output::OutputManager,
};

mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod output;

const WARNINGS_EXIT: u8 = 6;

fn main() -> ExitCode {
    // .env is optional.
    let _ = dotenvy::dotenv();

    // ── 1. Parse arguments ────────────────────────────────────────────────
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version land here too and are not failures.
            let _ = e.print();
            return ExitCode::from(if e.use_stderr() { 2 } else { 0 });
        }
    };

    // ── 2. Initialise tracing ─────────────────────────────────────────────
    if let Err(e) = init_logging(&cli.global) {
        eprintln!("Failed to initialise logging: {e}");
        return ExitCode::from(1);
    }

    debug!(
        verbose = cli.global.verbose,
        quiet = cli.global.quiet,
        no_color = cli.global.no_color,
        "CLI started"
    );

    let verbose = cli.global.verbose > 0;
    let no_color = cli.global.no_color;
    match run(cli) {
        Ok(Outcome::Clean) => {
            info!("calbump completed successfully");
            ExitCode::SUCCESS
        }
        Ok(Outcome::Warnings) => {
            info!("calbump completed with warnings");
            ExitCode::from(WARNINGS_EXIT)
        }
        Err(e) => handle_error(e, verbose, no_color),
    }
}

/// Load configuration and dispatch to the correct command handler.
#[instrument(skip_all)]
fn run(cli: Cli) -> CliResult<Outcome> {
    // ── 3. Project root + configuration ───────────────────────────────────
    let root = project_root(cli.global.directory.clone())?;
    let config = AppConfig::load(&root, cli.global.config.as_deref()).map_err(CliError::config)?;

    // ── 4. Output manager ─────────────────────────────────────────────────
    let output = OutputManager::new(&cli.global, &config);

    // ── 5. Dispatch ───────────────────────────────────────────────────────
    match cli.command {
        Commands::Bump(args) => commands::bump::execute(args, &root, config, output),
        Commands::Undo(args) => commands::undo::execute(args, &root, config, output),
        Commands::History(args) => commands::history::execute(args, &root, config, output),
        Commands::Init(args) => commands::init::execute(args, &root, output),
        Commands::Completions(args) => commands::completions::execute(args),
        Commands::Config(cmd) => commands::config::execute(cmd, &root, config, output),
    }
}

fn project_root(directory: Option<PathBuf>) -> CliResult<PathBuf> {
    let root = match directory {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    if !root.is_dir() {
        return Err(CliError::InvalidInput {
            message: format!("project directory '{}' does not exist", root.display()),
            source: None,
        });
    }
    Ok(root)
}

/// Translate a `CliError` into a user message and an exit code.
fn handle_error(err: CliError, verbose: bool, no_color: bool) -> ExitCode {
    err.log();

    // stderr, so the message survives a redirected stdout.
    let color = !no_color && std::io::stderr().is_terminal();
    eprint!("{}", err.render(verbose, color));

    ExitCode::from(err.exit_code())
}

// ── tests ─────────────────────────────────────────────────────────────────────
