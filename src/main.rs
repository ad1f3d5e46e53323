//! Labyrinth CLI - play, inspect and survey maze sessions.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod cli;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

/// Labyrinth - a deterministic turn-based maze game
#[derive(Parser, Debug)]
#[command(name = "labyrinth")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log filter when RUST_LOG is unset (e.g. info, labyrinth=debug)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Play interactively in the terminal
    Play {
        #[command(flatten)]
        grid: cli::GridArgs,

        /// Random seed (default: random)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Write logs to this file (the screen is owned by the TUI)
        #[arg(long)]
        log_file: Option<PathBuf>,
    },

    /// Print a generated level
    Generate {
        #[command(flatten)]
        grid: cli::GridArgs,

        /// Random seed (default: random)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,
    },

    /// Run a scripted intent sequence and print every event
    Simulate {
        #[command(flatten)]
        grid: cli::GridArgs,

        /// Random seed (default: random)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Intents separated by spaces or commas (e.g. "r r f b boom")
        #[arg(long, conflicts_with = "file")]
        script: Option<String>,

        /// Read the intent script from a file
        #[arg(long)]
        file: Option<PathBuf>,

        /// Stop at the first terminal event instead of recording refusals
        #[arg(long)]
        stop_on_end: bool,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,
    },

    /// Run many automated sessions in parallel and aggregate statistics
    Survey {
        #[command(flatten)]
        grid: cli::GridArgs,

        /// Number of sessions to run (default: 1000)
        #[arg(short, long, default_value = "1000")]
        runs: u64,

        /// Starting seed (increments for each run)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Parallel threads (default: CPU count)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Intents offered per session before giving up (default: 2000)
        #[arg(short = 'm', long, default_value = "2000")]
        max_intents: u32,

        /// Output format: text, json, or csv
        #[arg(short, long, default_value = "text")]
        format: cli::SurveyFormat,

        /// Show progress bar
        #[arg(short, long)]
        progress: bool,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();

    let log_file = match &args.command {
        Commands::Play { log_file, .. } => log_file.as_deref(),
        _ => None,
    };
    if let Err(e) = cli::init_tracing(&args.log_level, log_file) {
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }

    let result = match args.command {
        Commands::Play { grid, seed, .. } => cli::play::execute(grid, seed),

        Commands::Generate { grid, seed, format } => cli::generate::execute(grid, seed, format),

        Commands::Simulate {
            grid,
            seed,
            script,
            file,
            stop_on_end,
            format,
        } => cli::simulate::execute(grid, seed, script, file, stop_on_end, format),

        Commands::Survey {
            grid,
            runs,
            seed,
            threads,
            max_intents,
            format,
            progress,
        } => cli::survey::execute(grid, runs, seed, threads, max_intents, format, progress),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_survey() {
        let args = Args::try_parse_from([
            "labyrinth", "survey", "--runs", "8", "--rows", "10", "--format", "csv",
        ])
        .unwrap();
        assert!(matches!(args.command, Commands::Survey { runs: 8, .. }));
    }
}
