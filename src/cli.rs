//! CLI command implementations for Labyrinth.

pub(crate) mod generate;
pub(crate) mod play;
pub(crate) mod simulate;
pub(crate) mod survey;

mod output;

use clap::{Args, ValueEnum};
use labyrinth::{ConfigError, Coord, SessionConfig};
use std::error::Error;
use std::fmt;
use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Output format for `generate` and `simulate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Output format for the `survey` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum SurveyFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
    /// CSV format.
    Csv,
}

/// Grid and starting-resource flags shared by every command.
#[derive(Args, Debug, Clone, Copy)]
pub(crate) struct GridArgs {
    /// Grid rows
    #[arg(long, default_value = "20")]
    rows: u16,

    /// Grid columns
    #[arg(long, default_value = "40")]
    columns: u16,

    /// Hero spawn column
    #[arg(long, default_value = "1")]
    hero_x: u16,

    /// Hero spawn row
    #[arg(long, default_value = "1")]
    hero_y: u16,

    /// Starting health
    #[arg(long, default_value = "100")]
    health: i32,

    /// Starting energy
    #[arg(long, default_value = "500")]
    energy: i32,
}

impl GridArgs {
    /// Build and validate the session configuration.
    pub(crate) fn session_config(self) -> Result<SessionConfig, CliError> {
        let config = SessionConfig {
            rows: self.rows,
            columns: self.columns,
            hero_start: Coord::new(self.hero_x, self.hero_y),
            health: self.health,
            energy: self.energy,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Use the given seed, or derive one from the clock.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(42)
    })
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over `level` when set. With `log_file` the output goes to
/// that file instead of stderr, which the TUI needs to keep the screen clean.
pub(crate) fn init_tracing(level: &str, log_file: Option<&Path>) -> Result<(), CliError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let installed = match log_file {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                CliError::new(format!("Failed to create log file {}: {e}", path.display()))
            })?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };

    installed.map_err(|e| CliError::new(format!("Failed to initialise logging: {e}")))
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::new(format!("Invalid configuration: {e}"))
    }
}

impl From<labyrinth::game::UnknownIntent> for CliError {
    fn from(e: labyrinth::game::UnknownIntent) -> Self {
        Self::new(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(format!("JSON serialization failed: {e}"))
    }
}
