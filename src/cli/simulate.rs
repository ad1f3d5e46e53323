//! Simulate command implementation.
//!
//! Plays a fixed intent script against a seeded session and prints every
//! event, without a terminal UI.

use super::output::{
    JsonFinalState, JsonSimulation, JsonStep, format_final_text, format_step_text,
};
use super::{CliError, GridArgs, OutputFormat, resolve_seed};
use labyrinth::{Intent, Session, Xorshift64};
use std::fs;
use std::path::PathBuf;
use tracing::info;

/// Execute the simulate command.
///
/// The script comes from `script` or, if absent, from the file at
/// `script_file`.
///
/// # Errors
///
/// Returns an error if the configuration or the script is invalid.
pub(crate) fn execute(
    grid: GridArgs,
    seed: Option<u64>,
    script: Option<String>,
    script_file: Option<PathBuf>,
    stop_on_end: bool,
    format: OutputFormat,
) -> Result<(), CliError> {
    let config = grid.session_config()?;
    let seed = resolve_seed(seed);

    let source = match (script, script_file) {
        (Some(text), _) => text,
        (None, Some(path)) => fs::read_to_string(&path)
            .map_err(|e| CliError::new(format!("Failed to read {}: {e}", path.display())))?,
        (None, None) => return Err(CliError::new("No script given (use --script or --file)")),
    };
    let intents = Intent::parse_script(&source)?;

    let mut rng = Xorshift64::new(seed);
    let mut session = Session::new(config, &mut rng)?;
    info!(seed, intents = intents.len(), "simulation started");

    let mut steps = Vec::with_capacity(intents.len());
    for intent in intents {
        if stop_on_end && !session.is_playing() {
            break;
        }
        let resolution = session.apply(intent, &mut rng);
        steps.push(JsonStep::new(intent, resolution));
    }

    let final_state = JsonFinalState::from_session(&session);
    info!(status = ?final_state.status, steps = steps.len(), "simulation finished");

    match format {
        OutputFormat::Text => {
            println!("Simulating {} intents with seed {seed}", steps.len());
            println!();
            for (i, step) in steps.iter().enumerate() {
                print!("{}", format_step_text(i, step));
            }
            print!("{}", format_final_text(&final_state, &session.grid));
        }
        OutputFormat::Json => {
            let transcript = JsonSimulation {
                seed,
                steps,
                final_state,
            };
            println!("{}", serde_json::to_string_pretty(&transcript)?);
        }
    }

    Ok(())
}
