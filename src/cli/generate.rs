//! Generate command implementation.

use super::output::{JsonLevel, format_level_text};
use super::{CliError, GridArgs, OutputFormat, resolve_seed};
use labyrinth::{Session, Xorshift64};

/// Execute the generate command.
///
/// # Errors
///
/// Returns an error if the configuration is invalid.
pub(crate) fn execute(
    grid: GridArgs,
    seed: Option<u64>,
    format: OutputFormat,
) -> Result<(), CliError> {
    let config = grid.session_config()?;
    let seed = resolve_seed(seed);

    let mut rng = Xorshift64::new(seed);
    let session = Session::new(config, &mut rng)?;

    match format {
        OutputFormat::Text => print!("{}", format_level_text(seed, &session)),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&JsonLevel::from_session(seed, &session))?;
            println!("{json}");
        }
    }

    Ok(())
}
