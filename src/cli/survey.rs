//! Survey command implementation.

use super::output::{JsonSurveyResult, format_survey_csv, format_survey_text};
use super::{CliError, GridArgs, SurveyFormat, resolve_seed};
use indicatif::{ProgressBar, ProgressStyle};
use labyrinth::survey::{SurveyConfig, SurveyStats, run_session};
use rayon::prelude::*;
use std::time::Instant;
use tracing::{info, warn};

/// Execute the survey command.
///
/// # Errors
///
/// Returns an error if the configuration is invalid.
pub(crate) fn execute(
    grid: GridArgs,
    runs: u64,
    seed: Option<u64>,
    threads: Option<usize>,
    max_intents: u32,
    format: SurveyFormat,
    progress: bool,
) -> Result<(), CliError> {
    let config = SurveyConfig {
        session: grid.session_config()?,
        max_intents,
    };

    // Set thread pool size if specified
    if let Some(num_threads) = threads
        && let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
    {
        warn!("thread pool already initialised: {e}");
    }

    let base_seed = resolve_seed(seed);
    info!(runs, base_seed, max_intents, "survey started");

    let pb = if progress {
        let pb = ProgressBar::new(runs);
        let style = ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} runs ({per_sec})",
            )
            .map_err(|e| CliError::new(format!("Invalid progress template: {e}")))?
            .progress_chars("=>-");
        pb.set_style(style);
        Some(pb)
    } else {
        None
    };

    let start = Instant::now();

    // Each thread accumulates into its own SurveyStats, merged at the end
    let stats = (0..runs)
        .into_par_iter()
        .fold(SurveyStats::default, |mut local, i| {
            if let Ok(result) = run_session(base_seed.wrapping_add(i), &config) {
                local.add_result(&result);
            }
            if let Some(pb) = &pb {
                pb.inc(1);
            }
            local
        })
        .reduce(SurveyStats::default, |mut a, b| {
            a.merge(&b);
            a
        });

    if let Some(pb) = pb {
        pb.finish_with_message("done");
    }

    let duration = start.elapsed();
    #[allow(clippy::cast_precision_loss)]
    let runs_per_sec = if duration.as_secs_f64() > 0.0 {
        stats.runs as f64 / duration.as_secs_f64()
    } else {
        0.0
    };
    info!(runs = stats.runs, elapsed = ?duration, "survey finished");

    match format {
        SurveyFormat::Text => {
            println!();
            print!("{}", format_survey_text(&stats));
            println!();
            println!(
                "Duration: {:.2}s ({:.0} runs/sec)",
                duration.as_secs_f64(),
                runs_per_sec
            );
        }
        SurveyFormat::Json => {
            let json = serde_json::to_string_pretty(&JsonSurveyResult::from_stats(&stats))?;
            println!("{json}");
        }
        SurveyFormat::Csv => print!("{}", format_survey_csv(&stats)),
    }

    Ok(())
}
