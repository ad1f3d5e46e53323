//! Output formatting utilities for CLI.

use std::fmt::Write as _;

use labyrinth::game::{Event, Intent, Refusal, Resolution, TimedEvent};
use labyrinth::survey::{DEFEAT_CAUSES, SurveyStats};
use labyrinth::{CellKind, Coord, GameStatus, Grid, Session, SessionConfig};
use serde::Serialize;

/// JSON-serializable generated level.
#[derive(Debug, Serialize)]
pub(super) struct JsonLevel {
    /// Random seed used.
    pub(super) seed: u64,
    /// Configuration the level was built from.
    pub(super) config: SessionConfig,
    /// Medals placed.
    pub(super) total_medals: u32,
    /// Enemies placed.
    pub(super) enemies: u32,
    /// One glyph string per row.
    pub(super) rows: Vec<String>,
}

impl JsonLevel {
    /// Create from a fresh session.
    pub(super) fn from_session(seed: u64, session: &Session) -> Self {
        Self {
            seed,
            config: *session.config(),
            total_medals: session.resources.total_medals,
            enemies: session.grid.count(CellKind::Enemy),
            rows: session.grid.to_rows(),
        }
    }
}

/// One intent of a simulated script.
#[derive(Debug, Serialize)]
pub(super) struct JsonStep {
    /// The intent offered.
    pub(super) intent: Intent,
    /// Why it was refused, if it was.
    pub(super) refused: Option<Refusal>,
    /// Events it produced.
    pub(super) events: Vec<TimedEvent>,
}

impl JsonStep {
    /// Create from a resolution.
    pub(super) fn new(intent: Intent, resolution: Resolution) -> Self {
        match resolution {
            Resolution::Applied(events) => Self {
                intent,
                refused: None,
                events,
            },
            Resolution::Refused(refusal) => Self {
                intent,
                refused: Some(refusal),
                events: Vec::new(),
            },
        }
    }
}

/// Session state after a simulated script.
#[derive(Debug, Serialize)]
pub(super) struct JsonFinalState {
    /// Terminal or current status.
    pub(super) status: GameStatus,
    /// Hero position.
    pub(super) hero: Coord,
    /// Health.
    pub(super) health: i32,
    /// Energy.
    pub(super) energy: i32,
    /// Medals collected.
    pub(super) medal_count: u32,
    /// Medals placed.
    pub(super) total_medals: u32,
    /// Movement intents resolved.
    pub(super) total_steps: u32,
    /// One glyph string per row.
    pub(super) rows: Vec<String>,
}

impl JsonFinalState {
    /// Capture the session's current state.
    pub(super) fn from_session(session: &Session) -> Self {
        let res = &session.resources;
        Self {
            status: session.status,
            hero: session.hero.position,
            health: res.health,
            energy: res.energy,
            medal_count: res.medal_count,
            total_medals: res.total_medals,
            total_steps: res.total_steps,
            rows: session.grid.to_rows(),
        }
    }
}

/// JSON-serializable simulation transcript.
#[derive(Debug, Serialize)]
pub(super) struct JsonSimulation {
    /// Random seed used.
    pub(super) seed: u64,
    /// Per-intent results in order.
    pub(super) steps: Vec<JsonStep>,
    /// State after the last intent.
    #[serde(rename = "final")]
    pub(super) final_state: JsonFinalState,
}

/// Format a level as a text block.
pub(super) fn format_level_text(seed: u64, session: &Session) -> String {
    let mut output = String::new();
    let _ = writeln!(
        output,
        "Level {}x{} (seed {seed})",
        session.grid.columns(),
        session.grid.rows()
    );
    let _ = writeln!(
        output,
        "Medals: {}  Enemies: {}",
        session.resources.total_medals,
        session.grid.count(CellKind::Enemy)
    );
    output.push('\n');
    let _ = write!(output, "{}", session.grid);
    output
}

/// Describe one event on a single line.
pub(super) fn format_event(event: &Event) -> String {
    match *event {
        Event::CellChanged { pos, kind } => format!("cell {pos} -> {}", kind.glyph()),
        Event::ResourceChanged {
            health,
            energy,
            medal_count,
        } => format!("health {health}  energy {energy}  medals {medal_count}"),
        Event::Warning { kind } => format!("warning: {kind:?}"),
        Event::Defeat { cause } => format!("DEFEAT: {cause:?}"),
        Event::Victory { cause } => format!("VICTORY: {cause:?}"),
        Event::EnemySpawned { pos } => format!("enemy spawned at {pos}"),
    }
}

/// Format one simulated step as text.
pub(super) fn format_step_text(index: usize, step: &JsonStep) -> String {
    let mut output = String::new();
    let _ = write!(output, "#{:<4} {:<9}", index + 1, step.intent.token());
    match step.refused {
        Some(Refusal::InsufficientEnergy { needed, available }) => {
            let _ = writeln!(output, " refused: needs {needed} energy, has {available}");
        }
        Some(Refusal::SessionOver { status }) => {
            let _ = writeln!(output, " refused: session is {status:?}");
        }
        None if step.events.is_empty() => output.push_str(" (no effect)\n"),
        None => {
            output.push('\n');
            for timed in &step.events {
                let delay = timed.delay.as_millis();
                if delay > 0 {
                    let _ = writeln!(output, "        +{delay}ms {}", format_event(&timed.event));
                } else {
                    let _ = writeln!(output, "        {}", format_event(&timed.event));
                }
            }
        }
    }
    output
}

/// Format the final state as text.
pub(super) fn format_final_text(state: &JsonFinalState, grid: &Grid) -> String {
    let mut output = String::new();
    output.push_str("\n=== FINAL STATE ===\n\n");
    let _ = writeln!(output, "Status: {:?}", state.status);
    let _ = writeln!(output, "Hero: {}", state.hero);
    let _ = writeln!(
        output,
        "Health: {}  Energy: {}  Medals: {}/{}  Steps: {}",
        state.health, state.energy, state.medal_count, state.total_medals, state.total_steps
    );
    output.push('\n');
    let _ = write!(output, "{grid}");
    output
}

/// JSON-serializable survey result.
#[derive(Debug, Serialize)]
pub(super) struct JsonSurveyResult {
    /// Runs completed.
    runs: u64,
    /// Fraction of runs reaching the exit.
    exit_rate: f64,
    /// Fraction of runs hitting the intent budget.
    timeout_rate: f64,
    /// Defeat rates by cause.
    defeats: Vec<JsonDefeat>,
    /// Fraction of runs that collected every medal.
    all_medals_rate: f64,
    /// Fraction of runs that cleared every enemy.
    all_enemies_dead_rate: f64,
    /// Average intents per run.
    avg_intents: f64,
    /// Average refused intents per run.
    avg_refused: f64,
    /// Average movement steps per run.
    avg_steps: f64,
    /// Average medals placed per level.
    avg_total_medals: f64,
    /// Average medals collected per run.
    avg_medals: f64,
    /// Average enemies placed per level.
    avg_initial_enemies: f64,
    /// Average enemies spawned per run.
    avg_spawned: f64,
}

/// JSON-serializable defeat bucket.
#[derive(Debug, Serialize)]
struct JsonDefeat {
    /// Defeat cause.
    cause: labyrinth::DefeatCause,
    /// Number of runs.
    count: u64,
    /// Fraction of runs.
    rate: f64,
}

impl JsonSurveyResult {
    /// Create from stats.
    pub(super) fn from_stats(stats: &SurveyStats) -> Self {
        let defeats = DEFEAT_CAUSES
            .into_iter()
            .map(|cause| {
                let count = stats.defeats_by(cause);
                JsonDefeat {
                    cause,
                    count,
                    rate: stats.rate(count),
                }
            })
            .collect();

        Self {
            runs: stats.runs,
            exit_rate: stats.rate(stats.exits),
            timeout_rate: stats.rate(stats.timeouts),
            defeats,
            all_medals_rate: stats.rate(stats.all_medals),
            all_enemies_dead_rate: stats.rate(stats.all_enemies_dead),
            avg_intents: stats.average(stats.intents),
            avg_refused: stats.average(stats.refused),
            avg_steps: stats.average(stats.steps),
            avg_total_medals: stats.average(stats.total_medals),
            avg_medals: stats.average(stats.medals),
            avg_initial_enemies: stats.average(stats.initial_enemies),
            avg_spawned: stats.average(stats.spawned),
        }
    }
}

/// Format survey stats as human-readable text.
pub(super) fn format_survey_text(stats: &SurveyStats) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "Survey Results ({} runs)", stats.runs);
    output.push_str("========================================\n\n");

    output.push_str("Outcomes:\n");
    let _ = writeln!(
        output,
        "  Reached exit: {:.1}% ({})",
        stats.rate(stats.exits) * 100.0,
        stats.exits
    );
    for cause in DEFEAT_CAUSES {
        let count = stats.defeats_by(cause);
        let _ = writeln!(
            output,
            "  Defeat {:?}: {:.1}% ({count})",
            cause,
            stats.rate(count) * 100.0
        );
    }
    let _ = writeln!(
        output,
        "  Timed out: {:.1}% ({})\n",
        stats.rate(stats.timeouts) * 100.0,
        stats.timeouts
    );

    output.push_str("Side victories:\n");
    let _ = writeln!(
        output,
        "  All medals: {:.1}%",
        stats.rate(stats.all_medals) * 100.0
    );
    let _ = writeln!(
        output,
        "  All enemies dead: {:.1}%\n",
        stats.rate(stats.all_enemies_dead) * 100.0
    );

    output.push_str("Averages per run:\n");
    let _ = writeln!(
        output,
        "  Intents: {:.1} ({:.1} refused)",
        stats.average(stats.intents),
        stats.average(stats.refused)
    );
    let _ = writeln!(output, "  Steps: {:.1}", stats.average(stats.steps));
    let _ = writeln!(
        output,
        "  Medals: {:.2} of {:.2}",
        stats.average(stats.medals),
        stats.average(stats.total_medals)
    );
    let _ = writeln!(
        output,
        "  Enemies: {:.2} placed, {:.2} spawned",
        stats.average(stats.initial_enemies),
        stats.average(stats.spawned)
    );

    output
}

/// Format survey stats as CSV.
pub(super) fn format_survey_csv(stats: &SurveyStats) -> String {
    let mut output = String::new();

    output.push_str("outcome,count,rate\n");
    let _ = writeln!(
        output,
        "exit,{},{:.4}",
        stats.exits,
        stats.rate(stats.exits)
    );
    for cause in DEFEAT_CAUSES {
        let count = stats.defeats_by(cause);
        let _ = writeln!(output, "{cause:?},{count},{:.4}", stats.rate(count));
    }
    let _ = writeln!(
        output,
        "timeout,{},{:.4}",
        stats.timeouts,
        stats.rate(stats.timeouts)
    );

    output
}
