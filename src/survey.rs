//! Batch runs of automated sessions.
//!
//! Provides a pure function interface: `(seed, config) -> RunResult`
//!
//! Each run generates a level from `seed`, then feeds the session random
//! intents drawn from a second, independently seeded source until the
//! session ends or the intent budget runs out. Runs are independent, so the
//! CLI fans them out with rayon and merges [`SurveyStats`] afterwards.

use serde::Serialize;
use tracing::trace;

use crate::error::ConfigResult;
use crate::game::{
    CellKind, DefeatCause, Event, GameStatus, Intent, Resolution, Session, SessionConfig,
    VictoryCause,
};
use crate::random::{RandomSource, Xorshift64};

/// Mixed into the level seed to seed the autopilot.
const AUTOPILOT_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

/// Relative weights of the autopilot's intent choices.
const INTENT_WEIGHTS: [(Intent, u32); 8] = [
    (Intent::MoveUp, 20),
    (Intent::MoveDown, 20),
    (Intent::MoveLeft, 15),
    (Intent::MoveRight, 25),
    (Intent::Shoot, 8),
    (Intent::ShiftAttack, 5),
    (Intent::PlaceBomb, 3),
    (Intent::Detonate, 4),
];

/// Configuration for a survey run.
#[derive(Debug, Clone, Copy)]
pub struct SurveyConfig {
    /// Session settings shared by every run.
    pub session: SessionConfig,
    /// Intents offered before a run is abandoned.
    pub max_intents: u32,
}

impl Default for SurveyConfig {
    fn default() -> Self {
        Self {
            session: SessionConfig::default(),
            max_intents: 2000,
        }
    }
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "outcome", content = "cause", rename_all = "snake_case")]
pub enum RunOutcome {
    /// The hero reached the exit.
    Exit,
    /// The hero died.
    Defeat(DefeatCause),
    /// The intent budget ran out first.
    Timeout,
}

/// Final result of one automated session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunResult {
    /// Level seed.
    pub seed: u64,
    /// How the run ended.
    pub outcome: RunOutcome,
    /// Intents offered, including refused ones.
    pub intents: u32,
    /// Intents refused for lack of energy.
    pub refused: u32,
    /// Movement intents resolved.
    pub steps: u32,
    /// Medals placed at generation time.
    pub total_medals: u32,
    /// Medals collected.
    pub medals: u32,
    /// Enemies placed at generation time.
    pub initial_enemies: u32,
    /// Enemies added by the spawner.
    pub spawned: u32,
    /// Whether every medal was collected at some point.
    pub all_medals: bool,
    /// Whether the grid was cleared of enemies at some point.
    pub all_enemies_dead: bool,
}

/// Pick an intent according to [`INTENT_WEIGHTS`].
fn pick_intent<R: RandomSource + ?Sized>(rng: &mut R) -> Intent {
    let total: u32 = INTENT_WEIGHTS.iter().map(|&(_, weight)| weight).sum();
    let mut roll = rng.below(total);
    for &(intent, weight) in &INTENT_WEIGHTS {
        if roll < weight {
            return intent;
        }
        roll -= weight;
    }
    Intent::MoveRight
}

/// Run one automated session.
///
/// # Errors
///
/// Returns an error if the session configuration is invalid.
pub fn run_session(seed: u64, config: &SurveyConfig) -> ConfigResult<RunResult> {
    let mut world_rng = Xorshift64::new(seed);
    let mut pilot_rng = Xorshift64::new(seed ^ AUTOPILOT_SALT);

    let mut session = Session::new(config.session, &mut world_rng)?;
    let mut result = RunResult {
        seed,
        outcome: RunOutcome::Timeout,
        intents: 0,
        refused: 0,
        steps: 0,
        total_medals: session.resources.total_medals,
        medals: 0,
        initial_enemies: session.grid.count(CellKind::Enemy),
        spawned: 0,
        all_medals: false,
        all_enemies_dead: false,
    };

    while result.intents < config.max_intents {
        let intent = pick_intent(&mut pilot_rng);
        result.intents += 1;

        let resolution = session.apply(intent, &mut world_rng);
        if let Resolution::Refused(refusal) = &resolution {
            trace!(seed, %intent, ?refusal, "refused");
            result.refused += 1;
            continue;
        }
        if intent.is_movement() {
            result.steps += 1;
        }

        for event in resolution.events() {
            match *event {
                Event::EnemySpawned { .. } => result.spawned += 1,
                Event::Victory {
                    cause: VictoryCause::AllMedals,
                } => result.all_medals = true,
                Event::Victory {
                    cause: VictoryCause::AllEnemiesDead,
                } => result.all_enemies_dead = true,
                Event::Defeat { cause } => result.outcome = RunOutcome::Defeat(cause),
                _ => {}
            }
        }

        if session.status == GameStatus::Victorious {
            result.outcome = RunOutcome::Exit;
        }
        if !session.is_playing() {
            break;
        }
    }

    result.medals = session.resources.medal_count;
    Ok(result)
}

/// Aggregated statistics over many runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SurveyStats {
    /// Runs completed.
    pub runs: u64,
    /// Runs that reached the exit.
    pub exits: u64,
    /// Runs that hit the intent budget.
    pub timeouts: u64,
    /// Defeats by cause, in [`DefeatCause`] declaration order.
    pub defeats: [u64; 5],
    /// Runs that collected every medal.
    pub all_medals: u64,
    /// Runs that cleared every enemy.
    pub all_enemies_dead: u64,
    /// Sum of intents offered.
    pub intents: u64,
    /// Sum of refused intents.
    pub refused: u64,
    /// Sum of movement steps.
    pub steps: u64,
    /// Sum of medals placed.
    pub total_medals: u64,
    /// Sum of medals collected.
    pub medals: u64,
    /// Sum of enemies at generation.
    pub initial_enemies: u64,
    /// Sum of spawned enemies.
    pub spawned: u64,
}

/// Every defeat cause, in the order used by [`SurveyStats::defeats`].
pub const DEFEAT_CAUSES: [DefeatCause; 5] = [
    DefeatCause::BombStep,
    DefeatCause::BombBlast,
    DefeatCause::EnemyCombat,
    DefeatCause::StarvedHealth,
    DefeatCause::StarvedEnergy,
];

const fn defeat_index(cause: DefeatCause) -> usize {
    match cause {
        DefeatCause::BombStep => 0,
        DefeatCause::BombBlast => 1,
        DefeatCause::EnemyCombat => 2,
        DefeatCause::StarvedHealth => 3,
        DefeatCause::StarvedEnergy => 4,
    }
}

impl SurveyStats {
    /// Add one run.
    pub fn add_result(&mut self, result: &RunResult) {
        self.runs += 1;
        match result.outcome {
            RunOutcome::Exit => self.exits += 1,
            RunOutcome::Timeout => self.timeouts += 1,
            RunOutcome::Defeat(cause) => self.defeats[defeat_index(cause)] += 1,
        }
        self.all_medals += u64::from(result.all_medals);
        self.all_enemies_dead += u64::from(result.all_enemies_dead);
        self.intents += u64::from(result.intents);
        self.refused += u64::from(result.refused);
        self.steps += u64::from(result.steps);
        self.total_medals += u64::from(result.total_medals);
        self.medals += u64::from(result.medals);
        self.initial_enemies += u64::from(result.initial_enemies);
        self.spawned += u64::from(result.spawned);
    }

    /// Fold another accumulator into this one.
    pub fn merge(&mut self, other: &Self) {
        self.runs += other.runs;
        self.exits += other.exits;
        self.timeouts += other.timeouts;
        for (mine, theirs) in self.defeats.iter_mut().zip(other.defeats) {
            *mine += theirs;
        }
        self.all_medals += other.all_medals;
        self.all_enemies_dead += other.all_enemies_dead;
        self.intents += other.intents;
        self.refused += other.refused;
        self.steps += other.steps;
        self.total_medals += other.total_medals;
        self.medals += other.medals;
        self.initial_enemies += other.initial_enemies;
        self.spawned += other.spawned;
    }

    /// Defeats recorded for `cause`.
    #[must_use]
    pub const fn defeats_by(&self, cause: DefeatCause) -> u64 {
        self.defeats[defeat_index(cause)]
    }

    /// Total defeats of any cause.
    #[must_use]
    pub fn total_defeats(&self) -> u64 {
        self.defeats.iter().sum()
    }

    /// `count / runs`, or zero before any run.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn rate(&self, count: u64) -> f64 {
        if self.runs == 0 {
            return 0.0;
        }
        count as f64 / self.runs as f64
    }

    /// Per-run average of a summed counter.
    #[must_use]
    pub fn average(&self, sum: u64) -> f64 {
        self.rate(sum)
    }
}
