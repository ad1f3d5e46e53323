//! Session state management.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ConfigError, ConfigResult, MIN_COLUMNS, MIN_ROWS};
use crate::game::actions::{self, BOMB_COST, SHIFT_ATTACK_COST, SHOOT_COST};
use crate::game::{
    CellKind, Coord, DefeatCause, Event, EventLog, Grid, Hero, Intent, Refusal, Resolution,
    ResourceState, VictoryCause, assert_invariants, generate, outcome, spawner,
};
use crate::random::RandomSource;

/// Settings fixed for the lifetime of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Grid rows.
    pub rows: u16,
    /// Grid columns.
    pub columns: u16,
    /// Where the hero spawns. Must be an interior cell.
    pub hero_start: Coord,
    /// Starting health.
    pub health: i32,
    /// Starting energy.
    pub energy: i32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            rows: 20,
            columns: 40,
            hero_start: Coord::new(1, 1),
            health: 100,
            energy: 500,
        }
    }
}

impl SessionConfig {
    /// Check dimensions and hero placement.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub const fn validate(&self) -> ConfigResult<()> {
        if self.rows < MIN_ROWS || self.columns < MIN_COLUMNS {
            return Err(ConfigError::GridTooSmall {
                rows: self.rows,
                columns: self.columns,
            });
        }

        let Coord { x, y } = self.hero_start;
        // Both dimensions are at least 3 here, so the subtractions cannot wrap
        if x == 0 || y == 0 || x >= self.columns - 1 || y >= self.rows - 1 {
            return Err(ConfigError::HeroOutsideInterior { x, y });
        }

        Ok(())
    }
}

/// Where a session stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    /// Accepting intents.
    Playing,
    /// The hero died.
    Defeated,
    /// The hero reached the exit.
    Victorious,
}

/// One playthrough: grid, hero, counters and armed bombs.
///
/// The host loop owns the session and offers it one intent at a time with
/// [`Session::apply`]. Once the status leaves [`GameStatus::Playing`] every
/// intent is refused until [`Session::restart`].
#[derive(Debug, Clone)]
pub struct Session {
    /// Configuration the session was built from.
    config: SessionConfig,
    /// The maze.
    pub grid: Grid,
    /// The hero.
    pub hero: Hero,
    /// Health, energy and counters.
    pub resources: ResourceState,
    /// Armed bombs, in placement order.
    pub bombs: Vec<Coord>,
    /// Current status.
    pub status: GameStatus,
}

impl Session {
    /// Start a session on a freshly generated level.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new<R: RandomSource + ?Sized>(config: SessionConfig, rng: &mut R) -> ConfigResult<Self> {
        let level = generate(&config, rng)?;
        info!(
            rows = config.rows,
            columns = config.columns,
            total_medals = level.total_medals,
            "session started"
        );
        Ok(Self::assemble(config, level.grid, level.total_medals))
    }

    /// Start a session on a prebuilt grid.
    ///
    /// The hero is stamped at `config.hero_start` and every `Medal` on the
    /// grid counts towards the total.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, the grid does not
    /// match its dimensions, or it holds a hero away from `hero_start` or a
    /// bullet.
    pub fn from_grid(config: SessionConfig, mut grid: Grid) -> ConfigResult<Self> {
        config.validate()?;
        if (grid.rows(), grid.columns()) != (config.rows, config.columns) {
            return Err(ConfigError::GridMismatch {
                expected: (config.rows, config.columns),
                actual: (grid.rows(), grid.columns()),
            });
        }

        let stray = grid.iter().find(|&(coord, kind)| match kind {
            CellKind::Hero => coord != config.hero_start,
            CellKind::Bullet => true,
            _ => false,
        });
        if let Some((coord, kind)) = stray {
            return Err(ConfigError::StrayCell {
                x: coord.x,
                y: coord.y,
                glyph: kind.glyph(),
            });
        }

        grid.set(config.hero_start, CellKind::Hero);
        let total_medals = grid.count(CellKind::Medal);
        Ok(Self::assemble(config, grid, total_medals))
    }

    fn assemble(config: SessionConfig, grid: Grid, total_medals: u32) -> Self {
        Self {
            config,
            grid,
            hero: Hero::new(config.hero_start),
            resources: ResourceState::new(config.health, config.energy, total_medals),
            bombs: Vec::new(),
            status: GameStatus::Playing,
        }
    }

    /// Replace everything with a new level under the same configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn restart<R: RandomSource + ?Sized>(&mut self, rng: &mut R) -> ConfigResult<()> {
        *self = Self::new(self.config, rng)?;
        Ok(())
    }

    /// The configuration this session was built from.
    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Whether intents are still accepted.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.status == GameStatus::Playing
    }

    /// Resolve one intent.
    ///
    /// Runs the action, then the outcome check, then (for movement) the
    /// enemy spawner. Refused intents change nothing.
    pub fn apply<R: RandomSource + ?Sized>(&mut self, intent: Intent, rng: &mut R) -> Resolution {
        if !self.is_playing() {
            return Resolution::Refused(Refusal::SessionOver {
                status: self.status,
            });
        }

        let cost = match intent {
            Intent::Shoot => SHOOT_COST,
            Intent::ShiftAttack => SHIFT_ATTACK_COST,
            Intent::PlaceBomb => BOMB_COST,
            _ => 0,
        };
        if !self.resources.can_afford(cost) {
            debug!(%intent, needed = cost, available = self.resources.energy, "intent refused");
            return Resolution::Refused(Refusal::InsufficientEnergy {
                needed: cost,
                available: self.resources.energy,
            });
        }

        let before = self.resources.snapshot();
        let mut log = EventLog::default();

        match intent {
            Intent::MoveUp | Intent::MoveDown | Intent::MoveLeft | Intent::MoveRight => {
                if let Some(direction) = intent.direction() {
                    actions::move_hero(self, direction, rng, &mut log);
                }
            }
            Intent::Shoot => actions::shoot(self, &mut log),
            Intent::ShiftAttack => actions::shift_attack(self, &mut log),
            Intent::PlaceBomb => actions::place_bomb(self, &mut log),
            Intent::Detonate => actions::detonate(self, &mut log),
        }

        outcome::check_starvation(self, &mut log);

        let after = self.resources.snapshot();
        if after != before {
            log.push(Event::ResourceChanged {
                health: after.health,
                energy: after.energy,
                medal_count: after.medal_count,
            });
        }

        if intent.is_movement() {
            spawner::after_movement(self, rng, &mut log);
        }

        assert_invariants(self);

        let events = log.into_events();
        debug!(%intent, events = events.len(), status = ?self.status, "intent resolved");
        Resolution::Applied(events)
    }

    /// End the session in defeat.
    ///
    /// Bomb deaths force health to zero; every defeat clamps the reported
    /// counters to be non-negative.
    pub(crate) fn defeat(&mut self, cause: DefeatCause, log: &mut EventLog) {
        if matches!(cause, DefeatCause::BombStep | DefeatCause::BombBlast) {
            self.resources.health = 0;
        }
        self.resources.clamp_after_defeat();
        self.status = GameStatus::Defeated;
        info!(?cause, "hero defeated");
        log.push(Event::Defeat { cause });
    }

    /// Announce a victory; only terminal causes end the session.
    pub(crate) fn victory(&mut self, cause: VictoryCause, log: &mut EventLog) {
        if cause.is_terminal() {
            self.status = GameStatus::Victorious;
        }
        info!(?cause, "victory");
        log.push(Event::Victory { cause });
    }
}
