//! Deterministic level generation.
//!
//! Every interior cell rolls five independent chances in a fixed order, later
//! rolls overwriting earlier ones. Structural overrides then run in source
//! order: border walls, the hero's spawn, and finally the two exit halls.

use tracing::debug;

use crate::error::{ConfigError, ConfigResult};
use crate::game::{CellKind, Coord, Grid, SessionConfig};
use crate::random::RandomSource;

/// One interior cell in this many becomes a wall.
pub const WALL_ONE_IN: u32 = 5;

/// One interior cell in this many receives each pickup (medal, enemy, heal, coffee).
pub const PICKUP_ONE_IN: u32 = 100;

/// A freshly generated level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Level {
    /// The generated grid.
    pub grid: Grid,
    /// Number of medals placed.
    pub total_medals: u32,
}

/// The guaranteed gap in the right-hand border.
#[must_use]
pub const fn exit_cell(rows: u16, columns: u16) -> Coord {
    Coord::new(columns.saturating_sub(1), rows.saturating_sub(3))
}

/// The cell that is always open next to the hero's spawn.
#[must_use]
pub const fn spawn_exit(hero_start: Coord) -> Coord {
    Coord::new(hero_start.x.saturating_add(1), hero_start.y)
}

/// Generate a level for `config`.
///
/// # Errors
///
/// Returns an error if the configuration is invalid; nothing is drawn from
/// `rng` in that case.
pub fn generate<R: RandomSource + ?Sized>(
    config: &SessionConfig,
    rng: &mut R,
) -> ConfigResult<Level> {
    config.validate()?;

    let mut grid = Grid::new(config.rows, config.columns).ok_or(ConfigError::GridTooSmall {
        rows: config.rows,
        columns: config.columns,
    })?;

    scatter_interior(&mut grid, rng);
    apply_overrides(&mut grid, config.hero_start);

    let total_medals = grid.count(CellKind::Medal);
    debug!(
        rows = config.rows,
        columns = config.columns,
        walls = grid.count(CellKind::Wall),
        enemies = grid.count(CellKind::Enemy),
        total_medals,
        "level generated"
    );

    Ok(Level { grid, total_medals })
}

/// Roll one interior cell. Always consumes exactly five draws.
fn roll_cell<R: RandomSource + ?Sized>(rng: &mut R) -> CellKind {
    let mut cell = CellKind::Hall;

    if rng.one_in(WALL_ONE_IN) {
        cell = CellKind::Wall;
    }
    if rng.one_in(PICKUP_ONE_IN) {
        cell = CellKind::Medal;
    }
    if rng.one_in(PICKUP_ONE_IN) {
        cell = CellKind::Enemy;
    }
    if rng.one_in(PICKUP_ONE_IN) {
        cell = CellKind::Heal;
    }
    if rng.one_in(PICKUP_ONE_IN) {
        cell = CellKind::Coffee;
    }

    cell
}

/// Fill every interior cell with random content, row-major.
fn scatter_interior<R: RandomSource + ?Sized>(grid: &mut Grid, rng: &mut R) {
    for y in 1..grid.rows() - 1 {
        for x in 1..grid.columns() - 1 {
            let kind = roll_cell(rng);
            grid.set(Coord::new(x, y), kind);
        }
    }
}

/// Structural overrides. Order matters: later assignments win.
fn apply_overrides(grid: &mut Grid, hero_start: Coord) {
    let rows = grid.rows();
    let columns = grid.columns();

    for y in 0..rows {
        for x in 0..columns {
            let coord = Coord::new(x, y);
            if grid.is_border(coord) {
                grid.set(coord, CellKind::Wall);
            }
        }
    }

    grid.set(hero_start, CellKind::Hero);

    // The spawn-side opening must never breach the border or the hero.
    let beside_hero = spawn_exit(hero_start);
    if !grid.is_border(beside_hero) && beside_hero != hero_start {
        grid.set(beside_hero, CellKind::Hall);
    }

    grid.set(exit_cell(rows, columns), CellKind::Hall);
}
