//! Session invariants - sanity checks that detect bugs.
//!
//! These never trigger for sessions driven through [`Session::apply`]. A
//! violation means the resolver left the grid and the counters disagreeing.

use crate::game::mapgen::{exit_cell, spawn_exit};
use crate::game::{CellKind, Coord, GameStatus, Grid, Session};

/// Invariant violation error.
#[derive(Debug, Clone)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

fn violation(violations: &mut Vec<InvariantViolation>, message: String) {
    violations.push(InvariantViolation { message });
}

/// Check all session invariants.
///
/// Returns a list of violations found, or empty if all invariants hold.
#[must_use]
pub fn check_invariants(session: &Session) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let grid = &session.grid;
    let hero = session.hero.position;
    let res = &session.resources;

    if !grid.in_bounds(hero) {
        violation(&mut violations, format!("Hero at {hero} is off the grid"));
    }

    if session.status == GameStatus::Playing {
        let under_hero = grid.get(hero);
        let standing_on_bomb = session.bombs.contains(&hero) && under_hero == Some(CellKind::Bomb);
        if under_hero != Some(CellKind::Hero) && !standing_on_bomb {
            violation(
                &mut violations,
                format!("Hero at {hero} but the cell holds {under_hero:?}"),
            );
        }
    }

    let heroes = grid.count(CellKind::Hero);
    if heroes > 1 {
        violation(&mut violations, format!("{heroes} hero cells on the grid"));
    }

    let bullets = grid.count(CellKind::Bullet);
    if bullets > 0 {
        violation(
            &mut violations,
            format!("{bullets} bullet cells left on the grid"),
        );
    }

    for &bomb in &session.bombs {
        if bomb != hero && !grid.is(bomb, CellKind::Bomb) {
            violation(
                &mut violations,
                format!("Armed bomb at {bomb} but the cell holds {:?}", grid.get(bomb)),
            );
        }
    }

    if res.medal_count > res.total_medals {
        violation(
            &mut violations,
            format!(
                "Collected {} medals of {}",
                res.medal_count, res.total_medals
            ),
        );
    }

    if session.status == GameStatus::Defeated && (res.health < 0 || res.energy < 0) {
        violation(
            &mut violations,
            format!(
                "Defeated with unclamped counters health={} energy={}",
                res.health, res.energy
            ),
        );
    }

    violations
}

/// Check the structural guarantees of a freshly generated grid.
#[must_use]
pub fn check_generated(grid: &Grid, hero_start: Coord) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let exit = exit_cell(grid.rows(), grid.columns());

    for (coord, kind) in grid.iter() {
        if coord == exit {
            if kind != CellKind::Hall {
                violation(&mut violations, format!("Exit {coord} holds {kind:?}"));
            }
        } else if grid.is_border(coord) && kind != CellKind::Wall {
            violation(&mut violations, format!("Border {coord} holds {kind:?}"));
        }
    }

    if grid.get(hero_start) != Some(CellKind::Hero) {
        violation(
            &mut violations,
            format!("No hero at the spawn {hero_start}"),
        );
    }

    let beside = spawn_exit(hero_start);
    if !grid.is_border(beside) && grid.get(beside) != Some(CellKind::Hall) {
        violation(
            &mut violations,
            format!("Cell {beside} beside the spawn is not a hall"),
        );
    }

    violations
}

/// Assert all session invariants hold, panicking if any are violated.
///
/// Only active in debug builds. No-op in release builds.
///
/// # Panics
///
/// Panics with detailed message if any invariant is violated.
#[cfg(debug_assertions)]
pub fn assert_invariants(session: &Session) {
    let violations = check_invariants(session);
    if !violations.is_empty() {
        let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        panic!("Session invariant violations:\n  - {}", messages.join("\n  - "));
    }
}

/// No-op in release builds.
#[cfg(not(debug_assertions))]
pub fn assert_invariants(_session: &Session) {}
