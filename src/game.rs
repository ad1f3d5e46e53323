//! Simulation core for Labyrinth.
//!
//! Implements the rules of a single-player maze session:
//! - Grid of typed cells with bounded access
//! - Deterministic level generation from an injected random source
//! - Health, energy, cooldown and medal counters
//! - Action resolution (move, shoot, shift attack, bombs)
//! - Periodic enemy spawning and win/loss evaluation
//!
//! The core never renders, sleeps or performs I/O. Every resolved intent
//! yields an ordered list of [`TimedEvent`]s for a presenter to replay.

pub mod actions;
mod events;
mod grid;
mod hero;
mod intent;
mod invariants;
pub mod mapgen;
pub mod outcome;
mod resources;
pub mod spawner;
mod state;

pub use actions::{BOMB_COST, BulletPath, SHIFT_ATTACK_COST, SHOOT_COST};
pub use events::{
    DefeatCause, Event, EventLog, Refusal, Resolution, TimedEvent, VictoryCause, WarningKind,
};
pub use grid::{CellKind, Coord, Grid};
pub use hero::{Direction, Hero};
pub use intent::{Intent, UnknownIntent};
pub use invariants::{InvariantViolation, assert_invariants, check_generated, check_invariants};
pub use mapgen::{Level, generate};
pub use resources::{
    COFFEE_COOLDOWN, COFFEE_ENERGY, HEAL_AMOUNT, MAX_HEALTH, MOVE_COST, ResourceSnapshot,
    ResourceState,
};
pub use state::{GameStatus, Session, SessionConfig};
