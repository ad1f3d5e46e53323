// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! Labyrinth: a deterministic turn-based maze simulation.
//!
//! This crate provides the simulation core of a single-player maze game:
//! - Procedural level generation with structural guarantees
//! - Health, energy and cooldown bookkeeping
//! - Resolution of movement, shots, area attacks and bombs
//! - An ordered, timed event stream for any presenter
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   CLI / TUI presenter  ·  Survey    │
//! ├─────────────────────────────────────┤
//! │   Session (intents → events)        │
//! ├─────────────────────────────────────┤
//! │   Grid · Resources · RandomSource   │
//! └─────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use labyrinth::{Intent, Session, SessionConfig, Xorshift64};
//!
//! let mut rng = Xorshift64::new(42);
//! let mut session = Session::new(SessionConfig::default(), &mut rng).unwrap();
//! let resolution = session.apply(Intent::MoveRight, &mut rng);
//! assert!(!resolution.is_refused());
//! assert_eq!(session.resources.energy, 499);
//! ```

pub mod error;
pub mod game;
pub mod random;
pub mod survey;

pub use error::{ConfigError, ConfigResult};
pub use random::{RandomSource, ScriptedSource, Xorshift64};

// Re-export key game types at crate root for convenience
pub use game::{
    CellKind, Coord, DefeatCause, Direction, Event, GameStatus, Grid, Intent, Refusal,
    Resolution, Session, SessionConfig, TimedEvent, VictoryCause, WarningKind,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_reexports() {
        let mut rng = Xorshift64::new(1);
        let session = Session::new(SessionConfig::default(), &mut rng).unwrap();
        assert_eq!(session.status, GameStatus::Playing);
        assert_eq!(session.grid.get(Coord::new(1, 1)), Some(CellKind::Hero));
    }
}
