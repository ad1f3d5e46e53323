//! Events emitted by resolved intents.
//!
//! The core never draws or sleeps. It describes what changed as an ordered
//! list of [`TimedEvent`]s; a presenter applies them in order, waiting
//! `delay` before each one. Only staged effects (the bullet reveal) carry a
//! non-zero delay.

use std::time::Duration;

use serde::{Serialize, Serializer};

use crate::game::{CellKind, Coord, GameStatus};

/// Non-fatal notices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// Coffee picked up while the cooldown is still running.
    TooMuchCoffee,
    /// Heal picked up at (or near) full health.
    OverHeal,
}

/// Why a session was lost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DefeatCause {
    /// Walked onto an armed bomb.
    BombStep,
    /// Caught inside a detonation.
    BombBlast,
    /// An enemy collision drove health below zero.
    EnemyCombat,
    /// Health found negative by the outcome check.
    StarvedHealth,
    /// Energy found negative by the outcome check.
    StarvedEnergy,
}

/// Why a victory was announced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VictoryCause {
    /// Hero reached the rightmost column. Ends the session.
    ReachedExit,
    /// Every medal has been collected.
    AllMedals,
    /// No enemy is left on the grid.
    AllEnemiesDead,
}

impl VictoryCause {
    /// Whether this victory ends the session.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, VictoryCause::ReachedExit)
    }
}

/// Something the presentation layer should know about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A cell changed kind.
    CellChanged {
        /// Position of the cell.
        pos: Coord,
        /// New kind.
        kind: CellKind,
    },
    /// Health, energy or medal count changed.
    ResourceChanged {
        /// Health after the action.
        health: i32,
        /// Energy after the action.
        energy: i32,
        /// Medals collected after the action.
        medal_count: u32,
    },
    /// A pickup was refused.
    Warning {
        /// Which warning.
        kind: WarningKind,
    },
    /// The hero lost.
    Defeat {
        /// What killed the hero.
        cause: DefeatCause,
    },
    /// A victory condition was met.
    Victory {
        /// Which condition.
        cause: VictoryCause,
    },
    /// The spawner placed a new enemy.
    EnemySpawned {
        /// Where it appeared.
        pos: Coord,
    },
}

fn serialize_millis<S: Serializer>(delay: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(u64::try_from(delay.as_millis()).unwrap_or(u64::MAX))
}

/// An event plus how long the presenter waits before applying it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimedEvent {
    /// Wait before this event, relative to the previous one.
    #[serde(rename = "delay_ms", serialize_with = "serialize_millis")]
    pub delay: Duration,
    /// The event itself.
    #[serde(flatten)]
    pub event: Event,
}

impl TimedEvent {
    /// An event to apply immediately.
    #[must_use]
    pub const fn now(event: Event) -> Self {
        Self {
            delay: Duration::ZERO,
            event,
        }
    }
}

/// Ordered event sink used while resolving one intent.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<TimedEvent>,
}

impl EventLog {
    /// Record an event with no delay.
    pub fn push(&mut self, event: Event) {
        self.events.push(TimedEvent::now(event));
    }

    /// Record an event to be applied `delay` after the previous one.
    pub fn push_after(&mut self, delay: Duration, event: Event) {
        self.events.push(TimedEvent { delay, event });
    }

    /// Record a cell change.
    pub fn cell(&mut self, pos: Coord, kind: CellKind) {
        self.push(Event::CellChanged { pos, kind });
    }

    /// Events recorded so far.
    #[must_use]
    pub fn events(&self) -> &[TimedEvent] {
        &self.events
    }

    /// Consume the log.
    #[must_use]
    pub fn into_events(self) -> Vec<TimedEvent> {
        self.events
    }
}

/// Why an intent was not applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Refusal {
    /// Not enough energy for the action.
    InsufficientEnergy {
        /// Energy the action costs.
        needed: i32,
        /// Energy the hero has.
        available: i32,
    },
    /// The session already ended.
    SessionOver {
        /// The terminal status.
        status: GameStatus,
    },
}

/// Result of offering an intent to a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The intent ran; these events describe its effects in order.
    Applied(Vec<TimedEvent>),
    /// The intent was refused and nothing changed.
    Refused(Refusal),
}

impl Resolution {
    /// Timed events, empty when refused.
    #[must_use]
    pub fn timed(&self) -> &[TimedEvent] {
        match self {
            Resolution::Applied(events) => events,
            Resolution::Refused(_) => &[],
        }
    }

    /// Events without timing, empty when refused.
    pub fn events(&self) -> impl Iterator<Item = &Event> + '_ {
        self.timed().iter().map(|timed| &timed.event)
    }

    /// Whether the intent was refused.
    #[must_use]
    pub const fn is_refused(&self) -> bool {
        matches!(self, Resolution::Refused(_))
    }

    /// Whether any event carries a presentation delay.
    #[must_use]
    pub fn is_staged(&self) -> bool {
        self.timed().iter().any(|timed| !timed.delay.is_zero())
    }
}
