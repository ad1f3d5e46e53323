//! Read-only win and loss checks run after each resolved intent.

use crate::game::{CellKind, DefeatCause, EventLog, Grid, ResourceState, Session, VictoryCause};

/// Whether no enemy is left on the grid.
#[must_use]
pub fn all_enemies_dead(grid: &Grid) -> bool {
    !grid.contains(CellKind::Enemy)
}

/// Whether the hero stands in the rightmost column.
#[must_use]
pub fn reached_exit(session: &Session) -> bool {
    session.hero.position.x + 1 == session.grid.columns()
}

/// The starvation defeat implied by `resources`, if any.
///
/// Health is checked before energy.
#[must_use]
pub const fn starvation(resources: &ResourceState) -> Option<DefeatCause> {
    if resources.health < 0 {
        Some(DefeatCause::StarvedHealth)
    } else if resources.energy < 0 {
        Some(DefeatCause::StarvedEnergy)
    } else {
        None
    }
}

/// Announce the exterminator victory if the grid has no enemies left.
pub fn report_enemies_cleared(session: &mut Session, log: &mut EventLog) {
    if all_enemies_dead(&session.grid) {
        session.victory(VictoryCause::AllEnemiesDead, log);
    }
}

/// Defeat a still-playing session whose counters went negative.
pub fn check_starvation(session: &mut Session, log: &mut EventLog) {
    if !session.is_playing() {
        return;
    }
    if let Some(cause) = starvation(&session.resources) {
        session.defeat(cause, log);
    }
}
