//! Periodic enemy injection.
//!
//! Every [`SPAWN_INTERVAL`] movement intents a new enemy appears on a random
//! `Hall` cell. Positions are sampled uniformly over the whole grid and
//! rejected until one lands on a hall; after [`MAX_RESAMPLES`] rejections the
//! spawner picks uniformly among the remaining halls instead, and skips the
//! spawn entirely when none are left.

use tracing::{debug, warn};

use crate::game::{CellKind, Coord, Event, EventLog, Grid, Session};
use crate::random::RandomSource;

/// Movement intents between spawns.
pub const SPAWN_INTERVAL: u32 = 20;

/// Rejection-sampling attempts before falling back to an explicit hall list.
pub const MAX_RESAMPLES: u32 = 1024;

/// Pick a uniformly random `Hall` cell, or `None` if the grid has none.
pub fn pick_hall<R: RandomSource + ?Sized>(grid: &Grid, rng: &mut R) -> Option<Coord> {
    for _ in 0..MAX_RESAMPLES {
        let y = rng.below(u32::from(grid.rows()));
        let x = rng.below(u32::from(grid.columns()));
        let (Ok(x), Ok(y)) = (u16::try_from(x), u16::try_from(y)) else {
            continue;
        };
        let coord = Coord::new(x, y);
        if grid.is(coord, CellKind::Hall) {
            return Some(coord);
        }
    }

    let halls: Vec<Coord> = grid.positions_of(CellKind::Hall).collect();
    let count = u32::try_from(halls.len()).ok()?;
    if count == 0 {
        return None;
    }
    let index = usize::try_from(rng.below(count)).ok()?;
    halls.get(index).copied()
}

/// Count one movement intent and spawn an enemy when the interval elapses.
///
/// The counter advances even if the move failed or ended the session, but a
/// finished session never receives a new enemy.
pub fn after_movement<R: RandomSource + ?Sized>(
    session: &mut Session,
    rng: &mut R,
    log: &mut EventLog,
) {
    let res = &mut session.resources;
    res.total_steps += 1;
    res.steps_since_spawn += 1;
    if res.steps_since_spawn < SPAWN_INTERVAL {
        return;
    }
    res.steps_since_spawn = 0;

    if !session.is_playing() {
        return;
    }

    match pick_hall(&session.grid, rng) {
        Some(pos) => {
            session.grid.set(pos, CellKind::Enemy);
            debug!(%pos, total_steps = session.resources.total_steps, "enemy spawned");
            log.push(Event::EnemySpawned { pos });
        }
        None => warn!("no hall left for a new enemy"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GameStatus, SessionConfig};
    use crate::random::ScriptedSource;

    fn session() -> Session {
        let grid = Grid::from_rows(&["#####", "#@..#", "#....", "#...#", "#####"]).unwrap();
        let config = SessionConfig {
            rows: 5,
            columns: 5,
            hero_start: Coord::new(1, 1),
            ..SessionConfig::default()
        };
        Session::from_grid(config, grid).unwrap()
    }

    #[test]
    fn test_pick_hall_rejects_non_halls() {
        let grid = Grid::from_rows(&["###", "#.#", "###"]).unwrap();
        // (row 0, col 0) is a wall, (row 1, col 1) is the hall
        let mut rng = ScriptedSource::new(vec![0, 0, 1, 1]);
        assert_eq!(pick_hall(&grid, &mut rng), Some(Coord::new(1, 1)));
        assert_eq!(rng.consumed(), 4);
    }

    #[test]
    fn test_pick_hall_full_grid() {
        let grid = Grid::from_rows(&["###", "#E#", "###"]).unwrap();
        let mut rng = ScriptedSource::new(Vec::new());
        assert_eq!(pick_hall(&grid, &mut rng), None);
    }

    #[test]
    fn test_pick_hall_falls_back_to_list() {
        let grid = Grid::from_rows(&["####", "#..#", "####"]).unwrap();
        // Every scripted draw is exhausted and returns 0, landing on a wall
        // until the fallback picks the first hall.
        let mut rng = ScriptedSource::new(Vec::new());
        assert_eq!(pick_hall(&grid, &mut rng), Some(Coord::new(1, 1)));
        assert_eq!(rng.consumed(), 2 * MAX_RESAMPLES as usize + 1);
    }

    #[test]
    fn test_spawn_on_interval() {
        let mut session = session();
        let mut log = EventLog::default();
        // Row 2, column 3 is a hall
        let mut rng = ScriptedSource::new(vec![2, 3]);

        for _ in 0..SPAWN_INTERVAL - 1 {
            after_movement(&mut session, &mut rng, &mut log);
        }
        assert!(log.events().is_empty());
        assert_eq!(session.resources.steps_since_spawn, SPAWN_INTERVAL - 1);

        after_movement(&mut session, &mut rng, &mut log);
        assert_eq!(session.resources.steps_since_spawn, 0);
        assert_eq!(session.resources.total_steps, SPAWN_INTERVAL);
        assert_eq!(session.grid.get(Coord::new(3, 2)), Some(CellKind::Enemy));
        assert_eq!(
            log.events()[0].event,
            Event::EnemySpawned {
                pos: Coord::new(3, 2)
            }
        );
    }

    #[test]
    fn test_no_spawn_after_session_over() {
        let mut session = session();
        session.status = GameStatus::Victorious;
        session.resources.steps_since_spawn = SPAWN_INTERVAL - 1;
        let mut log = EventLog::default();
        let mut rng = ScriptedSource::new(Vec::new());

        after_movement(&mut session, &mut rng, &mut log);
        assert_eq!(session.resources.steps_since_spawn, 0);
        assert!(log.events().is_empty());
        assert_eq!(rng.consumed(), 0);
    }
}
