//! Multi-intent integration tests for whole sessions.
//!
//! These drive sessions through the public API only, with scripted or seeded
//! randomness, and check the event streams a presenter would receive.
//!
//! Run with: cargo test --release session_integration

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use std::time::Duration;

use labyrinth::game::spawner::SPAWN_INTERVAL;
use labyrinth::game::{DefeatCause, Refusal, VictoryCause, check_invariants};
use labyrinth::survey::{RunOutcome, SurveyConfig, run_session};
use labyrinth::{
    CellKind, Coord, Event, GameStatus, Grid, Intent, RandomSource, Resolution, ScriptedSource,
    Session, SessionConfig, Xorshift64,
};

/// Start a default-sized session whose grid is replaced by `picture`'s
/// top-left corner, the rest being halls inside a wall ring.
fn scenario(picture: &[&str]) -> Session {
    let config = SessionConfig::default();
    let mut grid = Grid::new(config.rows, config.columns).unwrap();
    for (coord, _) in grid.clone().iter() {
        if grid.is_border(coord) {
            grid.set(coord, CellKind::Wall);
        }
    }
    let exit = labyrinth::game::mapgen::exit_cell(config.rows, config.columns);
    grid.set(exit, CellKind::Hall);

    for (y, line) in picture.iter().enumerate() {
        for (x, glyph) in line.chars().enumerate() {
            let kind = CellKind::from_glyph(glyph).unwrap();
            grid.set(
                Coord::new(u16::try_from(x).unwrap(), u16::try_from(y).unwrap()),
                kind,
            );
        }
    }
    Session::from_grid(config, grid).unwrap()
}

fn events(resolution: &Resolution) -> Vec<Event> {
    resolution.events().copied().collect()
}

#[test]
fn test_enemy_collision_draw_22() {
    let mut session = scenario(&["####", "#@E."]);
    // between(20, 24) draws below(5); 2 gives 22 damage
    let mut rng = ScriptedSource::new(vec![2]);

    let resolution = session.apply(Intent::MoveRight, &mut rng);
    let events = events(&resolution);

    assert_eq!(session.resources.health, 78);
    assert_eq!(session.grid.get(Coord::new(2, 1)), Some(CellKind::Hero));
    assert_eq!(session.grid.get(Coord::new(1, 1)), Some(CellKind::Hall));
    assert!(!events.iter().any(|e| matches!(e, Event::Defeat { .. })));
    assert!(events.contains(&Event::ResourceChanged {
        health: 78,
        energy: 499,
        medal_count: 0
    }));
}

#[test]
fn test_reach_exit_from_second_to_last_column() {
    let config = SessionConfig::default();
    let mut session = scenario(&[]);
    let exit = labyrinth::game::mapgen::exit_cell(config.rows, config.columns);

    // Walk to the column before the exit
    session.grid.set(session.hero.position, CellKind::Hall);
    session.hero.position = Coord::new(exit.x - 1, exit.y);
    session.grid.set(session.hero.position, CellKind::Hero);

    let mut rng = Xorshift64::new(1);
    let resolution = session.apply(Intent::MoveRight, &mut rng);

    assert_eq!(session.hero.position.x, config.columns - 1);
    assert_eq!(session.status, GameStatus::Victorious);
    assert!(events(&resolution).contains(&Event::Victory {
        cause: VictoryCause::ReachedExit
    }));
    assert!(session.apply(Intent::MoveLeft, &mut rng).is_refused());
}

#[test]
fn test_exit_step_without_energy_is_defeat() {
    let grid = Grid::from_rows(&["#####", "#..@.", "#...#", "#####"]).unwrap();
    let config = SessionConfig {
        rows: 4,
        columns: 5,
        hero_start: Coord::new(3, 1),
        energy: 0,
        ..SessionConfig::default()
    };
    let mut session = Session::from_grid(config, grid).unwrap();
    let mut rng = Xorshift64::new(1);

    let resolution = session.apply(Intent::MoveRight, &mut rng);
    let events = events(&resolution);

    assert_eq!(session.status, GameStatus::Defeated);
    assert_eq!(session.resources.energy, 0);
    assert!(events.contains(&Event::Defeat {
        cause: DefeatCause::StarvedEnergy
    }));
    assert!(!events.contains(&Event::Victory {
        cause: VictoryCause::ReachedExit
    }));
    assert!(check_invariants(&session).is_empty());
}

#[test]
fn test_shoot_refused_without_energy() {
    let mut session = scenario(&["####", "#@.E"]);
    session.resources.energy = 15;
    let before = session.grid.clone();
    let mut rng = Xorshift64::new(1);

    let resolution = session.apply(Intent::Shoot, &mut rng);

    assert_eq!(
        resolution,
        Resolution::Refused(Refusal::InsufficientEnergy {
            needed: 20,
            available: 15
        })
    );
    assert_eq!(resolution.events().count(), 0);
    assert_eq!(session.grid, before);
    assert_eq!(session.resources.energy, 15);
}

#[test]
fn test_shot_replay_order() {
    let mut session = scenario(&["######", "#@..E."]);
    session.hero.facing = labyrinth::Direction::Right;
    let mut rng = Xorshift64::new(1);

    let resolution = session.apply(Intent::Shoot, &mut rng);
    assert!(resolution.is_staged());

    let cells: Vec<(Coord, CellKind, Duration)> = resolution
        .timed()
        .iter()
        .filter_map(|t| match t.event {
            Event::CellChanged { pos, kind } => Some((pos, kind, t.delay)),
            _ => None,
        })
        .collect();

    let path = [Coord::new(2, 1), Coord::new(3, 1), Coord::new(4, 1)];
    let marks: Vec<Coord> = cells[..3].iter().map(|c| c.0).collect();
    let clears: Vec<Coord> = cells[3..].iter().map(|c| c.0).collect();
    assert_eq!(marks, path);
    assert_eq!(clears, path);
    assert!(cells[..3].iter().all(|c| c.1 == CellKind::Bullet));
    assert!(cells[3..].iter().all(|c| c.1 == CellKind::Hall));

    // The model is already settled before the replay starts
    assert_eq!(session.grid.get(Coord::new(4, 1)), Some(CellKind::Hall));
    assert_eq!(session.resources.energy, 480);
}

#[test]
fn test_bomb_place_and_detonate_from_safety() {
    let mut session = scenario(&[]);
    let mut rng = Xorshift64::new(9);

    session.apply(Intent::PlaceBomb, &mut rng);
    assert_eq!(session.bombs, vec![Coord::new(1, 1)]);
    assert_eq!(session.hero.position, Coord::new(2, 1));

    // Walk out of the 7×7 square
    for _ in 0..4 {
        session.apply(Intent::MoveRight, &mut rng);
    }
    assert_eq!(session.hero.position, Coord::new(6, 1));

    let resolution = session.apply(Intent::Detonate, &mut rng);
    assert!(session.is_playing());
    assert!(session.bombs.is_empty());
    assert_eq!(session.grid.get(Coord::new(1, 1)), Some(CellKind::Hall));
    // Border walls inside the blast are cleared too
    assert_eq!(session.grid.get(Coord::new(0, 0)), Some(CellKind::Hall));
    assert!(!events(&resolution).iter().any(|e| matches!(e, Event::Defeat { .. })));
}

#[test]
fn test_bomb_blast_kills_nearby_hero() {
    let mut session = scenario(&[]);
    let mut rng = Xorshift64::new(9);

    session.apply(Intent::PlaceBomb, &mut rng);
    let resolution = session.apply(Intent::Detonate, &mut rng);

    assert_eq!(session.status, GameStatus::Defeated);
    assert_eq!(session.resources.health, 0);
    assert!(events(&resolution).contains(&Event::Defeat {
        cause: DefeatCause::BombBlast
    }));
}

#[test]
fn test_walking_back_onto_bomb() {
    let mut session = scenario(&[]);
    let mut rng = Xorshift64::new(9);

    session.apply(Intent::PlaceBomb, &mut rng);
    let resolution = session.apply(Intent::MoveLeft, &mut rng);

    assert_eq!(session.status, GameStatus::Defeated);
    assert_eq!(
        events(&resolution).first(),
        Some(&Event::Defeat {
            cause: DefeatCause::BombStep
        })
    );
}

#[test]
fn test_energy_starvation() {
    let mut session = scenario(&[]);
    session.resources.energy = 0;
    let mut rng = Xorshift64::new(2);

    let resolution = session.apply(Intent::MoveDown, &mut rng);
    assert_eq!(session.status, GameStatus::Defeated);
    assert_eq!(session.resources.energy, 0);
    assert!(events(&resolution).contains(&Event::Defeat {
        cause: DefeatCause::StarvedEnergy
    }));
}

#[test]
fn test_enemy_spawns_every_twenty_moves() {
    let mut session = scenario(&[]);
    let mut rng = Xorshift64::new(77);
    let mut spawned = Vec::new();

    // Shuffle up and down between two halls
    for i in 0..SPAWN_INTERVAL * 2 {
        let intent = if i % 2 == 0 {
            Intent::MoveDown
        } else {
            Intent::MoveUp
        };
        let resolution = session.apply(intent, &mut rng);
        for event in resolution.events() {
            if let Event::EnemySpawned { pos } = *event {
                spawned.push((i + 1, pos));
            }
        }
    }

    assert_eq!(spawned.len(), 2);
    assert_eq!(spawned[0].0, SPAWN_INTERVAL);
    assert_eq!(spawned[1].0, SPAWN_INTERVAL * 2);
    assert_eq!(session.grid.get(spawned[1].1), Some(CellKind::Enemy));
    assert_eq!(session.resources.total_steps, SPAWN_INTERVAL * 2);
}

#[test]
fn test_non_movement_does_not_advance_spawner() {
    let mut session = scenario(&[]);
    let mut rng = Xorshift64::new(3);

    for _ in 0..SPAWN_INTERVAL * 2 {
        session.apply(Intent::Detonate, &mut rng);
    }
    assert_eq!(session.resources.steps_since_spawn, 0);
    assert_eq!(session.resources.total_steps, 0);
}

#[test]
fn test_seeded_sessions_replay_identically() {
    let script = Intent::parse_script("r r d d f x r r b l boom d d r r r").unwrap();

    let play = |seed| {
        let mut rng = Xorshift64::new(seed);
        let mut session = Session::new(SessionConfig::default(), &mut rng).unwrap();
        let transcript: Vec<Resolution> = script
            .iter()
            .map(|&intent| session.apply(intent, &mut rng))
            .collect();
        (transcript, session.grid)
    };

    assert_eq!(play(1234), play(1234));
}

#[test]
fn test_long_random_sessions_hold_invariants() {
    for seed in 0..50 {
        let mut rng = Xorshift64::new(seed);
        let mut pilot = Xorshift64::new(seed.wrapping_mul(31));
        let mut session = Session::new(SessionConfig::default(), &mut rng).unwrap();

        for _ in 0..500 {
            let intent = Intent::ALL[usize::try_from(pilot.below(8)).unwrap()];
            session.apply(intent, &mut rng);
            let violations = check_invariants(&session);
            assert!(violations.is_empty(), "seed {seed}: {violations:?}");
            if !session.is_playing() {
                break;
            }
        }
    }
}

#[test]
fn test_restart_after_defeat() {
    let mut rng = Xorshift64::new(8);
    let mut session = Session::new(SessionConfig::default(), &mut rng).unwrap();
    session.resources.energy = 0;
    session.apply(Intent::MoveUp, &mut rng);
    assert_eq!(session.status, GameStatus::Defeated);

    session.restart(&mut rng).unwrap();
    assert!(session.is_playing());
    assert_eq!(session.resources.energy, 500);
    assert!(!session.apply(Intent::MoveRight, &mut rng).is_refused());
}

#[test]
fn test_survey_runs_terminate() {
    let config = SurveyConfig {
        max_intents: 300,
        ..SurveyConfig::default()
    };
    for seed in 0..20 {
        let result = run_session(seed, &config).unwrap();
        assert!(result.intents <= 300);
        if result.outcome != RunOutcome::Timeout {
            assert!(result.intents > 0);
        }
    }
}
