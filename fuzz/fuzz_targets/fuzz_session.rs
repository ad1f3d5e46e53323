#![no_main]

//! Whole-session fuzzer.
//!
//! Generates a level from fuzzer-chosen dimensions and seed, then offers an
//! arbitrary intent sequence and checks every invariant after each intent.

use arbitrary::Arbitrary;
use labyrinth::game::check_invariants;
use labyrinth::{Coord, Intent, Session, SessionConfig, Xorshift64};
use libfuzzer_sys::fuzz_target;

/// A fuzzer-generated intent.
#[derive(Arbitrary, Debug, Clone, Copy)]
enum FuzzIntent {
    Up,
    Down,
    Left,
    Right,
    Shoot,
    Shift,
    Bomb,
    Detonate,
}

impl From<FuzzIntent> for Intent {
    fn from(intent: FuzzIntent) -> Self {
        match intent {
            FuzzIntent::Up => Intent::MoveUp,
            FuzzIntent::Down => Intent::MoveDown,
            FuzzIntent::Left => Intent::MoveLeft,
            FuzzIntent::Right => Intent::MoveRight,
            FuzzIntent::Shoot => Intent::Shoot,
            FuzzIntent::Shift => Intent::ShiftAttack,
            FuzzIntent::Bomb => Intent::PlaceBomb,
            FuzzIntent::Detonate => Intent::Detonate,
        }
    }
}

/// Structured input for session fuzzing.
#[derive(Arbitrary, Debug)]
struct SessionInput {
    rows: u8,
    columns: u8,
    hero_x: u8,
    hero_y: u8,
    energy: u16,
    seed: u64,
    intents: Vec<FuzzIntent>,
}

fuzz_target!(|input: SessionInput| {
    // Cap sizes to keep iterations fast
    let rows = u16::from(input.rows % 48);
    let columns = u16::from(input.columns % 64);
    let config = SessionConfig {
        rows,
        columns,
        hero_start: Coord::new(u16::from(input.hero_x), u16::from(input.hero_y)),
        energy: i32::from(input.energy),
        ..SessionConfig::default()
    };

    let mut rng = Xorshift64::new(input.seed);
    // Invalid configurations must be rejected, never panic
    let Ok(mut session) = Session::new(config, &mut rng) else {
        return;
    };

    for intent in input.intents.into_iter().take(500) {
        session.apply(intent.into(), &mut rng);

        let violations = check_invariants(&session);
        assert!(violations.is_empty(), "{violations:?}");

        if !session.is_playing() {
            assert!(session.apply(Intent::Detonate, &mut rng).is_refused());
            break;
        }
    }
});
