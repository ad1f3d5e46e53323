//! Action resolution.
//!
//! Each function mutates the session and records what changed. Energy gating
//! happens in [`Session::apply`](crate::game::Session::apply) before any of
//! these run, so they spend without checking.

use std::time::Duration;

use tracing::{debug, trace};

use crate::game::resources::MOVE_COST;
use crate::game::{
    CellKind, Coord, DefeatCause, Direction, Event, EventLog, Grid, Session, VictoryCause,
    WarningKind, outcome,
};
use crate::random::RandomSource;

/// Energy cost of a shot.
pub const SHOOT_COST: i32 = 20;

/// Energy cost of a shift attack.
pub const SHIFT_ATTACK_COST: i32 = 10;

/// Energy cost of placing a bomb.
pub const BOMB_COST: i32 = 49;

/// Shift attack reaches enemies at most this Manhattan distance away.
pub const SHIFT_ATTACK_RADIUS: u32 = 8;

/// Half-width of a blast square (a radius of 3 gives 7×7).
pub const BLAST_RADIUS: u16 = 3;

/// Inclusive range of health lost when walking into an enemy.
pub const ENEMY_DAMAGE: (u32, u32) = (20, 24);

/// Pause between bullet marks while the shot is revealed.
pub const BULLET_MARK_DELAY: Duration = Duration::from_millis(5);

/// Pause between clears once the bullet has been drawn.
pub const BULLET_CLEAR_DELAY: Duration = Duration::from_millis(50);

/// Cells traversed by one shot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BulletPath {
    /// Traversed cells in flight order, including a struck enemy.
    pub cells: Vec<Coord>,
    /// The enemy the bullet stopped on, if any.
    pub hit: Option<Coord>,
}

/// Trace a bullet from `origin` (exclusive) along `direction`.
///
/// The bullet stops before a wall or the grid edge, and on the first enemy.
#[must_use]
pub fn trace_bullet(grid: &Grid, origin: Coord, direction: Direction) -> BulletPath {
    let mut path = BulletPath::default();
    let mut cursor = origin;

    while let Some(next) = grid.neighbour(cursor, direction) {
        match grid.get(next) {
            None | Some(CellKind::Wall) => break,
            Some(CellKind::Enemy) => {
                path.cells.push(next);
                path.hit = Some(next);
                break;
            }
            Some(_) => path.cells.push(next),
        }
        cursor = next;
    }

    path
}

/// Cells of the blast square around `center`, clipped to the grid.
pub fn blast_area(grid: &Grid, center: Coord) -> impl Iterator<Item = Coord> + use<> {
    let x_lo = center.x.saturating_sub(BLAST_RADIUS);
    let y_lo = center.y.saturating_sub(BLAST_RADIUS);
    let x_hi = center
        .x
        .saturating_add(BLAST_RADIUS)
        .min(grid.columns().saturating_sub(1));
    let y_hi = center
        .y
        .saturating_add(BLAST_RADIUS)
        .min(grid.rows().saturating_sub(1));

    (y_lo..=y_hi).flat_map(move |y| (x_lo..=x_hi).map(move |x| Coord::new(x, y)))
}

/// Move the hero into `target`, restamping the vacated cell.
///
/// A vacated cell that still holds an armed bomb keeps showing it.
fn relocate(session: &mut Session, target: Coord, log: &mut EventLog) {
    let vacated = session.hero.position;
    let left_behind = if session.bombs.contains(&vacated) {
        CellKind::Bomb
    } else {
        CellKind::Hall
    };

    session.grid.set(vacated, left_behind);
    log.cell(vacated, left_behind);

    session.hero.position = target;
    session.grid.set(target, CellKind::Hero);
    log.cell(target, CellKind::Hero);
}

/// Resolve one movement intent.
///
/// Every attempt costs energy and ticks the coffee cooldown, including
/// attempts that run into a wall or off the grid.
pub fn move_hero<R: RandomSource + ?Sized>(
    session: &mut Session,
    direction: Direction,
    rng: &mut R,
    log: &mut EventLog,
) {
    session.hero.face(direction);
    session.resources.spend(MOVE_COST);
    session.resources.tick_cooldown();

    let Some(target) = session.grid.neighbour(session.hero.position, direction) else {
        trace!(?direction, "move off the grid");
        return;
    };
    let Some(kind) = session.grid.get(target) else {
        return;
    };

    match kind {
        CellKind::Bomb => session.defeat(DefeatCause::BombStep, log),
        CellKind::Enemy => {
            let damage = rng.between(ENEMY_DAMAGE.0, ENEMY_DAMAGE.1);
            session.resources.take_damage(damage);
            debug!(damage, health = session.resources.health, "enemy collision");
            if session.resources.health < 0 {
                session.defeat(DefeatCause::EnemyCombat, log);
            } else {
                relocate(session, target, log);
                outcome::check_starvation(session, log);
                if session.is_playing() {
                    outcome::report_enemies_cleared(session, log);
                }
            }
        }
        CellKind::Medal => {
            let all_collected = session.resources.collect_medal();
            relocate(session, target, log);
            outcome::check_starvation(session, log);
            if all_collected && session.is_playing() {
                session.victory(VictoryCause::AllMedals, log);
            }
        }
        CellKind::Coffee => {
            if session.resources.coffee_blocked() {
                session.resources.extend_cooldown();
                log.push(Event::Warning {
                    kind: WarningKind::TooMuchCoffee,
                });
            } else {
                session.resources.drink_coffee();
                relocate(session, target, log);
            }
        }
        CellKind::Heal => {
            if session.resources.heal_would_overflow() {
                session.grid.set(target, CellKind::Heal);
                log.push(Event::Warning {
                    kind: WarningKind::OverHeal,
                });
            } else {
                session.resources.heal();
                relocate(session, target, log);
            }
        }
        CellKind::Wall => {}
        CellKind::Hall | CellKind::Hero | CellKind::Bullet => {
            relocate(session, target, log);
            // A starving hero loses even on the exit column
            outcome::check_starvation(session, log);
            if session.is_playing() && outcome::reached_exit(session) {
                session.victory(VictoryCause::ReachedExit, log);
            }
        }
    }
}

/// Fire along the hero's facing direction.
///
/// The kill and the final grid state are applied at once. The presentation
/// is staged: every path cell is marked `Bullet` in order, then cleared back
/// to `Hall` in order. Pickups and bombs on the path are consumed.
pub fn shoot(session: &mut Session, log: &mut EventLog) {
    session.resources.spend(SHOOT_COST);

    let path = trace_bullet(&session.grid, session.hero.position, session.hero.facing);
    debug!(cells = path.cells.len(), hit = ?path.hit, "bullet traced");

    for &cell in &path.cells {
        session.grid.set(cell, CellKind::Hall);
    }
    session.bombs.retain(|bomb| !path.cells.contains(bomb));

    if path.hit.is_some() {
        outcome::report_enemies_cleared(session, log);
    }

    for (i, &cell) in path.cells.iter().enumerate() {
        let delay = if i == 0 { Duration::ZERO } else { BULLET_MARK_DELAY };
        log.push_after(
            delay,
            Event::CellChanged {
                pos: cell,
                kind: CellKind::Bullet,
            },
        );
    }
    for (i, &cell) in path.cells.iter().enumerate() {
        let delay = if i == 0 {
            BULLET_MARK_DELAY
        } else {
            BULLET_CLEAR_DELAY
        };
        log.push_after(
            delay,
            Event::CellChanged {
                pos: cell,
                kind: CellKind::Hall,
            },
        );
    }
}

/// Clear every enemy within [`SHIFT_ATTACK_RADIUS`] of the hero.
pub fn shift_attack(session: &mut Session, log: &mut EventLog) {
    let hero = session.hero.position;
    let targets: Vec<Coord> = session
        .grid
        .positions_of(CellKind::Enemy)
        .filter(|enemy| enemy.manhattan(hero) <= SHIFT_ATTACK_RADIUS)
        .collect();

    for &enemy in &targets {
        session.grid.set(enemy, CellKind::Hall);
        log.cell(enemy, CellKind::Hall);
    }
    session.resources.spend(SHIFT_ATTACK_COST);
    debug!(killed = targets.len(), "shift attack");

    if !targets.is_empty() {
        outcome::report_enemies_cleared(session, log);
    }
}

/// Arm a bomb under the hero and step to the first open neighbour.
///
/// Neighbours are tried right, left, down, up. With no open neighbour the
/// hero stays on top of the bomb.
pub fn place_bomb(session: &mut Session, log: &mut EventLog) {
    session.resources.spend(BOMB_COST);

    let spot = session.hero.position;
    session.bombs.push(spot);

    let escape = Direction::BOMB_ESCAPE_ORDER
        .into_iter()
        .filter_map(|direction| session.grid.neighbour(spot, direction))
        .find(|&next| session.grid.is(next, CellKind::Hall));

    match escape {
        Some(next) => relocate(session, next, log),
        None => {
            debug!(%spot, "no open cell beside the bomb");
            session.grid.set(spot, CellKind::Bomb);
            log.cell(spot, CellKind::Bomb);
        }
    }
}

/// Detonate every armed bomb.
///
/// Each blast is checked against the hero on its own, so overlapping blasts
/// report one defeat each.
pub fn detonate(session: &mut Session, log: &mut EventLog) {
    let bombs = std::mem::take(&mut session.bombs);

    for &bomb in &bombs {
        let mut hero_caught = false;
        for cell in blast_area(&session.grid, bomb) {
            if cell == session.hero.position {
                hero_caught = true;
            }
            if !session.grid.is(cell, CellKind::Hall) {
                session.grid.set(cell, CellKind::Hall);
                log.cell(cell, CellKind::Hall);
            }
        }
        debug!(%bomb, hero_caught, "bomb detonated");

        if hero_caught {
            session.defeat(DefeatCause::BombBlast, log);
        }
    }

    if session.is_playing() {
        outcome::report_enemies_cleared(session, log);
    }
}
