//! Hero position and facing.

use serde::{Deserialize, Serialize};

use crate::game::Coord;

/// A cardinal direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Towards row 0.
    #[default]
    Up,
    /// Towards the last row.
    Down,
    /// Towards column 0.
    Left,
    /// Towards the last column.
    Right,
}

impl Direction {
    /// Order in which a hero fleeing a freshly placed bomb tries neighbours.
    pub const BOMB_ESCAPE_ORDER: [Direction; 4] = [
        Direction::Right,
        Direction::Left,
        Direction::Down,
        Direction::Up,
    ];

    /// Column and row offsets of one step in this direction.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// The player's avatar.
///
/// The hero owns its position; the grid's `Hero` cell only mirrors it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hero {
    /// Current position.
    pub position: Coord,
    /// Direction used to aim shots. Movement updates it, blocked or not.
    pub facing: Direction,
}

impl Hero {
    /// Create a hero at `position`, facing up.
    #[must_use]
    pub const fn new(position: Coord) -> Self {
        Self {
            position,
            facing: Direction::Up,
        }
    }

    /// Turn towards `direction`.
    pub fn face(&mut self, direction: Direction) {
        self.facing = direction;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hero_creation() {
        let hero = Hero::new(Coord::new(1, 1));
        assert_eq!(hero.position, Coord::new(1, 1));
        assert_eq!(hero.facing, Direction::Up);
    }

    #[test]
    fn test_hero_face() {
        let mut hero = Hero::new(Coord::new(3, 4));
        hero.face(Direction::Left);
        assert_eq!(hero.facing, Direction::Left);
        assert_eq!(hero.position, Coord::new(3, 4));
    }

    #[test]
    fn test_direction_delta() {
        assert_eq!(Direction::Up.delta(), (0, -1));
        assert_eq!(Direction::Right.delta(), (1, 0));
    }
}
