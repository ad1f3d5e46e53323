//! Player intents, independent of the input device.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::game::Direction;

/// A semantic player action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Step up.
    MoveUp,
    /// Step down.
    MoveDown,
    /// Step left.
    MoveLeft,
    /// Step right.
    MoveRight,
    /// Fire along the facing direction.
    Shoot,
    /// Melee every enemy nearby.
    ShiftAttack,
    /// Drop a bomb and step aside.
    PlaceBomb,
    /// Set off every armed bomb.
    Detonate,
}

impl Intent {
    /// Every intent, movement first.
    pub const ALL: [Intent; 8] = [
        Intent::MoveUp,
        Intent::MoveDown,
        Intent::MoveLeft,
        Intent::MoveRight,
        Intent::Shoot,
        Intent::ShiftAttack,
        Intent::PlaceBomb,
        Intent::Detonate,
    ];

    /// The movement intent for `direction`.
    #[must_use]
    pub const fn movement(direction: Direction) -> Self {
        match direction {
            Direction::Up => Intent::MoveUp,
            Direction::Down => Intent::MoveDown,
            Direction::Left => Intent::MoveLeft,
            Direction::Right => Intent::MoveRight,
        }
    }

    /// Direction of a movement intent.
    #[must_use]
    pub const fn direction(self) -> Option<Direction> {
        match self {
            Intent::MoveUp => Some(Direction::Up),
            Intent::MoveDown => Some(Direction::Down),
            Intent::MoveLeft => Some(Direction::Left),
            Intent::MoveRight => Some(Direction::Right),
            Intent::Shoot | Intent::ShiftAttack | Intent::PlaceBomb | Intent::Detonate => None,
        }
    }

    /// Whether this intent moves the hero.
    #[must_use]
    pub const fn is_movement(self) -> bool {
        self.direction().is_some()
    }

    /// Short token accepted by [`Intent::from_str`].
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Intent::MoveUp => "up",
            Intent::MoveDown => "down",
            Intent::MoveLeft => "left",
            Intent::MoveRight => "right",
            Intent::Shoot => "shoot",
            Intent::ShiftAttack => "shift",
            Intent::PlaceBomb => "bomb",
            Intent::Detonate => "detonate",
        }
    }

    /// Parse a whitespace- or comma-separated list of intents.
    ///
    /// # Errors
    ///
    /// Returns the first token that is not a known intent.
    pub fn parse_script(script: &str) -> Result<Vec<Intent>, UnknownIntent> {
        script
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|token| !token.is_empty())
            .map(str::parse)
            .collect()
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// A token that names no intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownIntent(pub String);

impl fmt::Display for UnknownIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown intent '{}'", self.0)
    }
}

impl std::error::Error for UnknownIntent {}

impl FromStr for Intent {
    type Err = UnknownIntent;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "up" | "u" => Intent::MoveUp,
            "down" | "d" => Intent::MoveDown,
            "left" | "l" => Intent::MoveLeft,
            "right" | "r" => Intent::MoveRight,
            "shoot" | "f" | "tab" => Intent::Shoot,
            "shift" | "x" => Intent::ShiftAttack,
            "bomb" | "b" | "enter" => Intent::PlaceBomb,
            "detonate" | "boom" | "space" => Intent::Detonate,
            _ => return Err(UnknownIntent(s.to_string())),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movement_round_trip() {
        for direction in [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ] {
            assert_eq!(Intent::movement(direction).direction(), Some(direction));
        }
        assert!(!Intent::Shoot.is_movement());
        assert!(Intent::MoveLeft.is_movement());
    }

    #[test]
    fn test_parse_tokens() {
        assert_eq!("R".parse::<Intent>(), Ok(Intent::MoveRight));
        assert_eq!("tab".parse::<Intent>(), Ok(Intent::Shoot));
        assert_eq!("space".parse::<Intent>(), Ok(Intent::Detonate));
        assert!("jump".parse::<Intent>().is_err());

        for intent in Intent::ALL {
            assert_eq!(intent.token().parse::<Intent>(), Ok(intent));
        }
    }

    #[test]
    fn test_parse_script() {
        let script = Intent::parse_script("r r, f  x\nb boom").unwrap();
        assert_eq!(
            script,
            vec![
                Intent::MoveRight,
                Intent::MoveRight,
                Intent::Shoot,
                Intent::ShiftAttack,
                Intent::PlaceBomb,
                Intent::Detonate,
            ]
        );

        let err = Intent::parse_script("r fly").unwrap_err();
        assert_eq!(err, UnknownIntent("fly".to_string()));
    }
}
