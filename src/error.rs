//! Error types for session construction.

use std::fmt;

/// Smallest grid that still has an interior cell and an interior exit row.
pub const MIN_ROWS: u16 = 4;

/// Smallest grid width with at least one interior column.
pub const MIN_COLUMNS: u16 = 3;

/// Invalid session configuration, reported before any generation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Grid dimensions below [`MIN_ROWS`] × [`MIN_COLUMNS`].
    GridTooSmall {
        /// Requested row count.
        rows: u16,
        /// Requested column count.
        columns: u16,
    },
    /// Hero start is on the border or outside the grid.
    HeroOutsideInterior {
        /// Requested column.
        x: u16,
        /// Requested row.
        y: u16,
    },
    /// A prebuilt grid does not match the configured dimensions.
    GridMismatch {
        /// Configured `(rows, columns)`.
        expected: (u16, u16),
        /// Dimensions of the supplied grid.
        actual: (u16, u16),
    },
    /// A prebuilt grid holds a second hero or a leftover bullet.
    StrayCell {
        /// Column of the offending cell.
        x: u16,
        /// Row of the offending cell.
        y: u16,
        /// Glyph found there.
        glyph: char,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::GridTooSmall { rows, columns } => write!(
                f,
                "grid {rows}x{columns} is too small (minimum {MIN_ROWS}x{MIN_COLUMNS})"
            ),
            ConfigError::HeroOutsideInterior { x, y } => {
                write!(f, "hero start ({x}, {y}) is not an interior cell")
            }
            ConfigError::GridMismatch { expected, actual } => write!(
                f,
                "grid is {}x{}, configuration expects {}x{}",
                actual.0, actual.1, expected.0, expected.1
            ),
            ConfigError::StrayCell { x, y, glyph } => {
                write!(f, "unexpected '{glyph}' at ({x}, {y}) in a prebuilt grid")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Result type for session construction.
pub type ConfigResult<T> = Result<T, ConfigError>;
