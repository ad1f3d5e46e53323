//! Grid and cell types.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::game::Direction;

/// A coordinate on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    /// X coordinate (column).
    pub x: u16,
    /// Y coordinate (row).
    pub y: u16,
}

impl Coord {
    /// Create a new coordinate.
    #[must_use]
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    /// One step in `direction`, or `None` when that would go below zero.
    ///
    /// The upper bound is not checked here; use [`Grid::neighbour`] for a
    /// fully bounded step.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<Coord> {
        let (dx, dy) = direction.delta();
        let x = u16::try_from(i32::from(self.x) + dx).ok()?;
        let y = u16::try_from(i32::from(self.y) + dy).ok()?;
        Some(Coord::new(x, y))
    }

    /// Manhattan distance to `other`.
    #[must_use]
    pub fn manhattan(self, other: Coord) -> u32 {
        u32::from(self.x.abs_diff(other.x)) + u32::from(self.y.abs_diff(other.y))
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// What occupies a grid position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum CellKind {
    /// Open floor.
    Hall = 0,
    /// Impassable wall.
    Wall = 1,
    /// Collectible medal.
    Medal = 2,
    /// Static enemy.
    Enemy = 3,
    /// Mirror of the hero's position.
    Hero = 4,
    /// Health pickup.
    Heal = 5,
    /// Energy pickup, gated by a cooldown.
    Coffee = 6,
    /// A bullet in flight (presentation only).
    Bullet = 7,
    /// An armed bomb.
    Bomb = 8,
}

impl CellKind {
    /// Single-character representation used by text renderers.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            CellKind::Hall => '.',
            CellKind::Wall => '#',
            CellKind::Medal => '$',
            CellKind::Enemy => 'E',
            CellKind::Hero => '@',
            CellKind::Heal => '+',
            CellKind::Coffee => 'c',
            CellKind::Bullet => '*',
            CellKind::Bomb => 'B',
        }
    }

    /// Parse a glyph produced by [`CellKind::glyph`].
    #[must_use]
    pub const fn from_glyph(glyph: char) -> Option<Self> {
        Some(match glyph {
            '.' => CellKind::Hall,
            '#' => CellKind::Wall,
            '$' => CellKind::Medal,
            'E' => CellKind::Enemy,
            '@' => CellKind::Hero,
            '+' => CellKind::Heal,
            'c' => CellKind::Coffee,
            '*' => CellKind::Bullet,
            'B' => CellKind::Bomb,
            _ => return None,
        })
    }
}

/// The maze: a fixed-size matrix of cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    /// Number of rows.
    rows: u16,
    /// Number of columns.
    columns: u16,
    /// Cells stored in row-major order.
    cells: Vec<CellKind>,
}

impl Grid {
    /// Create a grid filled with halls.
    ///
    /// Returns `None` if either dimension is zero.
    #[must_use]
    pub fn new(rows: u16, columns: u16) -> Option<Self> {
        if rows == 0 || columns == 0 {
            return None;
        }

        let size = usize::from(rows) * usize::from(columns);
        Some(Self {
            rows,
            columns,
            cells: vec![CellKind::Hall; size],
        })
    }

    /// Build a grid from text, one line per row, one glyph per cell.
    ///
    /// Returns `None` for an empty picture, ragged rows or unknown glyphs.
    #[must_use]
    pub fn from_rows(lines: &[&str]) -> Option<Self> {
        let rows = u16::try_from(lines.len()).ok()?;
        let columns = u16::try_from(lines.first()?.chars().count()).ok()?;
        let mut grid = Self::new(rows, columns)?;

        for (y, line) in lines.iter().enumerate() {
            if line.chars().count() != usize::from(columns) {
                return None;
            }
            for (x, glyph) in line.chars().enumerate() {
                let kind = CellKind::from_glyph(glyph)?;
                let idx = y * usize::from(columns) + x;
                grid.cells[idx] = kind;
            }
        }

        Some(grid)
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> u16 {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub const fn columns(&self) -> u16 {
        self.columns
    }

    /// Raw cells in row-major order.
    #[must_use]
    #[inline]
    pub fn cells(&self) -> &[CellKind] {
        &self.cells
    }

    /// Check if a coordinate is within the grid bounds.
    #[must_use]
    pub const fn in_bounds(&self, coord: Coord) -> bool {
        coord.x < self.columns && coord.y < self.rows
    }

    /// Check if a coordinate lies on the outermost ring.
    #[must_use]
    pub const fn is_border(&self, coord: Coord) -> bool {
        coord.x == 0 || coord.y == 0 || coord.x + 1 == self.columns || coord.y + 1 == self.rows
    }

    fn coord_to_index(&self, coord: Coord) -> Option<usize> {
        if self.in_bounds(coord) {
            Some(usize::from(coord.y) * usize::from(self.columns) + usize::from(coord.x))
        } else {
            None
        }
    }

    /// Get the cell at the given coordinate.
    #[must_use]
    pub fn get(&self, coord: Coord) -> Option<CellKind> {
        self.coord_to_index(coord).map(|idx| self.cells[idx])
    }

    /// Check whether the cell at `coord` holds `kind`.
    #[must_use]
    pub fn is(&self, coord: Coord, kind: CellKind) -> bool {
        self.get(coord) == Some(kind)
    }

    /// Set the cell at the given coordinate.
    ///
    /// Returns `false` if the coordinate is out of bounds.
    pub fn set(&mut self, coord: Coord, kind: CellKind) -> bool {
        if let Some(idx) = self.coord_to_index(coord) {
            self.cells[idx] = kind;
            true
        } else {
            false
        }
    }

    /// The in-bounds neighbour of `coord` in `direction`.
    #[must_use]
    pub fn neighbour(&self, coord: Coord, direction: Direction) -> Option<Coord> {
        coord.step(direction).filter(|next| self.in_bounds(*next))
    }

    /// Iterate over all coordinates and cells.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, CellKind)> + '_ {
        let columns = usize::from(self.columns);
        self.cells.iter().enumerate().map(move |(idx, &kind)| {
            #[allow(clippy::cast_possible_truncation)]
            let coord = Coord::new((idx % columns) as u16, (idx / columns) as u16);
            (coord, kind)
        })
    }

    /// Iterate over the coordinates holding `kind`.
    pub fn positions_of(&self, kind: CellKind) -> impl Iterator<Item = Coord> + '_ {
        self.iter()
            .filter(move |&(_, k)| k == kind)
            .map(|(coord, _)| coord)
    }

    /// Count cells of a given kind.
    #[must_use]
    pub fn count(&self, kind: CellKind) -> u32 {
        #[allow(clippy::cast_possible_truncation)]
        let n = self.cells.iter().filter(|&&k| k == kind).count() as u32;
        n
    }

    /// Check whether any cell holds `kind`.
    #[must_use]
    pub fn contains(&self, kind: CellKind) -> bool {
        self.cells.contains(&kind)
    }

    /// Text rows, one glyph per cell.
    #[must_use]
    pub fn to_rows(&self) -> Vec<String> {
        self.cells
            .chunks(usize::from(self.columns))
            .map(|row| row.iter().map(|k| k.glyph()).collect())
            .collect()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.to_rows() {
            writeln!(f, "{row}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_creation() {
        let grid = Grid::new(20, 40).unwrap();
        assert_eq!(grid.rows(), 20);
        assert_eq!(grid.columns(), 40);
        assert_eq!(grid.cells().len(), 800);
        assert_eq!(grid.count(CellKind::Hall), 800);
    }

    #[test]
    fn test_grid_zero_size() {
        assert!(Grid::new(0, 10).is_none());
        assert!(Grid::new(10, 0).is_none());
    }

    #[test]
    fn test_grid_get_set() {
        let mut grid = Grid::new(10, 10).unwrap();
        let coord = Coord::new(5, 3);

        assert_eq!(grid.get(coord), Some(CellKind::Hall));
        assert!(grid.set(coord, CellKind::Medal));
        assert_eq!(grid.get(coord), Some(CellKind::Medal));
        assert!(grid.is(coord, CellKind::Medal));
        assert!(!grid.set(Coord::new(10, 0), CellKind::Wall));
    }

    #[test]
    fn test_grid_bounds() {
        let grid = Grid::new(5, 8).unwrap();
        assert!(grid.in_bounds(Coord::new(0, 0)));
        assert!(grid.in_bounds(Coord::new(7, 4)));
        assert!(!grid.in_bounds(Coord::new(8, 0)));
        assert!(!grid.in_bounds(Coord::new(0, 5)));
        assert_eq!(grid.get(Coord::new(8, 0)), None);
    }

    #[test]
    fn test_is_border() {
        let grid = Grid::new(5, 8).unwrap();
        assert!(grid.is_border(Coord::new(0, 2)));
        assert!(grid.is_border(Coord::new(7, 2)));
        assert!(grid.is_border(Coord::new(3, 0)));
        assert!(grid.is_border(Coord::new(3, 4)));
        assert!(!grid.is_border(Coord::new(3, 2)));
    }

    #[test]
    fn test_coord_step() {
        let coord = Coord::new(0, 0);
        assert_eq!(coord.step(Direction::Up), None);
        assert_eq!(coord.step(Direction::Left), None);
        assert_eq!(coord.step(Direction::Right), Some(Coord::new(1, 0)));
        assert_eq!(coord.step(Direction::Down), Some(Coord::new(0, 1)));
    }

    #[test]
    fn test_neighbour_clips_upper_bound() {
        let grid = Grid::new(3, 3).unwrap();
        assert_eq!(grid.neighbour(Coord::new(2, 1), Direction::Right), None);
        assert_eq!(grid.neighbour(Coord::new(1, 2), Direction::Down), None);
        assert_eq!(
            grid.neighbour(Coord::new(1, 1), Direction::Up),
            Some(Coord::new(1, 0))
        );
    }

    #[test]
    fn test_manhattan() {
        assert_eq!(Coord::new(1, 1).manhattan(Coord::new(4, 6)), 8);
        assert_eq!(Coord::new(4, 6).manhattan(Coord::new(1, 1)), 8);
        assert_eq!(Coord::new(3, 3).manhattan(Coord::new(3, 3)), 0);
    }

    #[test]
    fn test_from_rows_round_trip() {
        let picture = ["#####", "#@.E#", "#$+c#", "#####"];
        let grid = Grid::from_rows(&picture).unwrap();
        assert_eq!(grid.rows(), 4);
        assert_eq!(grid.columns(), 5);
        assert_eq!(grid.get(Coord::new(3, 1)), Some(CellKind::Enemy));
        assert_eq!(grid.to_rows(), picture);
    }

    #[test]
    fn test_from_rows_rejects_bad_input() {
        assert!(Grid::from_rows(&[]).is_none());
        assert!(Grid::from_rows(&["###", "##"]).is_none());
        assert!(Grid::from_rows(&["#?#"]).is_none());
    }

    #[test]
    fn test_positions_of() {
        let grid = Grid::from_rows(&["E.E", "...", "..E"]).unwrap();
        let enemies: Vec<_> = grid.positions_of(CellKind::Enemy).collect();
        assert_eq!(
            enemies,
            vec![Coord::new(0, 0), Coord::new(2, 0), Coord::new(2, 2)]
        );
        assert_eq!(grid.count(CellKind::Enemy), 3);
        assert!(grid.contains(CellKind::Enemy));
        assert!(!grid.contains(CellKind::Bomb));
    }

    #[test]
    fn test_display() {
        let grid = Grid::from_rows(&["##", "@."]).unwrap();
        assert_eq!(grid.to_string(), "##\n@.\n");
    }
}
