//! Grid coordinates.

use super::direction::Vector;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Width and height of the board.
pub const GRID_SIZE: usize = 4;

/// A cell coordinate. `x` is the column, `y` the row; `(0, 0)` is top-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: u8,
    pub y: u8,
}

impl Position {
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    /// Whether both coordinates fall inside the grid.
    pub fn in_bounds(self) -> bool {
        (self.x as usize) < GRID_SIZE && (self.y as usize) < GRID_SIZE
    }

    /// The neighbouring cell one step along `vector`, or `None` past the border.
    pub fn step(self, vector: Vector) -> Option<Position> {
        let x = self.x as i16 + vector.dx as i16;
        let y = self.y as i16 + vector.dy as i16;
        let limit = GRID_SIZE as i16;
        if (0..limit).contains(&x) && (0..limit).contains(&y) {
            Some(Position::new(x as u8, y as u8))
        } else {
            None
        }
    }

    /// Every cell in row-major order.
    pub fn all() -> impl Iterator<Item = Position> {
        (0..GRID_SIZE as u8).flat_map(|y| (0..GRID_SIZE as u8).map(move |x| Position::new(x, y)))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
