//! Move directions, their unit vectors, and the traversal order they imply.

use super::position::{Position, GRID_SIZE};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const FORWARD: [usize; GRID_SIZE] = [0, 1, 2, 3];
const REVERSED: [usize; GRID_SIZE] = [3, 2, 1, 0];

/// A direction to slide every tile on the board.
///
/// Produced by whatever input layer sits in front of the engine (arrow keys,
/// WASD, swipe classification); the engine only ever sees this value.
///
/// # Example
///
/// ```rust
/// use tilemerge::core::Direction;
///
/// let dir: Direction = "left".parse().unwrap();
/// assert_eq!(dir, Direction::Left);
/// assert_eq!((dir.vector().dx, dir.vector().dy), (-1, 0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    /// All four directions, clockwise from `Up`.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// Unit vector of travel. `y` grows downwards.
    pub fn vector(self) -> Vector {
        match self {
            Self::Up => Vector { dx: 0, dy: -1 },
            Self::Right => Vector { dx: 1, dy: 0 },
            Self::Down => Vector { dx: 0, dy: 1 },
            Self::Left => Vector { dx: -1, dy: 0 },
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Right => "right",
            Self::Down => "down",
            Self::Left => "left",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a string does not name a direction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown direction '{0}', expected one of: up, right, down, left")]
pub struct ParseDirectionError(pub String);

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" => Ok(Self::Up),
            "right" => Ok(Self::Right),
            "down" => Ok(Self::Down),
            "left" => Ok(Self::Left),
            _ => Err(ParseDirectionError(s.to_string())),
        }
    }
}

/// Unit step along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vector {
    pub dx: i8,
    pub dy: i8,
}

impl Vector {
    /// Cell processing order for a move along this vector.
    ///
    /// Each axis is walked in reverse when the vector points towards its
    /// high end, so the tiles nearest the target edge are finalized first.
    pub fn traversal(self) -> Traversal {
        Traversal {
            xs: if self.dx > 0 { REVERSED } else { FORWARD },
            ys: if self.dy > 0 { REVERSED } else { FORWARD },
        }
    }
}

/// Row and column visiting order for one move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Traversal {
    pub xs: [usize; GRID_SIZE],
    pub ys: [usize; GRID_SIZE],
}

impl Traversal {
    /// All 16 cells, rows outermost.
    pub fn cells(self) -> impl Iterator<Item = Position> {
        self.ys.into_iter().flat_map(move |y| {
            self.xs
                .into_iter()
                .map(move |x| Position::new(x as u8, y as u8))
        })
    }
}
