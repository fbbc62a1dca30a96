//! The 4x4 grid of tiles.

use super::direction::{Direction, Vector};
use super::position::{Position, GRID_SIZE};
use super::source::IdSource;
use super::tile::{InvalidTileValue, Tile, TileValue};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Result of a farthest-position search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reach {
    /// Last free cell before an obstacle (the start cell if none is free).
    pub farthest: Position,
    /// The occupied cell that stopped the search, or `None` at the border.
    pub next: Option<Position>,
}

/// A 4x4 grid where each cell holds at most one [`Tile`].
///
/// Cells are stored row by row (`cells[y][x]`). A tile's `position` always
/// equals the coordinates of the cell holding it.
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Board {
    cells: [[Option<Tile>; GRID_SIZE]; GRID_SIZE],
}

impl Board {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a board from tile values, `0` meaning empty.
    ///
    /// # Example
    ///
    /// ```rust
    /// use tilemerge::core::{Board, SequentialIds};
    ///
    /// let board = Board::from_rows(
    ///     [[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]],
    ///     &mut SequentialIds::new(),
    /// )
    /// .unwrap();
    /// assert_eq!(board.tile_count(), 2);
    /// ```
    pub fn from_rows<I: IdSource + ?Sized>(
        rows: [[u32; GRID_SIZE]; GRID_SIZE],
        ids: &mut I,
    ) -> Result<Self, InvalidTileValue> {
        let mut board = Self::empty();
        for position in Position::all() {
            let raw = rows[position.y as usize][position.x as usize];
            if raw != 0 {
                let value = TileValue::new(raw)?;
                board.place(Tile::new(ids.next_id(), value, position));
            }
        }
        Ok(board)
    }

    /// Tile values row by row, `0` for empty cells.
    pub fn rows(&self) -> [[u32; GRID_SIZE]; GRID_SIZE] {
        let mut rows = [[0; GRID_SIZE]; GRID_SIZE];
        for tile in self.tiles() {
            rows[tile.position.y as usize][tile.position.x as usize] = tile.value.get();
        }
        rows
    }

    pub fn get(&self, position: Position) -> Option<&Tile> {
        self.cells
            .get(position.y as usize)
            .and_then(|row| row.get(position.x as usize))
            .and_then(Option::as_ref)
    }

    pub fn is_occupied(&self, position: Position) -> bool {
        self.get(position).is_some()
    }

    /// Put `tile` in the cell its position names, replacing any occupant.
    pub(crate) fn place(&mut self, tile: Tile) {
        self.cells[tile.position.y as usize][tile.position.x as usize] = Some(tile);
    }

    pub(crate) fn remove(&mut self, position: Position) -> Option<Tile> {
        self.cells[position.y as usize][position.x as usize].take()
    }

    /// Every cell with its contents, row-major.
    pub fn cells(&self) -> impl Iterator<Item = (Position, Option<&Tile>)> + '_ {
        Position::all().map(move |position| {
            (
                position,
                self.cells[position.y as usize][position.x as usize].as_ref(),
            )
        })
    }

    /// Occupied cells' tiles, row-major.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> + '_ {
        self.cells.iter().flatten().flatten()
    }

    pub fn tile_count(&self) -> usize {
        self.tiles().count()
    }

    pub fn empty_cells(&self) -> Vec<Position> {
        self.cells()
            .filter(|(_, tile)| tile.is_none())
            .map(|(position, _)| position)
            .collect()
    }

    pub fn is_full(&self) -> bool {
        self.tile_count() == GRID_SIZE * GRID_SIZE
    }

    pub fn max_value(&self) -> Option<TileValue> {
        self.tiles().map(|tile| tile.value).max()
    }

    /// Whether any horizontally or vertically adjacent pair holds equal values.
    ///
    /// Checking each cell's right and lower neighbour covers every pair.
    pub fn has_available_merges(&self) -> bool {
        self.tiles().any(|tile| {
            [Direction::Right, Direction::Down].iter().any(|dir| {
                tile.position
                    .step(dir.vector())
                    .and_then(|neighbour| self.get(neighbour))
                    .is_some_and(|other| other.value == tile.value)
            })
        })
    }

    /// No empty cell and no mergeable neighbours: the game cannot continue.
    pub fn is_stuck(&self) -> bool {
        self.is_full() && !self.has_available_merges()
    }

    /// Walk from `from` along `vector` while cells are free.
    pub fn farthest_position(&self, from: Position, vector: Vector) -> Reach {
        let mut farthest = from;
        loop {
            match farthest.step(vector) {
                Some(cell) if !self.is_occupied(cell) => farthest = cell,
                next => return Reach { farthest, next },
            }
        }
    }

    /// Whether sliding in `direction` would change anything.
    pub fn can_move(&self, direction: Direction) -> bool {
        let vector = direction.vector();
        self.tiles().any(|tile| match tile.position.step(vector) {
            None => false,
            Some(cell) => self
                .get(cell)
                .is_none_or(|neighbour| neighbour.value == tile.value),
        })
    }

    /// Directions in which a move would change the board.
    pub fn legal_directions(&self) -> Vec<Direction> {
        Direction::ALL
            .into_iter()
            .filter(|dir| self.can_move(*dir))
            .collect()
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Board").field("rows", &self.rows()).finish()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "+------+------+------+------+")?;
        for row in self.rows() {
            write!(f, "|")?;
            for value in row {
                if value == 0 {
                    write!(f, "      |")?;
                } else {
                    write!(f, "{:^6}|", value)?;
                }
            }
            writeln!(f)?;
            writeln!(f, "+------+------+------+------+")?;
        }
        Ok(())
    }
}
