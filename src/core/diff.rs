//! Per-move change description.
//!
//! Animation and notification layers need to know which tiles appeared,
//! which were consumed, and what a merge was built from. That information
//! lives here, beside the new state, instead of on the tiles themselves.

use super::direction::Direction;
use super::position::Position;
use super::tile::{Tile, TileId};
use serde::{Deserialize, Serialize};

/// A tile that kept its id and changed cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slide {
    pub id: TileId,
    pub from: Position,
    pub to: Position,
}

/// Two equal tiles combined into one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Merge {
    /// The new tile, with a fresh id, at the target cell.
    pub tile: Tile,
    /// The moving tile (as it was before the move) and the tile it hit.
    pub sources: [Tile; 2],
}

/// A win raised by this move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Win {
    /// First tile at or above the win value.
    Standard(u32),
    /// An achievement tier reached for the first time.
    Tier(u32),
}

/// What a single move did to the board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveDiff {
    pub direction: Direction,
    pub slides: Vec<Slide>,
    pub merges: Vec<Merge>,
    pub spawned: Option<Tile>,
    /// Score gained, the sum of all merged values.
    pub points: u64,
    /// Milestones reached for the first time.
    pub new_milestones: Vec<u32>,
    pub win: Option<Win>,
}

impl MoveDiff {
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            slides: Vec::new(),
            merges: Vec::new(),
            spawned: None,
            points: 0,
            new_milestones: Vec::new(),
            win: None,
        }
    }

    pub fn moved(&self) -> bool {
        !self.slides.is_empty() || !self.merges.is_empty()
    }

    /// Tiles that entered the board: merge results, then the spawned tile.
    pub fn tiles_to_add(&self) -> Vec<Tile> {
        self.merges
            .iter()
            .map(|merge| merge.tile)
            .chain(self.spawned)
            .collect()
    }

    /// Tiles consumed by merges, two per merge.
    pub fn tiles_to_remove(&self) -> Vec<Tile> {
        self.merges
            .iter()
            .flat_map(|merge| merge.sources)
            .collect()
    }
}
