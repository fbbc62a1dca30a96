//! Core game types and the move engine.
//!
//! This module contains the pure functional core of the game:
//! - Board, tile, and coordinate types
//! - The `apply_move` transition and its per-move `MoveDiff`
//! - Injectable random and id sources
//! - Immutable move history
//!
//! Nothing in this module performs I/O, following the "pure core,
//! imperative shell" philosophy; see `session` for the shell.

mod board;
mod diff;
mod direction;
mod engine;
mod history;
mod position;
mod source;
mod state;
mod tile;

pub use board::{Board, Reach};
pub use diff::{Merge, MoveDiff, Slide, Win};
pub use direction::{Direction, ParseDirectionError, Traversal, Vector};
pub use engine::{apply_move, initial_state, Engine, MoveOutcome};
pub use history::{MoveHistory, MoveRecord};
pub use position::{Position, GRID_SIZE};
pub use source::{IdSource, RandomIds, RngTileSource, SequentialIds, TileSource};
pub use state::{Achievements, GameState, Phase};
pub use tile::{InvalidTileValue, Tile, TileId, TileValue};
