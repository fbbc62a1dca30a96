//! Checkpoint error types.

use crate::core::{Position, TileId};
use thiserror::Error;

/// A structural problem found in a restored game.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("Tile {id} claims position {stored} but sits in cell {cell}")]
    MisplacedTile {
        id: TileId,
        stored: Position,
        cell: Position,
    },

    #[error("Tile {id} claims position {stored}, which is outside the grid")]
    OutOfGrid { id: TileId, stored: Position },

    #[error("Tile id {0} appears more than once")]
    DuplicateTileId(TileId),

    #[error("Score {score} exceeds best score {best}")]
    ScoreAboveBest { score: u64, best: u64 },

    #[error("Game-over flag is {flagged} but the board being stuck is {stuck}")]
    InconsistentOver { flagged: bool, stuck: bool },

    #[error("Milestone {0} is recorded more than once")]
    DuplicateMilestone(u32),
}

/// Errors that can occur during checkpoint operations
#[derive(Debug, Error)]
pub enum CheckpointError {
    /// Serialization to JSON or binary format failed
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    /// Deserialization from JSON or binary format failed
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),

    /// Checkpoint version is not supported by this version
    #[error("Unsupported checkpoint version {found}, supported: {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// Checkpoint data failed validation
    #[error("Checkpoint validation failed: {}", describe(.0))]
    ValidationFailed(Vec<Violation>),
}

fn describe(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
