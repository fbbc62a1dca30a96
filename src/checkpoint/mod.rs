//! Checkpoint and resume support for games.
//!
//! A [`Checkpoint`] is the persisted form of a game: its state and move
//! history, versioned and stamped. Loading always validates the board
//! before anything reaches the engine; a malformed save is rejected with
//! every problem listed.

use crate::core::{GameState, MoveHistory};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stillwater::validation::Validation;
use uuid::Uuid;

pub mod error;
mod validate;

pub use error::{CheckpointError, Violation};
pub use validate::validate_state;

/// Version identifier for checkpoint format
pub const CHECKPOINT_VERSION: u32 = 1;

/// Serializable snapshot of a game in progress.
///
/// # Example
///
/// ```rust
/// use tilemerge::checkpoint::Checkpoint;
/// use tilemerge::core::{Engine, MoveHistory};
///
/// let mut engine = Engine::seeded(3);
/// let checkpoint = Checkpoint::new(engine.new_game(0), MoveHistory::new());
///
/// let json = checkpoint.to_json().unwrap();
/// let restored = Checkpoint::from_json(&json).unwrap();
/// assert_eq!(restored.state, checkpoint.state);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Checkpoint format version
    pub version: u32,

    /// Unique checkpoint identifier
    pub id: String,

    /// When checkpoint was created
    pub timestamp: DateTime<Utc>,

    /// The game being saved
    pub state: GameState,

    /// Moves played so far in this game
    pub history: MoveHistory,
}

impl Checkpoint {
    pub fn new(state: GameState, history: MoveHistory) -> Self {
        Self {
            version: CHECKPOINT_VERSION,
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            state,
            history,
        }
    }

    pub fn to_json(&self) -> Result<String, CheckpointError> {
        serde_json::to_string(self).map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    pub fn to_json_pretty(&self) -> Result<String, CheckpointError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    /// Parse and verify a JSON checkpoint.
    pub fn from_json(json: &str) -> Result<Self, CheckpointError> {
        let checkpoint: Checkpoint = serde_json::from_str(json)
            .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))?;
        checkpoint.verify()?;
        Ok(checkpoint)
    }

    /// Compact binary encoding.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CheckpointError> {
        bincode::serialize(self).map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    /// Decode and verify a binary checkpoint.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CheckpointError> {
        let checkpoint: Checkpoint = bincode::deserialize(bytes)
            .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))?;
        checkpoint.verify()?;
        Ok(checkpoint)
    }

    /// Check the format version and the structural soundness of the state.
    pub fn verify(&self) -> Result<(), CheckpointError> {
        if self.version != CHECKPOINT_VERSION {
            return Err(CheckpointError::UnsupportedVersion {
                found: self.version,
                supported: CHECKPOINT_VERSION,
            });
        }
        match validate_state(&self.state) {
            Validation::Success(_) => Ok(()),
            Validation::Failure(errors) => Err(CheckpointError::ValidationFailed(
                errors.iter().cloned().collect(),
            )),
        }
    }
}
