//! The persistence collaborator seen from the session.

use crate::checkpoint::{Checkpoint, CheckpointError};
use thiserror::Error;

/// Errors a storage backend may report.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Checkpoint(#[from] CheckpointError),
}

/// Durable storage for the best score and the game in progress.
///
/// Failures never reach the engine: the session logs them and carries on.
pub trait Persistence {
    /// Best score from earlier games; `Ok(0)` when none was stored.
    fn load_best_score(&self) -> Result<u64, PersistenceError>;

    /// Called after every state change.
    fn save(&mut self, checkpoint: &Checkpoint) -> Result<(), PersistenceError>;
}

/// Keeps the last save in memory as JSON.
///
/// # Example
///
/// ```rust
/// use tilemerge::session::{MemoryPersistence, Persistence};
///
/// let store = MemoryPersistence::with_best_score(512);
/// assert_eq!(store.load_best_score().unwrap(), 512);
/// assert!(store.saved_json().is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryPersistence {
    best_score: u64,
    saved: Option<String>,
    saves: usize,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_best_score(best_score: u64) -> Self {
        Self {
            best_score,
            ..Self::default()
        }
    }

    /// The most recent save, as written.
    pub fn saved_json(&self) -> Option<&str> {
        self.saved.as_deref()
    }

    /// Parse the most recent save back into a checkpoint.
    pub fn load_checkpoint(&self) -> Option<Result<Checkpoint, PersistenceError>> {
        self.saved
            .as_deref()
            .map(|json| Checkpoint::from_json(json).map_err(PersistenceError::from))
    }

    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl Persistence for MemoryPersistence {
    fn load_best_score(&self) -> Result<u64, PersistenceError> {
        Ok(self.best_score)
    }

    fn save(&mut self, checkpoint: &Checkpoint) -> Result<(), PersistenceError> {
        self.saved = Some(checkpoint.to_json()?);
        self.best_score = self.best_score.max(checkpoint.state.best_score);
        self.saves += 1;
        Ok(())
    }
}
