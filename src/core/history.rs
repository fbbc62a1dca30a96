//! Move history tracking.
//!
//! Provides immutable tracking of the moves applied in one game, following
//! the same functional discipline as the engine itself.

use super::direction::Direction;
use super::diff::MoveDiff;
use super::tile::TileValue;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single applied move.
///
/// # Example
///
/// ```rust
/// use tilemerge::core::{Direction, MoveRecord};
/// use chrono::Utc;
///
/// let record = MoveRecord {
///     direction: Direction::Left,
///     points: 4,
///     merges: 1,
///     spawned: None,
///     timestamp: Utc::now(),
/// };
/// assert_eq!(record.points, 4);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub direction: Direction,
    /// Score gained by the move
    pub points: u64,
    /// Number of merges performed
    pub merges: usize,
    /// Value of the tile spawned afterwards
    pub spawned: Option<TileValue>,
    /// When the move was applied
    pub timestamp: DateTime<Utc>,
}

impl MoveRecord {
    /// Summarize `diff`, stamped with the current time.
    pub fn from_diff(diff: &MoveDiff) -> Self {
        Self {
            direction: diff.direction,
            points: diff.points,
            merges: diff.merges.len(),
            spawned: diff.spawned.map(|tile| tile.value),
            timestamp: Utc::now(),
        }
    }
}

/// Ordered history of the moves in one game.
///
/// History is immutable - the `record` method returns a new history
/// with the move added.
///
/// # Example
///
/// ```rust
/// use tilemerge::core::{Direction, MoveHistory, MoveRecord};
/// use chrono::Utc;
///
/// let history = MoveHistory::new();
/// let history = history.record(MoveRecord {
///     direction: Direction::Up,
///     points: 0,
///     merges: 0,
///     spawned: None,
///     timestamp: Utc::now(),
/// });
///
/// assert_eq!(history.move_count(), 1);
/// assert_eq!(history.directions(), vec![Direction::Up]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MoveHistory {
    records: Vec<MoveRecord>,
}

impl MoveHistory {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Record a move, returning a new history.
    ///
    /// Does not mutate the existing history.
    pub fn record(&self, record: MoveRecord) -> Self {
        let mut records = self.records.clone();
        records.push(record);
        Self { records }
    }

    /// Directions played, in order.
    pub fn directions(&self) -> Vec<Direction> {
        self.records.iter().map(|record| record.direction).collect()
    }

    pub fn move_count(&self) -> usize {
        self.records.len()
    }

    pub fn total_points(&self) -> u64 {
        self.records.iter().map(|record| record.points).sum()
    }

    /// Time from the first to the last recorded move.
    ///
    /// Returns `None` if there are no moves.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.records.first(), self.records.last()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }

    pub fn records(&self) -> &[MoveRecord] {
        &self.records
    }
}
