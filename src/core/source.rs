//! Injectable sources of randomness and tile identity.
//!
//! The engine never reaches for a global RNG or clock. Spawn positions,
//! spawn values, and fresh tile ids all come from these traits, so tests
//! can substitute scripted stand-ins and replays can be made deterministic
//! with a seed.

use super::tile::{TileId, TileValue};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;
use uuid::Uuid;

/// Chooses where a new tile appears and what it is worth.
pub trait TileSource {
    /// Index into a list of `candidates` empty cells. `candidates` is never zero.
    fn pick_cell(&mut self, candidates: usize) -> usize;

    /// A 4 with probability `four_probability`, a 2 otherwise.
    fn pick_value(&mut self, four_probability: f64) -> TileValue;
}

/// Hands out ids for newly created tiles.
pub trait IdSource {
    fn next_id(&mut self) -> TileId;

    /// Note an id already in use (e.g. on a restored board) so it is never
    /// handed out again.
    fn observe(&mut self, _id: TileId) {}
}

impl<T: TileSource + ?Sized> TileSource for &mut T {
    fn pick_cell(&mut self, candidates: usize) -> usize {
        (**self).pick_cell(candidates)
    }

    fn pick_value(&mut self, four_probability: f64) -> TileValue {
        (**self).pick_value(four_probability)
    }
}

impl<I: IdSource + ?Sized> IdSource for &mut I {
    fn next_id(&mut self) -> TileId {
        (**self).next_id()
    }

    fn observe(&mut self, id: TileId) {
        (**self).observe(id)
    }
}

/// [`TileSource`] backed by any `rand` generator.
///
/// # Example
///
/// ```rust
/// use tilemerge::core::{RngTileSource, TileSource};
///
/// let mut a = RngTileSource::seeded(7);
/// let mut b = RngTileSource::seeded(7);
/// assert_eq!(a.pick_cell(16), b.pick_cell(16));
/// ```
#[derive(Debug, Clone)]
pub struct RngTileSource<R> {
    rng: R,
}

impl<R: Rng> RngTileSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngTileSource<StdRng> {
    /// Reproducible source for replays and tests.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Source seeded from the operating system.
    pub fn from_os_rng() -> Self {
        Self::new(StdRng::from_os_rng())
    }
}

impl<R: Rng> TileSource for RngTileSource<R> {
    fn pick_cell(&mut self, candidates: usize) -> usize {
        self.rng.random_range(0..candidates.max(1))
    }

    fn pick_value(&mut self, four_probability: f64) -> TileValue {
        if self.rng.random::<f64>() < four_probability {
            TileValue::FOUR
        } else {
            TileValue::TWO
        }
    }
}

/// Monotonic ids: 1, 2, 3, ... encoded as UUIDs.
#[derive(Debug, Clone, Default)]
pub struct SequentialIds {
    issued: u128,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdSource for SequentialIds {
    /// Falls back to random v4 ids once the counter is exhausted, which only
    /// happens after observing ids near `u128::MAX`.
    fn next_id(&mut self) -> TileId {
        match self.issued.checked_add(1) {
            Some(next) => {
                self.issued = next;
                TileId::from_u128(next)
            }
            None => {
                debug!("sequential ids exhausted, issuing a random id");
                TileId::from_uuid(Uuid::new_v4())
            }
        }
    }

    fn observe(&mut self, id: TileId) {
        self.issued = self.issued.max(id.as_uuid().as_u128());
    }
}

/// Random v4 UUID ids.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIds;

impl IdSource for RandomIds {
    fn next_id(&mut self) -> TileId {
        TileId::from_uuid(Uuid::new_v4())
    }
}
