//! Tiles, tile values, and tile identifiers.

use super::position::Position;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Opaque tile identifier.
///
/// Stable while a tile slides around the board. A merge consumes both
/// source tiles and produces a tile with a fresh id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileId(Uuid);

impl TileId {
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Deterministic id built from a counter value.
    pub fn from_u128(n: u128) -> Self {
        Self(Uuid::from_u128(n))
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Error for numbers that cannot appear on a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{0} is not a valid tile value (expected a power of two between 2 and 131072)")]
pub struct InvalidTileValue(pub u32);

/// The number printed on a tile: a power of two from 2 up to 131072.
///
/// 131072 is the largest value a 4x4 board can physically hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct TileValue(u32);

impl TileValue {
    pub const TWO: TileValue = TileValue(2);
    pub const FOUR: TileValue = TileValue(4);
    pub const MAX: TileValue = TileValue(131_072);

    pub fn new(value: u32) -> Result<Self, InvalidTileValue> {
        if value >= Self::TWO.0 && value <= Self::MAX.0 && value.is_power_of_two() {
            Ok(Self(value))
        } else {
            Err(InvalidTileValue(value))
        }
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// The value a merge of two such tiles produces, if representable.
    pub fn doubled(self) -> Option<Self> {
        self.0
            .checked_mul(2)
            .and_then(|value| Self::new(value).ok())
    }

}

impl TryFrom<u32> for TileValue {
    type Error = InvalidTileValue;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TileValue> for u32 {
    fn from(value: TileValue) -> Self {
        value.0
    }
}

impl fmt::Display for TileValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A numbered piece occupying one board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    pub id: TileId,
    pub value: TileValue,
    pub position: Position,
}

impl Tile {
    pub fn new(id: TileId, value: TileValue, position: Position) -> Self {
        Self {
            id,
            value,
            position,
        }
    }

    /// Same tile, relocated.
    pub fn at(self, position: Position) -> Self {
        Self { position, ..self }
    }
}
