//! Game state and its coarse phase.
//!
//! A [`GameState`] is a plain value. The engine never mutates one in place;
//! every move yields a fresh state, leaving the previous snapshot intact.

use super::board::Board;
use super::tile::TileValue;
use serde::{Deserialize, Serialize};

/// Coarse position of a game in its lifecycle.
///
/// # Example
///
/// ```rust
/// use tilemerge::core::{Board, GameState, Phase};
///
/// let state = GameState::with_board(Board::empty(), 0);
/// assert_eq!(state.phase(), Phase::Playing);
/// assert!(!state.phase().is_final());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum Phase {
    Playing,
    /// A win is waiting to be acknowledged.
    Won,
    Over,
}

impl Phase {
    pub fn name(&self) -> &str {
        match self {
            Self::Playing => "Playing",
            Self::Won => "Won",
            Self::Over => "Over",
        }
    }

    /// Final phases accept no further moves.
    pub fn is_final(&self) -> bool {
        matches!(self, Self::Over)
    }
}

/// Achievement tiers reached in the current game, in the order reached.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievements {
    tiers: Vec<u32>,
}

impl Achievements {
    pub fn reached(&self, tier: u32) -> bool {
        self.tiers.contains(&tier)
    }

    pub fn reached_4096(&self) -> bool {
        self.reached(4096)
    }

    pub fn reached_8192(&self) -> bool {
        self.reached(8192)
    }

    pub fn tiers(&self) -> &[u32] {
        &self.tiers
    }

    /// Record `tier`; returns `false` if it was already recorded.
    pub(crate) fn record(&mut self, tier: u32) -> bool {
        if self.reached(tier) {
            false
        } else {
            self.tiers.push(tier);
            true
        }
    }
}

/// Everything the caller needs to render and persist one game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub board: Board,
    pub score: u64,
    /// Highest score across games, seeded from persistence at startup.
    pub best_score: u64,
    /// A winning tile exists and the player has not yet acknowledged it.
    pub won: bool,
    /// No move can change the board any more.
    pub over: bool,
    /// Whether the last applied move changed the board.
    pub moved: bool,
    #[serde(default)]
    pub win_acknowledged: bool,
    #[serde(default)]
    pub achievements: Achievements,
    /// Milestone values in the order they were first reached.
    #[serde(default)]
    pub achieved_milestones: Vec<u32>,
}

impl GameState {
    /// A state wrapping `board` with no score and no flags raised.
    pub fn with_board(board: Board, best_score: u64) -> Self {
        Self {
            board,
            score: 0,
            best_score,
            won: false,
            over: false,
            moved: false,
            win_acknowledged: false,
            achievements: Achievements::default(),
            achieved_milestones: Vec::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        if self.over {
            Phase::Over
        } else if self.won {
            Phase::Won
        } else {
            Phase::Playing
        }
    }

    pub fn max_tile(&self) -> Option<TileValue> {
        self.board.max_value()
    }

    /// The player chose to keep playing after a win.
    ///
    /// Returns a new state; `self` is left untouched.
    pub fn acknowledge_win(&self) -> Self {
        Self {
            won: false,
            win_acknowledged: self.win_acknowledged || self.won,
            ..self.clone()
        }
    }
}
