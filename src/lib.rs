//! Tilemerge: a pure, deterministic engine for the 4x4 sliding tile puzzle
//!
//! Tilemerge follows the "pure core, imperative shell" philosophy. The move
//! engine is a pure function from a game state and a direction to the next
//! state plus a description of what changed; randomness and tile ids come
//! from injected sources so every game can be replayed exactly.
//!
//! # Core Concepts
//!
//! - **GameState**: Board, score, and win/loss flags as a plain value
//! - **apply_move**: The single transition: slide, merge, score, spawn
//! - **MoveDiff**: Tiles added, removed, and merged by one move
//! - **Checkpoint**: Versioned, validated save format
//! - **GameSession**: The shell that sequences inputs and talks to storage
//!
//! # Example
//!
//! ```rust
//! use tilemerge::core::{apply_move, Board, Direction, GameState, RngTileSource, SequentialIds};
//! use tilemerge::Rules;
//!
//! let mut ids = SequentialIds::new();
//! let board = Board::from_rows([[2, 2, 2, 0], [0; 4], [0; 4], [0; 4]], &mut ids).unwrap();
//! let state = GameState::with_board(board, 0);
//!
//! let outcome = apply_move(
//!     &state,
//!     Direction::Left,
//!     &Rules::default(),
//!     &mut RngTileSource::seeded(42),
//!     &mut ids,
//! );
//!
//! // Only the leading pair merges; the third tile slides up behind it.
//! let row = outcome.state.board.rows()[0];
//! assert_eq!(row[0], 4);
//! assert_eq!(row[1], 2);
//! assert_eq!(outcome.state.score, 4);
//! assert_eq!(outcome.diff.merges.len(), 1);
//! ```

pub mod checkpoint;
pub mod core;
pub mod rules;
pub mod session;

// Re-export commonly used types
pub use checkpoint::{Checkpoint, CheckpointError};
pub use self::core::{apply_move, Direction, Engine, GameState, MoveDiff, MoveOutcome, Phase};
pub use rules::{Rules, RulesError};
pub use session::{GameSession, MemoryPersistence, Persistence, SessionError};
