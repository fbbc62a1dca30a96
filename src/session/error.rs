//! Session error types.

use thiserror::Error;

/// Errors returned to the input layer driving a session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Game is over (final score {score}); start a new game to keep playing")]
    GameOver { score: u64 },
}
