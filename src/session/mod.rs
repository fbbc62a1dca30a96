//! The imperative shell around the pure engine.
//!
//! A [`GameSession`] owns the current [`GameState`], the engine and its
//! sources, the move history, and a [`Persistence`] backend. It serializes
//! inputs, refuses moves once the game is over, and hands every new state
//! to persistence. Storage failures are logged and never affect play.

mod error;
mod persistence;

pub use error::SessionError;
pub use persistence::{MemoryPersistence, Persistence, PersistenceError};

use crate::checkpoint::Checkpoint;
use crate::core::{
    Direction, Engine, GameState, IdSource, MoveDiff, MoveHistory, MoveRecord, Phase, TileSource,
};
use tracing::{debug, info, warn};

/// One player's game, from first move to game over and beyond.
///
/// # Example
///
/// ```rust
/// use tilemerge::core::{Direction, Engine};
/// use tilemerge::session::{GameSession, MemoryPersistence};
///
/// let mut session = GameSession::start(Engine::seeded(7), MemoryPersistence::with_best_score(64));
/// assert_eq!(session.state().best_score, 64);
///
/// for direction in [Direction::Left, Direction::Up, Direction::Right, Direction::Down] {
///     if session.play(direction).is_err() {
///         break;
///     }
/// }
/// assert!(session.state().best_score >= 64);
/// ```
pub struct GameSession<T, I, P> {
    engine: Engine<T, I>,
    state: GameState,
    history: MoveHistory,
    persistence: P,
    last_diff: Option<MoveDiff>,
}

impl<T: TileSource, I: IdSource, P: Persistence> GameSession<T, I, P> {
    /// Begin a fresh game seeded with the stored best score.
    pub fn start(mut engine: Engine<T, I>, persistence: P) -> Self {
        let best_score = load_best_score(&persistence);
        let state = engine.new_game(best_score);
        debug!(best_score, "session started");
        Self {
            engine,
            state,
            history: MoveHistory::new(),
            persistence,
            last_diff: None,
        }
    }

    /// Resume a saved game, falling back to a fresh one if the save is
    /// unreadable or fails validation.
    pub fn resume(mut engine: Engine<T, I>, persistence: P, saved: &str) -> Self {
        let stored_best = load_best_score(&persistence);
        match Checkpoint::from_json(saved) {
            Ok(checkpoint) => {
                let mut state = checkpoint.state;
                state.best_score = state.best_score.max(stored_best);
                engine.observe_board(&state.board);
                info!(
                    checkpoint = %checkpoint.id,
                    score = state.score,
                    moves = checkpoint.history.move_count(),
                    "session resumed"
                );
                Self {
                    engine,
                    state,
                    history: checkpoint.history,
                    persistence,
                    last_diff: None,
                }
            }
            Err(err) => {
                warn!(error = %err, "saved game rejected, starting a new one");
                Self::start(engine, persistence)
            }
        }
    }

    /// Apply one input.
    ///
    /// Rejected once the game is over. A direction that changes nothing is
    /// not an error: the returned diff reports no movement.
    pub fn play(&mut self, direction: Direction) -> Result<&MoveDiff, SessionError> {
        if self.state.phase().is_final() {
            return Err(SessionError::GameOver {
                score: self.state.score,
            });
        }

        let outcome = self.engine.apply(&self.state, direction);
        self.state = outcome.state;
        if outcome.diff.moved() {
            self.history = self.history.record(MoveRecord::from_diff(&outcome.diff));
            self.persist();
        }
        Ok(&*self.last_diff.insert(outcome.diff))
    }

    /// Keep playing after a win.
    pub fn continue_playing(&mut self) {
        if self.state.phase() == Phase::Won {
            self.state = self.state.acknowledge_win();
            self.persist();
        }
    }

    /// Abandon the current game and deal a new one, keeping the best score.
    pub fn new_game(&mut self) {
        let best_score = self.state.best_score;
        self.state = self.engine.new_game(best_score);
        self.history = MoveHistory::new();
        self.last_diff = None;
        info!(best_score, "new game");
        self.persist();
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn history(&self) -> &MoveHistory {
        &self.history
    }

    /// Diff of the most recent input, if any since the game began.
    pub fn last_diff(&self) -> Option<&MoveDiff> {
        self.last_diff.as_ref()
    }

    pub fn engine(&self) -> &Engine<T, I> {
        &self.engine
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    /// Snapshot of the current game for saving.
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint::new(self.state.clone(), self.history.clone())
    }

    fn persist(&mut self) {
        let checkpoint = self.checkpoint();
        if let Err(err) = self.persistence.save(&checkpoint) {
            warn!(error = %err, "failed to persist game");
        }
    }
}

fn load_best_score<P: Persistence>(persistence: &P) -> u64 {
    persistence.load_best_score().unwrap_or_else(|err| {
        warn!(error = %err, "could not load best score, using 0");
        0
    })
}
