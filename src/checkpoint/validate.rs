//! Structural validation of restored game states.
//!
//! A persisted game must pass these checks before it is handed to the
//! engine. Every check runs; all violations are reported together.

use super::error::Violation;
use crate::core::GameState;
use std::collections::HashSet;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Check `state` for structural consistency, accumulating ALL violations.
pub fn validate_state(state: &GameState) -> Validation<(), NonEmptyVec<Violation>> {
    let mut checks: Vec<Validation<(), NonEmptyVec<Violation>>> = Vec::new();

    for (cell, tile) in state.board.cells() {
        if let Some(tile) = tile {
            if !tile.position.in_bounds() {
                checks.push(Validation::fail(Violation::OutOfGrid {
                    id: tile.id,
                    stored: tile.position,
                }));
            } else if tile.position != cell {
                checks.push(Validation::fail(Violation::MisplacedTile {
                    id: tile.id,
                    stored: tile.position,
                    cell,
                }));
            }
        }
    }

    let mut seen = HashSet::new();
    for tile in state.board.tiles() {
        if !seen.insert(tile.id) {
            checks.push(Validation::fail(Violation::DuplicateTileId(tile.id)));
        }
    }

    checks.push(if state.score > state.best_score {
        Validation::fail(Violation::ScoreAboveBest {
            score: state.score,
            best: state.best_score,
        })
    } else {
        Validation::success(())
    });

    let stuck = state.board.is_stuck();
    checks.push(if state.over != stuck {
        Validation::fail(Violation::InconsistentOver {
            flagged: state.over,
            stuck,
        })
    } else {
        Validation::success(())
    });

    let mut milestones = HashSet::new();
    for &value in &state.achieved_milestones {
        if !milestones.insert(value) {
            checks.push(Validation::fail(Violation::DuplicateMilestone(value)));
        }
    }

    // Accumulate ALL failures using all_vec
    Validation::all_vec(checks).map(|_| ())
}
