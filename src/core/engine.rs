//! The move/merge engine.
//!
//! [`apply_move`] is the single state transition of the game: slide every
//! tile in one direction, merge equal neighbours at most once per tile,
//! score, spawn, and re-evaluate the terminal flags. It is a pure function
//! of its inputs plus the injected [`TileSource`] and [`IdSource`].

use super::board::Board;
use super::diff::{Merge, MoveDiff, Slide, Win};
use super::direction::Direction;
use super::position::{Position, GRID_SIZE};
use super::source::{IdSource, RngTileSource, SequentialIds, TileSource};
use super::state::GameState;
use super::tile::Tile;
use crate::rules::Rules;
use rand::rngs::StdRng;
use tracing::{debug, info, trace};

/// A new state together with the changes that produced it.
#[derive(Clone, Debug, PartialEq)]
pub struct MoveOutcome {
    pub state: GameState,
    pub diff: MoveDiff,
}

/// Start a game: an empty board with two spawned tiles.
pub fn initial_state<T, I>(best_score: u64, rules: &Rules, tiles: &mut T, ids: &mut I) -> GameState
where
    T: TileSource + ?Sized,
    I: IdSource + ?Sized,
{
    let mut board = Board::empty();
    for _ in 0..2 {
        spawn_tile(&mut board, rules, tiles, ids);
    }
    GameState::with_board(board, best_score)
}

/// Apply one move to `state`, returning the next state and a diff.
///
/// A direction that changes nothing yields the same board and score with
/// `moved == false`; no tile is spawned and the terminal flags are left as
/// they were.
///
/// # Example
///
/// ```rust
/// use tilemerge::core::{apply_move, Board, Direction, GameState, RngTileSource, SequentialIds};
/// use tilemerge::Rules;
///
/// let mut ids = SequentialIds::new();
/// let board = Board::from_rows([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]], &mut ids).unwrap();
/// let state = GameState::with_board(board, 0);
///
/// let outcome = apply_move(
///     &state,
///     Direction::Left,
///     &Rules::default(),
///     &mut RngTileSource::seeded(1),
///     &mut ids,
/// );
/// assert!(outcome.state.moved);
/// assert_eq!(outcome.state.score, 4);
/// assert_eq!(outcome.state.board.rows()[0][0], 4);
/// ```
pub fn apply_move<T, I>(
    state: &GameState,
    direction: Direction,
    rules: &Rules,
    tiles: &mut T,
    ids: &mut I,
) -> MoveOutcome
where
    T: TileSource + ?Sized,
    I: IdSource + ?Sized,
{
    let vector = direction.vector();
    let mut board = state.board.clone();
    let mut diff = MoveDiff::new(direction);
    // Cells holding a tile created by a merge during this move.
    let mut merged = [[false; GRID_SIZE]; GRID_SIZE];

    for cell in vector.traversal().cells() {
        let Some(tile) = board.get(cell).copied() else {
            continue;
        };
        let reach = board.farthest_position(cell, vector);

        let target = reach
            .next
            .and_then(|next| board.get(next).copied())
            .filter(|target| target.value == tile.value && !is_marked(&merged, target.position));
        if let Some((target, value)) =
            target.and_then(|target| tile.value.doubled().map(|value| (target, value)))
        {
            let result = Tile::new(ids.next_id(), value, target.position);
            board.remove(cell);
            board.place(result);
            merged[target.position.y as usize][target.position.x as usize] = true;
            diff.points += u64::from(value.get());
            diff.merges.push(Merge {
                tile: result,
                sources: [tile, target],
            });
        } else if reach.farthest != cell {
            board.remove(cell);
            board.place(tile.at(reach.farthest));
            diff.slides.push(Slide {
                id: tile.id,
                from: cell,
                to: reach.farthest,
            });
        }
    }

    if !diff.moved() {
        trace!(%direction, "move changed nothing");
        return MoveOutcome {
            state: GameState {
                moved: false,
                ..state.clone()
            },
            diff,
        };
    }

    diff.spawned = spawn_tile(&mut board, rules, tiles, ids);

    let mut next = GameState {
        board,
        score: state.score + diff.points,
        moved: true,
        ..state.clone()
    };
    next.over = next.board.is_stuck();
    diff.win = detect_win(&mut next, rules);
    diff.new_milestones = record_milestones(&mut next, &diff, rules);
    next.best_score = next.best_score.max(next.score);

    debug!(
        %direction,
        slides = diff.slides.len(),
        merges = diff.merges.len(),
        points = diff.points,
        score = next.score,
        "move applied"
    );
    if next.over {
        info!(score = next.score, "game over");
    }

    MoveOutcome { state: next, diff }
}

fn is_marked(merged: &[[bool; GRID_SIZE]; GRID_SIZE], position: Position) -> bool {
    merged[position.y as usize][position.x as usize]
}

/// Drop a 2 or 4 on a uniformly chosen empty cell.
fn spawn_tile<T, I>(board: &mut Board, rules: &Rules, tiles: &mut T, ids: &mut I) -> Option<Tile>
where
    T: TileSource + ?Sized,
    I: IdSource + ?Sized,
{
    let empty = board.empty_cells();
    if empty.is_empty() {
        return None;
    }
    let index = tiles.pick_cell(empty.len()).min(empty.len() - 1);
    let value = tiles.pick_value(rules.four_probability);
    let tile = Tile::new(ids.next_id(), value, empty[index]);
    board.place(tile);
    trace!(value = value.get(), position = %tile.position, "tile spawned");
    Some(tile)
}

/// Raise `won` for a first win or a newly reached achievement tier.
///
/// The plain win is suppressed once acknowledged; tiers are tracked
/// separately and re-raise `won` even after an acknowledged win.
fn detect_win(state: &mut GameState, rules: &Rules) -> Option<Win> {
    let max = state.board.max_value().map_or(0, |value| value.get());
    let mut win = None;

    if !state.won && !state.win_acknowledged && max >= rules.win_value {
        state.won = true;
        win = Some(Win::Standard(rules.win_value));
    }
    for &tier in &rules.achievement_tiers {
        if max >= tier && state.achievements.record(tier) {
            state.won = true;
            win = Some(Win::Tier(tier));
        }
    }

    if let Some(win) = win {
        info!(?win, score = state.score, "win reached");
    }
    win
}

fn record_milestones(state: &mut GameState, diff: &MoveDiff, rules: &Rules) -> Vec<u32> {
    let mut fresh = Vec::new();
    for tile in diff.tiles_to_add() {
        let value = tile.value.get();
        if rules.is_milestone(value) && !state.achieved_milestones.contains(&value) {
            state.achieved_milestones.push(value);
            fresh.push(value);
            info!(value, "milestone reached");
        }
    }
    fresh
}

/// The engine bundled with its ruleset and sources.
///
/// # Example
///
/// ```rust
/// use tilemerge::core::{Direction, Engine};
///
/// let mut engine = Engine::seeded(42);
/// let state = engine.new_game(0);
/// assert_eq!(state.board.tile_count(), 2);
///
/// let outcome = engine.apply(&state, Direction::Up);
/// assert!(outcome.state.score >= state.score);
/// ```
#[derive(Debug, Clone)]
pub struct Engine<T, I> {
    rules: Rules,
    tiles: T,
    ids: I,
}

impl<T: TileSource, I: IdSource> Engine<T, I> {
    /// Bundle `rules` with the spawn and id sources it will draw from.
    pub fn new(rules: Rules, tiles: T, ids: I) -> Self {
        Self { rules, tiles, ids }
    }

    /// The ruleset every move is played under.
    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Make sure ids already on `board` are never issued again.
    pub fn observe_board(&mut self, board: &Board) {
        for tile in board.tiles() {
            self.ids.observe(tile.id);
        }
    }

    /// Deal a fresh two-tile board carrying over `best_score`.
    pub fn new_game(&mut self, best_score: u64) -> GameState {
        initial_state(best_score, &self.rules, &mut self.tiles, &mut self.ids)
    }

    /// Play one move; see [`apply_move`].
    pub fn apply(&mut self, state: &GameState, direction: Direction) -> MoveOutcome {
        apply_move(
            state,
            direction,
            &self.rules,
            &mut self.tiles,
            &mut self.ids,
        )
    }
}

impl Engine<RngTileSource<StdRng>, SequentialIds> {
    /// Classic rules with reproducible spawns and sequential ids.
    pub fn seeded(seed: u64) -> Self {
        Self::new(
            Rules::default(),
            RngTileSource::seeded(seed),
            SequentialIds::new(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Phase, TileValue};
    use std::collections::VecDeque;

    /// Always spawns at the first free cell (or a scripted index) with a
    /// scripted value, defaulting to 2.
    #[derive(Default)]
    struct Scripted {
        cells: VecDeque<usize>,
        values: VecDeque<TileValue>,
    }

    impl Scripted {
        fn values(values: &[u32]) -> Self {
            Self {
                cells: VecDeque::new(),
                values: values.iter().map(|v| TileValue::new(*v).unwrap()).collect(),
            }
        }
    }

    impl TileSource for Scripted {
        fn pick_cell(&mut self, _candidates: usize) -> usize {
            self.cells.pop_front().unwrap_or(0)
        }

        fn pick_value(&mut self, _four_probability: f64) -> TileValue {
            self.values.pop_front().unwrap_or(TileValue::TWO)
        }
    }

    struct Fixture {
        ids: SequentialIds,
        tiles: Scripted,
        rules: Rules,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                ids: SequentialIds::new(),
                tiles: Scripted::default(),
                rules: Rules::default(),
            }
        }

        fn state(&mut self, rows: [[u32; 4]; 4]) -> GameState {
            GameState::with_board(Board::from_rows(rows, &mut self.ids).unwrap(), 0)
        }

        fn apply(&mut self, state: &GameState, direction: Direction) -> MoveOutcome {
            apply_move(state, direction, &self.rules, &mut self.tiles, &mut self.ids)
        }
    }

    /// Board rows with the spawned tile blanked out.
    fn without_spawn(outcome: &MoveOutcome) -> [[u32; 4]; 4] {
        let mut rows = outcome.state.board.rows();
        if let Some(tile) = outcome.diff.spawned {
            rows[tile.position.y as usize][tile.position.x as usize] = 0;
        }
        rows
    }

    #[test]
    fn end_to_end_pair_merges_left() {
        let mut fx = Fixture::new();
        let state = fx.state([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);

        let outcome = fx.apply(&state, Direction::Left);

        assert_eq!(without_spawn(&outcome)[0], [4, 0, 0, 0]);
        assert_eq!(outcome.state.score, 4);
        assert!(outcome.state.moved);
        assert!(!outcome.state.over);
        assert!(!outcome.state.won);
        let spawned = outcome.diff.spawned.expect("a tile spawns after a move");
        assert!(matches!(spawned.value.get(), 2 | 4));
        assert_ne!(spawned.position, Position::new(0, 0));
        assert_eq!(outcome.state.board.tile_count(), 2);
    }

    #[test]
    fn three_in_a_row_merge_only_the_leading_pair() {
        let mut fx = Fixture::new();
        let state = fx.state([[2, 2, 2, 0], [0; 4], [0; 4], [0; 4]]);

        let outcome = fx.apply(&state, Direction::Left);

        assert_eq!(without_spawn(&outcome)[0], [4, 2, 0, 0]);
        assert_eq!(outcome.diff.merges.len(), 1);
        assert_eq!(outcome.state.score, 4);
    }

    #[test]
    fn four_in_a_row_make_two_merges() {
        let mut fx = Fixture::new();
        let state = fx.state([[2, 2, 2, 2], [0; 4], [0; 4], [0; 4]]);

        let outcome = fx.apply(&state, Direction::Left);

        assert_eq!(without_spawn(&outcome)[0], [4, 4, 0, 0]);
        assert_eq!(outcome.state.score, 8);
    }

    #[test]
    fn merged_tile_does_not_merge_again() {
        let mut fx = Fixture::new();
        let state = fx.state([[4, 2, 2, 0], [0; 4], [0; 4], [0; 4]]);

        let outcome = fx.apply(&state, Direction::Left);
        assert_eq!(without_spawn(&outcome)[0], [4, 4, 0, 0]);

        let state = fx.state([[2, 2, 4, 0], [0; 4], [0; 4], [0; 4]]);
        let outcome = fx.apply(&state, Direction::Left);
        assert_eq!(without_spawn(&outcome)[0], [4, 4, 0, 0]);
        assert_eq!(outcome.diff.merges.len(), 1);
    }

    #[test]
    fn right_moves_merge_the_pair_nearest_the_right_edge() {
        let mut fx = Fixture::new();
        let state = fx.state([[2, 2, 2, 0], [0; 4], [0; 4], [0; 4]]);

        let outcome = fx.apply(&state, Direction::Right);

        assert_eq!(without_spawn(&outcome)[0], [0, 0, 2, 4]);
    }

    #[test]
    fn vertical_moves_work_per_column() {
        let mut fx = Fixture::new();
        let state = fx.state([[2, 0, 0, 8], [2, 0, 0, 0], [0, 0, 0, 8], [4, 0, 0, 0]]);

        let down = fx.apply(&state, Direction::Down);
        let rows = without_spawn(&down);
        assert_eq!([rows[0][0], rows[1][0], rows[2][0], rows[3][0]], [0, 0, 4, 4]);
        assert_eq!([rows[0][3], rows[1][3], rows[2][3], rows[3][3]], [0, 0, 0, 16]);
        assert_eq!(down.state.score, 4 + 16);

        let up = fx.apply(&state, Direction::Up);
        let rows = without_spawn(&up);
        assert_eq!([rows[0][0], rows[1][0], rows[2][0], rows[3][0]], [4, 4, 0, 0]);
        assert_eq!(rows[0][3], 16);
    }

    #[test]
    fn sliding_keeps_ids_and_merging_mints_new_ones() {
        let mut fx = Fixture::new();
        let state = fx.state([[0, 0, 0, 8], [2, 0, 2, 0], [0; 4], [0; 4]]);
        let eight = *state.board.get(Position::new(3, 0)).unwrap();
        let twos: Vec<_> = [Position::new(0, 1), Position::new(2, 1)]
            .iter()
            .map(|p| state.board.get(*p).unwrap().id)
            .collect();

        let outcome = fx.apply(&state, Direction::Left);

        let slid = outcome.state.board.get(Position::new(0, 0)).unwrap();
        assert_eq!(slid.id, eight.id);
        assert_eq!(
            outcome.diff.slides,
            vec![Slide {
                id: eight.id,
                from: Position::new(3, 0),
                to: Position::new(0, 0)
            }]
        );

        let merged = outcome.state.board.get(Position::new(0, 1)).unwrap();
        assert!(!twos.contains(&merged.id));
        let merge = outcome.diff.merges[0];
        assert_eq!(merge.tile, *merged);
        let mut source_ids: Vec<_> = merge.sources.iter().map(|t| t.id).collect();
        source_ids.sort();
        assert_eq!(source_ids, twos);
        assert_eq!(outcome.diff.tiles_to_remove().len(), 2);
        assert_eq!(outcome.diff.tiles_to_add().len(), 2);
    }

    #[test]
    fn compacted_direction_is_a_no_op() {
        let mut fx = Fixture::new();
        let mut state = fx.state([[2, 4, 0, 0], [8, 0, 0, 0], [0; 4], [0; 4]]);
        state.score = 12;
        state.moved = true;

        let outcome = fx.apply(&state, Direction::Left);

        assert!(!outcome.state.moved);
        assert!(!outcome.diff.moved());
        assert!(outcome.diff.spawned.is_none());
        assert_eq!(outcome.state.board, state.board);
        assert_eq!(outcome.state.score, 12);
    }

    #[test]
    fn moves_on_a_stuck_board_are_no_ops() {
        let mut fx = Fixture::new();
        let mut state = fx.state([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]);
        state.over = true;

        for direction in Direction::ALL {
            let outcome = fx.apply(&state, direction);
            assert!(!outcome.state.moved);
            assert_eq!(outcome.state.board, state.board);
            assert!(outcome.state.over);
        }
    }

    #[test]
    fn empty_board_is_a_no_op() {
        let mut fx = Fixture::new();
        let state = fx.state([[0; 4]; 4]);
        let outcome = fx.apply(&state, Direction::Down);
        assert!(!outcome.state.moved);
        assert_eq!(outcome.state.board.tile_count(), 0);
    }

    #[test]
    fn filling_the_last_cell_without_merges_ends_the_game() {
        let mut fx = Fixture::new();
        // After sliding right the top row leaves (0,0) empty; a scripted 4
        // lands there and nothing can merge any more.
        fx.tiles = Scripted::values(&[4]);
        let state = fx.state([[2, 8, 16, 0], [8, 4, 2, 4], [2, 8, 4, 2], [4, 2, 8, 4]]);

        let outcome = fx.apply(&state, Direction::Right);

        assert_eq!(outcome.state.board.rows()[0], [4, 2, 8, 16]);
        assert!(outcome.state.over);
        assert_eq!(outcome.state.phase(), Phase::Over);
    }

    #[test]
    fn full_board_with_a_pair_is_not_over() {
        let mut fx = Fixture::new();
        fx.tiles = Scripted::values(&[2]);
        let state = fx.state([[2, 8, 16, 0], [8, 4, 2, 4], [2, 8, 4, 2], [4, 2, 8, 4]]);

        let outcome = fx.apply(&state, Direction::Right);

        assert_eq!(outcome.state.board.rows()[0], [2, 2, 8, 16]);
        assert!(outcome.state.board.is_full());
        assert!(!outcome.state.over);
    }

    #[test]
    fn reaching_2048_wins() {
        let mut fx = Fixture::new();
        let state = fx.state([[1024, 1024, 0, 0], [0; 4], [0; 4], [0; 4]]);

        let outcome = fx.apply(&state, Direction::Left);

        assert!(outcome.state.won);
        assert_eq!(outcome.diff.win, Some(Win::Standard(2048)));
        assert_eq!(outcome.state.phase(), Phase::Won);
        assert!(outcome.state.achieved_milestones.contains(&2048));
    }

    #[test]
    fn below_2048_never_wins() {
        let mut fx = Fixture::new();
        let state = fx.state([[512, 512, 1024, 0], [0; 4], [0; 4], [0; 4]]);

        let outcome = fx.apply(&state, Direction::Left);

        assert_eq!(without_spawn(&outcome)[0], [1024, 1024, 0, 0]);
        assert!(!outcome.state.won);
        assert_eq!(outcome.diff.win, None);
    }

    #[test]
    fn acknowledged_win_is_not_raised_again_at_2048() {
        let mut fx = Fixture::new();
        let mut state = fx.state([[2048, 0, 0, 0], [1024, 1024, 0, 0], [0; 4], [0; 4]]);
        state.win_acknowledged = true;

        let outcome = fx.apply(&state, Direction::Left);

        assert!(!outcome.state.won);
        assert_eq!(outcome.diff.win, None);
    }

    #[test]
    fn reaching_4096_after_acknowledging_raises_a_tier_win() {
        let mut fx = Fixture::new();
        let state = fx.state([[2048, 2048, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let state = GameState {
            won: true,
            ..state
        }
        .acknowledge_win();

        let outcome = fx.apply(&state, Direction::Left);

        assert!(outcome.state.won);
        assert!(outcome.state.achievements.reached_4096());
        assert!(!outcome.state.achievements.reached_8192());
        assert_eq!(outcome.diff.win, Some(Win::Tier(4096)));

        // The tier fires once; acknowledging and moving again stays quiet.
        let continued = outcome.state.acknowledge_win();
        let again = fx.apply(&continued, Direction::Right);
        assert!(!again.state.won);
        assert_eq!(again.diff.win, None);
    }

    #[test]
    fn reaching_8192_raises_its_own_tier_win() {
        let mut fx = Fixture::new();
        let state = fx.state([[4096, 4096, 0, 0], [0; 4], [0; 4], [0; 4]]);

        let outcome = fx.apply(&state, Direction::Left);

        assert_eq!(without_spawn(&outcome)[0], [8192, 0, 0, 0]);
        assert!(outcome.state.won);
        assert_eq!(outcome.diff.win, Some(Win::Tier(8192)));
        assert!(outcome.state.achievements.reached_4096());
        assert!(outcome.state.achievements.reached_8192());
        assert_eq!(outcome.state.achievements.tiers(), &[4096, 8192]);
        assert_eq!(outcome.diff.new_milestones, vec![8192]);
    }

    #[test]
    fn reaching_8192_after_4096_was_acknowledged() {
        let mut fx = Fixture::new();
        let state = fx.state([[2048, 2048, 0, 0], [4096, 0, 0, 0], [0; 4], [0; 4]]);

        let first = fx.apply(&state, Direction::Left);
        assert_eq!(first.diff.win, Some(Win::Tier(4096)));
        assert!(!first.state.achievements.reached_8192());

        let continued = first.state.acknowledge_win();
        let second = fx.apply(&continued, Direction::Up);

        assert_eq!(second.state.board.rows()[0][0], 8192);
        assert!(second.state.won);
        assert_eq!(second.diff.win, Some(Win::Tier(8192)));
        assert!(second.state.achievements.reached_8192());
    }

    #[test]
    fn milestones_are_recorded_once_in_order() {
        let mut fx = Fixture::new();
        let state = fx.state([[128, 128, 0, 0], [128, 128, 0, 0], [0; 4], [0; 4]]);

        let outcome = fx.apply(&state, Direction::Left);
        assert_eq!(outcome.diff.new_milestones, vec![256]);
        assert_eq!(outcome.state.achieved_milestones, vec![256]);

        let outcome = fx.apply(&outcome.state, Direction::Up);
        assert_eq!(outcome.diff.new_milestones, vec![512]);
        assert_eq!(outcome.state.achieved_milestones, vec![256, 512]);
    }

    #[test]
    fn best_score_tracks_the_maximum() {
        let mut fx = Fixture::new();
        let mut state = fx.state([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);
        state.best_score = 100;

        let outcome = fx.apply(&state, Direction::Left);
        assert_eq!(outcome.state.best_score, 100);

        let mut state = fx.state([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);
        state.best_score = 2;
        let outcome = fx.apply(&state, Direction::Left);
        assert_eq!(outcome.state.best_score, 4);
    }

    #[test]
    fn original_state_is_untouched() {
        let mut fx = Fixture::new();
        let state = fx.state([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let before = state.clone();

        let _ = fx.apply(&state, Direction::Left);

        assert_eq!(state, before);
    }

    #[test]
    fn initial_state_has_two_small_tiles() {
        let rules = Rules::default();
        let state = initial_state(
            77,
            &rules,
            &mut RngTileSource::seeded(5),
            &mut SequentialIds::new(),
        );
        assert_eq!(state.board.tile_count(), 2);
        assert!(state.board.tiles().all(|t| matches!(t.value.get(), 2 | 4)));
        assert_eq!(state.score, 0);
        assert_eq!(state.best_score, 77);
        assert!(!state.moved && !state.won && !state.over);
    }

    #[test]
    fn seeded_engines_replay_identically() {
        let mut a = Engine::seeded(11);
        let mut b = Engine::seeded(11);
        let mut sa = a.new_game(0);
        let mut sb = b.new_game(0);
        for direction in [Direction::Left, Direction::Up, Direction::Right, Direction::Down]
            .iter()
            .cycle()
            .take(40)
        {
            sa = a.apply(&sa, *direction).state;
            sb = b.apply(&sb, *direction).state;
        }
        assert_eq!(sa, sb);
    }
}
