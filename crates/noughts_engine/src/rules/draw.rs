//! Draw detection logic for tic-tac-toe.
//!
//! A line holding both symbols can never be completed by either side. Once
//! all 8 lines are in that state the game is a draw, even with empty squares
//! left, so the detector can end the game before the board fills up.

use super::super::{Board, Square, Symbol};
use super::LINES;
use super::win::check_win;
use crate::Position;
use tracing::instrument;

/// Checks if the board is full (all squares occupied).
#[instrument(skip(board))]
pub fn is_full(board: &Board) -> bool {
    board.squares().iter().all(|s| *s != Square::Empty)
}

/// Returns true if the line holds at least one of each symbol.
pub fn is_mixed(board: &Board, line: [Position; 3]) -> bool {
    let has = |symbol| line.iter().any(|pos| board.get(*pos) == Square::Occupied(symbol));
    has(Symbol::Cross) && has(Symbol::Nought)
}

/// Checks if neither side can still complete a line.
///
/// Never true for a board that holds a winning line.
#[instrument(skip(board))]
pub fn check_draw(board: &Board) -> bool {
    if is_full(board) {
        return !check_win(board);
    }

    LINES.iter().all(|line| is_mixed(board, *line))
}
