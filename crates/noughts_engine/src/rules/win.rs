//! Win detection logic for tic-tac-toe.

use super::super::{Board, Square, Symbol};
use super::LINES;
use tracing::instrument;

/// Returns the symbol holding three in a row, if any.
pub fn winning_symbol(board: &Board) -> Option<Symbol> {
    for [a, b, c] in LINES {
        let sq = board.get(a);
        if let Square::Occupied(symbol) = sq
            && sq == board.get(b)
            && sq == board.get(c)
        {
            return Some(symbol);
        }
    }

    None
}

/// Checks if any row, column or diagonal holds three equal symbols.
#[instrument(skip(board))]
pub fn check_win(board: &Board) -> bool {
    winning_symbol(board).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Position;

    const X: Option<Symbol> = Some(Symbol::Cross);
    const O: Option<Symbol> = Some(Symbol::Nought);
    const E: Option<Symbol> = None;

    #[test]
    fn test_no_winner_empty_board() {
        let board = Board::new();
        assert!(!check_win(&board));
        assert_eq!(winning_symbol(&board), None);
    }

    #[test]
    fn test_winner_top_row() {
        let mut board = Board::new();
        board.set(Position::TopLeft, Square::Occupied(Symbol::Cross));
        board.set(Position::TopCenter, Square::Occupied(Symbol::Cross));
        board.set(Position::TopRight, Square::Occupied(Symbol::Cross));
        assert!(check_win(&board));
        assert_eq!(winning_symbol(&board), Some(Symbol::Cross));
    }

    #[test]
    fn test_winner_column() {
        let board = Board::from_rows([[E, O, X], [X, O, E], [E, O, X]]);
        assert_eq!(winning_symbol(&board), Some(Symbol::Nought));
    }

    #[test]
    fn test_winner_diagonal() {
        let mut board = Board::new();
        board.set(Position::TopLeft, Square::Occupied(Symbol::Nought));
        board.set(Position::Center, Square::Occupied(Symbol::Nought));
        board.set(Position::BottomRight, Square::Occupied(Symbol::Nought));
        assert_eq!(winning_symbol(&board), Some(Symbol::Nought));
    }

    #[test]
    fn test_winner_anti_diagonal() {
        let board = Board::from_rows([[X, O, X], [O, X, O], [X, E, E]]);
        assert!(check_win(&board));
        assert_eq!(winning_symbol(&board), Some(Symbol::Cross));
    }

    #[test]
    fn test_no_winner_incomplete() {
        let board = Board::from_rows([[X, X, E], [O, O, E], [E, E, E]]);
        assert!(!check_win(&board));
    }

    #[test]
    fn test_mixed_line_is_not_a_win() {
        let board = Board::from_rows([[X, O, X], [E, E, E], [E, E, E]]);
        assert!(!check_win(&board));
    }
}
