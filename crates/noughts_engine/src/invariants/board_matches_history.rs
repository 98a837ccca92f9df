//! Board replay invariant: the board is the applied history replayed.

use super::Invariant;
use crate::{Board, GameState, Square};

/// Invariant: replaying the applied moves onto an empty board, each onto an
/// empty square and with the symbol the actor draws, reproduces the board.
pub struct BoardMatchesHistoryInvariant;

impl Invariant<GameState> for BoardMatchesHistoryInvariant {
    fn holds(game: &GameState) -> bool {
        let mut reconstructed = Board::new();

        for mov in game.history().applied() {
            if !reconstructed.is_empty(mov.position) {
                return false;
            }
            reconstructed.set(mov.position, Square::Occupied(game.symbol_for(mov.actor)));
        }

        reconstructed == *game.board()
    }

    fn description() -> &'static str {
        "Board equals the applied history replayed (squares never overwritten)"
    }
}
