//! History consistency invariant: applied moves match occupied squares.

use super::Invariant;
use crate::GameState;

/// Invariant: the cursor points inside the recorded moves, and the number of
/// applied moves equals the number of occupied squares and never exceeds 9.
pub struct HistoryConsistentInvariant;

impl Invariant<GameState> for HistoryConsistentInvariant {
    fn holds(game: &GameState) -> bool {
        let applied = game.history().cursor();
        game.history().is_consistent()
            && applied <= 9 && applied == game.board().occupied_count()
    }

    fn description() -> &'static str {
        "History cursor is in range and matches number of occupied squares"
    }
}
