//! Alternating turn invariant: the two seats take turns.

use super::Invariant;
use crate::{GameState, GameStatus};

/// Invariant: applied moves alternate between the player and the opponent,
/// starting with the starting role, and an ongoing game hands the turn to
/// the side that did not make the last applied move.
pub struct AlternatingTurnInvariant;

impl Invariant<GameState> for AlternatingTurnInvariant {
    fn holds(game: &GameState) -> bool {
        let applied = game.history().applied();

        if applied
            .iter()
            .any(|m| m.actor != game.player() && m.actor != game.opponent())
        {
            return false;
        }

        if let Some(first) = applied.first()
            && first.actor != game.starting_role()
        {
            return false;
        }

        if applied.windows(2).any(|w| w[0].actor == w[1].actor) {
            return false;
        }

        if game.status() != GameStatus::InProgress {
            return true;
        }

        let expected_next = match applied.last() {
            Some(last) => game.other(last.actor),
            None => game.starting_role(),
        };
        game.turn() == expected_next
    }

    fn description() -> &'static str {
        "Player and opponent alternate turns"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Role;

    #[test]
    fn test_empty_game_holds() {
        let game = GameState::new(Role::Ai, false);
        assert!(AlternatingTurnInvariant::holds(&game));
    }

    #[test]
    fn test_holds_through_undo_redo() {
        let mut game = GameState::new(Role::Ai, true);
        for (row, col) in [(0, 0), (1, 1), (2, 2), (0, 2)] {
            game.apply_move(row, col).unwrap();
            game.advance_turn();
        }
        game.undo();
        assert!(AlternatingTurnInvariant::holds(&game));
        assert_eq!(game.turn(), Role::Player1);
        game.redo();
        assert!(AlternatingTurnInvariant::holds(&game));
    }

    #[test]
    fn test_holds_after_win() {
        let mut game = GameState::new(Role::Player2, true);
        for (row, col) in [(0, 0), (1, 0), (0, 1), (1, 1), (0, 2)] {
            game.apply_move(row, col).unwrap();
            game.advance_turn();
        }
        assert_eq!(game.winner(), Some(Role::Player1));
        assert!(AlternatingTurnInvariant::holds(&game));
    }
}
