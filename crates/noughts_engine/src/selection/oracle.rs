//! Move selection delegated to an external move-policy oracle.
//!
//! The oracle sees the board as nine floats in row-major order from the
//! acting side's point of view (own symbol `1.0`, other symbol `-1.0`, empty
//! `0.0`) and answers with one preference score per square. The highest
//! scoring square that is empty both in that view and on the board is played.
//! Scores for occupied squares are discarded.

use super::{MoveSelector, SelectionError};
use crate::{symbol_for, Board, Position, Role, Square};
use derive_more::{Display, Error};
use tracing::{debug, error, instrument, warn};

/// External scoring function, such as a trained model runtime.
pub trait MovePolicy {
    /// Scores the 9 squares of an encoded board.
    ///
    /// # Errors
    ///
    /// Returns a [`PolicyError`] if the policy cannot be queried. The engine
    /// treats this as fatal for the turn.
    fn evaluate(&mut self, cells: &[f32; 9]) -> Result<[f32; 9], PolicyError>;
}

impl<P: MovePolicy + ?Sized> MovePolicy for Box<P> {
    fn evaluate(&mut self, cells: &[f32; 9]) -> Result<[f32; 9], PolicyError> {
        (**self).evaluate(cells)
    }
}

/// Adapts a closure into a [`MovePolicy`].
pub struct FnPolicy<F>(pub F);

impl<F> MovePolicy for FnPolicy<F>
where
    F: FnMut(&[f32; 9]) -> Result<[f32; 9], PolicyError>,
{
    fn evaluate(&mut self, cells: &[f32; 9]) -> Result<[f32; 9], PolicyError> {
        (self.0)(cells)
    }
}

/// The oracle could not produce scores.
#[derive(Debug, Clone, Display, Error)]
#[display("Policy error: {} at {}:{}", message, file, line)]
pub struct PolicyError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl PolicyError {
    /// Creates a new policy error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// Encodes `board` from the point of view of the side drawing
/// `symbol_for(acting, first_player_starts_first)`.
pub fn encode_board(board: &Board, acting: Role, first_player_starts_first: bool) -> [f32; 9] {
    let own = symbol_for(acting, first_player_starts_first);
    board.squares().map(|square| match square {
        Square::Empty => 0.0,
        Square::Occupied(symbol) if symbol == own => 1.0,
        Square::Occupied(_) => -1.0,
    })
}

/// Opponent driven by a [`MovePolicy`].
pub struct OracleSelector<P> {
    policy: P,
    name: String,
}

impl<P: MovePolicy> OracleSelector<P> {
    /// Wraps a policy.
    pub fn new(policy: P) -> Self {
        Self {
            policy,
            name: "Oracle".to_string(),
        }
    }

    /// Returns the wrapped policy.
    pub fn policy(&self) -> &P {
        &self.policy
    }
}

impl<P: MovePolicy> MoveSelector for OracleSelector<P> {
    #[instrument(skip(self, board))]
    fn choose_move(
        &mut self,
        board: &Board,
        acting: Role,
        first_player_starts_first: bool,
    ) -> Result<Position, SelectionError> {
        let cells = encode_board(board, acting, first_player_starts_first);
        let scores = self.policy.evaluate(&cells).map_err(|e| {
            error!(error = %e, "Oracle failed");
            SelectionError::Oracle(e)
        })?;

        let mut best: Option<(Position, f32)> = None;
        for (index, score) in scores.into_iter().enumerate() {
            let position = Position::ALL[index];
            if cells[index] != 0.0 || !board.is_empty(position) {
                continue;
            }
            if score.is_nan() {
                warn!(%position, "Oracle returned NaN score");
                continue;
            }
            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((position, score));
            }
        }

        let (position, score) = best.ok_or(SelectionError::NoLegalMove)?;
        debug!(%position, score, index = position.to_index(), "Oracle chose move");
        Ok(position)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Symbol;

    const X: Option<Symbol> = Some(Symbol::Cross);
    const O: Option<Symbol> = Some(Symbol::Nought);
    const E: Option<Symbol> = None;

    fn fixed(scores: [f32; 9]) -> FnPolicy<impl FnMut(&[f32; 9]) -> Result<[f32; 9], PolicyError>> {
        FnPolicy(move |_: &[f32; 9]| Ok(scores))
    }

    #[test]
    fn test_picks_highest_scoring_empty_square() {
        let board = Board::new();
        let mut scores = [0.1; 9];
        scores[5] = 0.9;
        let mut oracle = OracleSelector::new(fixed(scores));
        let mv = oracle.choose_move(&board, Role::Ai, true).unwrap();
        assert_eq!(mv, Position::MiddleRight);
        assert_eq!(mv.row_col(), (1, 2));
    }

    #[test]
    fn test_discards_occupied_squares() {
        let board = Board::from_rows([[X, E, E], [E, O, E], [E, E, E]]);
        let mut scores = [0.0; 9];
        scores[0] = 5.0;
        scores[4] = 4.0;
        scores[8] = 1.0;
        let mut oracle = OracleSelector::new(fixed(scores));
        let mv = oracle.choose_move(&board, Role::Ai, true).unwrap();
        assert_eq!(mv, Position::BottomRight);
    }

    #[test]
    fn test_encoding_is_relative_to_acting_side() {
        let board = Board::from_rows([[X, O, E], [E, E, E], [E, E, E]]);
        // Player first: AI draws noughts.
        let cells = encode_board(&board, Role::Ai, true);
        assert_eq!(cells[0], -1.0);
        assert_eq!(cells[1], 1.0);
        assert_eq!(cells[2], 0.0);
    }

    #[test]
    fn test_policy_sees_encoded_board() {
        let board = Board::from_rows([[E, E, E], [E, X, E], [E, E, E]]);
        let mut seen = None;
        let mut oracle = OracleSelector::new(FnPolicy(|cells: &[f32; 9]| {
            seen = Some(*cells);
            Ok::<_, PolicyError>([0.0; 9])
        }));
        oracle.choose_move(&board, Role::Ai, false).unwrap();
        drop(oracle);
        let seen = seen.expect("policy queried");
        assert_eq!(seen[4], 1.0);
    }

    #[test]
    fn test_failure_is_fatal() {
        let mut oracle = OracleSelector::new(FnPolicy(|_: &[f32; 9]| {
            Err::<[f32; 9], _>(PolicyError::new("session not loaded"))
        }));
        let result = oracle.choose_move(&Board::new(), Role::Ai, true);
        assert!(matches!(result, Err(SelectionError::Oracle(_))));
    }

    #[test]
    fn test_nan_scores_skipped() {
        let mut scores = [f32::NAN; 9];
        scores[7] = -3.0;
        let mut oracle = OracleSelector::new(fixed(scores));
        let mv = oracle.choose_move(&Board::new(), Role::Ai, true).unwrap();
        assert_eq!(mv, Position::BottomCenter);
    }
}
