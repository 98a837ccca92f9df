//! First-class invariants for tic-tac-toe game state.
//!
//! Invariants are logical properties that must hold after every operation on
//! a [`GameState`](crate::GameState). The session checks them after each
//! mutation and stops with a fatal error when one fails.

use crate::GameState;
use crate::error::EngineError;
use tracing::error;

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// A set of invariants that can be checked together.
///
/// Implemented for tuples of two and three invariants.
pub trait InvariantSet<S> {
    /// Checks every invariant in the set and collects all violations.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

fn record<S, I: Invariant<S>>(state: &S, violations: &mut Vec<InvariantViolation>) {
    if !I::holds(state) {
        violations.push(InvariantViolation::new(I::description()));
    }
}

macro_rules! impl_invariant_set {
    ($($inv:ident),+) => {
        impl<S, $($inv),+> InvariantSet<S> for ($($inv,)+)
        where
            $($inv: Invariant<S>,)+
        {
            fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
                let mut violations = Vec::new();
                $(record::<S, $inv>(state, &mut violations);)+
                if violations.is_empty() {
                    Ok(())
                } else {
                    Err(violations)
                }
            }
        }
    };
}

impl_invariant_set!(A, B);
impl_invariant_set!(A, B, C);

pub mod alternating_turn;
pub mod board_matches_history;
pub mod history_consistent;

pub use alternating_turn::AlternatingTurnInvariant;
pub use board_matches_history::BoardMatchesHistoryInvariant;
pub use history_consistent::HistoryConsistentInvariant;

/// All game state invariants as a composable set.
pub type GameInvariants = (
    BoardMatchesHistoryInvariant,
    AlternatingTurnInvariant,
    HistoryConsistentInvariant,
);

/// Checks [`GameInvariants`], folding violations into a fatal error.
pub fn verify(state: &GameState) -> Result<(), EngineError> {
    GameInvariants::check_all(state).map_err(|violations| {
        let description = violations
            .iter()
            .map(|v| v.description.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        error!(%description, "Game state invariant violated");
        EngineError::InvariantViolation { description }
    })
}
