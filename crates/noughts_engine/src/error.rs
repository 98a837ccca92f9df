//! Fatal engine errors.

use super::action::MoveError;
use super::config::ConfigError;
use super::selection::SelectionError;
use derive_more::{Display, Error};

/// Error that stops a session.
///
/// Rejected human input is reported through [`MoveError`] and leaves the game
/// untouched. The remaining variants mean the engine cannot safely continue.
#[derive(Debug, Clone, Display, Error)]
pub enum EngineError {
    /// A move was rejected.
    #[display("Illegal move: {}", _0)]
    Move(MoveError),

    /// The automated side could not produce a move.
    #[display("Move selection failed: {}", _0)]
    Selection(SelectionError),

    /// A cell holds a code that is neither empty, cross nor nought.
    #[display("Illegal board state: cell {} holds code {}", index, code)]
    IllegalCell {
        /// Row-major index of the cell.
        index: usize,
        /// Offending code.
        code: u8,
    },

    /// Game state no longer satisfies its invariants.
    #[display("Invariant violation: {}", description)]
    InvariantViolation {
        /// Descriptions of the violated invariants.
        description: String,
    },

    /// Configuration could not be used.
    #[display("{}", _0)]
    Config(ConfigError),
}

impl From<MoveError> for EngineError {
    fn from(err: MoveError) -> Self {
        Self::Move(err)
    }
}

impl From<SelectionError> for EngineError {
    fn from(err: SelectionError) -> Self {
        Self::Selection(err)
    }
}

impl From<ConfigError> for EngineError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}
