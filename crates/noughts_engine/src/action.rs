//! Moves and move rejection.

use super::{Position, Role};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// A move: a role placing its symbol at a position.
///
/// The symbol itself is not stored. It is derived from the role whenever the
/// move is replayed, so a move stays valid however the symbols were assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// The role making the move.
    pub actor: Role,
    /// The position where the role places its symbol.
    pub position: Position,
}

impl Move {
    /// Creates a new move.
    #[instrument]
    pub fn new(actor: Role, position: Position) -> Self {
        Self { actor, position }
    }

    /// Returns the role making this move.
    pub fn actor(&self) -> Role {
        self.actor
    }

    /// Returns the position of this move.
    pub fn position(&self) -> Position {
        self.position
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.actor, self.position.label())
    }
}

/// A rejected move. Rejection never changes game state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// Row or column outside `0..3`.
    #[display("Position ({}, {}) is off the board", row, col)]
    OutOfRange {
        /// Requested row.
        row: usize,
        /// Requested column.
        col: usize,
    },

    /// The square at the position is already occupied.
    #[display("Square {} is already occupied", _0)]
    SquareOccupied(Position),

    /// The game is already over.
    #[display("Game is already over")]
    GameOver,

    /// The automated side is to move; human input is not accepted.
    #[display("It's not {}'s turn", _0)]
    NotYourTurn(Role),
}

impl std::error::Error for MoveError {}
