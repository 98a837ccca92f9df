//! Move selection for the automated opponent.
//!
//! Both strategies implement [`MoveSelector`]: [`MinimaxSelector`] searches
//! the game tree, [`OracleSelector`] asks an external [`MovePolicy`] to score
//! the squares. Selectors only ever see a copy of the board.

mod minimax;
mod oracle;

pub use minimax::MinimaxSelector;
pub use oracle::{encode_board, FnPolicy, MovePolicy, OracleSelector, PolicyError};

use crate::{Board, Position, Role};
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Strategy that chooses a move for the side to act.
pub trait MoveSelector {
    /// Chooses a square for `acting` on `board`.
    ///
    /// `first_player_starts_first` fixes which symbol each side draws.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::NoLegalMove`] when no empty square is left
    /// and [`SelectionError::Oracle`] when an external policy fails.
    fn choose_move(
        &mut self,
        board: &Board,
        acting: Role,
        first_player_starts_first: bool,
    ) -> Result<Position, SelectionError>;

    /// Returns the selector's display name.
    fn name(&self) -> &str;
}

/// Failure to select a move.
#[derive(Debug, Clone, Display, Error)]
pub enum SelectionError {
    /// The move-policy oracle could not be queried.
    #[display("Oracle failed: {}", _0)]
    Oracle(PolicyError),

    /// No empty square is available.
    #[display("No legal move available")]
    NoLegalMove,
}

impl From<PolicyError> for SelectionError {
    fn from(err: PolicyError) -> Self {
        Self::Oracle(err)
    }
}

/// Search difficulty presets.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Difficulty {
    /// Looks two plies ahead: takes immediate wins and blocks immediate
    /// threats, but can be beaten.
    Easy,
    /// Searches the whole game tree.
    #[default]
    Impossible,
}

impl Difficulty {
    /// Search depth for this preset.
    #[instrument]
    pub fn max_depth(self) -> u8 {
        match self {
            Difficulty::Easy => 2,
            Difficulty::Impossible => 9,
        }
    }
}
