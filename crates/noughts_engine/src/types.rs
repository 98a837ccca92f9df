//! Core domain types for tic-tac-toe.

use super::error::EngineError;
use super::position::Position;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Mark drawn on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum Symbol {
    /// Cross (X), always drawn first.
    #[strum(to_string = "X")]
    Cross,
    /// Nought (O).
    #[strum(to_string = "O")]
    Nought,
}

impl Symbol {
    /// Returns the other symbol.
    pub fn opponent(self) -> Self {
        match self {
            Symbol::Cross => Symbol::Nought,
            Symbol::Nought => Symbol::Cross,
        }
    }
}

/// A seat at the table, independent of the symbol it draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum Role {
    /// The human player. Always seated as `player`.
    #[strum(to_string = "Player 1")]
    Player1,
    /// A second human in the opponent seat.
    #[strum(to_string = "Player 2")]
    Player2,
    /// The automated opponent.
    #[strum(to_string = "AI")]
    Ai,
}

impl Role {
    /// Returns true for the automated opponent.
    pub fn is_automated(self) -> bool {
        matches!(self, Role::Ai)
    }

    /// Returns true for roles that sit in the opponent seat.
    pub fn is_opponent(self) -> bool {
        !matches!(self, Role::Player1)
    }
}

/// Symbol drawn by `role` for a game with the given role assignment.
///
/// When `first_player_starts_first` is true the player draws crosses and the
/// opponent noughts; otherwise the mapping is inverted.
pub fn symbol_for(role: Role, first_player_starts_first: bool) -> Symbol {
    match (role.is_opponent(), first_player_starts_first) {
        (false, true) | (true, false) => Symbol::Cross,
        (false, false) | (true, true) => Symbol::Nought,
    }
}

/// A square on the tic-tac-toe board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Square {
    /// Empty square.
    Empty,
    /// Square holding a symbol.
    Occupied(Symbol),
}

impl Square {
    /// Numeric cell code: 0 empty, 1 cross, 2 nought.
    pub fn code(self) -> u8 {
        match self {
            Square::Empty => 0,
            Square::Occupied(Symbol::Cross) => 1,
            Square::Occupied(Symbol::Nought) => 2,
        }
    }

    /// Parses a numeric cell code. Any value outside `0..=2` is rejected.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Square::Empty),
            1 => Some(Square::Occupied(Symbol::Cross)),
            2 => Some(Square::Occupied(Symbol::Nought)),
            _ => None,
        }
    }
}

/// 3x3 tic-tac-toe board.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    /// Squares in row-major order (0-8).
    squares: [Square; 9],
}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self {
            squares: [Square::Empty; 9],
        }
    }

    /// Builds a board from rows of optional symbols.
    pub fn from_rows(rows: [[Option<Symbol>; 3]; 3]) -> Self {
        let mut board = Self::new();
        for (pos, cell) in Position::ALL.iter().zip(rows.iter().flatten()) {
            if let Some(symbol) = cell {
                board.set(*pos, Square::Occupied(*symbol));
            }
        }
        board
    }

    /// Builds a board from numeric cell codes in row-major order.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::IllegalCell`] if any code is not 0, 1 or 2.
    #[instrument]
    pub fn from_codes(codes: [u8; 9]) -> Result<Self, EngineError> {
        let mut board = Self::new();
        for (index, code) in codes.into_iter().enumerate() {
            board.squares[index] =
                Square::from_code(code).ok_or(EngineError::IllegalCell { index, code })?;
        }
        Ok(board)
    }

    /// Numeric cell codes in row-major order.
    pub fn to_codes(&self) -> [u8; 9] {
        self.squares.map(Square::code)
    }

    /// Gets the square at the given position.
    pub fn get(&self, pos: Position) -> Square {
        self.squares[pos.to_index()]
    }

    /// Sets the square at the given position.
    pub fn set(&mut self, pos: Position, square: Square) {
        self.squares[pos.to_index()] = square;
    }

    /// Clears the square at the given position.
    pub fn clear(&mut self, pos: Position) {
        self.set(pos, Square::Empty);
    }

    /// Empties every square.
    pub fn reset(&mut self) {
        self.squares = [Square::Empty; 9];
    }

    /// Checks if a square is empty.
    pub fn is_empty(&self, pos: Position) -> bool {
        self.get(pos) == Square::Empty
    }

    /// Returns all squares as a slice.
    pub fn squares(&self) -> &[Square; 9] {
        &self.squares
    }

    /// Empty positions in row-major order.
    pub fn empty_positions(&self) -> impl Iterator<Item = Position> + '_ {
        Position::ALL.into_iter().filter(|pos| self.is_empty(*pos))
    }

    /// Number of occupied squares.
    pub fn occupied_count(&self) -> usize {
        self.squares.iter().filter(|s| **s != Square::Empty).count()
    }

    /// Formats the board as a human-readable string.
    pub fn display(&self) -> String {
        let mut result = String::new();
        for row in 0..3 {
            for col in 0..3 {
                let pos = row * 3 + col;
                let symbol = match self.squares[pos] {
                    Square::Empty => (pos + 1).to_string(),
                    Square::Occupied(symbol) => symbol.to_string(),
                };
                result.push_str(&symbol);
                if col < 2 {
                    result.push('|');
                }
            }
            if row < 2 {
                result.push_str("\n-+-+-\n");
            }
        }
        result
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Current status of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// Game is ongoing.
    InProgress,
    /// Game ended in a win for the role.
    Won(Role),
    /// Game ended in a draw.
    Draw,
}

impl GameStatus {
    /// Returns true once the game has ended.
    pub fn is_over(self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }
}
