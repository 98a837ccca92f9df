//! Game state and turn model for tic-tac-toe.
//!
//! [`GameState`] owns the board, the move history and the turn. It is the
//! only place where moves are applied, undone or redone, so the board always
//! equals the applied prefix of the history replayed from an empty grid.

use super::action::{Move, MoveError};
use super::history::MoveHistory;
use super::rules::{check_draw, check_win};
use super::types::{symbol_for, Board, GameStatus, Role, Square, Symbol};
use super::Position;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Complete state of one game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    board: Board,
    history: MoveHistory,
    first_player_starts_first: bool,
    winner: Option<Role>,
    is_draw: bool,
    turn: Role,
    player: Role,
    opponent: Role,
}

impl GameState {
    /// Creates a fresh game against `opponent`.
    ///
    /// `first_player_starts_first` decides both who moves first and which
    /// symbol each side draws: the side moving first always draws crosses.
    ///
    /// # Panics
    ///
    /// Panics if `opponent` is [`Role::Player1`], which is reserved for the
    /// human player.
    #[instrument]
    pub fn new(opponent: Role, first_player_starts_first: bool) -> Self {
        assert!(opponent.is_opponent(), "Player 1 cannot be the opponent");

        let mut state = Self {
            board: Board::new(),
            history: MoveHistory::new(),
            first_player_starts_first,
            winner: None,
            is_draw: false,
            turn: Role::Player1,
            player: Role::Player1,
            opponent,
        };
        state.turn = state.starting_role();
        info!(?opponent, starting = ?state.turn, "Created game");
        state
    }

    /// Creates a fresh game with the role assignment drawn from `rng`.
    #[instrument(skip(rng))]
    pub fn with_rng<R: Rng + ?Sized>(opponent: Role, rng: &mut R) -> Self {
        Self::new(opponent, rng.random_bool(0.5))
    }

    /// Creates a fresh game with a randomly drawn role assignment.
    #[instrument]
    pub fn random(opponent: Role) -> Self {
        Self::with_rng(opponent, &mut rand::rng())
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the move history.
    pub fn history(&self) -> &MoveHistory {
        &self.history
    }

    /// Returns whether the player moves first and draws crosses.
    pub fn first_player_starts_first(&self) -> bool {
        self.first_player_starts_first
    }

    /// Returns the winner, once one is known.
    pub fn winner(&self) -> Option<Role> {
        self.winner
    }

    /// Returns true if the game ended in a draw.
    pub fn is_draw(&self) -> bool {
        self.is_draw
    }

    /// Returns the role to act next.
    pub fn turn(&self) -> Role {
        self.turn
    }

    /// Returns the human player's role.
    pub fn player(&self) -> Role {
        self.player
    }

    /// Returns the opponent's role.
    pub fn opponent(&self) -> Role {
        self.opponent
    }

    /// Returns the game status.
    pub fn status(&self) -> GameStatus {
        match self.winner {
            Some(role) => GameStatus::Won(role),
            None if self.is_draw => GameStatus::Draw,
            None => GameStatus::InProgress,
        }
    }

    /// Returns true once the game has been won, drawn or conceded.
    pub fn is_over(&self) -> bool {
        self.status().is_over()
    }

    /// Returns true if the automated opponent is to move.
    pub fn automated_turn(&self) -> bool {
        self.turn.is_automated() && !self.is_over()
    }

    /// The role that moves first in this game.
    pub fn starting_role(&self) -> Role {
        if self.first_player_starts_first {
            self.player
        } else {
            self.opponent
        }
    }

    /// Symbol drawn by `role` in this game.
    pub fn symbol_for(&self, role: Role) -> Symbol {
        symbol_for(role, self.first_player_starts_first)
    }

    /// Role that draws `symbol` in this game.
    pub fn role_for(&self, symbol: Symbol) -> Role {
        if self.symbol_for(self.player) == symbol {
            self.player
        } else {
            self.opponent
        }
    }

    /// Returns the other seat's role.
    pub fn other(&self, role: Role) -> Role {
        if role == self.player {
            self.opponent
        } else {
            self.player
        }
    }

    /// Places the symbol of the role to move at `row`, `col`.
    ///
    /// # Errors
    ///
    /// Returns a [`MoveError`] and leaves the game untouched if the
    /// coordinates are off the board, the square is occupied or the game is
    /// over.
    #[instrument(skip(self), fields(turn = ?self.turn))]
    pub fn apply_move(&mut self, row: usize, col: usize) -> Result<(), MoveError> {
        let position = Position::from_row_col(row, col).ok_or_else(|| {
            warn!(row, col, "Move off the board");
            MoveError::OutOfRange { row, col }
        })?;
        self.apply_at(position)
    }

    /// Places the symbol of the role to move at `position`.
    ///
    /// # Errors
    ///
    /// Returns a [`MoveError`] and leaves the game untouched if the square is
    /// occupied or the game is over.
    #[instrument(skip(self), fields(turn = ?self.turn))]
    pub fn apply_at(&mut self, position: Position) -> Result<(), MoveError> {
        if self.is_over() {
            warn!("Move after game over");
            return Err(MoveError::GameOver);
        }

        if !self.board.is_empty(position) {
            warn!(%position, "Square already occupied");
            return Err(MoveError::SquareOccupied(position));
        }

        let symbol = self.symbol_for(self.turn);
        self.board.set(position, Square::Occupied(symbol));
        self.history.append(Move::new(self.turn, position));
        debug!(%position, %symbol, "Move applied");
        Ok(())
    }

    /// Settles the position after a move.
    ///
    /// A win binds the winner to the role that just moved and a draw marks
    /// the game drawn; in both cases the turn stays put. Otherwise the turn
    /// passes to the other side. Does nothing once the game is over.
    #[instrument(skip(self), fields(turn = ?self.turn))]
    pub fn advance_turn(&mut self) -> GameStatus {
        if self.is_over() {
            debug!("Game already over, turn kept");
            return self.status();
        }

        if check_win(&self.board) {
            self.winner = Some(self.turn);
            info!(winner = ?self.turn, "Game won");
        } else if check_draw(&self.board) {
            self.is_draw = true;
            info!("Game drawn");
        } else {
            self.turn = self.other(self.turn);
            debug!(next = ?self.turn, "Turn passed");
        }
        self.status()
    }

    /// The side to move concedes. Returns the winner, or `None` if the game
    /// was already over.
    #[instrument(skip(self), fields(turn = ?self.turn))]
    pub fn surrender(&mut self) -> Option<Role> {
        if self.is_over() {
            return None;
        }
        let winner = self.other(self.turn);
        self.winner = Some(winner);
        info!(?winner, "Game conceded");
        Some(winner)
    }

    /// Steps back through the history.
    ///
    /// Against the automated opponent, stepping continues until the human is
    /// to move. Does nothing once the game is over or before the first move.
    #[instrument(skip(self), fields(cursor = self.history.cursor()))]
    pub fn undo(&mut self) {
        if self.is_over() || !self.history.can_undo() {
            debug!("Nothing to undo");
            return;
        }

        if self.history.at_first_move() && self.clears_on_first_undo() {
            self.board.reset();
            self.history.rewind();
            self.turn = self.starting_role();
            debug!(turn = ?self.turn, "Undo past the beginning, board cleared");
            return;
        }

        if let Some(mov) = self.history.step_back() {
            self.board.clear(mov.position);
            self.turn = mov.actor;
            debug!(%mov, "Move undone");
        }

        if self.skips_automated_turn() {
            self.undo();
        }
    }

    /// Steps forward through the history, replaying undone moves.
    ///
    /// Against the automated opponent, stepping continues until the human is
    /// to move. Does nothing once the game is over or without a redo branch.
    #[instrument(skip(self), fields(cursor = self.history.cursor()))]
    pub fn redo(&mut self) {
        if self.is_over() {
            return;
        }

        let Some(mov) = self.history.step_forward() else {
            debug!("Nothing to redo");
            return;
        };

        let symbol = self.symbol_for(mov.actor);
        self.board.set(mov.position, Square::Occupied(symbol));
        self.turn = self.other(mov.actor);
        debug!(%mov, "Move redone");

        if self.skips_automated_turn() && self.history.can_redo() {
            self.redo();
        }
    }

    /// Clears the board and history for a new game with the same roles.
    #[instrument(skip(self))]
    pub fn reset(&mut self, first_player_starts_first: bool) {
        self.board.reset();
        self.history.clear();
        self.first_player_starts_first = first_player_starts_first;
        self.winner = None;
        self.is_draw = false;
        self.turn = self.starting_role();
        info!(starting = ?self.turn, "Game reset");
    }

    /// Whether undoing the very first move clears the whole board.
    fn clears_on_first_undo(&self) -> bool {
        match self.opponent {
            Role::Ai => !self.first_player_starts_first,
            _ => true,
        }
    }

    /// Whether undo/redo should step again to hand the turn back to the human.
    ///
    /// Two-human games never skip.
    fn skips_automated_turn(&self) -> bool {
        self.opponent.is_automated() && self.turn == self.opponent
    }
}
