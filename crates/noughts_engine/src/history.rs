//! Cursor-based move history supporting undo and redo.
//!
//! Moves live in a single arena. The cursor counts how many of them are
//! currently applied to the board: `moves[..cursor]` produced the board and
//! `moves[cursor..]` is the redo branch left behind by undo. Appending a move
//! while a redo branch exists truncates the branch first.

use super::action::Move;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Navigable log of moves for one game.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveHistory {
    moves: Vec<Move>,
    cursor: usize,
}

impl MoveHistory {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a move after the cursor, discarding any redo branch.
    ///
    /// Returns the number of discarded moves.
    #[instrument(skip(self), fields(cursor = self.cursor, len = self.moves.len()))]
    pub fn append(&mut self, mov: Move) -> usize {
        let discarded = self.moves.len() - self.cursor;
        if discarded > 0 {
            debug!(discarded, "Truncating redo branch");
            self.moves.truncate(self.cursor);
        }
        self.moves.push(mov);
        self.cursor += 1;
        discarded
    }

    /// Moves the cursor back one move and returns the move it crossed.
    pub fn step_back(&mut self) -> Option<Move> {
        let mov = self.moves.get(self.cursor.checked_sub(1)?).copied()?;
        self.cursor -= 1;
        Some(mov)
    }

    /// Moves the cursor forward one move and returns the move it crossed.
    pub fn step_forward(&mut self) -> Option<Move> {
        let mov = self.moves.get(self.cursor).copied()?;
        self.cursor += 1;
        Some(mov)
    }

    /// Moves the cursor before the first move, keeping every move redoable.
    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    /// Drops every move.
    pub fn clear(&mut self) {
        self.moves.clear();
        self.cursor = 0;
    }

    /// The most recently applied move.
    pub fn current(&self) -> Option<&Move> {
        self.moves.get(self.cursor.checked_sub(1)?)
    }

    /// Moves currently applied to the board, oldest first.
    ///
    /// Clamped to the recorded moves if the cursor points past them.
    pub fn applied(&self) -> &[Move] {
        &self.moves[..self.cursor.min(self.moves.len())]
    }

    /// Moves beyond the cursor, next redo first.
    pub fn redo_branch(&self) -> &[Move] {
        self.moves.get(self.cursor..).unwrap_or(&[])
    }

    /// Returns true if the cursor points inside the recorded moves.
    ///
    /// Always true for histories built through [`MoveHistory::append`]; a
    /// deserialized history may break it.
    pub fn is_consistent(&self) -> bool {
        self.cursor <= self.moves.len()
    }

    /// Number of applied moves.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Returns true if the cursor rests on the first move.
    pub fn at_first_move(&self) -> bool {
        self.cursor == 1
    }

    /// Returns true if a move can be stepped back over.
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    /// Returns true if a move can be stepped forward over.
    pub fn can_redo(&self) -> bool {
        self.cursor < self.moves.len()
    }

    /// Total moves held, applied and redoable.
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    /// Returns true if no move was ever recorded.
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Position, Role};

    fn mv(actor: Role, pos: Position) -> Move {
        Move::new(actor, pos)
    }

    #[test]
    fn test_empty_history() {
        let mut history = MoveHistory::new();
        assert!(history.is_empty());
        assert_eq!(history.current(), None);
        assert_eq!(history.step_back(), None);
        assert_eq!(history.step_forward(), None);
    }

    #[test]
    fn test_append_advances_cursor() {
        let mut history = MoveHistory::new();
        history.append(mv(Role::Player1, Position::Center));
        history.append(mv(Role::Ai, Position::TopLeft));
        assert_eq!(history.cursor(), 2);
        assert_eq!(history.current(), Some(&mv(Role::Ai, Position::TopLeft)));
        assert!(!history.can_redo());
    }

    #[test]
    fn test_step_back_and_forward() {
        let mut history = MoveHistory::new();
        history.append(mv(Role::Player1, Position::Center));
        history.append(mv(Role::Player2, Position::TopLeft));

        assert_eq!(history.step_back(), Some(mv(Role::Player2, Position::TopLeft)));
        assert_eq!(history.current(), Some(&mv(Role::Player1, Position::Center)));
        assert_eq!(history.redo_branch().len(), 1);

        assert_eq!(history.step_forward(), Some(mv(Role::Player2, Position::TopLeft)));
        assert_eq!(history.step_forward(), None);
    }

    #[test]
    fn test_append_truncates_redo_branch() {
        let mut history = MoveHistory::new();
        history.append(mv(Role::Player1, Position::Center));
        history.append(mv(Role::Player2, Position::TopLeft));
        history.append(mv(Role::Player1, Position::TopRight));
        history.step_back();
        history.step_back();

        let discarded = history.append(mv(Role::Player2, Position::BottomLeft));

        assert_eq!(discarded, 2);
        assert_eq!(history.len(), 2);
        assert!(!history.can_redo());
        assert_eq!(history.step_forward(), None);
        assert_eq!(
            history.applied(),
            &[
                mv(Role::Player1, Position::Center),
                mv(Role::Player2, Position::BottomLeft)
            ]
        );
    }

    #[test]
    fn test_rewind_keeps_moves_redoable() {
        let mut history = MoveHistory::new();
        history.append(mv(Role::Ai, Position::Center));
        assert!(history.at_first_move());
        history.rewind();
        assert!(!history.can_undo());
        assert!(history.can_redo());
        assert_eq!(history.step_forward(), Some(mv(Role::Ai, Position::Center)));
    }

    #[test]
    fn test_cursor_past_end_does_not_panic() {
        let mut history = MoveHistory::new();
        history.append(mv(Role::Player1, Position::Center));
        let mut value = serde_json::to_value(&history).unwrap();
        value["cursor"] = serde_json::json!(5);
        let mut corrupt: MoveHistory = serde_json::from_value(value).unwrap();

        assert!(!corrupt.is_consistent());
        assert_eq!(corrupt.applied().len(), 1);
        assert!(corrupt.redo_branch().is_empty());
        assert_eq!(corrupt.current(), None);
        assert_eq!(corrupt.step_back(), None);
        assert_eq!(corrupt.step_forward(), None);
    }

    #[test]
    fn test_clear() {
        let mut history = MoveHistory::new();
        history.append(mv(Role::Ai, Position::Center));
        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.cursor(), 0);
    }
}
