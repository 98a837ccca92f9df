//! Game events for rendering and audio layers.

use crate::{Position, Role, Symbol};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::warn;

/// Notification sent to observers after a session changes state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A new game began.
    GameStarted {
        /// Opponent seated for the game.
        opponent: Role,
        /// Role that moves first.
        starting: Role,
    },
    /// A symbol was placed.
    MoveApplied {
        /// Role that moved.
        actor: Role,
        /// Square played.
        position: Position,
        /// Symbol drawn.
        symbol: Symbol,
    },
    /// Undo stepped back through the history.
    MoveUndone {
        /// Moves still applied after the undo.
        cursor: usize,
        /// Role to move after the undo.
        turn: Role,
    },
    /// Redo replayed moves from the history.
    MoveRedone {
        /// Moves applied after the redo.
        cursor: usize,
        /// Role to move after the redo.
        turn: Role,
    },
    /// The game ended. `winner` is `None` for a draw.
    GameOver {
        /// Winning role, if any.
        winner: Option<Role>,
    },
}

/// Receiver of [`GameEvent`]s.
pub trait GameObserver {
    /// Handles one event.
    fn notify(&mut self, event: &GameEvent);
}

impl GameObserver for mpsc::UnboundedSender<GameEvent> {
    fn notify(&mut self, event: &GameEvent) {
        if self.send(event.clone()).is_err() {
            warn!(?event, "Event receiver dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_observer() {
        let (mut tx, mut rx) = mpsc::unbounded_channel();
        tx.notify(&GameEvent::GameOver { winner: None });
        assert_eq!(rx.try_recv().unwrap(), GameEvent::GameOver { winner: None });
    }

    #[test]
    fn test_closed_channel_is_not_fatal() {
        let (mut tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        tx.notify(&GameEvent::GameOver { winner: Some(Role::Ai) });
    }

    #[test]
    fn test_event_serialization() {
        let event = GameEvent::MoveApplied {
            actor: Role::Player1,
            position: Position::Center,
            symbol: Symbol::Cross,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("MoveApplied"));
        assert!(json.contains("Center"));
    }
}
