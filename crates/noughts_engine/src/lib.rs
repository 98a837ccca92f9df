//! Noughts engine - tic-tac-toe rules, history and opponents
//!
//! This library provides the game core behind a tic-tac-toe front end. It
//! knows nothing about rendering, input widgets or audio; a presentation
//! layer drives a [`Session`] and listens for [`GameEvent`]s.
//!
//! # Architecture
//!
//! - **Board & turns**: [`GameState`] owns the board, the turn and the role
//!   assignment, and is the only place moves are applied.
//! - **History**: [`MoveHistory`] keeps every move with a cursor, so undo and
//!   redo walk the same log and a new move drops the redo branch.
//! - **Rules**: [`check_win`] and [`check_draw`], including early draws.
//! - **Opponents**: [`MoveSelector`] implemented by [`MinimaxSelector`] and
//!   [`OracleSelector`].
//! - **Session**: [`Session`] wires the above to configuration and observers.
//!
//! # Example
//!
//! ```
//! use noughts_engine::{EngineConfig, OpponentKind, Session};
//!
//! # fn example() -> Result<(), noughts_engine::EngineError> {
//! let config = EngineConfig::new(OpponentKind::Minimax).with_first_player_starts_first(true);
//! let mut session = Session::start(&config, None)?;
//! session.play(0, 0)?;
//! assert!(session.state().turn() == noughts_engine::Role::Player1);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod config;
mod error;
mod events;
mod game;
mod history;
pub mod invariants;
mod position;
pub mod rules;
mod selection;
mod session;
mod types;

pub use action::{Move, MoveError};
pub use config::{ConfigError, EngineConfig, OpponentKind};
pub use error::EngineError;
pub use events::{GameEvent, GameObserver};
pub use game::GameState;
pub use history::MoveHistory;
pub use position::Position;
pub use rules::{check_draw, check_win};
pub use selection::{
    encode_board, Difficulty, FnPolicy, MinimaxSelector, MovePolicy, MoveSelector, OracleSelector,
    PolicyError, SelectionError,
};
pub use session::Session;
pub use types::{symbol_for, Board, GameStatus, Role, Square, Symbol};
