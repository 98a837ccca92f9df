//! Session driver tying game state, move selection and observers together.
//!
//! A [`Session`] is what a presentation layer talks to. It accepts human
//! input, runs the automated reply when one is due, checks the game
//! invariants after every change and tells observers what happened.

use crate::config::{ConfigError, EngineConfig, OpponentKind};
use crate::events::{GameEvent, GameObserver};
use crate::invariants;
use crate::selection::{MinimaxSelector, MovePolicy, MoveSelector, OracleSelector};
use crate::{EngineError, GameState, GameStatus, MoveError, Role};
use tracing::{debug, error, info, instrument, warn};

/// One game session against a human or automated opponent.
pub struct Session {
    state: GameState,
    selector: Option<Box<dyn MoveSelector>>,
    observers: Vec<Box<dyn GameObserver>>,
    role_assignment: Option<bool>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.state)
            .field("selector", &self.selector.as_ref().map(|s| s.name()))
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl Session {
    /// Wraps an existing game.
    ///
    /// Restarts keep the game's current role assignment.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvariantViolation`] if `state` is not a legal
    /// game, such as a restored snapshot with a corrupt history or with
    /// [`Role::Player1`] in the opponent seat. Returns [`EngineError::Config`]
    /// if an automated opponent is seated without a selector.
    #[instrument(skip(state, selector), fields(opponent = ?state.opponent()))]
    pub fn new(
        state: GameState,
        selector: Option<Box<dyn MoveSelector>>,
    ) -> Result<Self, EngineError> {
        if !state.opponent().is_opponent() {
            error!("Player 1 seated as the opponent");
            return Err(EngineError::InvariantViolation {
                description: "Player 1 cannot be the opponent".to_string(),
            });
        }
        invariants::verify(&state)?;

        if state.opponent().is_automated() && selector.is_none() {
            error!("Automated opponent without a move selector");
            return Err(ConfigError::new("Automated opponent requires a move selector").into());
        }
        if !state.opponent().is_automated() && selector.is_some() {
            warn!("Selector ignored for a human opponent");
        }

        let role_assignment = Some(state.first_player_starts_first());
        Ok(Self {
            state,
            selector,
            observers: Vec::new(),
            role_assignment,
        })
    }

    /// Starts a session from configuration.
    ///
    /// `policy` is required when the configuration asks for an oracle
    /// opponent and ignored otherwise. If the automated side moves first, its
    /// opening move is played before this returns.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Config`] for an oracle opponent without a
    /// policy, or any error from the opening automated move.
    #[instrument(skip(config, policy), fields(opponent = %config.opponent()))]
    pub fn start(
        config: &EngineConfig,
        policy: Option<Box<dyn MovePolicy>>,
    ) -> Result<Self, EngineError> {
        let selector: Option<Box<dyn MoveSelector>> = match (config.opponent(), policy) {
            (OpponentKind::Human, _) => None,
            (OpponentKind::Minimax, _) => Some(Box::new(MinimaxSelector::new(config.max_depth()))),
            (OpponentKind::Oracle, Some(policy)) => Some(Box::new(OracleSelector::new(policy))),
            (OpponentKind::Oracle, None) => {
                error!("Oracle opponent configured without a move policy");
                return Err(
                    ConfigError::new("Oracle opponent configured without a move policy").into(),
                );
            }
        };

        let opponent = config.opponent().role();
        let state = match config.first_player_starts_first() {
            Some(flag) => GameState::new(opponent, *flag),
            None => GameState::random(opponent),
        };

        let mut session = Self::new(state, selector)?;
        session.role_assignment = *config.first_player_starts_first();
        session.begin()?;
        Ok(session)
    }

    /// Registers an observer for subsequent events.
    #[instrument(skip(self, observer))]
    pub fn subscribe(&mut self, observer: Box<dyn GameObserver>) {
        self.observers.push(observer);
        debug!(observers = self.observers.len(), "Observer subscribed");
    }

    /// Returns the game state.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Returns the automated opponent's name, if one is seated.
    pub fn selector_name(&self) -> Option<&str> {
        self.selector.as_ref().map(|s| s.name())
    }

    /// Plays the human side's move at `row`, `col`, then the automated reply
    /// if one is due.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Move`] without changing anything if the input
    /// is rejected, including [`MoveError::NotYourTurn`] while the automated
    /// side is to move. Other variants are fatal.
    #[instrument(skip(self), fields(turn = ?self.state.turn()))]
    pub fn play(&mut self, row: usize, col: usize) -> Result<GameStatus, EngineError> {
        if self.state.automated_turn() {
            warn!("Human input while the automated side is to move");
            return Err(MoveError::NotYourTurn(self.state.player()).into());
        }

        self.state.apply_move(row, col)?;
        let status = self.settle()?;

        if self.state.automated_turn() {
            return self.take_automated_turn();
        }
        Ok(status)
    }

    /// Lets the automated side move if it is due. Otherwise returns the
    /// current status unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Selection`] if no move could be chosen. This
    /// includes oracle failures, which are never retried.
    #[instrument(skip(self))]
    pub fn take_automated_turn(&mut self) -> Result<GameStatus, EngineError> {
        if !self.state.automated_turn() {
            debug!("No automated turn due");
            return Ok(self.state.status());
        }

        let Some(selector) = self.selector.as_mut() else {
            error!("Automated turn without a move selector");
            return Err(ConfigError::new("Automated opponent requires a move selector").into());
        };

        let position = selector
            .choose_move(
                self.state.board(),
                self.state.turn(),
                self.state.first_player_starts_first(),
            )
            .map_err(|e| {
                error!(error = %e, selector = selector.name(), "Move selection failed");
                EngineError::from(e)
            })?;

        info!(%position, selector = selector.name(), "Automated move chosen");
        self.state.apply_at(position)?;
        self.settle()
    }

    /// Undoes the last move, or the last round against an automated
    /// opponent.
    ///
    /// When the board is cleared back to a position where the automated side
    /// starts, its move is not replayed; call
    /// [`Session::take_automated_turn`] or [`Session::redo`].
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvariantViolation`] if the state is corrupt.
    #[instrument(skip(self))]
    pub fn undo(&mut self) -> Result<(), EngineError> {
        let before = self.state.history().cursor();
        self.state.undo();
        invariants::verify(&self.state)?;

        if self.state.history().cursor() != before {
            self.emit(GameEvent::MoveUndone {
                cursor: self.state.history().cursor(),
                turn: self.state.turn(),
            });
        }
        Ok(())
    }

    /// Redoes the last undone move, or round against an automated opponent.
    ///
    /// Stops early when the redo branch runs out. If it ends on the human's
    /// move, the automated side is left to move and [`Session::play`] refuses
    /// input until [`Session::take_automated_turn`] is called.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvariantViolation`] if the state is corrupt.
    #[instrument(skip(self))]
    pub fn redo(&mut self) -> Result<(), EngineError> {
        let before = self.state.history().cursor();
        self.state.redo();
        invariants::verify(&self.state)?;

        if self.state.history().cursor() != before {
            self.emit(GameEvent::MoveRedone {
                cursor: self.state.history().cursor(),
                turn: self.state.turn(),
            });
        }
        Ok(())
    }

    /// The side to move concedes. Returns the winner, or `None` if the game
    /// was already over.
    #[instrument(skip(self))]
    pub fn surrender(&mut self) -> Option<Role> {
        let winner = self.state.surrender()?;
        self.emit(GameEvent::GameOver {
            winner: Some(winner),
        });
        Some(winner)
    }

    /// Starts a new game with the same opponent.
    ///
    /// The role assignment is drawn again unless it was fixed at start.
    ///
    /// # Errors
    ///
    /// Returns any error from the opening automated move.
    #[instrument(skip(self))]
    pub fn restart(&mut self) -> Result<GameStatus, EngineError> {
        let flag = self
            .role_assignment
            .unwrap_or_else(|| rand::random_bool(0.5));
        self.state.reset(flag);
        self.begin()
    }

    fn begin(&mut self) -> Result<GameStatus, EngineError> {
        self.emit(GameEvent::GameStarted {
            opponent: self.state.opponent(),
            starting: self.state.starting_role(),
        });
        self.take_automated_turn()
    }

    /// Announces the move just applied, settles the turn and verifies the
    /// result.
    fn settle(&mut self) -> Result<GameStatus, EngineError> {
        if let Some(mov) = self.state.history().current().copied() {
            self.emit(GameEvent::MoveApplied {
                actor: mov.actor,
                position: mov.position,
                symbol: self.state.symbol_for(mov.actor),
            });
        }

        let status = self.state.advance_turn();
        invariants::verify(&self.state)?;

        if status.is_over() {
            self.emit(GameEvent::GameOver {
                winner: self.state.winner(),
            });
        }
        Ok(status)
    }

    fn emit(&mut self, event: GameEvent) {
        for observer in &mut self.observers {
            observer.notify(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::{FnPolicy, PolicyError};
    use crate::{Position, Square, Symbol};
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Observer sharing its log with the test.
    struct Recorder(Rc<RefCell<Vec<GameEvent>>>);

    impl GameObserver for Recorder {
        fn notify(&mut self, event: &GameEvent) {
            self.0.borrow_mut().push(event.clone());
        }
    }

    fn recorded(session: &mut Session) -> Rc<RefCell<Vec<GameEvent>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        session.subscribe(Box::new(Recorder(Rc::clone(&log))));
        log
    }

    #[test]
    fn test_minimax_replies_to_corner() {
        let config = EngineConfig::new(OpponentKind::Minimax).with_first_player_starts_first(true);
        let mut session = Session::start(&config, None).unwrap();

        let status = session.play(0, 0).unwrap();

        assert_eq!(status, GameStatus::InProgress);
        assert_eq!(
            session.state().board().get(Position::Center),
            Square::Occupied(Symbol::Nought)
        );
        assert_eq!(session.state().turn(), Role::Player1);
    }

    #[test]
    fn test_automated_opening_move() {
        let config = EngineConfig::new(OpponentKind::Minimax).with_first_player_starts_first(false);
        let session = Session::start(&config, None).unwrap();

        assert_eq!(session.state().history().cursor(), 1);
        assert_eq!(session.state().turn(), Role::Player1);
    }

    #[test]
    fn test_oracle_requires_policy() {
        let config = EngineConfig::new(OpponentKind::Oracle);
        let err = Session::start(&config, None).unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
    }

    #[test]
    fn test_oracle_failure_is_fatal() {
        let config = EngineConfig::new(OpponentKind::Oracle).with_first_player_starts_first(true);
        let policy = FnPolicy(|_: &[f32; 9]| {
            Err::<[f32; 9], _>(PolicyError::new("model not loaded"))
        });
        let mut session = Session::start(&config, Some(Box::new(policy))).unwrap();

        let err = session.play(1, 1).unwrap_err();
        assert!(matches!(err, EngineError::Selection(_)));
        assert!(session.state().automated_turn());
    }

    #[test]
    fn test_rejected_input_is_not_applied() {
        let config = EngineConfig::new(OpponentKind::Human).with_first_player_starts_first(true);
        let mut session = Session::start(&config, None).unwrap();
        session.play(1, 1).unwrap();

        let err = session.play(1, 1).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Move(MoveError::SquareOccupied(Position::Center))
        ));
        assert_eq!(session.state().history().len(), 1);
        assert_eq!(session.state().turn(), Role::Player2);
    }

    #[test]
    fn test_events_follow_moves() {
        let config = EngineConfig::new(OpponentKind::Human).with_first_player_starts_first(true);
        let mut session = Session::start(&config, None).unwrap();
        let log = recorded(&mut session);

        session.play(0, 0).unwrap();
        session.undo().unwrap();
        session.redo().unwrap();

        let events = log.borrow();
        assert_eq!(
            events[0],
            GameEvent::MoveApplied {
                actor: Role::Player1,
                position: Position::TopLeft,
                symbol: Symbol::Cross,
            }
        );
        assert_eq!(
            events[1],
            GameEvent::MoveUndone {
                cursor: 0,
                turn: Role::Player1
            }
        );
        assert_eq!(
            events[2],
            GameEvent::MoveRedone {
                cursor: 1,
                turn: Role::Player2
            }
        );
    }

    #[test]
    fn test_surrender_and_restart() {
        let config = EngineConfig::new(OpponentKind::Minimax).with_first_player_starts_first(true);
        let mut session = Session::start(&config, None).unwrap();
        let log = recorded(&mut session);

        assert_eq!(session.surrender(), Some(Role::Ai));
        assert_eq!(session.surrender(), None);
        assert_eq!(
            session.play(0, 0).unwrap_err().to_string(),
            "Illegal move: Game is already over"
        );

        session.restart().unwrap();
        assert_eq!(session.state().status(), GameStatus::InProgress);
        assert!(session.state().board().empty_positions().count() == 9);
        assert!(matches!(
            log.borrow().last(),
            Some(GameEvent::GameStarted { .. })
        ));
    }

    #[test]
    fn test_new_requires_selector_for_ai() {
        let state = GameState::new(Role::Ai, true);
        assert!(Session::new(state, None).is_err());
    }

    #[test]
    fn test_redo_can_leave_automated_side_to_move() {
        let config = EngineConfig::new(OpponentKind::Oracle).with_first_player_starts_first(true);
        let mut calls = 0;
        let policy = FnPolicy(move |_: &[f32; 9]| {
            calls += 1;
            if calls == 1 {
                Err(PolicyError::new("model warming up"))
            } else {
                Ok::<[f32; 9], PolicyError>([0.0; 9])
            }
        });
        let mut session = Session::start(&config, Some(Box::new(policy))).unwrap();
        assert!(session.play(1, 1).is_err());

        session.undo().unwrap();
        assert_eq!(session.state().turn(), Role::Player1);
        session.redo().unwrap();

        // The redo branch ended on the human's move.
        assert_eq!(session.state().turn(), Role::Ai);
        assert!(matches!(
            session.play(0, 0),
            Err(EngineError::Move(MoveError::NotYourTurn(Role::Player1)))
        ));
        session.take_automated_turn().unwrap();
        assert_eq!(session.state().turn(), Role::Player1);
        assert_eq!(session.state().history().cursor(), 2);
    }

    #[test]
    fn test_new_rejects_corrupt_history() {
        let config = EngineConfig::new(OpponentKind::Human).with_first_player_starts_first(true);
        let mut session = Session::start(&config, None).unwrap();
        session.play(1, 1).unwrap();

        let mut value = serde_json::to_value(session.state()).unwrap();
        value["history"]["cursor"] = serde_json::json!(5);
        let corrupt: GameState = serde_json::from_value(value).unwrap();

        assert!(matches!(
            Session::new(corrupt, None),
            Err(EngineError::InvariantViolation { .. })
        ));
    }

    #[test]
    fn test_new_rejects_player1_as_opponent() {
        let mut value = serde_json::to_value(GameState::new(Role::Player2, true)).unwrap();
        value["opponent"] = serde_json::json!("Player1");
        let state: GameState = serde_json::from_value(value).unwrap();

        assert!(matches!(
            Session::new(state, None),
            Err(EngineError::InvariantViolation { .. })
        ));
    }
}
