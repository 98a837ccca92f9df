//! Depth-limited minimax search.
//!
//! Scores are taken from the human side's point of view: a human win scores
//! `10 - depth` and an automated win `-10 + depth`, so the human layers
//! maximize and the automated layers minimize. The depth adjustment makes
//! the automated side prefer quick wins and, when losing, the longest
//! resistance. Draws, full boards and positions at the depth cap score 0.

use super::{Difficulty, MoveSelector, SelectionError};
use crate::rules::winning_symbol;
use crate::{symbol_for, Board, Position, Role, Square, Symbol};
use tracing::{debug, instrument};

const WIN_SCORE: i32 = 10;

/// Game-tree search opponent.
#[derive(Debug, Clone)]
pub struct MinimaxSelector {
    max_depth: u8,
    name: String,
}

impl MinimaxSelector {
    /// Creates a selector searching at most `max_depth` plies below its own
    /// candidate move. Depth 9 searches the whole tree.
    #[instrument]
    pub fn new(max_depth: u8) -> Self {
        Self {
            max_depth,
            name: format!("Minimax (depth {})", max_depth),
        }
    }

    /// Creates a selector for a difficulty preset.
    #[instrument]
    pub fn with_difficulty(difficulty: Difficulty) -> Self {
        Self::new(difficulty.max_depth())
    }

    /// Returns the depth cap.
    pub fn max_depth(&self) -> u8 {
        self.max_depth
    }
}

impl Default for MinimaxSelector {
    fn default() -> Self {
        Self::with_difficulty(Difficulty::default())
    }
}

impl MoveSelector for MinimaxSelector {
    #[instrument(skip(self, board), fields(depth = self.max_depth))]
    fn choose_move(
        &mut self,
        board: &Board,
        acting: Role,
        first_player_starts_first: bool,
    ) -> Result<Position, SelectionError> {
        let automated = symbol_for(acting, first_player_starts_first);
        let mut search = Search {
            automated,
            human: automated.opponent(),
            max_depth: i32::from(self.max_depth),
            nodes: 0,
        };

        let mut scratch = board.clone();
        let mut best: Option<(Position, i32)> = None;

        for pos in Position::ALL {
            if !scratch.is_empty(pos) {
                continue;
            }
            scratch.set(pos, Square::Occupied(automated));
            let score = search.minimax(&mut scratch, 0, false);
            scratch.clear(pos);

            // First strictly lower score wins ties.
            if best.is_none_or(|(_, best_score)| score < best_score) {
                best = Some((pos, score));
            }
        }

        let (position, score) = best.ok_or(SelectionError::NoLegalMove)?;
        debug!(%position, score, nodes = search.nodes, "Minimax chose move");
        Ok(position)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

struct Search {
    automated: Symbol,
    human: Symbol,
    max_depth: i32,
    nodes: u64,
}

impl Search {
    fn minimax(&mut self, board: &mut Board, depth: i32, automated_to_move: bool) -> i32 {
        self.nodes += 1;

        match winning_symbol(board) {
            Some(symbol) if symbol == self.human => return WIN_SCORE - depth,
            Some(_) => return -WIN_SCORE + depth,
            None => {}
        }

        if depth >= self.max_depth {
            return 0;
        }

        let symbol = if automated_to_move {
            self.automated
        } else {
            self.human
        };
        let mut best: Option<i32> = None;

        for pos in Position::ALL {
            if !board.is_empty(pos) {
                continue;
            }
            board.set(pos, Square::Occupied(symbol));
            let score = self.minimax(board, depth + 1, !automated_to_move);
            board.clear(pos);

            best = Some(match best {
                None => score,
                Some(b) if automated_to_move => b.min(score),
                Some(b) => b.max(score),
            });
        }

        // Full board without a winner.
        best.unwrap_or(0)
    }
}
