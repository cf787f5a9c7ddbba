//! One-ply reactive agents.
//!
//! `RandomAgent` and `GreedyAgent` are usable standalone and double as MCTS
//! rollout/opponent policies via the [`Policy`] trait.

use crate::board::{Board, Color, Move};
use crate::eval;

/// A move-selection policy: the one capability every agent and search
/// strategy implements. Returns `None` when `color` has no legal move,
/// which callers treat as a pass.
pub trait Policy {
    fn select_move(&mut self, board: &Board, color: Color) -> Option<Move>;
}

/// Uniform random choice among legal moves.
#[derive(Clone, Debug)]
pub struct RandomAgent {
    rng: fastrand::Rng,
}

impl RandomAgent {
    pub fn new() -> Self {
        Self {
            rng: fastrand::Rng::new(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
        }
    }
}

impl Default for RandomAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl Policy for RandomAgent {
    fn select_move(&mut self, board: &Board, color: Color) -> Option<Move> {
        let moves = board.legal_moves(color);
        if moves.is_empty() {
            None
        } else {
            Some(moves[self.rng.usize(..moves.len())])
        }
    }
}

/// One-ply lookahead: tries every legal move on a clone, keeps the moves
/// with the maximum heuristic value and breaks ties uniformly at random.
#[derive(Clone, Debug)]
pub struct GreedyAgent {
    rng: fastrand::Rng,
}

impl GreedyAgent {
    pub fn new() -> Self {
        Self {
            rng: fastrand::Rng::new(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
        }
    }
}

impl Default for GreedyAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl Policy for GreedyAgent {
    fn select_move(&mut self, board: &Board, color: Color) -> Option<Move> {
        let mut best_score = f64::NEG_INFINITY;
        let mut best_moves: Vec<Move> = Vec::new();

        for (x, y) in board.legal_moves(color) {
            let mut probe = board.clone();
            if !probe.play_move(x, y, color) {
                continue;
            }
            let score = eval::heuristic(&probe, color);
            if score > best_score {
                best_score = score;
                best_moves.clear();
                best_moves.push((x, y));
            } else if score == best_score {
                best_moves.push((x, y));
            }
        }

        if best_moves.is_empty() {
            None
        } else {
            Some(best_moves[self.rng.usize(..best_moves.len())])
        }
    }
}
