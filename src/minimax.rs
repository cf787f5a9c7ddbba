//! Depth-limited minimax search, with and without alpha-beta pruning.
//!
//! Both searchers share the same recursion shape: the root maximizes over
//! the searcher's moves, levels below alternate between minimizing and
//! maximizing, and depth 0 (or a position with no legal replies) evaluates
//! the leaf for the color to move there. The transposition memo is keyed by
//! `(board key, color, depth)` and owned by a single `search` invocation, so
//! stale entries can never leak across root positions.
//!
//! Pruning is an optimization, not a policy change: with the same leaf
//! evaluator, [`AlphaBeta`] returns the same best move and value as
//! [`Minimax`]. To keep that guarantee the alpha-beta searcher memoizes only
//! leaf evaluations: interior values computed under a narrowed window are
//! bounds, not exact values, and caching them would poison later lookups.

use std::collections::HashMap;

use crate::board::{Board, Color, Move};
use crate::eval;

/// Leaf evaluator: scores a position for the color to move at the leaf.
pub type LeafEval = fn(&Board, Color) -> f64;

/// Default minimax leaf: raw score differential.
pub fn score_leaf(board: &Board, color: Color) -> f64 {
    eval::evaluate(board, color)
}

/// Default alpha-beta leaf: heuristic differential.
pub fn heuristic_leaf(board: &Board, color: Color) -> f64 {
    eval::heuristic(board, color) - eval::heuristic(board, color.opponent())
}

type Memo = HashMap<(String, Color, u32), f64>;

/// Plain fixed-depth minimax.
pub struct Minimax {
    pub depth: u32,
    leaf: LeafEval,
}

impl Minimax {
    pub fn new(depth: u32) -> Self {
        Self {
            depth,
            leaf: score_leaf,
        }
    }

    pub fn with_leaf(depth: u32, leaf: LeafEval) -> Self {
        Self { depth, leaf }
    }

    /// Best move for `color` and its minimax value. `None` when `color` has
    /// no legal move (pass).
    pub fn search(&self, board: &Board, color: Color) -> (Option<Move>, f64) {
        let mut memo = Memo::new();
        let mut best_move = None;
        let mut best_value = f64::NEG_INFINITY;

        for (x, y) in board.legal_moves(color) {
            let mut child = board.clone();
            child.play_move(x, y, color);
            let value = self.search_inner(&child, color.opponent(), self.depth - 1, false, &mut memo);
            if value > best_value {
                best_value = value;
                best_move = Some((x, y));
            }
        }

        if best_move.is_none() {
            return (None, (self.leaf)(board, color));
        }
        (best_move, best_value)
    }

    fn search_inner(
        &self,
        board: &Board,
        color: Color,
        depth: u32,
        maximizing: bool,
        memo: &mut Memo,
    ) -> f64 {
        let key = (board.key(), color, depth);
        if let Some(&value) = memo.get(&key) {
            return value;
        }

        if depth == 0 {
            let value = (self.leaf)(board, color);
            memo.insert(key, value);
            return value;
        }

        let moves = board.legal_moves(color);
        if moves.is_empty() {
            let value = (self.leaf)(board, color);
            memo.insert(key, value);
            return value;
        }

        let mut best = if maximizing {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
        for (x, y) in moves {
            let mut child = board.clone();
            child.play_move(x, y, color);
            let value = self.search_inner(&child, color.opponent(), depth - 1, !maximizing, memo);
            best = if maximizing {
                best.max(value)
            } else {
                best.min(value)
            };
        }
        memo.insert(key, best);
        best
    }
}

/// Minimax with alpha-beta pruning. Branches are cut when `beta <= alpha`.
pub struct AlphaBeta {
    pub depth: u32,
    leaf: LeafEval,
}

impl AlphaBeta {
    pub fn new(depth: u32) -> Self {
        Self {
            depth,
            leaf: heuristic_leaf,
        }
    }

    pub fn with_leaf(depth: u32, leaf: LeafEval) -> Self {
        Self { depth, leaf }
    }

    /// Best move for `color` and its value, searched with an unbounded
    /// initial window. `None` when `color` has no legal move.
    pub fn search(&self, board: &Board, color: Color) -> (Option<Move>, f64) {
        let mut memo = Memo::new();
        let mut best_move = None;
        let mut alpha = f64::NEG_INFINITY;
        let beta = f64::INFINITY;

        for (x, y) in board.legal_moves(color) {
            let mut child = board.clone();
            child.play_move(x, y, color);
            let value = self.search_inner(
                &child,
                color.opponent(),
                self.depth - 1,
                alpha,
                beta,
                false,
                &mut memo,
            );
            if value > alpha {
                alpha = value;
                best_move = Some((x, y));
            }
        }

        if best_move.is_none() {
            return (None, (self.leaf)(board, color));
        }
        (best_move, alpha)
    }

    #[allow(clippy::too_many_arguments)]
    fn search_inner(
        &self,
        board: &Board,
        color: Color,
        depth: u32,
        mut alpha: f64,
        mut beta: f64,
        maximizing: bool,
        memo: &mut Memo,
    ) -> f64 {
        let key = (board.key(), color, depth);
        if let Some(&value) = memo.get(&key) {
            return value;
        }

        if depth == 0 {
            let value = (self.leaf)(board, color);
            memo.insert(key, value);
            return value;
        }

        let moves = board.legal_moves(color);
        if moves.is_empty() {
            let value = (self.leaf)(board, color);
            memo.insert(key, value);
            return value;
        }

        if maximizing {
            let mut best = f64::NEG_INFINITY;
            for (x, y) in moves {
                let mut child = board.clone();
                child.play_move(x, y, color);
                let value =
                    self.search_inner(&child, color.opponent(), depth - 1, alpha, beta, false, memo);
                best = best.max(value);
                alpha = alpha.max(value);
                if beta <= alpha {
                    break;
                }
            }
            best
        } else {
            let mut best = f64::INFINITY;
            for (x, y) in moves {
                let mut child = board.clone();
                child.play_move(x, y, color);
                let value =
                    self.search_inner(&child, color.opponent(), depth - 1, alpha, beta, true, memo);
                best = best.min(value);
                beta = beta.min(value);
                if beta <= alpha {
                    break;
                }
            }
            best
        }
    }
}
