//! Depth-limited expectimax search.
//!
//! The searching color's turns maximize; the opponent's turns average over
//! all legal replies with uniform probability, modeling a non-adversarial
//! opponent. Leaves are evaluated with the raw score differential for the
//! color to move there. The memo is keyed and scoped exactly like the
//! minimax one; every stored value is exact, so interior nodes memoize too.

use std::collections::HashMap;

use crate::board::{Board, Color, Move};
use crate::eval;

type Memo = HashMap<(String, Color, u32), f64>;

pub struct Expectimax {
    pub depth: u32,
}

impl Expectimax {
    pub fn new(depth: u32) -> Self {
        Self { depth }
    }

    /// Best move for `color` and its expected value. `None` when `color`
    /// has no legal move (pass).
    pub fn search(&self, board: &Board, color: Color) -> (Option<Move>, f64) {
        let mut memo = Memo::new();
        let mut best_move = None;
        let mut best_value = f64::NEG_INFINITY;

        for (x, y) in board.legal_moves(color) {
            let mut child = board.clone();
            child.play_move(x, y, color);
            let value =
                self.search_inner(&child, color.opponent(), color, self.depth - 1, &mut memo);
            if value > best_value {
                best_value = value;
                best_move = Some((x, y));
            }
        }

        if best_move.is_none() {
            return (None, eval::evaluate(board, color));
        }
        (best_move, best_value)
    }

    fn search_inner(
        &self,
        board: &Board,
        color: Color,
        root_color: Color,
        depth: u32,
        memo: &mut Memo,
    ) -> f64 {
        let key = (board.key(), color, depth);
        if let Some(&value) = memo.get(&key) {
            return value;
        }

        if depth == 0 {
            let value = eval::evaluate(board, color);
            memo.insert(key, value);
            return value;
        }

        let moves = board.legal_moves(color);
        if moves.is_empty() {
            let value = eval::evaluate(board, color);
            memo.insert(key, value);
            return value;
        }

        let value = if color == root_color {
            let mut best = f64::NEG_INFINITY;
            for &(x, y) in &moves {
                let mut child = board.clone();
                child.play_move(x, y, color);
                best = best.max(self.search_inner(
                    &child,
                    color.opponent(),
                    root_color,
                    depth - 1,
                    memo,
                ));
            }
            best
        } else {
            // Chance node: uniform average over the opponent's replies.
            let mut total = 0.0;
            for &(x, y) in &moves {
                let mut child = board.clone();
                child.play_move(x, y, color);
                total +=
                    self.search_inner(&child, color.opponent(), root_color, depth - 1, memo);
            }
            total / moves.len() as f64
        };

        memo.insert(key, value);
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expectimax_passes_when_no_moves() {
        let mut board = Board::new(3);
        for x in 0..3 {
            for y in 0..3 {
                let color = if (x + y) % 2 == 0 {
                    Color::Black
                } else {
                    Color::White
                };
                board.place(x, y, Some(color));
            }
        }
        let (mv, _) = Expectimax::new(2).search(&board, Color::Black);
        assert_eq!(mv, None);
    }

    #[test]
    fn chance_node_is_mean_of_replies() {
        // Depth 2: value of each Black move is the uniform average of
        // evaluate(Black) over all White replies. Recompute that average by
        // hand for the searcher's chosen move.
        let mut board = Board::new(3);
        board.place(0, 0, Some(Color::White));
        board.place(2, 2, Some(Color::Black));

        let searcher = Expectimax::new(2);
        let (mv, value) = searcher.search(&board, Color::Black);
        let (x, y) = mv.unwrap();

        let mut after = board.clone();
        assert!(after.play_move(x, y, Color::Black));
        let replies = after.legal_moves(Color::White);
        let mut total = 0.0;
        for &(rx, ry) in &replies {
            let mut leaf = after.clone();
            leaf.play_move(rx, ry, Color::White);
            total += eval::evaluate(&leaf, Color::Black);
        }
        let expected = total / replies.len() as f64;
        assert!((value - expected).abs() < 1e-9);
    }
}
