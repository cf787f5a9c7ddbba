//! Tabular Q-learning over serialized board states.
//!
//! States are the exact row-major board keys from [`Board::key`] (order
//! sensitive, no symmetry folding), so the table is only ever as general as
//! the positions it has visited. Unseen (state, action) pairs are scored on
//! the fly with a one-move-lookahead heuristic difference instead of a flat
//! zero, which biases early play toward sensible moves.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::board::{Board, Color, Move};
use crate::eval;

/// Heuristic reward normalizer for non-terminal positions.
const REWARD_NORMALIZATION: f64 = 10.0;

/// One persisted Q-table entry.
#[derive(Serialize, Deserialize)]
struct QEntry {
    state: String,
    action: Move,
    value: f64,
}

/// Tabular Q-learner with ε-greedy action selection.
pub struct QLearning {
    pub learning_rate: f64,
    pub discount_factor: f64,
    pub exploration_rate: f64,
    pub exploration_decay: f64,
    pub min_exploration_rate: f64,
    q_table: HashMap<(String, Move), f64>,
    rng: fastrand::Rng,
}

impl QLearning {
    /// Training defaults: α=0.3, γ=0.9, ε decaying from 1.0 by 0.99 down to
    /// a floor of 0.1.
    pub fn new() -> Self {
        Self::with_exploration(1.0)
    }

    /// A learner with a fixed starting exploration rate; 0.0 gives a purely
    /// greedy player for evaluation games.
    pub fn with_exploration(exploration_rate: f64) -> Self {
        Self {
            learning_rate: 0.3,
            discount_factor: 0.9,
            exploration_rate,
            exploration_decay: 0.99,
            min_exploration_rate: 0.1,
            q_table: HashMap::new(),
            rng: fastrand::Rng::new(),
        }
    }

    pub fn seed(&mut self, seed: u64) {
        self.rng = fastrand::Rng::with_seed(seed);
    }

    pub fn table_len(&self) -> usize {
        self.q_table.len()
    }

    /// Stored Q-value for (state of `board`, `mv`), or the lookahead bias
    /// for unseen pairs: play `mv` for `color` on a clone and take the
    /// edge-free heuristic differential.
    pub fn q_value(&self, board: &Board, mv: Move, color: Color) -> f64 {
        let key = (board.key(), mv);
        if let Some(&value) = self.q_table.get(&key) {
            return value;
        }
        let mut probe = board.clone();
        probe.play_move(mv.0, mv.1, color);
        eval::heuristic_plain(&probe, color) - eval::heuristic_plain(&probe, color.opponent())
    }

    pub fn set_q_value(&mut self, state: String, action: Move, value: f64) {
        self.q_table.insert((state, action), value);
    }

    /// ε-greedy action selection: explore uniformly with probability
    /// `exploration_rate`, otherwise take the best-valued legal move with
    /// uniform tie-breaking. `None` when `color` has no legal move.
    pub fn choose_action(&mut self, board: &Board, color: Color) -> Option<Move> {
        let moves = board.legal_moves(color);
        if moves.is_empty() {
            return None;
        }
        if self.rng.f64() < self.exploration_rate {
            return Some(moves[self.rng.usize(..moves.len())]);
        }

        let mut best_value = f64::NEG_INFINITY;
        let mut best_moves: Vec<Move> = Vec::new();
        for &mv in &moves {
            let value = self.q_value(board, mv, color);
            if value > best_value {
                best_value = value;
                best_moves.clear();
                best_moves.push(mv);
            } else if value == best_value {
                best_moves.push(mv);
            }
        }
        Some(best_moves[self.rng.usize(..best_moves.len())])
    }

    /// One-step Q-update:
    /// `Q ← (1-α)·Q + α·(reward + γ·max_a' Q(next, a'))`,
    /// with the max taken over the legal moves in `next_board` (0 when it
    /// has none).
    pub fn update(
        &mut self,
        board: &Board,
        color: Color,
        action: Move,
        reward: f64,
        next_board: &Board,
    ) {
        let max_future = next_board
            .legal_moves(color)
            .into_iter()
            .map(|mv| self.q_value(next_board, mv, color))
            .fold(f64::NEG_INFINITY, f64::max);
        let max_future = if max_future.is_finite() { max_future } else { 0.0 };

        let current = self.q_value(board, action, color);
        let updated = (1.0 - self.learning_rate) * current
            + self.learning_rate * (reward + self.discount_factor * max_future);
        self.set_q_value(board.key(), action, updated);
    }

    /// Reward for the position from `color`'s side: ±1/0 at the end of the
    /// game by final score comparison, otherwise the heuristic differential
    /// normalized by 10.
    pub fn reward(&self, board: &Board, color: Color) -> f64 {
        if board.is_terminal(color) {
            let score = eval::score(board);
            let (own, other) = (score.of(color), score.of(color.opponent()));
            return if own > other {
                1.0
            } else if own == other {
                0.0
            } else {
                -1.0
            };
        }
        let diff =
            eval::heuristic(board, color) - eval::heuristic(board, color.opponent());
        diff / REWARD_NORMALIZATION
    }

    /// Geometric exploration decay toward the floor, applied after every
    /// completed game.
    pub fn decay_exploration(&mut self) {
        self.exploration_rate =
            (self.exploration_rate * self.exploration_decay).max(self.min_exploration_rate);
    }

    /// Persist the table as a JSON list of `{state, action, value}` entries.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let entries: Vec<QEntry> = self
            .q_table
            .iter()
            .map(|((state, action), &value)| QEntry {
                state: state.clone(),
                action: *action,
                value,
            })
            .collect();
        let json = serde_json::to_string(&entries)?;
        fs::write(path, json).with_context(|| format!("writing q-table to {}", path.display()))?;
        Ok(())
    }

    /// Replace the table with the entries stored at `path`.
    pub fn load(&mut self, path: &Path) -> anyhow::Result<()> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("reading q-table from {}", path.display()))?;
        let entries: Vec<QEntry> = serde_json::from_str(&json)?;
        self.q_table = entries
            .into_iter()
            .map(|e| ((e.state, e.action), e.value))
            .collect();
        Ok(())
    }
}

impl Default for QLearning {
    fn default() -> Self {
        Self::new()
    }
}
