//! Tesuji: a small-board Go engine with a family of search agents.
//!
//! The crate is split into a rules engine and a search layer built on top of
//! it. Every agent answers the same question through [`agents::Policy`]:
//! the move to play for a color on a board, or `None` to pass.
//!
//! ## Modules
//!
//! - [`board`] - Board state, move legality, captures, ko, undo
//! - [`eval`] - Territory scoring and the weighted heuristics
//! - [`agents`] - Random and greedy one-ply agents
//! - [`minimax`] - Depth-limited minimax, plain and alpha-beta pruned
//! - [`expectimax`] - Expectimax with uniform chance nodes
//! - [`mcts`] - Monte Carlo Tree Search, serial and rollout-parallel
//! - [`qlearn`] - Tabular Q-learning with JSON persistence
//! - [`strategy`] - One enum over every playing agent
//! - [`game`] - Match driver and Q-learning self-play training
//!
//! ## Example
//!
//! ```
//! use tesuji::board::{Board, Color};
//! use tesuji::minimax::Minimax;
//!
//! let mut board = Board::new(5);
//! board.play_move(2, 2, Color::Black);
//! board.record_position();
//!
//! let (best, value) = Minimax::new(2).search(&board, Color::White);
//! assert!(best.is_some());
//! println!("White plays {best:?} (value {value})");
//! ```

pub mod agents;
pub mod board;
pub mod eval;
pub mod expectimax;
pub mod game;
pub mod mcts;
pub mod minimax;
pub mod qlearn;
pub mod strategy;
