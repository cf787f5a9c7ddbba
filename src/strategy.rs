//! Strategy selection: one enum over every playing agent so the game driver
//! and the CLI can treat them uniformly.

use std::path::Path;

use crate::agents::{GreedyAgent, Policy, RandomAgent};
use crate::board::{Board, Color, Move};
use crate::expectimax::Expectimax;
use crate::mcts::Mcts;
use crate::minimax::{AlphaBeta, Minimax};
use crate::qlearn::QLearning;

/// Default search depth for the tree searchers.
pub const DEFAULT_DEPTH: u32 = 4;
/// Default Monte Carlo budget and UCT exploration constant.
pub const DEFAULT_MCTS_ITERATIONS: usize = 50;
pub const DEFAULT_MCTS_EXPLORATION: f64 = 1.5;

/// Strategy name as given on the command line.
#[derive(Copy, Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
#[value(rename_all = "snake_case")]
pub enum StrategyKind {
    Random,
    Greedy,
    Minimax,
    AlphaBeta,
    Expectimax,
    MonteCarlo,
    Qlearn,
}

impl StrategyKind {
    /// Instantiate the strategy with its default parameters. `q_table` is
    /// only consulted for [`StrategyKind::Qlearn`]; a trained table is
    /// loaded from it when given, and the learner plays greedily (ε = 0)
    /// either way.
    pub fn build(self, q_table: Option<&Path>) -> anyhow::Result<Strategy> {
        Ok(match self {
            StrategyKind::Random => Strategy::Random(RandomAgent::new()),
            StrategyKind::Greedy => Strategy::Greedy(GreedyAgent::new()),
            StrategyKind::Minimax => Strategy::Minimax(Minimax::new(DEFAULT_DEPTH)),
            StrategyKind::AlphaBeta => Strategy::AlphaBeta(AlphaBeta::new(DEFAULT_DEPTH)),
            StrategyKind::Expectimax => Strategy::Expectimax(Expectimax::new(DEFAULT_DEPTH)),
            StrategyKind::MonteCarlo => Strategy::MonteCarlo(Mcts::with_opponent(
                DEFAULT_MCTS_ITERATIONS,
                DEFAULT_MCTS_EXPLORATION,
                GreedyAgent::new(),
            )),
            StrategyKind::Qlearn => {
                let mut learner = QLearning::with_exploration(0.0);
                if let Some(path) = q_table {
                    learner.load(path)?;
                }
                Strategy::Qlearn(Box::new(learner))
            }
        })
    }
}

/// A ready-to-play strategy. Everything answers the same question: the move
/// to play for `color` on `board`, or `None` to pass.
pub enum Strategy {
    Random(RandomAgent),
    Greedy(GreedyAgent),
    Minimax(Minimax),
    AlphaBeta(AlphaBeta),
    Expectimax(Expectimax),
    MonteCarlo(Mcts<GreedyAgent>),
    Qlearn(Box<QLearning>),
}

impl Policy for Strategy {
    fn select_move(&mut self, board: &Board, color: Color) -> Option<Move> {
        match self {
            Strategy::Random(agent) => agent.select_move(board, color),
            Strategy::Greedy(agent) => agent.select_move(board, color),
            Strategy::Minimax(searcher) => searcher.search(board, color).0,
            Strategy::AlphaBeta(searcher) => searcher.search(board, color).0,
            Strategy::Expectimax(searcher) => searcher.search(board, color).0,
            Strategy::MonteCarlo(searcher) => searcher.search_parallel(board, color),
            Strategy::Qlearn(learner) => learner.choose_action(board, color),
        }
    }
}
