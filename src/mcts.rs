//! Monte Carlo Tree Search over an index-addressed node arena.
//!
//! The tree lives in a `Vec<Node>`; parents are non-owning back-indices and
//! children are owned index lists, so no reference cycles exist and the
//! whole tree is dropped after the best move is extracted.
//!
//! The loop is the classic select, expand, simulate, backpropagate. Two
//! deliberate simplifications: rollout rewards are evaluated for one fixed
//! color (the searcher) and are *not* sign-flipped per ply during
//! backpropagation, and the rollout plays the searcher's stones uniformly
//! at random while the opponent follows a pluggable policy.
//!
//! [`Mcts::search_parallel`] farms the rollouts out to rayon workers, each
//! on its own board clone; selection, expansion and backpropagation stay on
//! the invoking thread, which is the only thread that ever touches the tree.

use rayon::prelude::*;

use crate::agents::{Policy, RandomAgent};
use crate::board::{Board, Color, Move};
use crate::eval;

/// Rollout length cap, in plies.
const ROLLOUT_CAP: usize = 50;

/// One tree node: a board snapshot, the color to move there, the move that
/// produced it, and the visit/value statistics driving UCT.
struct Node {
    board: Board,
    color: Color,
    mv: Option<Move>,
    parent: Option<usize>,
    children: Vec<usize>,
    untried: Vec<Move>,
    visits: u32,
    value: f64,
}

impl Node {
    fn new(board: Board, color: Color, mv: Option<Move>, parent: Option<usize>) -> Self {
        // Reversed so pop() expands moves in row-major order.
        let mut untried = board.legal_moves(color);
        untried.reverse();
        Self {
            board,
            color,
            mv,
            parent,
            children: Vec::new(),
            untried,
            visits: 0,
            value: 0.0,
        }
    }

    fn is_fully_expanded(&self) -> bool {
        self.untried.is_empty()
    }

    fn is_terminal(&self) -> bool {
        self.untried.is_empty() && self.children.is_empty()
    }
}

struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    fn new(board: &Board, color: Color) -> Self {
        Self {
            nodes: vec![Node::new(board.clone(), color, None, None)],
        }
    }

    /// UCT score of `idx` from its parent's point of view. Unvisited nodes
    /// score +infinity so they are always tried first.
    fn uct(&self, idx: usize, exploration: f64) -> f64 {
        let node = &self.nodes[idx];
        if node.visits == 0 {
            return f64::INFINITY;
        }
        let parent_visits = node
            .parent
            .map(|p| self.nodes[p].visits)
            .unwrap_or(1)
            .max(1) as f64;
        node.value / node.visits as f64
            + exploration * (parent_visits.ln() / node.visits as f64).sqrt()
    }

    fn best_child(&self, idx: usize, exploration: f64) -> Option<usize> {
        self.nodes[idx].children.iter().copied().max_by(|&a, &b| {
            self.uct(a, exploration)
                .partial_cmp(&self.uct(b, exploration))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
    }

    /// Descend while fully expanded, then expand one untried move. Returns
    /// the node to simulate from (a terminal node returns itself).
    fn select_and_expand(&mut self, exploration: f64) -> usize {
        let mut idx = 0;
        loop {
            if self.nodes[idx].is_terminal() {
                return idx;
            }
            if !self.nodes[idx].is_fully_expanded() {
                return self.expand(idx);
            }
            match self.best_child(idx, exploration) {
                Some(child) => idx = child,
                None => return idx,
            }
        }
    }

    /// Turn one untried move into a child node with the alternated color.
    fn expand(&mut self, idx: usize) -> usize {
        let (x, y) = match self.nodes[idx].untried.pop() {
            Some(mv) => mv,
            None => return idx,
        };
        let mut board = self.nodes[idx].board.clone();
        board.play_move(x, y, self.nodes[idx].color);
        let child_color = self.nodes[idx].color.opponent();
        let child = Node::new(board, child_color, Some((x, y)), Some(idx));
        self.nodes.push(child);
        let child_idx = self.nodes.len() - 1;
        self.nodes[idx].children.push(child_idx);
        child_idx
    }

    /// Add the reward at every node from `idx` up to the root. The reward is
    /// accumulated from the searcher's fixed perspective, no sign flip.
    fn backpropagate(&mut self, idx: usize, reward: f64) {
        let mut current = Some(idx);
        while let Some(i) = current {
            self.nodes[i].visits += 1;
            self.nodes[i].value += reward;
            current = self.nodes[i].parent;
        }
    }

    /// Root child with the highest mean value: the UCT rule with the
    /// exploration term zeroed.
    fn best_move(&self) -> Option<Move> {
        let mean = |idx: usize| {
            let node = &self.nodes[idx];
            if node.visits == 0 {
                f64::NEG_INFINITY
            } else {
                node.value / node.visits as f64
            }
        };
        self.nodes[0]
            .children
            .iter()
            .copied()
            .max_by(|&a, &b| {
                mean(a)
                    .partial_cmp(&mean(b))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .and_then(|idx| self.nodes[idx].mv)
    }
}

/// Play out a bounded random continuation and score the end position with
/// the heuristic from `root_color`'s perspective. The searcher's stones are
/// played uniformly at random; the opponent's by `policy`.
fn rollout<P: Policy>(
    mut board: Board,
    mut color: Color,
    root_color: Color,
    policy: &mut P,
    rng: &mut fastrand::Rng,
) -> f64 {
    for _ in 0..ROLLOUT_CAP {
        let mv = if color == root_color {
            let moves = board.legal_moves(color);
            if moves.is_empty() {
                None
            } else {
                Some(moves[rng.usize(..moves.len())])
            }
        } else {
            policy.select_move(&board, color)
        };
        match mv {
            Some((x, y)) => {
                board.play_move(x, y, color);
                color = color.opponent();
            }
            None => break,
        }
    }
    eval::heuristic(&board, root_color)
}

/// Monte Carlo Tree Search. `P` is the opponent's rollout policy (the
/// searcher side plays random rollout moves).
pub struct Mcts<P: Policy = RandomAgent> {
    pub iterations: usize,
    pub exploration: f64,
    opponent: P,
    rng: fastrand::Rng,
}

impl Mcts<RandomAgent> {
    pub fn new(iterations: usize, exploration: f64) -> Self {
        Self::with_opponent(iterations, exploration, RandomAgent::new())
    }
}

impl<P: Policy> Mcts<P> {
    pub fn with_opponent(iterations: usize, exploration: f64, opponent: P) -> Self {
        Self {
            iterations,
            exploration,
            opponent,
            rng: fastrand::Rng::new(),
        }
    }

    pub fn seed(&mut self, seed: u64) {
        self.rng = fastrand::Rng::with_seed(seed);
    }

    /// Run the search loop and return the best move for `color`, or `None`
    /// when the root never grew a child (zero iterations, or no legal move).
    pub fn search(&mut self, board: &Board, color: Color) -> Option<Move> {
        let mut tree = Tree::new(board, color);
        for _ in 0..self.iterations {
            let leaf = tree.select_and_expand(self.exploration);
            let reward = rollout(
                tree.nodes[leaf].board.clone(),
                tree.nodes[leaf].color,
                color,
                &mut self.opponent,
                &mut self.rng,
            );
            tree.backpropagate(leaf, reward);
        }
        tree.best_move()
    }
}

impl<P: Policy + Clone + Send + Sync> Mcts<P> {
    /// Like [`Mcts::search`], but rollouts run on rayon workers. Each batch
    /// is selected and expanded serially, simulated in parallel on private
    /// board clones, then backpropagated serially; the node arena is only
    /// ever mutated by this thread.
    pub fn search_parallel(&mut self, board: &Board, color: Color) -> Option<Move> {
        let mut tree = Tree::new(board, color);
        let batch = rayon::current_num_threads().max(1);
        let mut remaining = self.iterations;

        while remaining > 0 {
            let take = batch.min(remaining);
            remaining -= take;

            let jobs: Vec<(usize, Board, Color, u64)> = (0..take)
                .map(|_| {
                    let leaf = tree.select_and_expand(self.exploration);
                    (
                        leaf,
                        tree.nodes[leaf].board.clone(),
                        tree.nodes[leaf].color,
                        self.rng.u64(..),
                    )
                })
                .collect();

            let opponent = &self.opponent;
            let rewards: Vec<(usize, f64)> = jobs
                .into_par_iter()
                .map(|(leaf, job_board, job_color, seed)| {
                    let mut policy = opponent.clone();
                    let mut rng = fastrand::Rng::with_seed(seed);
                    let reward = rollout(job_board, job_color, color, &mut policy, &mut rng);
                    (leaf, reward)
                })
                .collect();

            for (leaf, reward) in rewards {
                tree.backpropagate(leaf, reward);
            }
        }
        tree.best_move()
    }
}
