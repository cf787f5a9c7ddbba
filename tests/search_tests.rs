//! Search-layer integration tests: pruning equivalence, expectimax chance
//! nodes, MCTS edge cases and strategy dispatch.

use tesuji::agents::Policy;
use tesuji::board::{Board, Color};
use tesuji::eval;
use tesuji::expectimax::Expectimax;
use tesuji::mcts::Mcts;
use tesuji::minimax::{heuristic_leaf, score_leaf, AlphaBeta, Minimax};
use tesuji::strategy::StrategyKind;

fn setpos(size: usize, black: &[(usize, usize)], white: &[(usize, usize)]) -> Board {
    let mut board = Board::new(size);
    for &(x, y) in black {
        board.place(x, y, Some(Color::Black));
    }
    for &(x, y) in white {
        board.place(x, y, Some(Color::White));
    }
    board
}

// =============================================================================
// Minimax and alpha-beta
// =============================================================================

#[test]
fn pruning_never_changes_the_result() {
    // Same depth, same leaf evaluator, several positions: alpha-beta with an
    // unbounded initial window must agree with plain minimax exactly.
    let positions = [
        setpos(3, &[(2, 2)], &[(0, 0)]),
        setpos(3, &[(1, 1), (0, 2)], &[(2, 0)]),
        setpos(4, &[(0, 1), (1, 0)], &[(0, 0), (3, 3)]),
    ];
    for board in &positions {
        for color in [Color::Black, Color::White] {
            let (plain_move, plain_value) =
                Minimax::with_leaf(2, heuristic_leaf).search(board, color);
            let (pruned_move, pruned_value) =
                AlphaBeta::with_leaf(2, heuristic_leaf).search(board, color);
            assert_eq!(plain_move, pruned_move);
            assert_eq!(plain_value, pruned_value);

            let (plain_move, plain_value) = Minimax::with_leaf(2, score_leaf).search(board, color);
            let (pruned_move, pruned_value) =
                AlphaBeta::with_leaf(2, score_leaf).search(board, color);
            assert_eq!(plain_move, pruned_move);
            assert_eq!(plain_value, pruned_value);
        }
    }
}

#[test]
fn minimax_finds_forced_capture() {
    // White in atari at (0,0); capturing dominates every alternative.
    let mut board = setpos(4, &[(0, 1)], &[(0, 0), (2, 2)]);
    board.record_position();
    let (mv, _) = Minimax::new(2).search(&board, Color::Black);
    assert_eq!(mv, Some((1, 0)));
}

// =============================================================================
// Expectimax
// =============================================================================

#[test]
fn expectimax_value_is_order_independent_mean() {
    // The chance value of the chosen move equals the arithmetic mean of the
    // leaf values over all opponent replies, recomputed here in reverse
    // order to show the ordering does not matter.
    let board = setpos(3, &[(2, 2)], &[(0, 0)]);
    let (mv, value) = Expectimax::new(2).search(&board, Color::Black);
    let (x, y) = mv.unwrap();

    let mut after = board.clone();
    assert!(after.play_move(x, y, Color::Black));
    let mut replies = after.legal_moves(Color::White);
    replies.reverse();
    let mut total = 0.0;
    for &(rx, ry) in &replies {
        let mut leaf = after.clone();
        leaf.play_move(rx, ry, Color::White);
        total += eval::evaluate(&leaf, Color::Black);
    }
    assert!((value - total / replies.len() as f64).abs() < 1e-9);
}

// =============================================================================
// MCTS
// =============================================================================

#[test]
fn mcts_zero_iterations_returns_none() {
    let board = Board::new(5);
    let mut mcts = Mcts::new(0, 1.5);
    assert_eq!(mcts.search(&board, Color::Black), None);
}

#[test]
fn mcts_serial_and_parallel_both_return_legal_moves() {
    let board = setpos(5, &[(2, 2)], &[(1, 1)]);
    let mut mcts = Mcts::new(40, 1.5);
    mcts.seed(3);
    for _ in 0..3 {
        let (x, y) = mcts.search(&board, Color::White).unwrap();
        assert!(board.is_legal_move(x, y, Color::White));
        let (x, y) = mcts.search_parallel(&board, Color::White).unwrap();
        assert!(board.is_legal_move(x, y, Color::White));
    }
}

#[test]
fn mcts_search_leaves_caller_board_untouched() {
    let board = setpos(5, &[(2, 2)], &[]);
    let key = board.key();
    let mut mcts = Mcts::new(25, 1.5);
    mcts.seed(9);
    mcts.search(&board, Color::White);
    assert_eq!(board.key(), key);
}

// =============================================================================
// Strategy dispatch
// =============================================================================

#[test]
fn all_strategies_pass_on_a_dead_board() {
    // Checkerboard fill: no empty cell, so every strategy must pass.
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
    for kind in [
        StrategyKind::Random,
        StrategyKind::Greedy,
        StrategyKind::Minimax,
        StrategyKind::AlphaBeta,
        StrategyKind::Expectimax,
        StrategyKind::MonteCarlo,
        StrategyKind::Qlearn,
    ] {
        let mut strategy = kind.build(None).unwrap();
        assert_eq!(
            strategy.select_move(&board, Color::Black),
            None,
            "{kind:?} must pass with no legal moves"
        );
    }
}
