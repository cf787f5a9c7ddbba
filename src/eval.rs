//! Board evaluation: territory scoring and the weighted heuristics.
//!
//! Everything here is a pure function over a board snapshot. Dead-stone
//! adjudication is approximated by flood-fill territory: an empty region
//! counts for a color only when every stone bordering it is that color.

use crate::board::{Board, Color};

/// Final score per color: enclosed territory plus stones captured from the
/// opponent.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Score {
    pub black: usize,
    pub white: usize,
}

impl Score {
    pub fn of(self, color: Color) -> usize {
        match color {
            Color::Black => self.black,
            Color::White => self.white,
        }
    }
}

/// Count empty cells in regions entirely bordered by `color` stones.
///
/// A region with no bordering stones at all (e.g. the whole empty board)
/// belongs to nobody.
pub fn territory(board: &Board, color: Color) -> usize {
    let size = board.size;
    let mut visited = vec![false; size * size];
    let mut total = 0;

    for x in 0..size {
        for y in 0..size {
            if board.get(x, y).is_some() || visited[x * size + y] {
                continue;
            }
            let region = board.group_at(x, y);
            let mut bordered = true;
            let mut touches_stone = false;
            for &(rx, ry) in &region {
                visited[rx * size + ry] = true;
                for (nx, ny) in board.neighbors(rx, ry) {
                    match board.get(nx, ny) {
                        Some(c) if c == color => touches_stone = true,
                        Some(_) => bordered = false,
                        None => {}
                    }
                }
            }
            if bordered && touches_stone {
                total += region.len();
            }
        }
    }
    total
}

/// Score both colors: territory plus captures taken from the opponent.
pub fn score(board: &Board) -> Score {
    Score {
        black: territory(board, Color::Black) + board.captured(Color::Black),
        white: territory(board, Color::White) + board.captured(Color::White),
    }
}

/// Raw score differential from `color`'s point of view.
pub fn evaluate(board: &Board, color: Color) -> f64 {
    let s = score(board);
    s.of(color) as f64 - s.of(color.opponent()) as f64
}

fn stone_count(board: &Board, color: Color) -> usize {
    let mut count = 0;
    for x in 0..board.size {
        for y in 0..board.size {
            if board.get(x, y) == Some(color) {
                count += 1;
            }
        }
    }
    count
}

/// Distinct empty cells adjacent to at least one `color` stone.
fn liberty_count(board: &Board, color: Color) -> usize {
    let size = board.size;
    let mut liberty = vec![false; size * size];
    for x in 0..size {
        for y in 0..size {
            if board.get(x, y) != Some(color) {
                continue;
            }
            for (nx, ny) in board.neighbors(x, y) {
                if board.get(nx, ny).is_none() {
                    liberty[nx * size + ny] = true;
                }
            }
        }
    }
    liberty.into_iter().filter(|&l| l).count()
}

/// Stones of `color` on the first line (edges and corners).
fn edge_occupancy(board: &Board, color: Color) -> usize {
    let last = board.size - 1;
    let mut count = 0;
    for x in 0..board.size {
        for y in 0..board.size {
            if (x == 0 || y == 0 || x == last || y == last) && board.get(x, y) == Some(color) {
                count += 1;
            }
        }
    }
    count
}

/// Weighted positional heuristic: stones ×1, territory ×5, captures ×3,
/// liberties ×2, edge/corner occupancy ×4.
///
/// The literal weights are load-bearing: trained Q-tables and the search
/// strategies both depend on reproducing these exact values.
pub fn heuristic(board: &Board, color: Color) -> f64 {
    stone_count(board, color) as f64
        + 5.0 * territory(board, color) as f64
        + 3.0 * board.captured(color) as f64
        + 2.0 * liberty_count(board, color) as f64
        + 4.0 * edge_occupancy(board, color) as f64
}

/// [`heuristic`] without the edge/corner term. The Q-learner scores unseen
/// state-action pairs with this variant.
pub fn heuristic_plain(board: &Board, color: Color) -> f64 {
    stone_count(board, color) as f64
        + 5.0 * territory(board, color) as f64
        + 3.0 * board.captured(color) as f64
        + 2.0 * liberty_count(board, color) as f64
}
