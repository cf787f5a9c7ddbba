//! Go board state and move execution.
//!
//! The board is an N×N grid of cells, each empty or holding a stone. All rule
//! enforcement lives here: stone placement, capture resolution, the suicide
//! ban, and the ko rule (positional superko over the set of previously
//! recorded positions). Searches never mutate a caller's board; they work on
//! deep clones obtained via `Clone`.

use std::collections::HashSet;
use std::fmt;

/// Stone color. Black moves first.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    Black,
    White,
}

impl Color {
    pub fn opponent(self) -> Color {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Black => write!(f, "BLACK"),
            Color::White => write!(f, "WHITE"),
        }
    }
}

/// A board coordinate, `(row, col)`, zero-based.
pub type Move = (usize, usize);

/// Snapshot of the mutable board state taken before an accepted move.
#[derive(Clone)]
struct Snapshot {
    mv: Move,
    cells: Vec<Option<Color>>,
    captured: [usize; 2],
}

/// An N×N Go board.
///
/// `captured[c]` counts stones captured *by* color `c`. `history` holds one
/// snapshot per accepted move so `undo_move` restores the exact prior state.
/// `seen` holds the serialized keys of positions recorded with
/// [`Board::record_position`]; `is_legal_move` rejects any move that would
/// recreate one of them (positional superko).
#[derive(Clone)]
pub struct Board {
    pub size: usize,
    cells: Vec<Option<Color>>,
    captured: [usize; 2],
    history: Vec<Snapshot>,
    seen: HashSet<String>,
}

fn color_index(color: Color) -> usize {
    match color {
        Color::Black => 0,
        Color::White => 1,
    }
}

impl Board {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![None; size * size],
            captured: [0, 0],
            history: Vec::new(),
            seen: HashSet::new(),
        }
    }

    fn idx(&self, x: usize, y: usize) -> usize {
        x * self.size + y
    }

    pub fn is_on_board(&self, x: usize, y: usize) -> bool {
        x < self.size && y < self.size
    }

    /// Stone at `(x, y)`, or `None` for an empty or off-board cell.
    pub fn get(&self, x: usize, y: usize) -> Option<Color> {
        if !self.is_on_board(x, y) {
            return None;
        }
        self.cells[self.idx(x, y)]
    }

    /// Stones captured by `color` so far.
    pub fn captured(&self, color: Color) -> usize {
        self.captured[color_index(color)]
    }

    /// On-board 4-neighbors of `(x, y)`.
    pub fn neighbors(&self, x: usize, y: usize) -> Vec<Move> {
        let mut v = Vec::with_capacity(4);
        if x > 0 {
            v.push((x - 1, y));
        }
        if x + 1 < self.size {
            v.push((x + 1, y));
        }
        if y > 0 {
            v.push((x, y - 1));
        }
        if y + 1 < self.size {
            v.push((x, y + 1));
        }
        v
    }

    /// Flood-fill the maximal connected region of cells holding the same
    /// value as the seed (a stone group, or an empty region when the seed is
    /// empty). Recomputed on every call; group data is never cached.
    pub fn group_at(&self, x: usize, y: usize) -> Vec<Move> {
        let target = self.get(x, y);
        let mut group = Vec::new();
        let mut visited = vec![false; self.size * self.size];
        let mut stack = vec![(x, y)];
        while let Some((cx, cy)) = stack.pop() {
            let i = self.idx(cx, cy);
            if visited[i] {
                continue;
            }
            visited[i] = true;
            group.push((cx, cy));
            for (nx, ny) in self.neighbors(cx, cy) {
                if !visited[self.idx(nx, ny)] && self.get(nx, ny) == target {
                    stack.push((nx, ny));
                }
            }
        }
        group
    }

    /// True iff any cell of `group` has an empty 4-neighbor.
    pub fn has_liberties(&self, group: &[Move]) -> bool {
        group.iter().any(|&(x, y)| {
            self.neighbors(x, y)
                .into_iter()
                .any(|(nx, ny)| self.get(nx, ny).is_none())
        })
    }

    /// Clear every cell of `group` and credit the captured stones to
    /// `captor`. Only called after a liberties check has failed.
    fn remove_group(&mut self, group: &[Move], captor: Color) {
        for &(x, y) in group {
            let i = self.idx(x, y);
            self.cells[i] = None;
        }
        self.captured[color_index(captor)] += group.len();
    }

    /// Place a stone of `color` at `(x, y)`.
    ///
    /// Any adjacent opposing group left without liberties is removed first
    /// (captures take effect before the suicide test, so a capturing move
    /// that would otherwise be self-capture is legal). A move that captures
    /// nothing and leaves its own group without liberties is rejected and
    /// the board rolled back. Returns whether the move was accepted; the
    /// board is mutated only on acceptance.
    pub fn play_move(&mut self, x: usize, y: usize, color: Color) -> bool {
        if !self.is_on_board(x, y) || self.get(x, y).is_some() {
            return false;
        }
        let snapshot = Snapshot {
            mv: (x, y),
            cells: self.cells.clone(),
            captured: self.captured,
        };

        let i = self.idx(x, y);
        self.cells[i] = Some(color);

        let mut captured_any = false;
        for (nx, ny) in self.neighbors(x, y) {
            // Cells of an already-removed group read back as empty here.
            if self.get(nx, ny) == Some(color.opponent()) {
                let group = self.group_at(nx, ny);
                if !self.has_liberties(&group) {
                    self.remove_group(&group, color);
                    captured_any = true;
                }
            }
        }

        if !captured_any {
            let own = self.group_at(x, y);
            if !self.has_liberties(&own) {
                self.cells = snapshot.cells;
                self.captured = snapshot.captured;
                return false;
            }
        }

        self.history.push(snapshot);
        true
    }

    /// Revert the most recent accepted move, restoring the exact cell grid
    /// and capture counts it was played from.
    pub fn undo_move(&mut self) {
        if let Some(snapshot) = self.history.pop() {
            self.cells = snapshot.cells;
            self.captured = snapshot.captured;
        }
    }

    /// The move that produced the current position, if any.
    pub fn last_move(&self) -> Option<Move> {
        self.history.last().map(|s| s.mv)
    }

    /// Non-mutating legality test: the placement rules of [`Board::play_move`]
    /// plus the ko rule. A move is illegal if the position it produces has
    /// already been recorded via [`Board::record_position`].
    pub fn is_legal_move(&self, x: usize, y: usize, color: Color) -> bool {
        if !self.is_on_board(x, y) || self.get(x, y).is_some() {
            return false;
        }
        let mut probe = self.clone();
        probe.play_move(x, y, color) && !self.seen.contains(&probe.key())
    }

    /// All legal moves for `color`, in row-major scan order.
    pub fn legal_moves(&self, color: Color) -> Vec<Move> {
        let mut moves = Vec::new();
        for x in 0..self.size {
            for y in 0..self.size {
                if self.is_legal_move(x, y, color) {
                    moves.push((x, y));
                }
            }
        }
        moves
    }

    /// True iff `color` has no legal move.
    pub fn is_terminal(&self, color: Color) -> bool {
        for x in 0..self.size {
            for y in 0..self.size {
                if self.is_legal_move(x, y, color) {
                    return false;
                }
            }
        }
        true
    }

    /// Mark the current position as seen for ko purposes. The driver calls
    /// this after every accepted move on the *real* board; speculative moves
    /// played on clones during search never record.
    pub fn record_position(&mut self) {
        let key = self.key();
        self.seen.insert(key);
    }

    /// Total, collision-free serialization of the cell grid: one char per
    /// cell in row-major order (`X` black, `O` white, `.` empty). Used as the
    /// transposition-memo key, the superko key, and the Q-table state key.
    pub fn key(&self) -> String {
        self.cells
            .iter()
            .map(|c| match c {
                Some(Color::Black) => 'X',
                Some(Color::White) => 'O',
                None => '.',
            })
            .collect()
    }

    /// Set a cell directly, bypassing the rules. Position-setup helper for
    /// tests and diagnostics; does not touch history or capture counts.
    pub fn place(&mut self, x: usize, y: usize, stone: Option<Color>) {
        let i = self.idx(x, y);
        self.cells[i] = stone;
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for x in 0..self.size {
            for y in 0..self.size {
                let ch = match self.get(x, y) {
                    Some(Color::Black) => 'X',
                    Some(Color::White) => 'O',
                    None => '.',
                };
                write!(f, "{ch} ")?;
            }
            writeln!(f)?;
        }
        writeln!(
            f,
            "captured: BLACK {} WHITE {}",
            self.captured(Color::Black),
            self.captured(Color::White)
        )
    }
}
