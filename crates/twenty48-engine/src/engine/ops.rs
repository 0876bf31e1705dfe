use super::grid::Grid;
use super::state::{Move, Score, Tile};

/// Result of applying one move to a grid: whether any cell changed, and the
/// score gained from merges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    pub moved: bool,
    pub score: Score,
}

/// Slide/merge tiles in the given direction. No randomness.
///
/// All four directions reduce to the left case through row reversal and
/// transposition, so merge tie-breaking is identical everywhere.
pub fn shift(grid: &mut Grid, direction: Move) -> MoveOutcome {
    match direction {
        Move::Left => shift_left(grid),
        Move::Right => {
            reverse_rows(grid);
            let outcome = shift_left(grid);
            reverse_rows(grid);
            outcome
        }
        Move::Up => {
            transpose(grid);
            let outcome = shift_left(grid);
            transpose(grid);
            outcome
        }
        Move::Down => {
            transpose(grid);
            reverse_rows(grid);
            let outcome = shift_left(grid);
            reverse_rows(grid);
            transpose(grid);
            outcome
        }
    }
}

/// True iff shifting in `direction` would change the grid. Probes a clone;
/// the caller's grid is never mutated.
pub fn can_shift(grid: &Grid, direction: Move) -> bool {
    let mut probe = grid.clone();
    shift(&mut probe, direction).moved
}

/// True iff any direction can shift the grid.
pub fn has_moves(grid: &Grid) -> bool {
    Move::ALL
        .iter()
        .any(|&direction| can_shift(grid, direction))
}

/// Merge one compacted line of non-zero values: a single left-to-right
/// pass where each equal adjacent pair collapses into one doubled tile.
/// Returns the merged line and the score delta (the sum of values
/// produced by merges). A tile produced by a merge never merges again in
/// the same pass.
pub(crate) fn merge_line(tiles: &[Tile]) -> (Vec<Tile>, Score) {
    let mut merged = Vec::with_capacity(tiles.len());
    let mut score = 0;
    let mut idx = 0;
    while idx < tiles.len() {
        if idx + 1 < tiles.len() && tiles[idx] == tiles[idx + 1] {
            let doubled = tiles[idx] * 2;
            merged.push(doubled);
            score += doubled;
            idx += 2;
        } else {
            merged.push(tiles[idx]);
            idx += 1;
        }
    }
    (merged, score)
}

fn shift_left(grid: &mut Grid) -> MoveOutcome {
    let size = grid.size();
    let mut moved = false;
    let mut score = 0;
    for r in 0..size {
        let occupied: Vec<Tile> = grid.row(r).iter().copied().filter(|&v| v != 0).collect();
        let (merged, row_score) = merge_line(&occupied);
        let row = grid.row_mut(r);
        for (c, cell) in row.iter_mut().enumerate() {
            let value = merged.get(c).copied().unwrap_or(0);
            if *cell != value {
                moved = true;
            }
            *cell = value;
        }
        score += row_score;
    }
    MoveOutcome { moved, score }
}

fn reverse_rows(grid: &mut Grid) {
    for r in 0..grid.size() {
        grid.row_mut(r).reverse();
    }
}

fn transpose(grid: &mut Grid) {
    let size = grid.size();
    for r in 0..size {
        for c in r + 1..size {
            grid.swap_cells((r, c), (c, r));
        }
    }
}
