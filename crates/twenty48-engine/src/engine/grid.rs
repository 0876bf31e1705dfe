use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{GameError, Tile};

/// Smallest supported grid edge. Anything smaller cannot hold the two
/// initial tiles.
pub const MIN_GRID_SIZE: usize = 2;
/// Largest supported grid edge.
pub const MAX_GRID_SIZE: usize = 16;

/// N×N matrix of tile values stored row-major.
///
/// Cells hold the actual value: 0 for empty, otherwise a power of two ≥ 2.
/// The dimensions are fixed at construction; every mutation happens in
/// place through `set`, move processing, or `spawn_random_tile`.
///
/// ```
/// use twenty48_engine::engine::Grid;
/// let mut grid = Grid::new(4).unwrap();
/// grid.set(0, 0, 2);
/// assert_eq!(grid.get(0, 0), Some(2));
/// assert_eq!(grid.get(9, 9), None);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Grid {
    size: usize,
    cells: Vec<Tile>,
}

impl Grid {
    /// Construct an empty grid. Sizes outside
    /// `MIN_GRID_SIZE..=MAX_GRID_SIZE` are a construction error.
    pub fn new(size: usize) -> Result<Self, GameError> {
        if !(MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&size) {
            return Err(GameError::UnsupportedSize(size));
        }
        Ok(Grid {
            size,
            cells: vec![0; size * size],
        })
    }

    /// Construct a grid from a square matrix of values, validating the
    /// power-of-two cell invariant.
    ///
    /// ```
    /// use twenty48_engine::engine::Grid;
    /// let grid = Grid::from_rows(&[vec![2, 0], vec![0, 4]]).unwrap();
    /// assert_eq!(grid.get(1, 1), Some(4));
    /// assert!(Grid::from_rows(&[vec![3, 0], vec![0, 4]]).is_err());
    /// ```
    pub fn from_rows(rows: &[Vec<Tile>]) -> Result<Self, GameError> {
        let mut grid = Grid::new(rows.len())?;
        for (r, row) in rows.iter().enumerate() {
            if row.len() != rows.len() {
                return Err(GameError::NotSquare);
            }
            for (c, &value) in row.iter().enumerate() {
                if value != 0 && !(value.is_power_of_two() && value >= 2) {
                    return Err(GameError::InvalidTile(value));
                }
                grid.cells[r * grid.size + c] = value;
            }
        }
        Ok(grid)
    }

    /// Edge length of the grid.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Total number of cells.
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.size * self.size
    }

    /// Value at `(row, col)`, or `None` out of bounds. Never panics.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<Tile> {
        if row < self.size && col < self.size {
            Some(self.cells[row * self.size + col])
        } else {
            None
        }
    }

    /// Overwrite the value at `(row, col)`. Out-of-bounds writes are
    /// silently ignored.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: Tile) {
        if row < self.size && col < self.size {
            self.cells[row * self.size + col] = value;
        }
    }

    /// Coordinates of every empty cell in row-major order.
    pub fn empty_cells(&self) -> Vec<(usize, usize)> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, &value)| value == 0)
            .map(|(idx, _)| (idx / self.size, idx % self.size))
            .collect()
    }

    /// Count the number of empty cells.
    pub fn count_empty(&self) -> usize {
        self.cells.iter().filter(|&&value| value == 0).count()
    }

    /// True iff no cell is empty.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|&value| value != 0)
    }

    /// True iff any cell holds `value`.
    pub fn contains(&self, value: Tile) -> bool {
        self.cells.contains(&value)
    }

    /// Highest tile value on the grid (0 when empty).
    pub fn highest_tile(&self) -> Tile {
        self.cells.iter().copied().max().unwrap_or(0)
    }

    /// Write a 2 (90%) or 4 (10%) into a uniformly chosen empty cell, using
    /// the provided RNG. Returns `false` when the grid is already full.
    ///
    /// This is the sole source of randomness in the engine; pass a seeded
    /// RNG for reproducible spawns.
    pub fn spawn_random_tile<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        let empties = self.empty_cells();
        if empties.is_empty() {
            return false;
        }
        let (row, col) = empties[rng.gen_range(0..empties.len())];
        let value = if rng.gen_range(0..10) < 9 { 2 } else { 4 };
        self.set(row, col, value);
        true
    }

    /// Reset every cell to empty.
    pub fn clear(&mut self) {
        self.cells.fill(0);
    }

    /// Borrow one row as a slice.
    #[inline]
    pub fn row(&self, row: usize) -> &[Tile] {
        &self.cells[row * self.size..(row + 1) * self.size]
    }

    /// Borrow the raw row-major cell storage.
    #[inline]
    pub fn cells(&self) -> &[Tile] {
        &self.cells
    }

    /// Owned `size × size` matrix copy of the current cells, for callers
    /// that want a snapshot detached from the live grid.
    pub fn to_rows(&self) -> Vec<Vec<Tile>> {
        (0..self.size).map(|r| self.row(r).to_vec()).collect()
    }

    #[inline]
    pub(crate) fn row_mut(&mut self, row: usize) -> &mut [Tile] {
        &mut self.cells[row * self.size..(row + 1) * self.size]
    }

    pub(crate) fn swap_cells(&mut self, a: (usize, usize), b: (usize, usize)) {
        let idx_a = a.0 * self.size + a.1;
        let idx_b = b.0 * self.size + b.1;
        self.cells.swap(idx_a, idx_b);
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let divider = "-".repeat(self.size * 8);
        writeln!(f)?;
        for r in 0..self.size {
            if r > 0 {
                writeln!(f, "{}", divider)?;
            }
            let row: Vec<String> = self.row(r).iter().map(|&v| format_val(v)).collect();
            writeln!(f, "{}", row.join("|"))?;
        }
        Ok(())
    }
}

fn format_val(val: Tile) -> String {
    if val == 0 {
        return String::from("       ");
    }
    let mut text = val.to_string();
    while text.len() < 7 {
        match text.len() {
            6 => text = format!(" {}", text),
            _ => text = format!(" {} ", text),
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn it_rejects_unsupported_sizes() {
        assert!(matches!(Grid::new(0), Err(GameError::UnsupportedSize(0))));
        assert!(matches!(Grid::new(1), Err(GameError::UnsupportedSize(1))));
        assert!(matches!(Grid::new(17), Err(GameError::UnsupportedSize(17))));
        assert!(Grid::new(2).is_ok());
        assert!(Grid::new(16).is_ok());
    }

    #[test]
    fn it_bounds_checks_access() {
        let mut grid = Grid::new(4).unwrap();
        assert_eq!(grid.get(0, 0), Some(0));
        assert_eq!(grid.get(3, 3), Some(0));
        assert_eq!(grid.get(4, 0), None);
        assert_eq!(grid.get(0, 4), None);
        // Out-of-bounds writes are ignored, not panics
        grid.set(4, 4, 2048);
        assert!(grid.cells().iter().all(|&v| v == 0));
        grid.set(2, 1, 8);
        assert_eq!(grid.get(2, 1), Some(8));
    }

    #[test]
    fn it_enumerates_empty_cells_row_major() {
        let grid = Grid::from_rows(&[vec![2, 0, 4], vec![0, 2, 0], vec![4, 0, 2]]).unwrap();
        assert_eq!(
            grid.empty_cells(),
            vec![(0, 1), (1, 0), (1, 2), (2, 1)]
        );
        assert_eq!(grid.count_empty(), 4);
        assert!(!grid.is_full());
    }

    #[test]
    fn it_validates_from_rows() {
        assert!(matches!(
            Grid::from_rows(&[vec![2, 0], vec![0]]),
            Err(GameError::NotSquare)
        ));
        assert!(matches!(
            Grid::from_rows(&[vec![2, 6], vec![0, 0]]),
            Err(GameError::InvalidTile(6))
        ));
        assert!(matches!(
            Grid::from_rows(&[vec![2, 1], vec![0, 0]]),
            Err(GameError::InvalidTile(1))
        ));
        assert!(matches!(Grid::from_rows(&[vec![2]]), Err(GameError::UnsupportedSize(1))));
    }

    #[test]
    fn it_spawns_until_full() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut grid = Grid::new(4).unwrap();
        for _ in 0..16 {
            assert!(grid.spawn_random_tile(&mut rng));
        }
        assert!(grid.is_full());
        assert!(!grid.spawn_random_tile(&mut rng));
        assert!(grid.cells().iter().all(|&v| v == 2 || v == 4));
    }

    #[test]
    fn it_compares_cell_wise() {
        let a = Grid::from_rows(&[vec![2, 0], vec![0, 4]]).unwrap();
        let mut b = a.clone();
        assert_eq!(a, b);
        b.set(0, 1, 2);
        assert_ne!(a, b);
        // Different sizes are never equal
        let c = Grid::new(3).unwrap();
        let d = Grid::new(4).unwrap();
        assert_ne!(c, d);
    }

    #[test]
    fn it_clones_with_independent_storage() {
        let original = Grid::from_rows(&[vec![2, 4], vec![8, 16]]).unwrap();
        let mut copy = original.clone();
        copy.set(0, 0, 32);
        copy.clear();
        assert_eq!(original.get(0, 0), Some(2));
        assert_eq!(original.highest_tile(), 16);
        assert_eq!(copy.highest_tile(), 0);
    }

    #[test]
    fn it_snapshots_rows() {
        let grid = Grid::from_rows(&[vec![2, 0], vec![0, 4]]).unwrap();
        assert_eq!(grid.to_rows(), vec![vec![2, 0], vec![0, 4]]);
        assert_eq!(grid.row(1), &[0, 4]);
        assert!(grid.contains(4));
        assert!(!grid.contains(8));
    }
}
