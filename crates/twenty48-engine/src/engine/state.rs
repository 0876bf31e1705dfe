use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::grid::{Grid, MAX_GRID_SIZE, MIN_GRID_SIZE};
use super::ops;

/// Value held by one cell: 0 for empty, otherwise a power of two ≥ 2.
pub type Tile = u64;
/// Accumulated merge score.
pub type Score = u64;

/// Tile value that ends a playthrough as a win.
pub const DEFAULT_WIN_TILE: Tile = 2048;

const INITIAL_TILES: usize = 2;
const INIT_ATTEMPTS: usize = 3;

/// A direction to move/merge tiles.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    /// Every direction, in the order used for legality masks.
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];
}

/// Error from parsing a direction string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized move direction {0:?}; expected one of up/down/left/right")]
pub struct ParseMoveError(String);

impl FromStr for Move {
    type Err = ParseMoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" => Ok(Move::Up),
            "down" => Ok(Move::Down),
            "left" => Ok(Move::Left),
            "right" => Ok(Move::Right),
            other => Err(ParseMoveError(other.to_string())),
        }
    }
}

/// Construction-time failures. Everything recoverable (bad direction input,
/// out-of-range cell access, moves after a terminal state) is a non-error
/// `false`/no-op instead.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("unsupported grid size {0}: must be between {MIN_GRID_SIZE} and {MAX_GRID_SIZE}")]
    UnsupportedSize(usize),
    #[error("invalid winning tile {0}: must be a power of two of at least 8")]
    InvalidWinTile(Tile),
    #[error("invalid tile value {0}: cells hold 0 or a power of two of at least 2")]
    InvalidTile(Tile),
    #[error("rows must form a square matrix")]
    NotSquare,
    #[error("initialization failed to place {INITIAL_TILES} starting tiles")]
    Initialization,
}

/// State captured before a committed move, for one-step rollback.
#[derive(Clone)]
struct Snapshot {
    grid: Grid,
    score: Score,
    move_count: u64,
    won: bool,
    game_over: bool,
}

/// One 2048 playthrough: a grid plus score, move count, and terminal flags.
///
/// The state machine has three states: playing (initial), won, and lost.
/// Terminal states persist until `restart`. Randomness (tile spawning) is
/// injected through `&mut impl Rng` on every call that needs it, so a seeded
/// source makes whole playthroughs reproducible.
///
/// ```
/// use twenty48_engine::engine::{Game, Move};
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let mut rng = StdRng::seed_from_u64(9);
/// let mut game = Game::new(4, &mut rng).unwrap();
/// assert_eq!(game.grid().count_empty(), 14);
/// assert!(!game.is_won() && !game.is_game_over());
/// ```
pub struct Game {
    grid: Grid,
    score: Score,
    move_count: u64,
    won: bool,
    game_over: bool,
    win_tile: Tile,
    previous: Option<Snapshot>,
}

impl Game {
    /// Start a playthrough on a `size`×`size` grid with the standard 2048
    /// winning tile.
    pub fn new<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Result<Self, GameError> {
        Self::with_win_tile(size, DEFAULT_WIN_TILE, rng)
    }

    /// Start a playthrough that ends in a win when any cell reaches
    /// `win_tile`. The target must be a power of two ≥ 8 so it can only be
    /// reached by merging, never by a spawn.
    pub fn with_win_tile<R: Rng + ?Sized>(
        size: usize,
        win_tile: Tile,
        rng: &mut R,
    ) -> Result<Self, GameError> {
        if !win_tile.is_power_of_two() || win_tile < 8 {
            return Err(GameError::InvalidWinTile(win_tile));
        }
        let mut game = Game {
            grid: Grid::new(size)?,
            score: 0,
            move_count: 0,
            won: false,
            game_over: false,
            win_tile,
            previous: None,
        };
        game.initialize(rng)?;
        Ok(game)
    }

    /// Clear everything and spawn the two starting tiles. The two-tile
    /// post-condition is verified; an attempt that misses it is retried a
    /// bounded number of times before surfacing as fatal.
    fn initialize<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), GameError> {
        for _ in 0..INIT_ATTEMPTS {
            self.grid.clear();
            self.score = 0;
            self.move_count = 0;
            self.won = false;
            self.game_over = false;
            self.previous = None;
            let placed = (0..INITIAL_TILES)
                .filter(|_| self.grid.spawn_random_tile(rng))
                .count();
            if placed == INITIAL_TILES
                && self.grid.cell_count() - self.grid.count_empty() == INITIAL_TILES
            {
                return Ok(());
            }
        }
        Err(GameError::Initialization)
    }

    /// Reinitialize to a fresh playing state on the same grid size and
    /// winning tile.
    pub fn restart<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), GameError> {
        self.initialize(rng)
    }

    /// Attempt a move. Returns `true` iff the grid changed.
    ///
    /// A successful move adds the merge score, increments the move count,
    /// spawns one random tile, and re-evaluates the terminal conditions:
    /// win when any cell reaches the winning tile, else loss when the grid
    /// is full and no direction can shift. Moves in a terminal state, and
    /// moves that change nothing, return `false` and leave all state
    /// untouched.
    pub fn make_move<R: Rng + ?Sized>(&mut self, direction: Move, rng: &mut R) -> bool {
        if self.won || self.game_over {
            return false;
        }
        let snapshot = self.snapshot();
        let outcome = ops::shift(&mut self.grid, direction);
        if !outcome.moved {
            return false;
        }
        self.score += outcome.score;
        self.move_count += 1;
        // A full post-merge grid is not an error; fullness is folded into
        // the loss check below.
        let _ = self.grid.spawn_random_tile(rng);
        if self.grid.contains(self.win_tile) {
            self.won = true;
        } else if self.grid.is_full() && !ops::has_moves(&self.grid) {
            self.game_over = true;
        }
        self.previous = Some(snapshot);
        true
    }

    /// True iff a move in `direction` would change the grid. Never mutates
    /// state; false in a terminal state, where every move is rejected.
    pub fn can_move(&self, direction: Move) -> bool {
        !self.won && !self.game_over && ops::can_shift(&self.grid, direction)
    }

    /// Roll back to the state before the last committed move. One level
    /// only; returns `false` when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        match self.previous.take() {
            Some(prev) => {
                self.grid = prev.grid;
                self.score = prev.score;
                self.move_count = prev.move_count;
                self.won = prev.won;
                self.game_over = prev.game_over;
                true
            }
            None => false,
        }
    }

    /// The live grid. For an owned matrix copy use `grid().to_rows()`.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn move_count(&self) -> u64 {
        self.move_count
    }

    pub fn is_won(&self) -> bool {
        self.won
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn win_tile(&self) -> Tile {
        self.win_tile
    }

    /// Highest tile value on the grid.
    pub fn highest_tile(&self) -> Tile {
        self.grid.highest_tile()
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            grid: self.grid.clone(),
            score: self.score,
            move_count: self.move_count,
            won: self.won,
            game_over: self.game_over,
        }
    }
}
