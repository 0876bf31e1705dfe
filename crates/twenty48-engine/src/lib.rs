//! twenty48-engine: the 2048 game-state engine
//!
//! This crate provides:
//! - A `Grid` type holding an N×N matrix of tile values with bounds-checked
//!   access and random tile spawning
//! - Slide/merge move processing for all four directions (`ops` module)
//! - A `Game` state machine driving a playthrough: scoring, win/loss
//!   detection, one-step undo, and restart
//!
//! Quick start:
//! ```
//! use twenty48_engine::engine::{Game, Move};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! // Deterministic setup with a seeded RNG
//! let mut rng = StdRng::seed_from_u64(42);
//! let mut game = Game::new(4, &mut rng).unwrap();
//! assert_eq!(game.score(), 0);
//!
//! // Apply moves until one changes the grid
//! for direction in Move::ALL {
//!     if game.make_move(direction, &mut rng) {
//!         break;
//!     }
//! }
//! ```
//!
//! Note: All randomness is injected through `&mut impl Rng`, so move
//! sequences are reproducible by seeding the source.
pub mod engine;
