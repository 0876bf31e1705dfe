use rand::rngs::StdRng;
use rand::SeedableRng;

use twenty48_engine::engine::{Game, GameError, Move, Tile};

use crate::config::Strategy;
use crate::strategies;

/// Per-game actor that drives a single playthrough to completion by
/// querying the strategy and applying selected moves.
pub struct GameActor {
    pub game_id: u32,
    pub seed: u64,
    strategy: Strategy,
    max_moves: Option<u64>,
    game: Game,
    rng: StdRng,
}

/// Summary for a completed playthrough.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameResult {
    pub game_id: u32,
    pub seed: u64,
    pub moves: u64,
    pub score: u64,
    pub highest_tile: Tile,
    pub won: bool,
}

impl GameActor {
    pub fn new(
        game_id: u32,
        seed: u64,
        size: usize,
        win_tile: Tile,
        strategy: Strategy,
        max_moves: Option<u64>,
    ) -> Result<Self, GameError> {
        // Seed per game so a run is reproducible from (base seed, game id)
        let mut rng = StdRng::seed_from_u64(seed);
        let game = Game::with_win_tile(size, win_tile, &mut rng)?;
        Ok(Self {
            game_id,
            seed,
            strategy,
            max_moves,
            game,
            rng,
        })
    }

    /// Run the actor loop to completion and return the result.
    pub fn run(mut self) -> GameResult {
        while !self.game.is_won() && !self.game.is_game_over() {
            if let Some(budget) = self.max_moves {
                if self.game.move_count() >= budget {
                    break;
                }
            }
            let legal = legal_mask(&self.game);
            let Some(direction) =
                strategies::select_move(&self.game, &legal, &self.strategy, &mut self.rng)
            else {
                break;
            };
            if !self.game.make_move(direction, &mut self.rng) {
                break;
            }
        }
        GameResult {
            game_id: self.game_id,
            seed: self.seed,
            moves: self.game.move_count(),
            score: self.game.score(),
            highest_tile: self.game.highest_tile(),
            won: self.game.is_won(),
        }
    }
}

/// Legality of each direction, in `Move::ALL` order.
pub(crate) fn legal_mask(game: &Game) -> [bool; 4] {
    let mut mask = [false; 4];
    for (i, &direction) in Move::ALL.iter().enumerate() {
        mask[i] = game.can_move(direction);
    }
    mask
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StrategyKind;

    #[test]
    fn it_plays_a_seeded_game_to_the_end() {
        let actor = GameActor::new(
            0,
            42,
            4,
            2048,
            Strategy::of_kind(StrategyKind::Random),
            None,
        )
        .unwrap();
        let result = actor.run();
        assert!(result.moves > 0);
        assert!(result.score > 0);
        assert!(result.highest_tile >= 4);
    }

    #[test]
    fn it_reproduces_runs_from_the_seed() {
        let play = |seed| {
            GameActor::new(1, seed, 4, 2048, Strategy::of_kind(StrategyKind::Greedy), None)
                .unwrap()
                .run()
        };
        assert_eq!(play(7), play(7));
    }

    #[test]
    fn it_honors_the_move_budget() {
        let actor = GameActor::new(
            2,
            9,
            4,
            2048,
            Strategy::of_kind(StrategyKind::Ordered),
            Some(5),
        )
        .unwrap();
        let result = actor.run();
        assert!(result.moves <= 5);
    }
}
