use rand::rngs::StdRng;
use rand::Rng;

use twenty48_engine::engine::{ops, Game, Grid, Move, Score};

use crate::config::{Strategy, StrategyKind};

pub(crate) fn select_move(
    game: &Game,
    legal: &[bool; 4],
    strategy: &Strategy,
    rng: &mut StdRng,
) -> Option<Move> {
    match strategy.kind {
        StrategyKind::Random => select_move_random(legal, rng),
        StrategyKind::Greedy => select_move_greedy(game.grid(), legal),
        StrategyKind::Ordered => select_move_ordered(legal, &strategy.order_or_default()),
    }
}

fn select_move_random(legal: &[bool; 4], rng: &mut StdRng) -> Option<Move> {
    let candidates: Vec<Move> = Move::ALL
        .iter()
        .copied()
        .enumerate()
        .filter(|&(i, _)| legal[i])
        .map(|(_, direction)| direction)
        .collect();
    if candidates.is_empty() {
        return None;
    }
    Some(candidates[rng.gen_range(0..candidates.len())])
}

fn select_move_greedy(grid: &Grid, legal: &[bool; 4]) -> Option<Move> {
    let mut best: Option<(Move, Score)> = None;
    for (i, &direction) in Move::ALL.iter().enumerate() {
        if !legal[i] {
            continue;
        }
        // Probe on a clone; the live grid stays untouched
        let mut probe = grid.clone();
        let outcome = ops::shift(&mut probe, direction);
        match best {
            Some((_, best_score)) if outcome.score <= best_score => {}
            _ => best = Some((direction, outcome.score)),
        }
    }
    best.map(|(direction, _)| direction)
}

fn select_move_ordered(legal: &[bool; 4], order: &[Move]) -> Option<Move> {
    order
        .iter()
        .copied()
        .find(|&direction| legal[mask_index(direction)])
}

fn mask_index(direction: Move) -> usize {
    match direction {
        Move::Up => 0,
        Move::Down => 1,
        Move::Left => 2,
        Move::Right => 3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn mask(grid: &Grid) -> [bool; 4] {
        let mut mask = [false; 4];
        for (i, &direction) in Move::ALL.iter().enumerate() {
            mask[i] = ops::can_shift(grid, direction);
        }
        mask
    }

    #[test]
    fn it_picks_random_moves_from_the_legal_set() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            select_move_random(&[false, false, true, false], &mut rng),
            Some(Move::Left)
        );
        assert_eq!(select_move_random(&[false; 4], &mut rng), None);
    }

    #[test]
    fn it_greedily_maximizes_the_immediate_score() {
        // Vertical merges are worth 8 + 4; horizontal ones only 8
        let grid = Grid::from_rows(&[
            vec![4, 4, 2, 0],
            vec![4, 0, 2, 0],
            vec![0, 0, 0, 0],
            vec![0, 0, 0, 0],
        ])
        .unwrap();
        let legal = mask(&grid);
        assert_eq!(legal, [true; 4]);
        // Up and Down tie at 12; the scan keeps the first
        assert_eq!(select_move_greedy(&grid, &legal), Some(Move::Up));
    }

    #[test]
    fn it_greedily_settles_for_moves_without_merges() {
        let grid = Grid::from_rows(&[
            vec![0, 2, 0, 0],
            vec![0, 0, 0, 0],
            vec![0, 0, 0, 0],
            vec![0, 0, 0, 0],
        ])
        .unwrap();
        let legal = mask(&grid);
        // No merge anywhere; any legal compaction move qualifies
        let choice = select_move_greedy(&grid, &legal).unwrap();
        assert!(legal[mask_index(choice)]);
    }

    #[test]
    fn it_follows_the_preference_order() {
        let order = [Move::Left, Move::Down, Move::Right, Move::Up];
        assert_eq!(
            select_move_ordered(&[true, true, false, true], &order),
            Some(Move::Down)
        );
        assert_eq!(
            select_move_ordered(&[true, false, false, false], &[Move::Right, Move::Up]),
            Some(Move::Up)
        );
        assert_eq!(select_move_ordered(&[false; 4], &order), None);
    }
}
