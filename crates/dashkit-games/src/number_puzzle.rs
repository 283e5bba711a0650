//! Number puzzle: pick numbers that add up to the target.

use rand::Rng;

use crate::{check_index, GameError, GameResult};

pub const NUMBER_COUNT: usize = 6;
pub const POINTS_PER_LEVEL: u32 = 10;

#[derive(Debug, Clone)]
pub struct NumberPuzzle {
    numbers: [u32; NUMBER_COUNT],
    target: u32,
    selected: Vec<usize>,
    score: u32,
    level: u32,
}

impl NumberPuzzle {
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut puzzle = Self {
            numbers: [0; NUMBER_COUNT],
            target: 0,
            selected: Vec::new(),
            score: 0,
            level: 1,
        };
        puzzle.deal(rng);
        puzzle
    }

    /// Fresh numbers in 1..=20; the target is their sum minus 0..10, so
    /// dropping small numbers usually reaches it.
    pub fn deal<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.numbers = std::array::from_fn(|_| rng.gen_range(1..=20));
        let sum: u32 = self.numbers.iter().sum();
        let offset: u32 = rng.gen_range(0..10);
        self.target = sum - offset.min(sum - 1);
        self.selected.clear();
    }

    pub fn numbers(&self) -> &[u32; NUMBER_COUNT] {
        &self.numbers
    }

    pub fn target(&self) -> u32 {
        self.target
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selected.contains(&index)
    }

    pub fn toggle(&mut self, index: usize) -> GameResult<bool> {
        check_index(index, NUMBER_COUNT)?;
        if let Some(pos) = self.selected.iter().position(|i| *i == index) {
            self.selected.remove(pos);
            Ok(false)
        } else {
            self.selected.push(index);
            Ok(true)
        }
    }

    pub fn current_sum(&self) -> u32 {
        self.selected.iter().map(|i| self.numbers[*i]).sum()
    }

    /// A correct sum scores and deals the next level. A wrong sum keeps the
    /// selection so the player can adjust it.
    pub fn check<R: Rng + ?Sized>(&mut self, rng: &mut R) -> GameResult<bool> {
        if self.selected.is_empty() {
            return Err(GameError::EmptySelection);
        }
        if self.current_sum() != self.target {
            return Ok(false);
        }
        self.score += POINTS_PER_LEVEL;
        self.level += 1;
        self.deal(rng);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn setup_puzzle(seed: u64) -> (NumberPuzzle, StdRng) {
        let mut rng = StdRng::seed_from_u64(seed);
        let puzzle = NumberPuzzle::new(&mut rng);
        (puzzle, rng)
    }

    /// Finds a subset hitting the target by brute force over the 64 masks.
    fn solve(puzzle: &NumberPuzzle) -> Option<Vec<usize>> {
        (1u32..1 << NUMBER_COUNT).find_map(|mask| {
            let picks: Vec<usize> = (0..NUMBER_COUNT).filter(|i| mask & (1 << i) != 0).collect();
            let sum: u32 = picks.iter().map(|i| puzzle.numbers()[*i]).sum();
            (sum == puzzle.target()).then_some(picks)
        })
    }

    #[test]
    fn test_deal_respects_ranges() {
        let (puzzle, _) = setup_puzzle(1);
        assert!(puzzle.numbers().iter().all(|n| (1..=20).contains(n)));
        let sum: u32 = puzzle.numbers().iter().sum();
        assert!(puzzle.target() >= 1 && puzzle.target() <= sum && puzzle.target() + 10 > sum);
    }

    #[test]
    fn test_correct_sum_advances_level() {
        for seed in 0..20 {
            let (mut puzzle, mut rng) = setup_puzzle(seed);
            let Some(picks) = solve(&puzzle) else { continue };
            for i in picks {
                puzzle.toggle(i).unwrap();
            }
            assert!(puzzle.check(&mut rng).unwrap());
            assert_eq!(puzzle.score(), 10);
            assert_eq!(puzzle.level(), 2);
            assert_eq!(puzzle.current_sum(), 0);
            return;
        }
        panic!("no solvable puzzle in 20 seeds");
    }

    #[test]
    fn test_wrong_sum_keeps_selection() {
        let (mut puzzle, mut rng) = setup_puzzle(3);
        assert_eq!(puzzle.check(&mut rng), Err(GameError::EmptySelection));

        let smallest = (0..NUMBER_COUNT).min_by_key(|i| puzzle.numbers()[*i]).unwrap();
        puzzle.toggle(smallest).unwrap();
        if puzzle.current_sum() != puzzle.target() {
            assert!(!puzzle.check(&mut rng).unwrap());
            assert!(puzzle.is_selected(smallest));
            assert_eq!(puzzle.score(), 0);
        }
    }

    #[test]
    fn test_toggle_twice_deselects() {
        let (mut puzzle, _) = setup_puzzle(5);
        assert!(puzzle.toggle(2).unwrap());
        assert!(!puzzle.toggle(2).unwrap());
        assert!(!puzzle.is_selected(2));
        assert!(puzzle.toggle(6).is_err());
    }
}
