//! Pattern master: name the next number in a sequence.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::{GameError, GameResult};

pub const POINTS_PER_PATTERN: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    pub sequence: [i64; 4],
    pub answer: i64,
}

pub static PATTERNS: [Pattern; 5] = [
    Pattern { sequence: [1, 2, 3, 4], answer: 5 },
    Pattern { sequence: [2, 4, 6, 8], answer: 10 },
    Pattern { sequence: [1, 4, 9, 16], answer: 25 },
    Pattern { sequence: [5, 10, 15, 20], answer: 25 },
    Pattern { sequence: [1, 3, 5, 7], answer: 9 },
];

#[derive(Debug, Clone)]
pub struct PatternMaster {
    current: &'static Pattern,
    score: u32,
    level: u32,
    streak: u32,
}

impl PatternMaster {
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            current: pick(rng),
            score: 0,
            level: 1,
            streak: 0,
        }
    }

    pub fn current(&self) -> &Pattern {
        self.current
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    /// Checks a typed answer and moves on to another pattern either way.
    /// Returns whether it was right.
    pub fn answer<R: Rng + ?Sized>(&mut self, input: &str, rng: &mut R) -> GameResult<bool> {
        let value: i64 = input
            .trim()
            .parse()
            .map_err(|_| GameError::InvalidAnswer(input.to_string()))?;

        let correct = value == self.current.answer;
        if correct {
            self.score += POINTS_PER_PATTERN;
            self.streak += 1;
            self.level += 1;
        } else {
            self.streak = 0;
        }
        self.current = pick(rng);
        Ok(correct)
    }

    /// Skipping keeps the streak.
    pub fn skip<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.current = pick(rng);
    }
}

fn pick<R: Rng + ?Sized>(rng: &mut R) -> &'static Pattern {
    PATTERNS.choose(rng).unwrap_or(&PATTERNS[0])
}
