//! Timed rounds: speed typing and color match.
//!
//! The caller owns the clock and reports elapsed time with
//! [`TimedRound::advance`]; once the round length is used up every move is
//! rejected with [`GameError::NotRunning`].

use std::time::Duration;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::{GameError, GameResult};

pub const TYPING_ROUND: Duration = Duration::from_secs(60);
pub const COLOR_ROUND: Duration = Duration::from_secs(30);
pub const POINTS_PER_HIT: u32 = 10;
/// Taken off on a wrong pick; the score never goes below zero.
pub const MISS_PENALTY: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimedRound {
    length: Duration,
    elapsed: Duration,
    started: bool,
}

impl TimedRound {
    pub fn new(length: Duration) -> Self {
        Self {
            length,
            elapsed: Duration::ZERO,
            started: false,
        }
    }

    pub fn start(&mut self) {
        self.elapsed = Duration::ZERO;
        self.started = true;
    }

    pub fn advance(&mut self, by: Duration) {
        if self.started {
            self.elapsed = (self.elapsed + by).min(self.length);
        }
    }

    pub fn is_running(&self) -> bool {
        self.started && self.elapsed < self.length
    }

    pub fn is_over(&self) -> bool {
        self.started && self.elapsed >= self.length
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn remaining(&self) -> Duration {
        self.length - self.elapsed
    }

    fn ensure_running(&self) -> GameResult<()> {
        if self.is_running() {
            Ok(())
        } else {
            Err(GameError::NotRunning)
        }
    }
}

const TYPING_WORDS: [&str; 15] = [
    "React",
    "TypeScript",
    "JavaScript",
    "Next.js",
    "Node.js",
    "WordPress",
    "Salesforce",
    "Agentforce",
    "API",
    "Database",
    "Component",
    "Function",
    "Variable",
    "Array",
    "Object",
];

#[derive(Debug, Clone)]
pub struct SpeedTyping {
    round: TimedRound,
    word: &'static str,
    words_typed: u32,
    score: u32,
}

impl SpeedTyping {
    pub fn new() -> Self {
        Self {
            round: TimedRound::new(TYPING_ROUND),
            word: TYPING_WORDS[0],
            words_typed: 0,
            score: 0,
        }
    }

    pub fn start<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.round.start();
        self.words_typed = 0;
        self.score = 0;
        self.next_word(rng);
    }

    pub fn round(&self) -> &TimedRound {
        &self.round
    }

    pub fn advance(&mut self, by: Duration) {
        self.round.advance(by);
    }

    pub fn word(&self) -> &'static str {
        self.word
    }

    pub fn words_typed(&self) -> u32 {
        self.words_typed
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Feeds the current contents of the input box. An exact match scores
    /// the word length and serves the next word.
    pub fn input<R: Rng + ?Sized>(&mut self, text: &str, rng: &mut R) -> GameResult<bool> {
        self.round.ensure_running()?;
        if text != self.word {
            return Ok(false);
        }
        self.words_typed += 1;
        self.score += self.word.chars().count() as u32;
        self.next_word(rng);
        Ok(true)
    }

    /// Words per minute over the time played so far.
    pub fn wpm(&self) -> u32 {
        let secs = self.round.elapsed().as_secs_f64();
        if secs <= 0.0 {
            return 0;
        }
        (f64::from(self.words_typed) / secs * 60.0).round() as u32
    }

    fn next_word<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.word = TYPING_WORDS.choose(rng).copied().unwrap_or(TYPING_WORDS[0]);
    }
}

impl Default for SpeedTyping {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Swatch {
    pub name: &'static str,
    pub hex: &'static str,
}

pub const SWATCHES: [Swatch; 6] = [
    Swatch { name: "Rouge", hex: "#EF4444" },
    Swatch { name: "Vert", hex: "#10B981" },
    Swatch { name: "Bleu", hex: "#3B82F6" },
    Swatch { name: "Jaune", hex: "#F59E0B" },
    Swatch { name: "Violet", hex: "#8B5CF6" },
    Swatch { name: "Rose", hex: "#EC4899" },
];

#[derive(Debug, Clone)]
pub struct ColorMatch {
    round: TimedRound,
    target: Swatch,
    board: [Swatch; 6],
    score: u32,
    misses: u32,
}

impl ColorMatch {
    pub fn new() -> Self {
        Self {
            round: TimedRound::new(COLOR_ROUND),
            target: SWATCHES[0],
            board: SWATCHES,
            score: 0,
            misses: 0,
        }
    }

    pub fn start<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.round.start();
        self.score = 0;
        self.misses = 0;
        self.deal(rng);
    }

    pub fn round(&self) -> &TimedRound {
        &self.round
    }

    pub fn advance(&mut self, by: Duration) {
        self.round.advance(by);
    }

    pub fn target(&self) -> Swatch {
        self.target
    }

    /// The shuffled swatches on screen.
    pub fn board(&self) -> &[Swatch; 6] {
        &self.board
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn misses(&self) -> u32 {
        self.misses
    }

    /// A right pick scores and deals a new target; a wrong pick costs
    /// points and keeps it.
    pub fn pick<R: Rng + ?Sized>(&mut self, name: &str, rng: &mut R) -> GameResult<bool> {
        self.round.ensure_running()?;
        if name != self.target.name {
            self.misses += 1;
            self.score = self.score.saturating_sub(MISS_PENALTY);
            return Ok(false);
        }
        self.score += POINTS_PER_HIT;
        self.deal(rng);
        Ok(true)
    }

    fn deal<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.target = SWATCHES.choose(rng).copied().unwrap_or(SWATCHES[0]);
        self.board = SWATCHES;
        self.board.shuffle(rng);
    }
}

impl Default for ColorMatch {
    fn default() -> Self {
        Self::new()
    }
}
