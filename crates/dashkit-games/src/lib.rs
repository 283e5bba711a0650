//! Rule engines for the dashkit mini-games arcade.
//!
//! Every game is a plain state machine with no shared state. Randomness is
//! drawn from a caller-supplied [`rand::Rng`] and timed games take elapsed
//! time as an argument, so a front end drives the clock and tests stay
//! deterministic.

pub mod catalog;
pub mod code_breaker;
pub mod memory;
pub mod number_puzzle;
pub mod pattern;
pub mod quiz;
pub mod reaction;
pub mod timed;
pub mod word_scramble;

use thiserror::Error;

pub use catalog::GameKind;
pub use code_breaker::{CodeBreaker, Color, Feedback};
pub use memory::{Card, FlipOutcome, MemoryMatch};
pub use number_puzzle::NumberPuzzle;
pub use pattern::{Pattern, PatternMaster};
pub use quiz::{Answered, Question, Quiz};
pub use reaction::{ClickOutcome, ReactionTest};
pub use timed::{ColorMatch, SpeedTyping, TimedRound};
pub use word_scramble::WordScramble;

/// Errors raised when a move is not legal in the current game state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Game is over")]
    Finished,

    #[error("Round is not running")]
    NotRunning,

    #[error("Index {index} out of range for {len} items")]
    OutOfRange { index: usize, len: usize },

    #[error("Guess has empty slots")]
    IncompleteGuess,

    #[error("Nothing selected")]
    EmptySelection,

    #[error("Card {0} is already face up")]
    AlreadyRevealed(usize),

    #[error("Invalid answer: {0}")]
    InvalidAnswer(String),
}

pub type GameResult<T> = Result<T, GameError>;

pub(crate) fn check_index(index: usize, len: usize) -> GameResult<()> {
    if index < len {
        Ok(())
    } else {
        Err(GameError::OutOfRange { index, len })
    }
}
