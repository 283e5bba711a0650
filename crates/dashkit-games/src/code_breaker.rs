//! Code breaker: guess a hidden four-color code.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{check_index, GameError, GameResult};

pub const CODE_LENGTH: usize = 4;
pub const MAX_ATTEMPTS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Green,
    Blue,
    Yellow,
    Purple,
    Orange,
}

impl Color {
    pub const ALL: [Color; 6] = [
        Color::Red,
        Color::Green,
        Color::Blue,
        Color::Yellow,
        Color::Purple,
        Color::Orange,
    ];

    /// The slot button cycles through the palette.
    pub fn cycle(current: Option<Color>) -> Color {
        match current {
            None => Self::ALL[0],
            Some(c) => {
                let pos = Self::ALL.iter().position(|x| *x == c).unwrap_or(0);
                Self::ALL[(pos + 1) % Self::ALL.len()]
            }
        }
    }

    fn random<R: Rng + ?Sized>(rng: &mut R) -> Color {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

/// Pegs for one attempt: right color in the right slot, then right color elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub exact: usize,
    pub color_only: usize,
}

impl Feedback {
    pub fn is_solved(&self) -> bool {
        self.exact == CODE_LENGTH
    }
}

/// Scores `guess` against `code`. Each code slot is consumed at most once.
pub fn score_guess(code: &[Color; CODE_LENGTH], guess: &[Color; CODE_LENGTH]) -> Feedback {
    let mut code_left: [Option<Color>; CODE_LENGTH] = code.map(Some);
    let mut guess_left: [Option<Color>; CODE_LENGTH] = guess.map(Some);
    let mut exact = 0;

    for i in 0..CODE_LENGTH {
        if guess[i] == code[i] {
            exact += 1;
            code_left[i] = None;
            guess_left[i] = None;
        }
    }

    let mut color_only = 0;
    for g in guess_left.into_iter().flatten() {
        if let Some(slot) = code_left.iter_mut().find(|c| **c == Some(g)) {
            *slot = None;
            color_only += 1;
        }
    }

    Feedback { exact, color_only }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Playing,
    Won,
    Lost,
}

#[derive(Debug, Clone)]
pub struct CodeBreaker {
    code: [Color; CODE_LENGTH],
    guess: [Option<Color>; CODE_LENGTH],
    attempts: Vec<([Color; CODE_LENGTH], Feedback)>,
    status: Status,
}

impl CodeBreaker {
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::with_code(std::array::from_fn(|_| Color::random(rng)))
    }

    pub fn with_code(code: [Color; CODE_LENGTH]) -> Self {
        Self {
            code,
            guess: [None; CODE_LENGTH],
            attempts: Vec::new(),
            status: Status::Playing,
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn guess(&self) -> &[Option<Color>; CODE_LENGTH] {
        &self.guess
    }

    pub fn attempts(&self) -> &[([Color; CODE_LENGTH], Feedback)] {
        &self.attempts
    }

    pub fn attempts_left(&self) -> usize {
        MAX_ATTEMPTS - self.attempts.len()
    }

    /// Only revealed once the game has ended.
    pub fn secret(&self) -> Option<&[Color; CODE_LENGTH]> {
        (self.status != Status::Playing).then_some(&self.code)
    }

    pub fn set_slot(&mut self, slot: usize, color: Color) -> GameResult<()> {
        self.ensure_playing()?;
        check_index(slot, CODE_LENGTH)?;
        self.guess[slot] = Some(color);
        Ok(())
    }

    pub fn cycle_slot(&mut self, slot: usize) -> GameResult<Color> {
        self.ensure_playing()?;
        check_index(slot, CODE_LENGTH)?;
        let next = Color::cycle(self.guess[slot]);
        self.guess[slot] = Some(next);
        Ok(next)
    }

    /// Submits the current guess and clears the slots.
    pub fn check(&mut self) -> GameResult<Feedback> {
        self.ensure_playing()?;
        let mut guess = [Color::Red; CODE_LENGTH];
        for (dst, src) in guess.iter_mut().zip(self.guess) {
            *dst = src.ok_or(GameError::IncompleteGuess)?;
        }

        let feedback = score_guess(&self.code, &guess);
        self.attempts.push((guess, feedback));
        self.guess = [None; CODE_LENGTH];

        if feedback.is_solved() {
            self.status = Status::Won;
        } else if self.attempts.len() >= MAX_ATTEMPTS {
            self.status = Status::Lost;
        }
        Ok(feedback)
    }

    pub fn restart<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        *self = Self::new(rng);
    }

    fn ensure_playing(&self) -> GameResult<()> {
        match self.status {
            Status::Playing => Ok(()),
            _ => Err(GameError::Finished),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use Color::*;

    fn setup_game() -> CodeBreaker {
        CodeBreaker::with_code([Red, Green, Blue, Yellow])
    }

    fn enter(game: &mut CodeBreaker, guess: [Color; CODE_LENGTH]) -> GameResult<Feedback> {
        for (slot, color) in guess.into_iter().enumerate() {
            game.set_slot(slot, color)?;
        }
        game.check()
    }

    #[test]
    fn test_exact_hits_counted_before_color_hits() {
        let code = [Red, Red, Blue, Green];
        assert_eq!(
            score_guess(&code, &[Red, Blue, Red, Red]),
            Feedback { exact: 1, color_only: 2 }
        );
    }

    #[test]
    fn test_code_slot_consumed_once() {
        let code = [Red, Green, Blue, Yellow];
        assert_eq!(
            score_guess(&code, &[Green, Green, Green, Green]),
            Feedback { exact: 1, color_only: 0 }
        );
        assert_eq!(
            score_guess(&code, &[Yellow, Red, Green, Blue]),
            Feedback { exact: 0, color_only: 4 }
        );
    }

    #[test]
    fn test_win_on_four_exact() {
        let mut game = setup_game();
        assert!(game.secret().is_none());
        let fb = enter(&mut game, [Red, Green, Blue, Yellow]).unwrap();
        assert!(fb.is_solved());
        assert_eq!(game.status(), Status::Won);
        assert_eq!(game.set_slot(0, Red), Err(GameError::Finished));
        assert_eq!(game.secret(), Some(&[Red, Green, Blue, Yellow]));
    }

    #[test]
    fn test_incomplete_guess_rejected() {
        let mut game = setup_game();
        game.set_slot(0, Red).unwrap();
        assert_eq!(game.check(), Err(GameError::IncompleteGuess));
        assert!(game.attempts().is_empty());
    }

    #[test]
    fn test_lost_after_max_attempts() {
        let mut game = setup_game();
        for _ in 0..MAX_ATTEMPTS {
            enter(&mut game, [Orange, Orange, Orange, Orange]).unwrap();
        }
        assert_eq!(game.status(), Status::Lost);
        assert_eq!(game.attempts_left(), 0);
        assert_eq!(game.check(), Err(GameError::Finished));
    }

    #[test]
    fn test_slot_cycles_through_palette() {
        let mut game = setup_game();
        assert_eq!(game.cycle_slot(2).unwrap(), Red);
        assert_eq!(game.cycle_slot(2).unwrap(), Green);
        game.set_slot(2, Orange).unwrap();
        assert_eq!(game.cycle_slot(2).unwrap(), Red);
        assert!(game.cycle_slot(4).is_err());
    }

    #[test]
    fn test_restart_clears_attempts() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut game = CodeBreaker::new(&mut rng);
        enter(&mut game, [Red, Red, Red, Red]).unwrap();
        game.restart(&mut rng);
        assert!(game.attempts().is_empty());
        assert_eq!(game.status(), Status::Playing);
    }
}
