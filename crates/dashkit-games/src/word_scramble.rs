//! Word scramble: unscramble a technical word.

use rand::seq::SliceRandom;
use rand::Rng;

pub const POINTS_PER_WORD: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Word {
    pub word: &'static str,
    pub hint: &'static str,
}

pub const WORDS: [Word; 6] = [
    Word { word: "REACT", hint: "Framework JavaScript" },
    Word { word: "NODEJS", hint: "Runtime JavaScript côté serveur" },
    Word { word: "TYPESCRIPT", hint: "Langage typé basé sur JavaScript" },
    Word { word: "WORDPRESS", hint: "CMS populaire" },
    Word { word: "SALESFORCE", hint: "Plateforme CRM" },
    Word { word: "DATABASE", hint: "Base de données" },
];

#[derive(Debug, Clone)]
pub struct WordScramble {
    current: Word,
    scrambled: String,
    score: u32,
    level: u32,
    show_hint: bool,
}

impl WordScramble {
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut game = Self {
            current: WORDS[0],
            scrambled: String::new(),
            score: 0,
            level: 1,
            show_hint: false,
        };
        game.next_word(rng);
        game
    }

    pub fn next_word<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.current = *WORDS.choose(rng).unwrap_or(&WORDS[0]);
        self.scrambled = scramble(self.current.word, rng);
        self.show_hint = false;
    }

    pub fn scrambled(&self) -> &str {
        &self.scrambled
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    /// `None` while the hint is hidden.
    pub fn hint(&self) -> Option<&'static str> {
        self.show_hint.then_some(self.current.hint)
    }

    pub fn toggle_hint(&mut self) -> bool {
        self.show_hint = !self.show_hint;
        self.show_hint
    }

    /// Case-insensitive. A wrong guess leaves the word in place.
    pub fn guess<R: Rng + ?Sized>(&mut self, guess: &str, rng: &mut R) -> bool {
        if !guess.trim().eq_ignore_ascii_case(self.current.word) {
            return false;
        }
        self.score += POINTS_PER_WORD;
        self.level += 1;
        self.next_word(rng);
        true
    }
}

/// Fisher-Yates over the letters.
pub fn scramble<R: Rng + ?Sized>(word: &str, rng: &mut R) -> String {
    let mut letters: Vec<char> = word.chars().collect();
    letters.shuffle(rng);
    letters.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sorted(s: &str) -> Vec<char> {
        let mut chars: Vec<char> = s.chars().collect();
        chars.sort_unstable();
        chars
    }

    #[test]
    fn test_scramble_keeps_letters() {
        let mut rng = StdRng::seed_from_u64(9);
        for w in &WORDS {
            assert_eq!(sorted(&scramble(w.word, &mut rng)), sorted(w.word));
        }
    }

    #[test]
    fn test_guess_is_case_insensitive() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut game = WordScramble::new(&mut rng);
        let answer = game.current.word.to_lowercase();

        assert!(!game.guess("nope", &mut rng));
        assert_eq!(game.score(), 0);
        assert!(game.guess(&answer, &mut rng));
        assert_eq!(game.score(), 10);
        assert_eq!(game.level(), 2);
    }

    #[test]
    fn test_hint_toggles_and_resets() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut game = WordScramble::new(&mut rng);
        assert_eq!(game.hint(), None);
        assert!(game.toggle_hint());
        assert_eq!(game.hint(), Some(game.current.hint));

        game.next_word(&mut rng);
        assert_eq!(game.hint(), None);
    }
}
