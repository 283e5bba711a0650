//! Memory match: find the pairs of technology cards.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::{check_index, GameError, GameResult};

const TECHS: [&str; 6] = [
    "React",
    "Next.js",
    "Node.js",
    "TypeScript",
    "WordPress",
    "Salesforce",
];

pub const PAIRS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Card {
    pub tech: &'static str,
    pub face_up: bool,
    pub matched: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipOutcome {
    /// First card of a pair is showing.
    FirstUp,
    Match { first: usize, second: usize },
    /// Both cards are turned back down.
    Mismatch { first: usize, second: usize },
}

#[derive(Debug, Clone)]
pub struct MemoryMatch {
    cards: Vec<Card>,
    pending: Option<usize>,
    moves: u32,
}

impl MemoryMatch {
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut cards: Vec<Card> = TECHS[..PAIRS]
            .iter()
            .copied()
            .flat_map(|tech| {
                let card = Card {
                    tech,
                    face_up: false,
                    matched: false,
                };
                [card.clone(), card]
            })
            .collect();
        cards.shuffle(rng);
        Self {
            cards,
            pending: None,
            moves: 0,
        }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn is_won(&self) -> bool {
        self.cards.iter().all(|c| c.matched)
    }

    pub fn flip(&mut self, index: usize) -> GameResult<FlipOutcome> {
        if self.is_won() {
            return Err(GameError::Finished);
        }
        check_index(index, self.cards.len())?;
        let card = &self.cards[index];
        if card.face_up || card.matched {
            return Err(GameError::AlreadyRevealed(index));
        }
        self.cards[index].face_up = true;

        let Some(first) = self.pending.take() else {
            self.pending = Some(index);
            return Ok(FlipOutcome::FirstUp);
        };

        self.moves += 1;
        let is_pair = self.cards[first].tech == self.cards[index].tech;
        for i in [first, index] {
            self.cards[i].face_up = false;
            self.cards[i].matched = is_pair;
        }
        Ok(if is_pair {
            FlipOutcome::Match {
                first,
                second: index,
            }
        } else {
            FlipOutcome::Mismatch {
                first,
                second: index,
            }
        })
    }

    pub fn restart<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        *self = Self::new(rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn setup_game() -> MemoryMatch {
        MemoryMatch::new(&mut StdRng::seed_from_u64(42))
    }

    fn partner_of(game: &MemoryMatch, index: usize) -> usize {
        let tech = game.cards()[index].tech;
        (0..game.cards().len())
            .find(|&i| i != index && game.cards()[i].tech == tech)
            .unwrap()
    }

    #[test]
    fn test_deck_has_four_pairs() {
        let game = setup_game();
        assert_eq!(game.cards().len(), PAIRS * 2);
        for tech in &TECHS[..PAIRS] {
            assert_eq!(game.cards().iter().filter(|c| c.tech == *tech).count(), 2);
        }
    }

    #[test]
    fn test_mismatch_hides_both() {
        let mut game = setup_game();
        let other = (1..8).find(|&i| game.cards()[i].tech != game.cards()[0].tech).unwrap();

        assert_eq!(game.flip(0).unwrap(), FlipOutcome::FirstUp);
        assert_eq!(game.flip(0), Err(GameError::AlreadyRevealed(0)));
        assert_eq!(
            game.flip(other).unwrap(),
            FlipOutcome::Mismatch { first: 0, second: other }
        );
        assert!(game.cards().iter().all(|c| !c.face_up && !c.matched));
        assert_eq!(game.moves(), 1);
    }

    #[test]
    fn test_matching_every_pair_wins() {
        let mut game = setup_game();
        for i in 0..game.cards().len() {
            if game.cards()[i].matched {
                continue;
            }
            let partner = partner_of(&game, i);
            game.flip(i).unwrap();
            assert!(matches!(game.flip(partner).unwrap(), FlipOutcome::Match { .. }));
        }
        assert!(game.is_won());
        assert_eq!(game.moves(), PAIRS as u32);
        assert_eq!(game.flip(0), Err(GameError::Finished));
    }

    #[test]
    fn test_matched_card_cannot_flip() {
        let mut game = setup_game();
        let partner = partner_of(&game, 0);
        game.flip(0).unwrap();
        game.flip(partner).unwrap();
        assert_eq!(game.flip(partner), Err(GameError::AlreadyRevealed(partner)));
    }
}
