//! The arcade lineup shown on the games carousel.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameKind {
    MemoryChallenge,
    CodeBreaker,
    SpeedTyping,
    TechQuiz,
    ColorMatch,
    NumberPuzzle,
    WordScramble,
    ReactionTest,
    PatternMaster,
    CodeMaster,
}

impl GameKind {
    /// Carousel order.
    pub const ALL: [GameKind; 10] = [
        GameKind::MemoryChallenge,
        GameKind::CodeBreaker,
        GameKind::SpeedTyping,
        GameKind::TechQuiz,
        GameKind::ColorMatch,
        GameKind::NumberPuzzle,
        GameKind::WordScramble,
        GameKind::ReactionTest,
        GameKind::PatternMaster,
        GameKind::CodeMaster,
    ];

    pub fn title(self) -> &'static str {
        match self {
            GameKind::MemoryChallenge => "Memory Challenge",
            GameKind::CodeBreaker => "Code Breaker",
            GameKind::SpeedTyping => "Speed Typing",
            GameKind::TechQuiz => "Tech Quiz",
            GameKind::ColorMatch => "Color Match",
            GameKind::NumberPuzzle => "Number Puzzle",
            GameKind::WordScramble => "Word Scramble",
            GameKind::ReactionTest => "Reaction Test",
            GameKind::PatternMaster => "Pattern Master",
            GameKind::CodeMaster => "Code Master",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            GameKind::MemoryChallenge => {
                "Testez votre mémoire en trouvant les paires de technologies."
            }
            GameKind::CodeBreaker => "Déchiffrez le code secret en devinant la séquence.",
            GameKind::SpeedTyping => "Testez votre vitesse de frappe avec des mots techniques.",
            GameKind::TechQuiz => "Répondez aux questions sur les technologies web.",
            GameKind::ColorMatch => "Associez les couleurs rapidement.",
            GameKind::NumberPuzzle => "Résolvez le puzzle numérique.",
            GameKind::WordScramble => "Reconstituez les mots techniques mélangés.",
            GameKind::ReactionTest => "Testez vos réflexes en cliquant au bon moment.",
            GameKind::PatternMaster => "Identifiez et complétez les motifs.",
            GameKind::CodeMaster => "Résolvez des énigmes de programmation.",
        }
    }

    /// Carousel position after `self`, wrapping at the end.
    pub fn next(self) -> GameKind {
        let pos = Self::ALL.iter().position(|k| *k == self).unwrap_or(0);
        Self::ALL[(pos + 1) % Self::ALL.len()]
    }

    pub fn previous(self) -> GameKind {
        let pos = Self::ALL.iter().position(|k| *k == self).unwrap_or(0);
        Self::ALL[(pos + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_carousel_wraps() {
        assert_eq!(GameKind::CodeMaster.next(), GameKind::MemoryChallenge);
        assert_eq!(GameKind::MemoryChallenge.previous(), GameKind::CodeMaster);
        assert_eq!(GameKind::TechQuiz.next(), GameKind::ColorMatch);
    }

    #[test]
    fn test_kind_serializes_as_slug() {
        let json = serde_json::to_string(&GameKind::ReactionTest).unwrap();
        assert_eq!(json, "\"reaction-test\"");
        let back: GameKind = serde_json::from_str("\"code-breaker\"").unwrap();
        assert_eq!(back, GameKind::CodeBreaker);
    }
}
