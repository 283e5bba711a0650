//! Multiple-choice quizzes: the tech quiz and the code master challenges.

use crate::{check_index, GameError, GameResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub prompt: &'static str,
    pub code: Option<&'static str>,
    pub options: [&'static str; 4],
    pub correct: usize,
    pub explanation: Option<&'static str>,
}

pub static TECH_QUESTIONS: [Question; 5] = [
    Question {
        prompt: "Quel framework React est utilisé pour le SSR ?",
        code: None,
        options: ["Angular", "Next.js", "Vue.js", "Svelte"],
        correct: 1,
        explanation: None,
    },
    Question {
        prompt: "Quel langage est un sur-ensemble de JavaScript ?",
        code: None,
        options: ["Python", "TypeScript", "Java", "C++"],
        correct: 1,
        explanation: None,
    },
    Question {
        prompt: "Quelle plateforme est utilisée pour la gestion de la relation client ?",
        code: None,
        options: ["WordPress", "Salesforce", "Shopify", "Magento"],
        correct: 1,
        explanation: None,
    },
    Question {
        prompt: "Quel est le système de gestion de base de données le plus populaire ?",
        code: None,
        options: ["MongoDB", "MySQL", "PostgreSQL", "Redis"],
        correct: 1,
        explanation: None,
    },
    Question {
        prompt: "Quel outil est utilisé pour le versioning de code ?",
        code: None,
        options: ["Git", "SVN", "Mercurial", "Perforce"],
        correct: 0,
        explanation: None,
    },
];

pub static CODE_CHALLENGES: [Question; 3] = [
    Question {
        prompt: "Quelle fonction JavaScript retourne un tableau filtré ?",
        code: Some("const arr = [1, 2, 3, 4, 5];\nconst result = arr.???((x) => x > 3);"),
        options: ["map", "filter", "reduce", "forEach"],
        correct: 1,
        explanation: Some("filter() crée un nouveau tableau avec les éléments qui passent le test."),
    },
    Question {
        prompt: "Quelle méthode React est appelée après le premier rendu ?",
        code: Some("useEffect(() => {\n  // Code ici\n}, ???);"),
        options: ["[props]", "[state]", "[]", "[dependencies]"],
        correct: 2,
        explanation: Some(
            "Un tableau vide [] signifie que l'effet ne s'exécute qu'une fois après le montage.",
        ),
    },
    Question {
        prompt: "Comment déclarer une variable constante en JavaScript ?",
        code: Some("??? name = \"Dahamni\";"),
        options: ["var", "let", "const", "function"],
        correct: 2,
        explanation: Some("const déclare une constante qui ne peut pas être réassignée."),
    },
];

/// Result of answering the current question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Answered {
    pub chosen: usize,
    pub correct: usize,
}

impl Answered {
    pub fn is_correct(&self) -> bool {
        self.chosen == self.correct
    }
}

#[derive(Debug, Clone)]
pub struct Quiz {
    questions: &'static [Question],
    points_per_correct: u32,
    current: usize,
    answered: Option<Answered>,
    score: u32,
    finished: bool,
}

impl Quiz {
    pub fn new(questions: &'static [Question], points_per_correct: u32) -> Self {
        Self {
            questions,
            points_per_correct,
            current: 0,
            answered: None,
            score: 0,
            finished: questions.is_empty(),
        }
    }

    /// One point per right answer.
    pub fn tech() -> Self {
        Self::new(&TECH_QUESTIONS, 1)
    }

    /// Ten points per right answer.
    pub fn code_master() -> Self {
        Self::new(&CODE_CHALLENGES, 10)
    }

    pub fn question(&self) -> Option<&Question> {
        (!self.finished).then(|| &self.questions[self.current])
    }

    /// Zero-based position and total.
    pub fn progress(&self) -> (usize, usize) {
        (self.current, self.questions.len())
    }

    pub fn answered(&self) -> Option<Answered> {
        self.answered
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn max_score(&self) -> u32 {
        self.questions.len() as u32 * self.points_per_correct
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Only the first answer to a question counts.
    pub fn answer(&mut self, option: usize) -> GameResult<Answered> {
        let question = self.question().ok_or(GameError::Finished)?;
        if let Some(existing) = self.answered {
            return Ok(existing);
        }
        check_index(option, question.options.len())?;

        let answered = Answered {
            chosen: option,
            correct: question.correct,
        };
        if answered.is_correct() {
            self.score += self.points_per_correct;
        }
        self.answered = Some(answered);
        Ok(answered)
    }

    /// Moves past an answered question. Returns false once the quiz is over.
    pub fn advance(&mut self) -> bool {
        if self.finished || self.answered.is_none() {
            return !self.finished;
        }
        self.answered = None;
        if self.current + 1 < self.questions.len() {
            self.current += 1;
            true
        } else {
            self.finished = true;
            false
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.questions, self.points_per_correct);
    }
}
