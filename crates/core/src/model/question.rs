use serde::{Deserialize, Serialize};

//
// ─── QUESTION ─────────────────────────────────────────────────────────────────
//

/// One country/capital pair from the reference set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    country: String,
    capital: String,
}

impl Question {
    #[must_use]
    pub fn new(country: impl Into<String>, capital: impl Into<String>) -> Self {
        Self {
            country: country.into(),
            capital: capital.into(),
        }
    }

    #[must_use]
    pub fn country(&self) -> &str {
        &self.country
    }

    #[must_use]
    pub fn capital(&self) -> &str {
        &self.capital
    }
}

//
// ─── QUESTION INSTANCE ────────────────────────────────────────────────────────
//

/// A question as presented to the player: the pair plus four shuffled options.
///
/// `QuestionGenerator` is the only producer and guarantees that `options`
/// holds exactly four distinct capitals, one of them equal to
/// `question.capital()`. `number` is the 1-based ordinal within the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionInstance {
    question: Question,
    options: Vec<String>,
    number: u32,
}

impl QuestionInstance {
    #[must_use]
    pub fn new(question: Question, options: Vec<String>, number: u32) -> Self {
        Self {
            question,
            options,
            number,
        }
    }

    #[must_use]
    pub fn question(&self) -> &Question {
        &self.question
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn number(&self) -> u32 {
        self.number
    }

    /// Whether the given option is the correct capital for this question.
    #[must_use]
    pub fn is_correct_option(&self, option: &str) -> bool {
        self.question.capital() == option
    }
}
