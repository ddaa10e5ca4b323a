use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::GameId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GameResultError {
    #[error("a game must have at least one question")]
    ZeroQuestions,

    #[error("correct answers ({correct}) exceed total questions ({total})")]
    TooManyCorrect { correct: u32, total: u32 },

    #[error("wrong answers ({wrong}) do not equal total ({total}) minus correct ({correct})")]
    CountMismatch { total: u32, correct: u32, wrong: u32 },

    #[error("score percentage ({stored}) does not match computed value ({computed})")]
    PercentageMismatch { stored: u32, computed: u32 },
}

/// Aggregate result of one completed game, immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameResult {
    id: Option<GameId>,
    total_questions: u32,
    correct_answers: u32,
    wrong_answers: u32,
    score_percentage: u32,
    game_date: DateTime<Utc>,
}

/// `round(correct / total * 100)`, half away from zero, in integer math.
fn percentage(correct: u32, total: u32) -> u32 {
    (correct * 200 + total) / (2 * total)
}

impl GameResult {
    /// Build a result from a final score.
    ///
    /// # Errors
    ///
    /// Returns `GameResultError::ZeroQuestions` for an empty game and
    /// `GameResultError::TooManyCorrect` if the score exceeds the total.
    pub fn from_score(
        correct_answers: u32,
        total_questions: u32,
        game_date: DateTime<Utc>,
    ) -> Result<Self, GameResultError> {
        if total_questions == 0 {
            return Err(GameResultError::ZeroQuestions);
        }
        if correct_answers > total_questions {
            return Err(GameResultError::TooManyCorrect {
                correct: correct_answers,
                total: total_questions,
            });
        }

        Ok(Self {
            id: None,
            total_questions,
            correct_answers,
            wrong_answers: total_questions - correct_answers,
            score_percentage: percentage(correct_answers, total_questions),
            game_date,
        })
    }

    /// Rehydrate a result from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns `GameResultError` if the stored counts or percentage do not
    /// align with each other.
    pub fn from_persisted(
        id: GameId,
        total_questions: u32,
        correct_answers: u32,
        wrong_answers: u32,
        score_percentage: u32,
        game_date: DateTime<Utc>,
    ) -> Result<Self, GameResultError> {
        let mut result = Self::from_score(correct_answers, total_questions, game_date)?;
        if wrong_answers != result.wrong_answers {
            return Err(GameResultError::CountMismatch {
                total: total_questions,
                correct: correct_answers,
                wrong: wrong_answers,
            });
        }
        if score_percentage != result.score_percentage {
            return Err(GameResultError::PercentageMismatch {
                stored: score_percentage,
                computed: result.score_percentage,
            });
        }
        result.id = Some(id);
        Ok(result)
    }

    #[must_use]
    pub fn id(&self) -> Option<GameId> {
        self.id
    }

    #[must_use]
    pub fn total_questions(&self) -> u32 {
        self.total_questions
    }

    #[must_use]
    pub fn correct_answers(&self) -> u32 {
        self.correct_answers
    }

    #[must_use]
    pub fn wrong_answers(&self) -> u32 {
        self.wrong_answers
    }

    #[must_use]
    pub fn score_percentage(&self) -> u32 {
        self.score_percentage
    }

    #[must_use]
    pub fn game_date(&self) -> DateTime<Utc> {
        self.game_date
    }

    /// Attach the store-assigned identity after insert.
    #[must_use]
    pub fn with_id(mut self, id: GameId) -> Self {
        self.id = Some(id);
        self
    }
}
