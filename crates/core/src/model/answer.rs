use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::{AnswerId, GameId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AnswerError {
    #[error("question_number must be 1-based, got {0}")]
    InvalidQuestionNumber(u32),

    #[error("is_correct flag does not match user/correct answer pair")]
    CorrectnessMismatch,
}

/// One submitted answer, recorded the moment the player picks an option.
///
/// Created with `game_id = None` because the answer is persisted before the
/// session outcome exists. The id is set from `None` exactly once, when the
/// store links the record to a finalized game; never reassigned after that.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerRecord {
    id: Option<AnswerId>,
    game_id: Option<GameId>,
    country: String,
    user_answer: String,
    correct_answer: String,
    is_correct: bool,
    question_number: u32,
    answered_at: DateTime<Utc>,
}

impl AnswerRecord {
    /// Build a fresh, unlinked record for a just-submitted answer.
    ///
    /// Correctness is derived from the answer pair so the flag can never
    /// drift from the strings that produced it.
    ///
    /// # Errors
    ///
    /// Returns `AnswerError::InvalidQuestionNumber` if `question_number` is 0.
    pub fn new(
        country: impl Into<String>,
        user_answer: impl Into<String>,
        correct_answer: impl Into<String>,
        question_number: u32,
        answered_at: DateTime<Utc>,
    ) -> Result<Self, AnswerError> {
        if question_number == 0 {
            return Err(AnswerError::InvalidQuestionNumber(question_number));
        }

        let user_answer = user_answer.into();
        let correct_answer = correct_answer.into();
        let is_correct = user_answer == correct_answer;

        Ok(Self {
            id: None,
            game_id: None,
            country: country.into(),
            user_answer,
            correct_answer,
            is_correct,
            question_number,
            answered_at,
        })
    }

    /// Rehydrate a record from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns `AnswerError::InvalidQuestionNumber` for a 0 ordinal and
    /// `AnswerError::CorrectnessMismatch` if the stored flag disagrees with
    /// the stored answer pair.
    #[allow(clippy::too_many_arguments)]
    pub fn from_persisted(
        id: AnswerId,
        game_id: Option<GameId>,
        country: String,
        user_answer: String,
        correct_answer: String,
        is_correct: bool,
        question_number: u32,
        answered_at: DateTime<Utc>,
    ) -> Result<Self, AnswerError> {
        if question_number == 0 {
            return Err(AnswerError::InvalidQuestionNumber(question_number));
        }
        if is_correct != (user_answer == correct_answer) {
            return Err(AnswerError::CorrectnessMismatch);
        }

        Ok(Self {
            id: Some(id),
            game_id,
            country,
            user_answer,
            correct_answer,
            is_correct,
            question_number,
            answered_at,
        })
    }

    #[must_use]
    pub fn id(&self) -> Option<AnswerId> {
        self.id
    }

    #[must_use]
    pub fn game_id(&self) -> Option<GameId> {
        self.game_id
    }

    #[must_use]
    pub fn country(&self) -> &str {
        &self.country
    }

    #[must_use]
    pub fn user_answer(&self) -> &str {
        &self.user_answer
    }

    #[must_use]
    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.is_correct
    }

    #[must_use]
    pub fn question_number(&self) -> u32 {
        self.question_number
    }

    #[must_use]
    pub fn answered_at(&self) -> DateTime<Utc> {
        self.answered_at
    }

    /// Attach the store-assigned identity after insert.
    #[must_use]
    pub fn with_id(mut self, id: AnswerId) -> Self {
        self.id = Some(id);
        self
    }

    /// Bind an unlinked record to a finalized game.
    ///
    /// Returns `true` if the record was unlinked and is now bound; an
    /// already-linked record is left untouched and `false` is returned.
    pub fn link(&mut self, game_id: GameId) -> bool {
        if self.game_id.is_some() {
            return false;
        }
        self.game_id = Some(game_id);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn new_record_starts_unlinked() {
        let record = AnswerRecord::new("France", "Paris", "Paris", 1, fixed_now()).unwrap();
        assert!(record.id().is_none());
        assert!(record.game_id().is_none());
        assert!(record.is_correct());
    }

    #[test]
    fn correctness_is_derived_from_answers() {
        let record = AnswerRecord::new("France", "Berlin", "Paris", 3, fixed_now()).unwrap();
        assert!(!record.is_correct());
        assert_eq!(record.question_number(), 3);
    }

    #[test]
    fn zero_question_number_is_rejected() {
        let err = AnswerRecord::new("France", "Paris", "Paris", 0, fixed_now()).unwrap_err();
        assert_eq!(err, AnswerError::InvalidQuestionNumber(0));
    }

    #[test]
    fn persisted_correctness_mismatch_is_rejected() {
        let err = AnswerRecord::from_persisted(
            AnswerId::new(1),
            None,
            "France".into(),
            "Berlin".into(),
            "Paris".into(),
            true,
            1,
            fixed_now(),
        )
        .unwrap_err();
        assert_eq!(err, AnswerError::CorrectnessMismatch);
    }

    #[test]
    fn link_binds_exactly_once() {
        let mut record = AnswerRecord::new("France", "Paris", "Paris", 1, fixed_now()).unwrap();
        assert!(record.link(GameId::new(5)));
        assert!(!record.link(GameId::new(6)));
        assert_eq!(record.game_id(), Some(GameId::new(5)));
    }
}
