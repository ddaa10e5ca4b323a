use std::sync::Arc;

use quiz_core::model::{AnswerRecord, GameId, GameResult};
use storage::repository::{AnswerLedger, GameResultStore, IncorrectAnswer, IncorrectAnswerLog};

use crate::error::HistoryError;

/// Read-mostly queries over past games and answers for the history screens.
#[derive(Clone)]
pub struct HistoryService {
    answers: Arc<dyn AnswerLedger>,
    games: Arc<dyn GameResultStore>,
    incorrect: Arc<dyn IncorrectAnswerLog>,
}

impl HistoryService {
    #[must_use]
    pub fn new(
        answers: Arc<dyn AnswerLedger>,
        games: Arc<dyn GameResultStore>,
        incorrect: Arc<dyn IncorrectAnswerLog>,
    ) -> Self {
        Self {
            answers,
            games,
            incorrect,
        }
    }

    /// Completed games, most recent first.
    ///
    /// # Errors
    ///
    /// Returns `HistoryError` if the listing fails.
    pub async fn list_games(&self) -> Result<Vec<GameResult>, HistoryError> {
        Ok(self.games.list_results().await?)
    }

    /// Per-question details for one game, in question order.
    ///
    /// # Errors
    ///
    /// Returns `HistoryError` if the listing fails.
    pub async fn answers_for_game(
        &self,
        game_id: GameId,
    ) -> Result<Vec<AnswerRecord>, HistoryError> {
        Ok(self.answers.answers_for_game(game_id).await?)
    }

    /// Every recorded answer, most recent first. Includes unlinked rows, so
    /// an in-flight session is browsable before it finalizes.
    ///
    /// # Errors
    ///
    /// Returns `HistoryError` if the listing fails.
    pub async fn recent_answers(&self) -> Result<Vec<AnswerRecord>, HistoryError> {
        Ok(self.answers.recent_answers().await?)
    }

    /// The legacy incorrect-answer log, most recent first.
    ///
    /// # Errors
    ///
    /// Returns `HistoryError` if the listing fails.
    pub async fn incorrect_answers(&self) -> Result<Vec<IncorrectAnswer>, HistoryError> {
        Ok(self.incorrect.list_incorrect().await?)
    }

    /// Wipe all history: answers, game results and the legacy log.
    /// Not reversible.
    ///
    /// # Errors
    ///
    /// Returns `HistoryError` on the first delete that fails.
    pub async fn clear_history(&self) -> Result<(), HistoryError> {
        self.answers.clear_answers().await?;
        self.games.clear_results().await?;
        self.incorrect.clear_incorrect().await?;
        Ok(())
    }
}
