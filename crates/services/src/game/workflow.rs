use std::sync::Arc;

use tracing::{debug, warn};

use quiz_core::Clock;
use quiz_core::model::{AnswerRecord, GameResult, QuizConfig, ReferenceSet};
use storage::repository::{AnswerLedger, GameResultStore, IncorrectAnswer, IncorrectAnswerLog};

use super::linker::GameLinker;
use super::questions::QuestionGenerator;
use super::session::{AnswerFeedback, GamePhase, GameSession};
use crate::error::GameError;

/// What happened when the feedback pause elapsed.
#[derive(Debug, Clone, PartialEq)]
pub enum GameAdvance {
    /// A fresh question is presenting.
    NextQuestion,
    /// The round is over; `result.id()` is `None` when persisting the result
    /// failed (the score is still correct, from memory).
    Completed { result: GameResult },
}

/// Orchestrates game start, persisted answering and finalization.
///
/// Owns no session state itself; it drives a `GameSession` and performs every
/// storage write. Per-answer and finalization writes are best-effort: a
/// failed write is logged and the quiz continues.
#[derive(Clone)]
pub struct GameLoopService {
    clock: Clock,
    config: QuizConfig,
    generator: QuestionGenerator,
    answers: Arc<dyn AnswerLedger>,
    games: Arc<dyn GameResultStore>,
    incorrect: Arc<dyn IncorrectAnswerLog>,
}

impl GameLoopService {
    #[must_use]
    pub fn new(
        clock: Clock,
        config: QuizConfig,
        reference: Arc<ReferenceSet>,
        answers: Arc<dyn AnswerLedger>,
        games: Arc<dyn GameResultStore>,
        incorrect: Arc<dyn IncorrectAnswerLog>,
    ) -> Self {
        Self {
            clock,
            config,
            generator: QuestionGenerator::new(reference),
            answers,
            games,
            incorrect,
        }
    }

    #[must_use]
    pub fn config(&self) -> QuizConfig {
        self.config
    }

    /// Start a new game: `Loading` then straight to `Presenting` with the
    /// first question.
    #[must_use]
    pub fn start_game(&self) -> GameSession {
        let mut session = GameSession::new(self.config, self.clock.now());
        self.present_next(&mut session);
        session
    }

    /// Reset an existing session and present the first question of a fresh
    /// game. Valid from any phase; unlinked answers of an abandoned game stay
    /// in the ledger.
    pub fn restart(&self, session: &mut GameSession) {
        session.reset(self.clock.now());
        self.present_next(session);
    }

    fn present_next(&self, session: &mut GameSession) {
        let number = session.question_count() + 1;
        let mut rng = rand::rng();
        let instance = self
            .generator
            .next_instance(session.used_countries_mut(), number, &mut rng);
        session.present(instance);
    }

    /// Record the player's pick and persist it immediately, before the
    /// session outcome exists (`game_id` stays NULL until finalization).
    ///
    /// Returns `None` for a duplicate submission. A failed ledger write is
    /// logged and swallowed: losing one record must not abort the quiz.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Completed` once the game is over.
    pub async fn submit_answer(
        &self,
        session: &mut GameSession,
        option: &str,
    ) -> Result<Option<AnswerFeedback>, GameError> {
        let Some(feedback) = session.select(option)? else {
            return Ok(None);
        };

        match AnswerRecord::new(
            feedback.country.clone(),
            feedback.selected.clone(),
            feedback.correct_answer.clone(),
            feedback.question_number,
            self.clock.now(),
        ) {
            Ok(record) => {
                match self.answers.append_answer(&record).await {
                    Ok(id) => debug!(answer = %id, number = feedback.question_number, "answer recorded"),
                    Err(error) => {
                        warn!(%error, number = feedback.question_number, "failed to record answer, continuing");
                    }
                }
                if !record.is_correct() {
                    let entry = IncorrectAnswer::from_answer(&record);
                    if let Err(error) = self.incorrect.append_incorrect(&entry).await {
                        warn!(%error, "failed to log incorrect answer, continuing");
                    }
                }
            }
            Err(error) => warn!(%error, "answer record rejected, not persisted"),
        }

        Ok(Some(feedback))
    }

    /// Move on once the feedback pause has elapsed: either present the next
    /// question or finalize the round.
    ///
    /// Finalization writes the game result and then links the in-flight
    /// ledger entries to the assigned id. Both writes are best-effort, and a
    /// failed result write suppresses linking entirely (never link against a
    /// game row that does not exist).
    ///
    /// # Errors
    ///
    /// Returns `GameError::AwaitingAnswer` if the current question has no
    /// answer yet and `GameError::Completed` once the game is over.
    pub async fn advance(&self, session: &mut GameSession) -> Result<GameAdvance, GameError> {
        match session.phase() {
            GamePhase::Completed => return Err(GameError::Completed),
            GamePhase::Loading | GamePhase::Presenting => return Err(GameError::AwaitingAnswer),
            GamePhase::Feedback => {}
        }

        if !session.round_complete() {
            self.present_next(session);
            return Ok(GameAdvance::NextQuestion);
        }

        let result = GameResult::from_score(
            session.score(),
            session.questions_per_game(),
            self.clock.now(),
        )?;

        let result = match self.games.append_result(&result).await {
            Ok(game_id) => {
                match GameLinker::link(self.answers.as_ref(), game_id).await {
                    Ok(linked) => debug!(game = %game_id, linked, "game finalized"),
                    Err(error) => {
                        warn!(%error, game = %game_id, "failed to link answers, they remain unlinked");
                    }
                }
                result.with_id(game_id)
            }
            Err(error) => {
                warn!(%error, "failed to persist game result, score shown from memory");
                result
            }
        };

        session.complete(result.id());
        Ok(GameAdvance::Completed { result })
    }
}
