use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::fmt;
use std::time::Duration;

use quiz_core::model::{GameId, QuestionInstance, QuizConfig};

use super::progress::GameProgress;
use crate::error::GameError;

//
// ─── PHASE ────────────────────────────────────────────────────────────────────
//

/// Lifecycle of one game.
///
/// `Loading → Presenting → Feedback → (Presenting | Completed)`; `Completed`
/// is terminal, a new game starts over from `Loading`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Waiting for the first (or next) question to be generated.
    Loading,
    /// A question is on screen and no answer has been picked yet.
    Presenting,
    /// An answer was picked; paused before auto-advancing.
    Feedback,
    /// All questions answered; the game is finalized.
    Completed,
}

//
// ─── ANSWER FEEDBACK ──────────────────────────────────────────────────────────
//

/// Outcome of a single submitted answer, for immediate display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerFeedback {
    pub country: String,
    pub selected: String,
    pub correct_answer: String,
    pub is_correct: bool,
    pub question_number: u32,
}

//
// ─── SESSION ──────────────────────────────────────────────────────────────────
//

/// In-memory state of one quiz run, owned by a single controller.
///
/// Holds the current question, the player's selection, the running score and
/// the set of countries already asked. Persistence lives entirely in
/// `GameLoopService`; this type only enforces the state machine.
pub struct GameSession {
    config: QuizConfig,
    phase: GamePhase,
    current: Option<QuestionInstance>,
    selected: Option<String>,
    score: u32,
    question_count: u32,
    used_countries: HashSet<String>,
    game_id: Option<GameId>,
    started_at: DateTime<Utc>,
}

impl GameSession {
    pub(crate) fn new(config: QuizConfig, started_at: DateTime<Utc>) -> Self {
        Self {
            config,
            phase: GamePhase::Loading,
            current: None,
            selected: None,
            score: 0,
            question_count: 0,
            used_countries: HashSet::new(),
            game_id: None,
            started_at,
        }
    }

    #[must_use]
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&QuestionInstance> {
        self.current.as_ref()
    }

    #[must_use]
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn question_count(&self) -> u32 {
        self.question_count
    }

    #[must_use]
    pub fn used_countries(&self) -> &HashSet<String> {
        &self.used_countries
    }

    pub(crate) fn used_countries_mut(&mut self) -> &mut HashSet<String> {
        &mut self.used_countries
    }

    #[must_use]
    pub fn game_id(&self) -> Option<GameId> {
        self.game_id
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn questions_per_game(&self) -> u32 {
        self.config.questions_per_game()
    }

    /// Pause between feedback and the next question; the caller drives the
    /// timer, nothing inside the session sleeps.
    #[must_use]
    pub fn feedback_delay(&self) -> Duration {
        self.config.feedback_delay()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.phase == GamePhase::Completed
    }

    /// Whether every question of the round has been answered.
    #[must_use]
    pub fn round_complete(&self) -> bool {
        self.question_count >= self.config.questions_per_game()
    }

    /// Returns a summary of the current game progress.
    #[must_use]
    pub fn progress(&self) -> GameProgress {
        GameProgress {
            total: self.config.questions_per_game(),
            answered: self.question_count,
            remaining: self
                .config
                .questions_per_game()
                .saturating_sub(self.question_count),
            score: self.score,
            is_complete: self.is_complete(),
        }
    }

    /// Put the next question on screen and clear the selection.
    pub(crate) fn present(&mut self, instance: QuestionInstance) {
        self.current = Some(instance);
        self.selected = None;
        self.phase = GamePhase::Presenting;
    }

    /// Record the player's pick for the current question.
    ///
    /// Exactly one selection is accepted per presentation: while feedback for
    /// the current question is showing (double taps), or before any question
    /// is up, the call is a no-op returning `None`.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Completed` once the game is over.
    pub fn select(&mut self, option: &str) -> Result<Option<AnswerFeedback>, GameError> {
        match self.phase {
            GamePhase::Completed => return Err(GameError::Completed),
            GamePhase::Loading | GamePhase::Feedback => return Ok(None),
            GamePhase::Presenting => {}
        }
        if self.selected.is_some() {
            return Ok(None);
        }
        let Some(instance) = &self.current else {
            return Ok(None);
        };

        let is_correct = instance.is_correct_option(option);
        self.selected = Some(option.to_owned());
        if is_correct {
            self.score += 1;
        }
        self.question_count += 1;
        self.phase = GamePhase::Feedback;

        Ok(Some(AnswerFeedback {
            country: instance.question().country().to_owned(),
            selected: option.to_owned(),
            correct_answer: instance.question().capital().to_owned(),
            is_correct,
            question_number: self.question_count,
        }))
    }

    /// Mark the game finalized; `game_id` stays `None` when the result row
    /// could not be written.
    pub(crate) fn complete(&mut self, game_id: Option<GameId>) {
        self.game_id = game_id;
        self.current = None;
        self.selected = None;
        self.phase = GamePhase::Completed;
    }

    /// Reset to a fresh game: score, count, used countries and game id all
    /// return to their initial values. Valid from any phase.
    pub fn reset(&mut self, now: DateTime<Utc>) {
        *self = Self::new(self.config, now);
    }
}

impl fmt::Debug for GameSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameSession")
            .field("phase", &self.phase)
            .field("score", &self.score)
            .field("question_count", &self.question_count)
            .field("used_countries_len", &self.used_countries.len())
            .field("game_id", &self.game_id)
            .field("started_at", &self.started_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ────────────────────────────────────────────────────────────────────
//
