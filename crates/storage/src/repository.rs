use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quiz_core::model::{AnswerId, AnswerRecord, GameId, GameResult};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Persisted shape of the legacy incorrect-answer log.
///
/// Populated only for wrong answers and kept alongside the comprehensive
/// ledger for backward-compatible listing. Append-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncorrectAnswer {
    pub id: Option<i64>,
    pub country: String,
    pub user_answer: String,
    pub correct_answer: String,
    pub logged_at: DateTime<Utc>,
}

impl IncorrectAnswer {
    /// Derive a legacy log entry from a full answer record.
    #[must_use]
    pub fn from_answer(record: &AnswerRecord) -> Self {
        Self {
            id: None,
            country: record.country().to_owned(),
            user_answer: record.user_answer().to_owned(),
            correct_answer: record.correct_answer().to_owned(),
            logged_at: record.answered_at(),
        }
    }
}

/// Durable log of every submitted answer.
///
/// Records are inserted unlinked (`game_id = NULL`) the moment the player
/// answers, then bound to a game id in one batch when the game finalizes.
#[async_trait]
pub trait AnswerLedger: Send + Sync {
    /// Insert one answer record; the record's `game_id` is persisted as-is
    /// (`NULL` for in-flight answers). Returns the assigned identity.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the insert fails.
    async fn append_answer(&self, record: &AnswerRecord) -> Result<AnswerId, StorageError>;

    /// Bind every record with a `NULL` game id to the given game.
    ///
    /// Idempotent: a second run finds no `NULL` rows and affects zero.
    /// Already-linked records are never reassigned. Returns the number of
    /// rows linked.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the update fails.
    async fn link_unlinked(&self, game_id: GameId) -> Result<u64, StorageError>;

    /// All records for one game, ordered by question number ascending.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the query fails.
    async fn answers_for_game(&self, game_id: GameId) -> Result<Vec<AnswerRecord>, StorageError>;

    /// All records, most recent first. Unlinked rows show up here, which is
    /// how in-flight answers stay browsable before finalization.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the query fails.
    async fn recent_answers(&self) -> Result<Vec<AnswerRecord>, StorageError>;

    /// Number of records still waiting for a game id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the query fails.
    async fn unlinked_count(&self) -> Result<u64, StorageError>;

    /// Delete all answer records. Not reversible.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the delete fails.
    async fn clear_answers(&self) -> Result<(), StorageError>;
}

/// Durable store of completed game results.
#[async_trait]
pub trait GameResultStore: Send + Sync {
    /// Insert one immutable result row; returns the assigned identity for
    /// use when linking the ledger.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the insert fails.
    async fn append_result(&self, result: &GameResult) -> Result<GameId, StorageError>;

    /// All results, most recent game first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the query fails.
    async fn list_results(&self) -> Result<Vec<GameResult>, StorageError>;

    /// Delete all result rows. Not reversible.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the delete fails.
    async fn clear_results(&self) -> Result<(), StorageError>;
}

/// Legacy append-only log of incorrect answers.
#[async_trait]
pub trait IncorrectAnswerLog: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError` if the insert fails.
    async fn append_incorrect(&self, entry: &IncorrectAnswer) -> Result<i64, StorageError>;

    /// Entries most recent first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the query fails.
    async fn list_incorrect(&self) -> Result<Vec<IncorrectAnswer>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the delete fails.
    async fn clear_incorrect(&self) -> Result<(), StorageError>;
}

//
// ─── IN-MEMORY IMPLEMENTATION ─────────────────────────────────────────────────
//

#[derive(Default)]
struct InMemoryState {
    answers: Vec<AnswerRecord>,
    games: Vec<GameResult>,
    incorrect: Vec<IncorrectAnswer>,
    next_answer_id: i64,
    next_game_id: i64,
    next_incorrect_id: i64,
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    state: Arc<Mutex<InMemoryState>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, InMemoryState>, StorageError> {
        self.state
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))
    }
}

#[async_trait]
impl AnswerLedger for InMemoryRepository {
    async fn append_answer(&self, record: &AnswerRecord) -> Result<AnswerId, StorageError> {
        let mut state = self.lock()?;
        state.next_answer_id += 1;
        let id = AnswerId::new(state.next_answer_id);
        state.answers.push(record.clone().with_id(id));
        Ok(id)
    }

    async fn link_unlinked(&self, game_id: GameId) -> Result<u64, StorageError> {
        let mut state = self.lock()?;
        let mut linked = 0;
        for record in &mut state.answers {
            if record.link(game_id) {
                linked += 1;
            }
        }
        Ok(linked)
    }

    async fn answers_for_game(&self, game_id: GameId) -> Result<Vec<AnswerRecord>, StorageError> {
        let state = self.lock()?;
        let mut out: Vec<AnswerRecord> = state
            .answers
            .iter()
            .filter(|r| r.game_id() == Some(game_id))
            .cloned()
            .collect();
        out.sort_by_key(AnswerRecord::question_number);
        Ok(out)
    }

    async fn recent_answers(&self) -> Result<Vec<AnswerRecord>, StorageError> {
        let state = self.lock()?;
        let mut out = state.answers.clone();
        out.sort_by(|a, b| {
            b.answered_at()
                .cmp(&a.answered_at())
                .then(b.id().cmp(&a.id()))
        });
        Ok(out)
    }

    async fn unlinked_count(&self) -> Result<u64, StorageError> {
        let state = self.lock()?;
        Ok(state.answers.iter().filter(|r| r.game_id().is_none()).count() as u64)
    }

    async fn clear_answers(&self) -> Result<(), StorageError> {
        self.lock()?.answers.clear();
        Ok(())
    }
}

#[async_trait]
impl GameResultStore for InMemoryRepository {
    async fn append_result(&self, result: &GameResult) -> Result<GameId, StorageError> {
        let mut state = self.lock()?;
        state.next_game_id += 1;
        let id = GameId::new(state.next_game_id);
        state.games.push(result.clone().with_id(id));
        Ok(id)
    }

    async fn list_results(&self) -> Result<Vec<GameResult>, StorageError> {
        let state = self.lock()?;
        let mut out = state.games.clone();
        out.sort_by(|a, b| b.game_date().cmp(&a.game_date()).then(b.id().cmp(&a.id())));
        Ok(out)
    }

    async fn clear_results(&self) -> Result<(), StorageError> {
        self.lock()?.games.clear();
        Ok(())
    }
}

#[async_trait]
impl IncorrectAnswerLog for InMemoryRepository {
    async fn append_incorrect(&self, entry: &IncorrectAnswer) -> Result<i64, StorageError> {
        let mut state = self.lock()?;
        state.next_incorrect_id += 1;
        let id = state.next_incorrect_id;
        let mut entry = entry.clone();
        entry.id = Some(id);
        state.incorrect.push(entry);
        Ok(id)
    }

    async fn list_incorrect(&self) -> Result<Vec<IncorrectAnswer>, StorageError> {
        let state = self.lock()?;
        let mut out = state.incorrect.clone();
        out.sort_by(|a, b| b.logged_at.cmp(&a.logged_at).then(b.id.cmp(&a.id)));
        Ok(out)
    }

    async fn clear_incorrect(&self) -> Result<(), StorageError> {
        self.lock()?.incorrect.clear();
        Ok(())
    }
}

/// Aggregates the three record stores behind trait objects for easy backend
/// swapping.
#[derive(Clone)]
pub struct Storage {
    pub answers: Arc<dyn AnswerLedger>,
    pub games: Arc<dyn GameResultStore>,
    pub incorrect: Arc<dyn IncorrectAnswerLog>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let answers: Arc<dyn AnswerLedger> = Arc::new(repo.clone());
        let games: Arc<dyn GameResultStore> = Arc::new(repo.clone());
        let incorrect: Arc<dyn IncorrectAnswerLog> = Arc::new(repo);
        Self {
            answers,
            games,
            incorrect,
        }
    }
}
