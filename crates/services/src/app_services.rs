use std::sync::Arc;

use quiz_core::model::{QuizConfig, ReferenceSet};
use storage::repository::Storage;

use crate::Clock;
use crate::error::AppServicesError;
use crate::game::GameLoopService;
use crate::history_service::HistoryService;

/// Assembles app-facing services over a storage backend and reference data.
#[derive(Clone)]
pub struct QuizServices {
    game_loop: Arc<GameLoopService>,
    history: Arc<HistoryService>,
}

impl QuizServices {
    /// Build services backed by `SQLite` storage and the builtin country
    /// data.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        config: QuizConfig,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::from_storage(
            storage,
            clock,
            config,
            ReferenceSet::builtin(),
        ))
    }

    /// Build services over in-memory storage, for tests and prototyping.
    #[must_use]
    pub fn new_in_memory(clock: Clock, config: QuizConfig) -> Self {
        Self::from_storage(
            Storage::in_memory(),
            clock,
            config,
            ReferenceSet::builtin(),
        )
    }

    /// Build services over an existing storage aggregate and reference set.
    #[must_use]
    pub fn from_storage(
        storage: Storage,
        clock: Clock,
        config: QuizConfig,
        reference: ReferenceSet,
    ) -> Self {
        let reference = Arc::new(reference);
        let game_loop = Arc::new(GameLoopService::new(
            clock,
            config,
            Arc::clone(&reference),
            Arc::clone(&storage.answers),
            Arc::clone(&storage.games),
            Arc::clone(&storage.incorrect),
        ));
        let history = Arc::new(HistoryService::new(
            Arc::clone(&storage.answers),
            Arc::clone(&storage.games),
            Arc::clone(&storage.incorrect),
        ));

        Self { game_loop, history }
    }

    #[must_use]
    pub fn game_loop(&self) -> Arc<GameLoopService> {
        Arc::clone(&self.game_loop)
    }

    #[must_use]
    pub fn history(&self) -> Arc<HistoryService> {
        Arc::clone(&self.history)
    }
}
