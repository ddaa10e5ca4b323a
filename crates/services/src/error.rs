//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{ConfigurationError, GameResultError};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by the game loop.
///
/// Storage failures during gameplay are deliberately absent: per-answer and
/// finalization writes are best-effort and only logged, so the quiz never
/// aborts on a failed write.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GameError {
    #[error("game already completed")]
    Completed,

    #[error("current question has not been answered yet")]
    AwaitingAnswer,

    #[error(transparent)]
    Score(#[from] GameResultError),
}

/// Errors emitted by `HistoryService`.
///
/// Unlike gameplay writes, a failed history read blocks the requested action
/// and is surfaced to the caller.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HistoryError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}
