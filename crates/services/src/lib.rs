#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod game;
pub mod history_service;

pub use quiz_core::Clock;

pub use app_services::QuizServices;
pub use error::{AppServicesError, GameError, HistoryError};
pub use game::{
    AnswerFeedback, GameAdvance, GameLinker, GameLoopService, GamePhase, GameProgress, GameSession,
    QuestionGenerator,
};
pub use history_service::HistoryService;
