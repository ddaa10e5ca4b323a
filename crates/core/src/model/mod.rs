mod answer;
mod config;
mod game;
mod ids;
mod question;
mod reference;

pub use answer::{AnswerError, AnswerRecord};
pub use config::{DEFAULT_FEEDBACK_DELAY, DEFAULT_QUESTIONS_PER_GAME, QuizConfig};
pub use game::{GameResult, GameResultError};
pub use ids::{AnswerId, GameId, ParseIdError};
pub use question::{Question, QuestionInstance};
pub use reference::{ConfigurationError, MIN_REFERENCE_ENTRIES, ReferenceSet};
