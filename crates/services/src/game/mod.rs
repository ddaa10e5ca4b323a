mod linker;
mod progress;
mod questions;
mod session;
mod workflow;

// Public API of the game subsystem.
pub use crate::error::GameError;
pub use linker::GameLinker;
pub use progress::GameProgress;
pub use questions::QuestionGenerator;
pub use session::{AnswerFeedback, GamePhase, GameSession};
pub use workflow::{GameAdvance, GameLoopService};
