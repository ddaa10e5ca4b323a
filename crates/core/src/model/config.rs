use std::time::Duration;

/// Gameplay policy knobs: session length and the pause between feedback and
/// the next question. Both are configuration rather than literals so callers
/// (and tests) can shorten games.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizConfig {
    questions_per_game: u32,
    feedback_delay: Duration,
}

pub const DEFAULT_QUESTIONS_PER_GAME: u32 = 10;
pub const DEFAULT_FEEDBACK_DELAY: Duration = Duration::from_secs(2);

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            questions_per_game: DEFAULT_QUESTIONS_PER_GAME,
            feedback_delay: DEFAULT_FEEDBACK_DELAY,
        }
    }
}

impl QuizConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the session length; values below 1 are clamped to 1.
    #[must_use]
    pub fn with_questions_per_game(mut self, questions: u32) -> Self {
        self.questions_per_game = questions.max(1);
        self
    }

    #[must_use]
    pub fn with_feedback_delay(mut self, delay: Duration) -> Self {
        self.feedback_delay = delay;
        self
    }

    #[must_use]
    pub fn questions_per_game(&self) -> u32 {
        self.questions_per_game
    }

    #[must_use]
    pub fn feedback_delay(&self) -> Duration {
        self.feedback_delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_policy() {
        let config = QuizConfig::default();
        assert_eq!(config.questions_per_game(), 10);
        assert_eq!(config.feedback_delay(), Duration::from_secs(2));
    }

    #[test]
    fn zero_length_games_are_clamped() {
        let config = QuizConfig::new().with_questions_per_game(0);
        assert_eq!(config.questions_per_game(), 1);
    }
}
