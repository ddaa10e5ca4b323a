use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identity of a finished game, assigned by the store on insert.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GameId(i64);

impl GameId {
    /// Creates a new `GameId`
    #[must_use]
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the underlying i64 value
    #[must_use]
    pub fn value(&self) -> i64 {
        self.0
    }
}

/// Identity of a single answer record, assigned by the store on insert.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AnswerId(i64);

impl AnswerId {
    /// Creates a new `AnswerId`
    #[must_use]
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the underlying i64 value
    #[must_use]
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Debug for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GameId({})", self.0)
    }
}

impl fmt::Debug for AnswerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AnswerId({})", self.0)
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for AnswerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error type for parsing ID from string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    kind: String,
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse {} from string", self.kind)
    }
}

impl std::error::Error for ParseIdError {}

impl FromStr for GameId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>().map(GameId::new).map_err(|_| ParseIdError {
            kind: "GameId".to_string(),
        })
    }
}

impl FromStr for AnswerId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>()
            .map(AnswerId::new)
            .map_err(|_| ParseIdError {
                kind: "AnswerId".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn game_id_display() {
        let id = GameId::new(42);
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn game_id_from_str() {
        let id: GameId = "123".parse().unwrap();
        assert_eq!(id, GameId::new(123));
    }

    #[test]
    fn game_id_from_str_invalid() {
        let result = "not-a-number".parse::<GameId>();
        assert!(result.is_err());
    }

    #[test]
    fn answer_id_roundtrip() {
        let original = AnswerId::new(7);
        let serialized = original.to_string();
        let deserialized: AnswerId = serialized.parse().unwrap();
        assert_eq!(original, deserialized);
    }
}
