use std::collections::HashSet;
use thiserror::Error;

use crate::model::Question;

/// Minimum entries needed to build one correct option plus three distractors.
pub const MIN_REFERENCE_ENTRIES: usize = 4;

/// Errors for malformed reference data, surfaced once at startup.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigurationError {
    #[error("reference set has {len} entries, need at least {MIN_REFERENCE_ENTRIES}")]
    TooFewEntries { len: usize },

    #[error("reference set has {len} distinct capitals, need at least {MIN_REFERENCE_ENTRIES}")]
    TooFewCapitals { len: usize },

    #[error("duplicate country in reference set: {0}")]
    DuplicateCountry(String),

    #[error("blank country or capital in reference set")]
    BlankEntry,
}

/// Immutable, validated collection of country/capital pairs.
///
/// Countries are unique; there are at least four entries and four distinct
/// capitals, so four distinct multiple-choice options can always be built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceSet {
    questions: Vec<Question>,
}

impl ReferenceSet {
    /// Validate a list of pairs into a usable reference set.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` if the set is too small, a country appears
    /// twice, capitals are not varied enough, or any field is blank.
    pub fn from_pairs(questions: Vec<Question>) -> Result<Self, ConfigurationError> {
        if questions.len() < MIN_REFERENCE_ENTRIES {
            return Err(ConfigurationError::TooFewEntries {
                len: questions.len(),
            });
        }

        let mut countries = HashSet::new();
        let mut capitals = HashSet::new();
        for question in &questions {
            if question.country().trim().is_empty() || question.capital().trim().is_empty() {
                return Err(ConfigurationError::BlankEntry);
            }
            if !countries.insert(question.country().to_owned()) {
                return Err(ConfigurationError::DuplicateCountry(
                    question.country().to_owned(),
                ));
            }
            capitals.insert(question.capital().to_owned());
        }

        if capitals.len() < MIN_REFERENCE_ENTRIES {
            return Err(ConfigurationError::TooFewCapitals {
                len: capitals.len(),
            });
        }

        Ok(Self { questions })
    }

    /// The embedded country/capital reference data.
    ///
    /// # Panics
    ///
    /// Panics if the embedded data is malformed; guarded by a test.
    #[must_use]
    pub fn builtin() -> Self {
        let questions = BUILTIN_COUNTRIES
            .iter()
            .map(|(country, capital)| Question::new(*country, *capital))
            .collect();
        Self::from_pairs(questions).expect("builtin reference data should be valid")
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Capitals of all countries other than the given one, deduplicated and
    /// excluding the correct capital itself. Order follows the reference data
    /// so selection stays deterministic under a seeded rng.
    #[must_use]
    pub fn distractor_pool(&self, capital: &str) -> Vec<&str> {
        let mut pool: Vec<&str> = Vec::with_capacity(self.questions.len());
        for question in &self.questions {
            let candidate = question.capital();
            if candidate != capital && !pool.contains(&candidate) {
                pool.push(candidate);
            }
        }
        pool
    }
}

const BUILTIN_COUNTRIES: &[(&str, &str)] = &[
    ("France", "Paris"),
    ("Germany", "Berlin"),
    ("Italy", "Rome"),
    ("Spain", "Madrid"),
    ("Portugal", "Lisbon"),
    ("United Kingdom", "London"),
    ("Ireland", "Dublin"),
    ("Netherlands", "Amsterdam"),
    ("Belgium", "Brussels"),
    ("Switzerland", "Bern"),
    ("Austria", "Vienna"),
    ("Poland", "Warsaw"),
    ("Czechia", "Prague"),
    ("Hungary", "Budapest"),
    ("Greece", "Athens"),
    ("Norway", "Oslo"),
    ("Sweden", "Stockholm"),
    ("Finland", "Helsinki"),
    ("Denmark", "Copenhagen"),
    ("Iceland", "Reykjavik"),
    ("Ukraine", "Kyiv"),
    ("Turkey", "Ankara"),
    ("Egypt", "Cairo"),
    ("Morocco", "Rabat"),
    ("Nigeria", "Abuja"),
    ("Kenya", "Nairobi"),
    ("Ethiopia", "Addis Ababa"),
    ("China", "Beijing"),
    ("Japan", "Tokyo"),
    ("South Korea", "Seoul"),
    ("India", "New Delhi"),
    ("Thailand", "Bangkok"),
    ("Vietnam", "Hanoi"),
    ("Indonesia", "Jakarta"),
    ("Australia", "Canberra"),
    ("New Zealand", "Wellington"),
    ("United States", "Washington, D.C."),
    ("Canada", "Ottawa"),
    ("Mexico", "Mexico City"),
    ("Brazil", "Brasilia"),
    ("Argentina", "Buenos Aires"),
    ("Chile", "Santiago"),
    ("Peru", "Lima"),
    ("Colombia", "Bogota"),
];
