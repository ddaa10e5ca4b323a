use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};
use std::collections::HashSet;
use std::sync::Arc;

use quiz_core::model::{Question, QuestionInstance, ReferenceSet};

/// Number of options shown per question: one correct capital + 3 distractors.
pub const OPTIONS_PER_QUESTION: usize = 4;

/// Produces non-repeating questions with shuffled distractors.
///
/// Pure apart from the rng: the caller owns the `used` set, which is the only
/// thing carried between questions. Infallible because `ReferenceSet`
/// validates entry count and capital variety at construction.
#[derive(Clone)]
pub struct QuestionGenerator {
    reference: Arc<ReferenceSet>,
}

impl QuestionGenerator {
    #[must_use]
    pub fn new(reference: Arc<ReferenceSet>) -> Self {
        Self { reference }
    }

    #[must_use]
    pub fn reference(&self) -> &ReferenceSet {
        &self.reference
    }

    /// Draw the next question, avoiding countries in `used`.
    ///
    /// When `used` covers the whole reference set it is reset to empty first,
    /// so the quiz never stalls; revisits only happen after full exhaustion.
    /// The chosen country is inserted into `used`.
    pub fn next_instance<R: Rng>(
        &self,
        used: &mut HashSet<String>,
        number: u32,
        rng: &mut R,
    ) -> QuestionInstance {
        if used.len() >= self.reference.len() {
            used.clear();
        }

        let pool: Vec<&Question> = self
            .reference
            .questions()
            .iter()
            .filter(|q| !used.contains(q.country()))
            .collect();

        // Non-empty: `used` was just cleared if it covered the whole set.
        let question = pool[rng.random_range(0..pool.len())].clone();
        used.insert(question.country().to_owned());

        let options = self.multiple_choice_options(question.capital(), rng);
        QuestionInstance::new(question, options, number)
    }

    /// Build four shuffled options: the correct capital plus three distinct
    /// distractors drawn without replacement from other countries' capitals.
    #[must_use]
    pub fn multiple_choice_options<R: Rng>(&self, capital: &str, rng: &mut R) -> Vec<String> {
        let pool = self.reference.distractor_pool(capital);
        let mut options: Vec<String> = pool
            .choose_multiple(rng, OPTIONS_PER_QUESTION - 1)
            .map(|s| (*s).to_owned())
            .collect();
        options.push(capital.to_owned());
        options.shuffle(rng);
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn generator() -> QuestionGenerator {
        QuestionGenerator::new(Arc::new(ReferenceSet::builtin()))
    }

    #[test]
    fn options_hold_four_distinct_capitals_with_one_correct() {
        let generator = generator();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..100 {
            let options = generator.multiple_choice_options("Paris", &mut rng);
            assert_eq!(options.len(), OPTIONS_PER_QUESTION);

            let distinct: HashSet<&String> = options.iter().collect();
            assert_eq!(distinct.len(), OPTIONS_PER_QUESTION);

            let correct = options.iter().filter(|o| *o == "Paris").count();
            assert_eq!(correct, 1);
        }
    }

    #[test]
    fn countries_never_repeat_before_exhaustion() {
        let generator = generator();
        let mut rng = StdRng::seed_from_u64(11);
        let mut used = HashSet::new();
        let total = generator.reference().len();

        let mut seen = HashSet::new();
        for number in 0..total {
            let instance = generator.next_instance(&mut used, number as u32 + 1, &mut rng);
            assert!(
                seen.insert(instance.question().country().to_owned()),
                "country repeated before exhaustion"
            );
        }
        assert_eq!(used.len(), total);
    }

    #[test]
    fn used_set_resets_after_covering_reference() {
        let generator = generator();
        let mut rng = StdRng::seed_from_u64(13);
        let mut used = HashSet::new();
        let total = generator.reference().len();

        for number in 0..total {
            generator.next_instance(&mut used, number as u32 + 1, &mut rng);
        }
        assert_eq!(used.len(), total);

        // One more draw resets the set and starts a fresh pass.
        generator.next_instance(&mut used, 1, &mut rng);
        assert_eq!(used.len(), 1);
    }

    #[test]
    fn instance_options_contain_its_own_capital() {
        let generator = generator();
        let mut rng = StdRng::seed_from_u64(17);
        let mut used = HashSet::new();

        for number in 1..=20 {
            let instance = generator.next_instance(&mut used, number, &mut rng);
            let capital = instance.question().capital();
            assert_eq!(
                instance.options().iter().filter(|o| *o == capital).count(),
                1
            );
        }
    }
}
