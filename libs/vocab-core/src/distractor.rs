//! Wrong-answer selection for multiple-choice questions.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::matching::{meanings_equivalent, normalize_meaning};
use crate::types::{QuestionDirection, Word};

/// Picks plausible wrong answers for a target word.
///
/// Entropy-seeded by default, so repeated runs produce different picks and
/// orderings. Use [`DistractorSelector::seeded`] for reproducible output.
#[derive(Debug, Clone)]
pub struct DistractorSelector {
    rng: StdRng,
}

impl Default for DistractorSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl DistractorSelector {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Choose up to `k` answer texts from `pool` that are wrong for `target`.
    ///
    /// The target itself and any entry whose meaning is equivalent to the
    /// target's are excluded, as are entries whose answer text repeats an
    /// earlier candidate. Fewer than `k` eligible entries yields all of them.
    pub fn select(
        &mut self,
        target: &Word,
        pool: &[Word],
        k: usize,
        direction: QuestionDirection,
    ) -> Vec<String> {
        let correct_key = normalize_meaning(direction.answer_for(target));
        let mut seen = HashSet::new();

        let mut eligible: Vec<&str> = pool
            .iter()
            .filter(|word| word.id != target.id)
            .filter(|word| !meanings_equivalent(&word.meaning, &target.meaning))
            .map(|word| direction.answer_for(word))
            .filter(|answer| {
                let key = normalize_meaning(answer);
                !key.is_empty() && key != correct_key && seen.insert(key)
            })
            .collect();

        eligible.shuffle(&mut self.rng);
        eligible.truncate(k);
        eligible.into_iter().map(str::to_string).collect()
    }

    /// Shuffle a slice with this selector's RNG.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.rng);
    }

    /// Pick one value from a slice.
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut self.rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pool() -> Vec<Word> {
        vec![
            Word::new("w1", "perro", "dog"),
            Word::new("w2", "gato", "cat"),
            Word::new("w3", "casa", "house"),
            Word::new("w4", "libro", "book"),
            Word::new("w5", "agua", "water"),
        ]
    }

    #[test]
    fn returns_k_distinct_non_target_entries() {
        let pool = pool();
        let mut selector = DistractorSelector::new();
        let picks = selector.select(&pool[0], &pool, 3, QuestionDirection::Forward);

        assert_eq!(picks.len(), 3);
        assert!(!picks.contains(&"dog".to_string()));
        let unique: HashSet<_> = picks.iter().collect();
        assert_eq!(unique.len(), 3);

        let mut options = picks.clone();
        options.push("dog".to_string());
        let unique: HashSet<_> = options.iter().collect();
        assert_eq!(unique.len(), 4);
    }

    #[test]
    fn excludes_entries_with_equivalent_meaning() {
        let mut pool = pool();
        pool.push(Word::new("w6", "can", "Dog."));
        let mut selector = DistractorSelector::seeded(7);

        for _ in 0..20 {
            let picks = selector.select(&pool[0], &pool, 10, QuestionDirection::Reverse);
            assert!(!picks.contains(&"perro".to_string()));
            assert!(!picks.contains(&"can".to_string()));
            assert_eq!(picks.len(), 4);
        }
    }

    #[test]
    fn small_pool_returns_everything_eligible() {
        let pool = pool();
        let mut selector = DistractorSelector::seeded(1);
        let picks = selector.select(&pool[0], &pool[..3], 3, QuestionDirection::Forward);
        assert_eq!(picks.len(), 2);

        let none = selector.select(&pool[0], &pool[..1], 3, QuestionDirection::Forward);
        assert!(none.is_empty());
    }

    #[test]
    fn duplicate_answers_collapse_to_one_option() {
        let pool = vec![
            Word::new("w1", "perro", "dog"),
            Word::new("w2", "gato", "cat"),
            Word::new("w3", "minino", "cat"),
        ];
        let mut selector = DistractorSelector::seeded(3);
        let picks = selector.select(&pool[0], &pool, 3, QuestionDirection::Forward);
        assert_eq!(picks, vec!["cat".to_string()]);
    }

    #[test]
    fn unseeded_selection_varies_between_runs() {
        let pool: Vec<Word> = (0..30)
            .map(|i| Word::new(format!("w{i}"), format!("t{i}"), format!("m{i}")))
            .collect();

        let first = DistractorSelector::new().select(&pool[0], &pool, 3, QuestionDirection::Forward);
        let varied = (0..10).any(|_| {
            DistractorSelector::new().select(&pool[0], &pool, 3, QuestionDirection::Forward) != first
        });
        assert!(varied);
    }
}
