//! Per-word quiz mastery scoring.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::{EngineSettings, WordMastery};

/// Scoring constants applied by [`WordMasteryTracker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasteryRules {
    pub mastery_threshold: u32,
    pub correct_increment: u32,
    pub wrong_penalty: u32,
}

impl Default for MasteryRules {
    fn default() -> Self {
        Self::from(&EngineSettings::default())
    }
}

impl From<&EngineSettings> for MasteryRules {
    fn from(settings: &EngineSettings) -> Self {
        Self {
            mastery_threshold: settings.mastery_threshold,
            correct_increment: settings.correct_increment,
            wrong_penalty: settings.wrong_penalty,
        }
    }
}

/// Owns the mastery record of every word answered so far.
///
/// Scores never go below zero: a wrong answer subtracts the penalty and
/// clamps at zero. `is_mastered` is refreshed after every mutation.
#[derive(Debug, Clone, Default)]
pub struct WordMasteryTracker {
    rules: MasteryRules,
    records: HashMap<String, WordMastery>,
}

impl WordMasteryTracker {
    pub fn new(rules: MasteryRules) -> Self {
        Self {
            rules,
            records: HashMap::new(),
        }
    }

    /// Rebuild a tracker from persisted records.
    ///
    /// `is_mastered` is re-derived so a changed threshold takes effect.
    pub fn from_snapshot(rules: MasteryRules, records: HashMap<String, WordMastery>) -> Self {
        let mut tracker = Self { rules, records };
        let threshold = tracker.rules.mastery_threshold;
        for record in tracker.records.values_mut() {
            record.is_mastered = record.total_score >= threshold;
        }
        tracker
    }

    /// Replace the mastery threshold, re-deriving every record's flag.
    pub fn with_threshold(self, mastery_threshold: u32) -> Self {
        let rules = MasteryRules {
            mastery_threshold,
            ..self.rules
        };
        Self::from_snapshot(rules, self.records)
    }

    pub fn rules(&self) -> MasteryRules {
        self.rules
    }

    pub fn mastery_threshold(&self) -> u32 {
        self.rules.mastery_threshold
    }

    /// Apply one quiz answer and return the updated record.
    pub fn record_answer(&mut self, word_id: &str, is_correct: bool) -> WordMastery {
        let rules = self.rules;
        let record = self
            .records
            .entry(word_id.to_string())
            .or_insert_with(|| WordMastery::new(word_id));

        record.times_asked += 1;
        if is_correct {
            record.total_score = record.total_score.saturating_add(rules.correct_increment);
            record.correct_streak += 1;
            record.wrong_streak = 0;
            record.times_correct += 1;
        } else {
            record.total_score = record.total_score.saturating_sub(rules.wrong_penalty);
            record.wrong_streak += 1;
            record.correct_streak = 0;
            record.times_wrong += 1;
        }

        let was_mastered = record.is_mastered;
        record.is_mastered = record.total_score >= rules.mastery_threshold;
        if record.is_mastered && !was_mastered {
            tracing::debug!(word_id, score = record.total_score, "word mastered");
        }

        record.clone()
    }

    pub fn is_mastered(&self, word_id: &str) -> bool {
        self.records
            .get(word_id)
            .map_or(false, |record| record.total_score >= self.rules.mastery_threshold)
    }

    pub fn total_score(&self, word_id: &str) -> u32 {
        self.records.get(word_id).map_or(0, |record| record.total_score)
    }

    pub fn mastery(&self, word_id: &str) -> Option<&WordMastery> {
        self.records.get(word_id)
    }

    /// Zero every counter of a word and clear its mastery.
    pub fn reset(&mut self, word_id: &str) {
        if let Some(record) = self.records.get_mut(word_id) {
            *record = WordMastery::new(word_id);
        }
    }

    /// Copy of all records, for handing to a persistence store.
    pub fn snapshot(&self) -> HashMap<String, WordMastery> {
        self.records.clone()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tracker() -> WordMasteryTracker {
        WordMasteryTracker::new(MasteryRules::default())
    }

    #[test]
    fn correct_then_wrong_clamps_at_zero() {
        let mut tracker = tracker();

        let after_correct = tracker.record_answer("w1", true);
        assert_eq!(after_correct.total_score, 10);
        assert_eq!(after_correct.correct_streak, 1);

        let after_wrong = tracker.record_answer("w1", false);
        assert_eq!(after_wrong.total_score, 0);
        assert_eq!(after_wrong.wrong_streak, 1);
        assert_eq!(after_wrong.correct_streak, 0);
        assert!(!after_wrong.is_mastered);
        assert!(!tracker.is_mastered("w1"));
    }

    #[test]
    fn mastered_exactly_on_tenth_correct_answer() {
        let mut tracker = tracker();
        for i in 1..=10 {
            let record = tracker.record_answer("w1", true);
            assert_eq!(record.total_score, i * 10);
            assert_eq!(record.is_mastered, i == 10);
            assert_eq!(tracker.is_mastered("w1"), i == 10);
        }
    }

    #[test]
    fn mastery_predicate_tracks_score_after_every_mutation() {
        let mut tracker = tracker();
        let answers = [true, true, false, true, true, true, true, true, true, true, true, true, false, true];
        for answer in answers {
            let record = tracker.record_answer("w1", answer);
            assert_eq!(record.is_mastered, record.total_score >= 100);
            assert_eq!(tracker.is_mastered("w1"), record.is_mastered);
        }
    }

    #[test]
    fn wrong_answers_on_fresh_word_never_go_negative() {
        let mut tracker = tracker();
        for _ in 0..5 {
            let record = tracker.record_answer("w1", false);
            assert_eq!(record.total_score, 0);
        }
        let record = tracker.mastery("w1").unwrap();
        assert_eq!(record.wrong_streak, 5);
        assert_eq!(record.times_wrong, 5);
        assert_eq!(record.times_asked, 5);
    }

    #[test]
    fn counters_split_by_outcome() {
        let mut tracker = tracker();
        tracker.record_answer("w1", true);
        tracker.record_answer("w1", false);
        tracker.record_answer("w1", true);

        let record = tracker.mastery("w1").unwrap();
        assert_eq!(record.times_asked, 3);
        assert_eq!(record.times_correct, 2);
        assert_eq!(record.times_wrong, 1);
        assert_eq!(record.correct_streak, 1);
    }

    #[test]
    fn reset_clears_mastery() {
        let mut tracker = tracker();
        for _ in 0..10 {
            tracker.record_answer("w1", true);
        }
        assert!(tracker.is_mastered("w1"));

        tracker.reset("w1");
        assert_eq!(tracker.mastery("w1"), Some(&WordMastery::new("w1")));
        assert!(!tracker.is_mastered("w1"));
    }

    #[test]
    fn unknown_word_is_not_mastered() {
        let tracker = tracker();
        assert!(!tracker.is_mastered("missing"));
        assert_eq!(tracker.total_score("missing"), 0);
    }

    #[test]
    fn snapshot_rederives_mastery_for_new_threshold() {
        let mut tracker = tracker();
        tracker.record_answer("w1", true);
        tracker.record_answer("w1", true);

        let rules = MasteryRules {
            mastery_threshold: 20,
            ..MasteryRules::default()
        };
        let reloaded = WordMasteryTracker::from_snapshot(rules, tracker.snapshot());
        assert!(reloaded.is_mastered("w1"));
        assert!(reloaded.mastery("w1").unwrap().is_mastered);
    }
}
