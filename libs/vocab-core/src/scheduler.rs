//! Flashcard scheduling: review responses, suspension and the daily queue.

use chrono::{DateTime, Utc};

use crate::algorithm::sm2::Sm2;
use crate::algorithm::{days_after, SpacedRepetitionAlgorithm};
use crate::types::{DailyQueue, EngineSettings, MasteryLevel, ResponseQuality, ReviewItem, SrsState};

/// Applies a spaced repetition algorithm to word states and builds daily queues.
pub struct SrsScheduler {
    algorithm: Box<dyn SpacedRepetitionAlgorithm>,
    suspend_days: i64,
    daily_new_word_limit: usize,
    daily_review_limit: usize,
}

impl Default for SrsScheduler {
    fn default() -> Self {
        Self::from_settings(&EngineSettings::default())
    }
}

impl std::fmt::Debug for SrsScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SrsScheduler")
            .field("algorithm", &self.algorithm.name())
            .field("suspend_days", &self.suspend_days)
            .field("daily_new_word_limit", &self.daily_new_word_limit)
            .field("daily_review_limit", &self.daily_review_limit)
            .finish()
    }
}

impl SrsScheduler {
    /// SM-2 scheduler configured from engine settings.
    pub fn from_settings(settings: &EngineSettings) -> Self {
        Self::new(Box::new(Sm2::from(settings)), settings)
    }

    pub fn new(algorithm: Box<dyn SpacedRepetitionAlgorithm>, settings: &EngineSettings) -> Self {
        Self {
            algorithm,
            suspend_days: settings.suspend_days,
            daily_new_word_limit: settings.daily_new_word_limit,
            daily_review_limit: settings.daily_review_limit,
        }
    }

    pub fn algorithm_name(&self) -> &'static str {
        self.algorithm.name()
    }

    pub fn initial_state(&self) -> SrsState {
        self.algorithm.initial_state()
    }

    /// Apply a review response to `state` and return the next review date.
    pub fn process_review_response(
        &self,
        state: &mut SrsState,
        quality: ResponseQuality,
        now: DateTime<Utc>,
    ) -> DateTime<Utc> {
        let result = self.algorithm.schedule(state, quality, now);
        tracing::trace!(
            quality = quality.as_str(),
            ease = result.new_state.ease_factor,
            interval = result.new_state.interval_days,
            "review scheduled"
        );
        *state = result.new_state;
        result.next_review
    }

    /// Keep a word out of rotation for `suspend_days`, capped at
    /// `MAX_INTERVAL_DAYS`. Ease and level are untouched.
    pub fn suspend(&self, state: &mut SrsState, now: DateTime<Utc>) -> DateTime<Utc> {
        let until = days_after(now, self.suspend_days);
        state.next_review_date = Some(until);
        until
    }

    /// Split the eligible pool into today's new words and due reviews.
    ///
    /// Both caps apply independently. New words suspended into the future
    /// are skipped; due reviews are ordered by how overdue they are.
    pub fn build_daily_queue(&self, items: Vec<ReviewItem>, now: DateTime<Utc>) -> DailyQueue {
        let (new_pool, seen_pool): (Vec<_>, Vec<_>) = items
            .into_iter()
            .partition(|item| item.srs.mastery_level == MasteryLevel::New);

        let new_words: Vec<ReviewItem> = new_pool
            .into_iter()
            .filter(|item| item.srs.next_review_date.map_or(true, |date| date <= now))
            .take(self.daily_new_word_limit)
            .collect();

        let mut due_words: Vec<ReviewItem> = seen_pool
            .into_iter()
            .filter(|item| item.srs.is_due(now))
            .collect();
        due_words.sort_by_key(|item| item.srs.next_review_date);
        due_words.truncate(self.daily_review_limit);

        DailyQueue {
            new_remaining: self.daily_new_word_limit.saturating_sub(new_words.len()),
            due_remaining: self.daily_review_limit.saturating_sub(due_words.len()),
            new_words,
            due_words,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Word;
    use chrono::Duration;
    use pretty_assertions::assert_eq;

    fn item(id: &str, srs: SrsState) -> ReviewItem {
        ReviewItem::new(Word::new(id, format!("text-{id}"), format!("meaning-{id}")), srs)
    }

    fn seen(due: DateTime<Utc>) -> SrsState {
        SrsState {
            mastery_level: MasteryLevel::Learning,
            next_review_date: Some(due),
            review_count: 1,
            ..Default::default()
        }
    }

    #[test]
    fn process_updates_state_in_place() {
        let scheduler = SrsScheduler::default();
        let now = Utc::now();
        let mut state = scheduler.initial_state();

        let next = scheduler.process_review_response(&mut state, ResponseQuality::Good, now);
        assert_eq!(state.review_count, 1);
        assert_eq!(state.next_review_date, Some(next));
        assert_eq!(state.last_review_date, Some(now));
        assert_eq!((next - now).num_days(), 1);
    }

    #[test]
    fn again_schedules_shortest_interval() {
        let scheduler = SrsScheduler::default();
        let now = Utc::now();
        let mut state = SrsState {
            mastery_level: MasteryLevel::Familiar,
            repetition: 3,
            interval_days: 20.0,
            ..Default::default()
        };
        let next = scheduler.process_review_response(&mut state, ResponseQuality::Again, now);
        assert_eq!(state.repetition, 0);
        assert_eq!((next - now).num_days(), 1);
    }

    #[test]
    fn suspend_leaves_ease_and_level_alone() {
        let scheduler = SrsScheduler::default();
        let now = Utc::now();
        let mut state = SrsState {
            mastery_level: MasteryLevel::Familiar,
            ease_factor: 2.1,
            ..Default::default()
        };
        let until = scheduler.suspend(&mut state, now);

        assert_eq!((until - now).num_days(), 30);
        assert_eq!(state.next_review_date, Some(until));
        assert_eq!(state.ease_factor, 2.1);
        assert_eq!(state.mastery_level, MasteryLevel::Familiar);
    }

    #[test]
    fn huge_suspend_is_capped() {
        let settings = EngineSettings {
            suspend_days: i64::MAX,
            ..Default::default()
        };
        let scheduler = SrsScheduler::from_settings(&settings);
        let now = Utc::now();
        let mut state = SrsState::default();

        let until = scheduler.suspend(&mut state, now);
        assert_eq!((until - now).num_days(), crate::algorithm::MAX_INTERVAL_DAYS);
    }

    #[test]
    fn daily_queue_caps_new_and_due_independently() {
        let settings = EngineSettings {
            daily_new_word_limit: 2,
            daily_review_limit: 3,
            ..Default::default()
        };
        let scheduler = SrsScheduler::from_settings(&settings);
        let now = Utc::now();

        let mut items = Vec::new();
        for i in 0..5 {
            items.push(item(&format!("new{i}"), SrsState::default()));
        }
        for i in 0..5 {
            items.push(item(&format!("due{i}"), seen(now - Duration::days(i + 1))));
        }
        items.push(item("later", seen(now + Duration::days(2))));

        let queue = scheduler.build_daily_queue(items, now);
        assert_eq!(queue.new_words.len(), 2);
        assert_eq!(queue.due_words.len(), 3);
        assert_eq!(queue.new_remaining, 0);
        assert_eq!(queue.due_remaining, 0);

        let due_ids: Vec<_> = queue.due_words.iter().map(|i| i.word.id.as_str()).collect();
        assert_eq!(due_ids, vec!["due4", "due3", "due2"]);
        assert_eq!(queue.into_workload().len(), 5);
    }

    #[test]
    fn suspended_new_word_stays_out_of_queue() {
        let scheduler = SrsScheduler::default();
        let now = Utc::now();
        let mut state = SrsState::default();
        scheduler.suspend(&mut state, now);

        let queue = scheduler.build_daily_queue(vec![item("w1", state)], now);
        assert!(queue.is_empty());
        assert_eq!(queue.new_remaining, 10);
    }

    #[test]
    fn suspended_review_word_is_not_due() {
        let scheduler = SrsScheduler::default();
        let now = Utc::now();
        let mut state = seen(now - Duration::days(1));
        scheduler.suspend(&mut state, now);

        let queue = scheduler.build_daily_queue(vec![item("w1", state)], now);
        assert!(queue.due_words.is_empty());
    }
}
