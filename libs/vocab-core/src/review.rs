//! Flashcard review sessions over a queue of scheduled words.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{EngineError, Result};
use crate::mastery::WordMasteryTracker;
use crate::scheduler::SrsScheduler;
use crate::types::{ResponseQuality, ReviewItem, SrsState, Word};

/// Count of responses per quality bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewTally {
    pub again: u32,
    pub hard: u32,
    pub good: u32,
    pub easy: u32,
}

impl ReviewTally {
    fn add(&mut self, quality: ResponseQuality) {
        match quality {
            ResponseQuality::Again => self.again += 1,
            ResponseQuality::Hard => self.hard += 1,
            ResponseQuality::Good => self.good += 1,
            ResponseQuality::Easy => self.easy += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.again + self.hard + self.good + self.easy
    }
}

/// Result of one recorded review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewOutcome {
    pub word_id: String,
    pub quality: ResponseQuality,
    pub srs: SrsState,
    pub next_review: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewState {
    Active,
    Completed,
}

/// Walks a queue of words, feeding each response to the scheduler and the
/// quiz mastery tracker. A failed recall counts as a wrong answer for the
/// tracker; any other quality counts as a correct one.
#[derive(Debug)]
pub struct ReviewSession {
    id: Uuid,
    items: Vec<ReviewItem>,
    position: usize,
    scheduler: SrsScheduler,
    tracker: WordMasteryTracker,
    tally: ReviewTally,
    /// Set between recording a response and advancing past it.
    reviewed_current: bool,
    state: ReviewState,
}

impl ReviewSession {
    pub fn create(
        items: Vec<ReviewItem>,
        scheduler: SrsScheduler,
        tracker: WordMasteryTracker,
    ) -> Result<Self> {
        if items.is_empty() {
            return Err(EngineError::ContentUnavailable(
                "no words due for review".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            items,
            position: 0,
            scheduler,
            tracker,
            tally: ReviewTally::default(),
            reviewed_current: false,
            state: ReviewState::Active,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> ReviewState {
        self.state
    }

    pub fn is_completed(&self) -> bool {
        self.state == ReviewState::Completed
    }

    pub fn current_item(&self) -> Option<&ReviewItem> {
        match self.state {
            ReviewState::Active => self.items.get(self.position),
            ReviewState::Completed => None,
        }
    }

    pub fn current_word(&self) -> Option<&Word> {
        self.current_item().map(|item| &item.word)
    }

    pub fn items(&self) -> &[ReviewItem] {
        &self.items
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn progress(&self) -> f64 {
        if self.items.is_empty() {
            return 1.0;
        }
        self.position as f64 / self.items.len() as f64
    }

    pub fn tally(&self) -> ReviewTally {
        self.tally
    }

    pub fn tracker(&self) -> &WordMasteryTracker {
        &self.tracker
    }

    pub fn into_tracker(self) -> WordMasteryTracker {
        self.tracker
    }

    /// Move the current word to the back of the queue without reviewing it.
    ///
    /// Returns `false` when there is nothing to skip or the word was already
    /// reviewed and is waiting to be advanced past.
    pub fn skip(&mut self) -> bool {
        if self.state == ReviewState::Completed
            || self.reviewed_current
            || self.position >= self.items.len()
        {
            return false;
        }
        let item = self.items.remove(self.position);
        self.items.push(item);
        true
    }

    /// Review the current word and move on.
    pub fn submit_review(&mut self, quality: ResponseQuality, now: DateTime<Utc>) -> Option<ReviewOutcome> {
        let outcome = self.record_review(quality, now)?;
        self.advance();
        Some(outcome)
    }

    /// Review the current word without advancing. `None` if it was already
    /// reviewed or nothing is left.
    pub fn record_review(&mut self, quality: ResponseQuality, now: DateTime<Utc>) -> Option<ReviewOutcome> {
        if self.state == ReviewState::Completed || self.reviewed_current {
            return None;
        }
        let item = self.items.get_mut(self.position)?;
        let next_review = self
            .scheduler
            .process_review_response(&mut item.srs, quality, now);
        self.tracker.record_answer(&item.word.id, quality.is_pass());
        self.tally.add(quality);
        self.reviewed_current = true;

        Some(ReviewOutcome {
            word_id: item.word.id.clone(),
            quality,
            srs: item.srs.clone(),
            next_review,
        })
    }

    /// Move past a reviewed word. Flips to `Completed` at the end of the queue.
    pub fn advance(&mut self) -> bool {
        if self.state == ReviewState::Completed || !self.reviewed_current {
            return false;
        }
        self.reviewed_current = false;
        self.position += 1;
        if self.position >= self.items.len() {
            self.state = ReviewState::Completed;
            tracing::debug!(session_id = %self.id, reviewed = self.tally.total(), "review session completed");
        }
        true
    }

    /// Stop early.
    pub fn end_session(&mut self) -> ReviewTally {
        self.state = ReviewState::Completed;
        self.reviewed_current = false;
        self.tally
    }
}
