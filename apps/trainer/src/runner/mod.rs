//! Async hosts for quiz and review sessions.
//!
//! A runner owns one session, persists its progress in the background and
//! publishes [`SessionEvent`]s for whatever is presenting the session.

pub mod quiz;
pub mod review;

use chrono::{DateTime, Utc};
use vocab_core::{
    AnswerOutcome, EngineSettings, MasteryRules, QuestionBuilder, QuestionDirection, QuizSession,
    ReviewItem, ReviewOutcome, ReviewSession, ReviewTally, SessionOptions, SessionSummary,
    SrsScheduler, WordMasteryTracker,
};

use crate::content::ContentProvider;
use crate::error::Result;
use crate::store::{MasteryStore, SrsStore};

pub use quiz::{QuizRunner, QuizSnapshot};
pub use review::{ReviewRunner, ReviewSnapshot};

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    AnswerRecorded(AnswerOutcome),
    ReviewRecorded(ReviewOutcome),
    Advanced {
        position: usize,
        len: usize,
        progress: f64,
    },
    Skipped {
        word_id: String,
    },
    QuizCompleted(SessionSummary),
    ReviewCompleted(ReviewTally),
}

/// Build a quiz over up to `words_per_session` words not yet mastered.
///
/// The whole candidate list serves as the distractor pool.
pub async fn prepare_quiz(
    content: &dyn ContentProvider,
    mastery: &dyn MasteryStore,
    settings: &EngineSettings,
) -> Result<QuizSession> {
    let words = content.candidate_words().await?;
    let records = mastery.load_mastery().await?;
    let tracker = WordMasteryTracker::from_snapshot(MasteryRules::from(settings), records);

    let mut builder = QuestionBuilder::new(words.clone(), settings.distractor_count);
    let mut chosen: Vec<_> = words
        .into_iter()
        .filter(|word| !tracker.is_mastered(&word.id))
        .collect();
    builder.shuffle(&mut chosen);
    chosen.truncate(settings.words_per_session);

    tracing::info!(
        words = chosen.len(),
        tracked = tracker.len(),
        "preparing quiz session"
    );

    let session = QuizSession::from_words(
        &chosen,
        QuestionDirection::Forward,
        tracker,
        builder,
        SessionOptions::from(settings),
    )?;
    Ok(session)
}

/// Build a review over today's queue: due words first, then new ones.
pub async fn prepare_review(
    content: &dyn ContentProvider,
    mastery: &dyn MasteryStore,
    srs: &dyn SrsStore,
    settings: &EngineSettings,
    now: DateTime<Utc>,
) -> Result<ReviewSession> {
    let words = content.candidate_words().await?;
    let mut states = srs.load_all_srs_states().await?;
    let records = mastery.load_mastery().await?;
    let tracker = WordMasteryTracker::from_snapshot(MasteryRules::from(settings), records);
    let scheduler = SrsScheduler::from_settings(settings);

    let items = words
        .into_iter()
        .map(|word| {
            let srs = states
                .remove(&word.id)
                .unwrap_or_else(|| scheduler.initial_state());
            ReviewItem::new(word, srs)
        })
        .collect();
    let queue = scheduler.build_daily_queue(items, now);

    tracing::info!(
        new = queue.new_words.len(),
        due = queue.due_words.len(),
        new_remaining = queue.new_remaining,
        due_remaining = queue.due_remaining,
        "built daily review queue"
    );

    let session = ReviewSession::create(queue.into_workload(), scheduler, tracker)?;
    Ok(session)
}
