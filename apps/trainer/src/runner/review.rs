use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{mpsc, Mutex};
use uuid::Uuid;
use vocab_core::{ResponseQuality, ReviewItem, ReviewOutcome, ReviewSession, ReviewState, ReviewTally};

use super::SessionEvent;
use crate::advance::AutoAdvance;
use crate::persist::Persister;

/// Read-only view of a review for presentation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewSnapshot {
    pub session_id: Uuid,
    pub state: ReviewState,
    pub position: usize,
    pub len: usize,
    pub progress: f64,
    pub tally: ReviewTally,
    pub current_item: Option<ReviewItem>,
    pub advance_pending: bool,
}

pub struct ReviewRunner {
    session: Arc<Mutex<ReviewSession>>,
    advance: AutoAdvance,
    persister: Persister,
    events: mpsc::UnboundedSender<SessionEvent>,
}

impl ReviewRunner {
    pub fn new(
        session: ReviewSession,
        persister: Persister,
        auto_advance: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let runner = Self {
            session: Arc::new(Mutex::new(session)),
            advance: AutoAdvance::new(auto_advance),
            persister,
            events,
        };
        (runner, rx)
    }

    /// Grade the current word, persist its schedule and mastery, then
    /// schedule the advance.
    pub async fn submit_review(&mut self, quality: ResponseQuality, now: DateTime<Utc>) -> Option<ReviewOutcome> {
        let outcome = {
            let mut session = self.session.lock().await;
            let outcome = session.record_review(quality, now)?;
            self.persister
                .save_srs_state(outcome.word_id.clone(), outcome.srs.clone());
            self.persister.save_mastery(session.tracker().snapshot());
            outcome
        };
        let _ = self.events.send(SessionEvent::ReviewRecorded(outcome.clone()));

        if self.advance.delay().is_zero() {
            self.advance_now().await;
        } else {
            let session = self.session.clone();
            let persister = self.persister.clone();
            let events = self.events.clone();
            self.advance.schedule(move |token| async move {
                let mut session = session.lock().await;
                if token.is_cancelled() {
                    return;
                }
                advance_locked(&mut session, &persister, &events);
            });
        }
        Some(outcome)
    }

    /// Send the current word to the back of the queue.
    pub async fn skip(&mut self) -> bool {
        let mut session = self.session.lock().await;
        let Some(word_id) = session.current_word().map(|word| word.id.clone()) else {
            return false;
        };
        if !session.skip() {
            return false;
        }
        tracing::debug!(%word_id, "review word skipped");
        let _ = self.events.send(SessionEvent::Skipped { word_id });
        true
    }

    pub async fn advance_now(&mut self) -> bool {
        self.advance.cancel();
        let mut session = self.session.lock().await;
        advance_locked(&mut session, &self.persister, &self.events)
    }

    pub async fn end_session(&mut self) -> ReviewTally {
        self.advance.cancel();
        let mut session = self.session.lock().await;
        let already_completed = session.is_completed();
        let tally = session.end_session();
        if !already_completed {
            finish(&session, &self.persister, &self.events);
        }
        tally
    }

    pub async fn snapshot(&self) -> ReviewSnapshot {
        let session = self.session.lock().await;
        ReviewSnapshot {
            session_id: session.id(),
            state: session.state(),
            position: session.position(),
            len: session.len(),
            progress: session.progress(),
            tally: session.tally(),
            current_item: session.current_item().cloned(),
            advance_pending: self.advance.is_pending(),
        }
    }

    pub async fn is_completed(&self) -> bool {
        self.session.lock().await.is_completed()
    }
}

fn advance_locked(
    session: &mut ReviewSession,
    persister: &Persister,
    events: &mpsc::UnboundedSender<SessionEvent>,
) -> bool {
    if !session.advance() {
        return false;
    }
    if session.is_completed() {
        finish(session, persister, events);
    } else {
        let _ = events.send(SessionEvent::Advanced {
            position: session.position(),
            len: session.len(),
            progress: session.progress(),
        });
    }
    true
}

/// Final save of every reviewed schedule and the mastery map, queued after
/// the per-review saves so the store ends on the session's last state.
fn finish(
    session: &ReviewSession,
    persister: &Persister,
    events: &mpsc::UnboundedSender<SessionEvent>,
) {
    persister.save_mastery(session.tracker().snapshot());
    for item in session.items().iter().filter(|item| item.srs.review_count > 0) {
        persister.save_srs_state(item.word.id.clone(), item.srs.clone());
    }

    let tally = session.tally();
    tracing::info!(
        session_id = %session.id(),
        again = tally.again,
        hard = tally.hard,
        good = tally.good,
        easy = tally.easy,
        "review session finished"
    );
    let _ = events.send(SessionEvent::ReviewCompleted(tally));
}
