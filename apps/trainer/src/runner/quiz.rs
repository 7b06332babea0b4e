use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{mpsc, Mutex};
use uuid::Uuid;
use vocab_core::{AnswerOutcome, QuizQuestion, QuizSession, SessionState, SessionSummary};

use super::SessionEvent;
use crate::advance::AutoAdvance;
use crate::persist::Persister;

/// Read-only view of a quiz for presentation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuizSnapshot {
    pub session_id: Uuid,
    pub state: SessionState,
    pub position: usize,
    pub len: usize,
    pub progress: f64,
    pub total_score: u32,
    pub current_question: Option<QuizQuestion>,
    pub advance_pending: bool,
}

pub struct QuizRunner {
    session: Arc<Mutex<QuizSession>>,
    advance: AutoAdvance,
    persister: Persister,
    events: mpsc::UnboundedSender<SessionEvent>,
}

impl QuizRunner {
    /// Wrap a session. A zero delay advances right after each answer.
    pub fn new(
        session: QuizSession,
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

    /// Record an answer, persist mastery and schedule the advance.
    ///
    /// `None` when the current question was already answered or the session
    /// is over.
    pub async fn answer(&mut self, selected: &str, response_time: Duration) -> Option<AnswerOutcome> {
        let outcome = {
            let mut session = self.session.lock().await;
            let outcome = session.record_answer(selected, response_time)?;
            self.persister.save_mastery(session.tracker().snapshot());
            outcome
        };
        let _ = self.events.send(SessionEvent::AnswerRecorded(outcome.clone()));

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

    /// Skip the remaining auto-advance delay.
    pub async fn advance_now(&mut self) -> bool {
        self.advance.cancel();
        let mut session = self.session.lock().await;
        advance_locked(&mut session, &self.persister, &self.events)
    }

    /// Stop the session. A pending advance is cancelled before it can fire.
    pub async fn end_session(&mut self) -> SessionSummary {
        self.advance.cancel();
        let mut session = self.session.lock().await;
        let already_completed = session.is_completed();
        let summary = session.end_session();
        if !already_completed {
            finish(&session, &summary, &self.persister, &self.events);
        }
        summary
    }

    pub async fn snapshot(&self) -> QuizSnapshot {
        let session = self.session.lock().await;
        QuizSnapshot {
            session_id: session.id(),
            state: session.state(),
            position: session.position(),
            len: session.len(),
            progress: session.progress(),
            total_score: session.total_score(),
            current_question: session.current_question().cloned(),
            advance_pending: self.advance.is_pending(),
        }
    }

    pub async fn is_completed(&self) -> bool {
        self.session.lock().await.is_completed()
    }
}

fn advance_locked(
    session: &mut QuizSession,
    persister: &Persister,
    events: &mpsc::UnboundedSender<SessionEvent>,
) -> bool {
    if !session.advance() {
        return false;
    }
    if session.is_completed() {
        let summary = session.end_session();
        finish(session, &summary, persister, events);
    } else {
        let _ = events.send(SessionEvent::Advanced {
            position: session.position(),
            len: session.len(),
            progress: session.progress(),
        });
    }
    true
}

fn finish(
    session: &QuizSession,
    summary: &SessionSummary,
    persister: &Persister,
    events: &mpsc::UnboundedSender<SessionEvent>,
) {
    tracing::info!(
        session_id = %summary.session_id,
        correct = summary.correct,
        wrong = summary.wrong,
        score = summary.total_score,
        "quiz session finished"
    );
    persister.save_mastery(session.tracker().snapshot());
    let _ = events.send(SessionEvent::QuizCompleted(summary.clone()));
}
