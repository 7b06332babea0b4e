//! Background persistence with failure reporting.
//!
//! Saves are queued to a single writer task and applied in the order they
//! were requested, so a newer snapshot is never overwritten by an older one.
//! The session never waits on storage. A failed save is logged and reported
//! on the channel returned by [`Persister::new`]; in-memory state is kept as
//! it is and the next successful save reconciles the store.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc;
use vocab_core::{SrsState, WordMastery};

use crate::store::{MasteryStore, SrsStore};

/// What a save was writing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistTarget {
    Mastery,
    Srs { word_id: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceReport {
    Saved(PersistTarget),
    Failed { target: PersistTarget, error: String },
}

#[derive(Debug)]
enum SaveJob {
    Mastery(HashMap<String, WordMastery>),
    Srs { word_id: String, state: SrsState },
}

/// Handle to the writer task. Clones share the same queue; the writer stops
/// once every clone is dropped and the queue is drained.
#[derive(Clone)]
pub struct Persister {
    jobs: mpsc::UnboundedSender<SaveJob>,
}

impl Persister {
    /// Spawn the writer. Must be called inside a Tokio runtime.
    pub fn new(
        mastery: Arc<dyn MasteryStore>,
        srs: Arc<dyn SrsStore>,
    ) -> (Self, mpsc::UnboundedReceiver<PersistenceReport>) {
        let (jobs, queue) = mpsc::unbounded_channel();
        let (reports, rx) = mpsc::unbounded_channel();
        tokio::spawn(write_loop(queue, mastery, srs, reports));
        (Self { jobs }, rx)
    }

    pub fn save_mastery(&self, records: HashMap<String, WordMastery>) {
        self.enqueue(SaveJob::Mastery(records));
    }

    pub fn save_srs_state(&self, word_id: String, state: SrsState) {
        self.enqueue(SaveJob::Srs { word_id, state });
    }

    fn enqueue(&self, job: SaveJob) {
        if self.jobs.send(job).is_err() {
            tracing::warn!("persistence writer has stopped, save dropped");
        }
    }
}

async fn write_loop(
    mut queue: mpsc::UnboundedReceiver<SaveJob>,
    mastery: Arc<dyn MasteryStore>,
    srs: Arc<dyn SrsStore>,
    reports: mpsc::UnboundedSender<PersistenceReport>,
) {
    while let Some(job) = queue.recv().await {
        let (target, result) = match job {
            SaveJob::Mastery(records) => (
                PersistTarget::Mastery,
                mastery.save_mastery(&records).await,
            ),
            SaveJob::Srs { word_id, state } => {
                let result = srs.save_srs_state(&word_id, &state).await;
                (PersistTarget::Srs { word_id }, result)
            }
        };

        let report = match result {
            Ok(()) => PersistenceReport::Saved(target),
            Err(e) => {
                let error = e.to_string();
                tracing::warn!(?target, %error, "failed to persist state");
                PersistenceReport::Failed { target, error }
            }
        };
        // Nobody listening is fine.
        let _ = reports.send(report);
    }
    tracing::debug!("persistence writer stopped");
}
