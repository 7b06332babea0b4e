//! Common test utilities for the trainer integration tests.
//!
//! Provides a store that always fails, a context wiring an in-memory store
//! into a persister, and helpers for waiting on channel messages.

#![allow(dead_code)]

pub mod fixtures;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;

use vocab_core::{SrsState, WordMastery};
use vocab_trainer::error::{StoreError, StoreResult};
use vocab_trainer::persist::{PersistenceReport, Persister};
use vocab_trainer::store::{MasteryStore, MemoryStore, SrsStore};

/// How long a test waits for a single message before giving up.
pub const RECV_TIMEOUT: Duration = Duration::from_secs(2);

/// Store whose every write fails.
#[derive(Debug, Default)]
pub struct FailingStore;

#[async_trait]
impl MasteryStore for FailingStore {
    async fn load_mastery(&self) -> StoreResult<HashMap<String, WordMastery>> {
        Ok(HashMap::new())
    }

    async fn save_mastery(&self, _records: &HashMap<String, WordMastery>) -> StoreResult<()> {
        Err(StoreError::InvalidData("disk full".to_string()))
    }
}

#[async_trait]
impl SrsStore for FailingStore {
    async fn load_srs_state(&self, _word_id: &str) -> StoreResult<Option<SrsState>> {
        Ok(None)
    }

    async fn load_all_srs_states(&self) -> StoreResult<HashMap<String, SrsState>> {
        Ok(HashMap::new())
    }

    async fn save_srs_state(&self, _word_id: &str, _state: &SrsState) -> StoreResult<()> {
        Err(StoreError::InvalidData("disk full".to_string()))
    }
}

/// In-memory store plus a persister writing to it.
pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub persister: Persister,
    pub reports: mpsc::UnboundedReceiver<PersistenceReport>,
}

impl TestContext {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let (persister, reports) = Persister::new(store.clone(), store.clone());
        Self {
            store,
            persister,
            reports,
        }
    }

    /// Context whose saves all fail.
    pub fn failing() -> (Persister, mpsc::UnboundedReceiver<PersistenceReport>) {
        let store = Arc::new(FailingStore);
        Persister::new(store.clone(), store)
    }
}

/// Wait for the next message.
///
/// # Panics
/// Panics if nothing arrives within [`RECV_TIMEOUT`] or the channel closed.
pub async fn next<T>(rx: &mut mpsc::UnboundedReceiver<T>) -> T {
    tokio::time::timeout(RECV_TIMEOUT, rx.recv())
        .await
        .expect("timed out waiting for message")
        .expect("channel closed")
}

/// Wait for `n` messages, in arrival order.
pub async fn take<T>(rx: &mut mpsc::UnboundedReceiver<T>, n: usize) -> Vec<T> {
    let mut out = Vec::with_capacity(n);
    for _ in 0..n {
        out.push(next(rx).await);
    }
    out
}
