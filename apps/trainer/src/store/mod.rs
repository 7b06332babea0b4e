//! Persistence interfaces and their implementations.

pub mod memory;
pub mod schema;
pub mod sqlite;

use std::collections::HashMap;

use async_trait::async_trait;
use vocab_core::{SrsState, WordMastery};

use crate::error::StoreResult;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Storage for quiz mastery records.
///
/// Saves are idempotent upserts keyed by word id. Loaded records carry
/// `is_mastered = false`; the tracker re-derives it against its threshold.
#[async_trait]
pub trait MasteryStore: Send + Sync {
    async fn load_mastery(&self) -> StoreResult<HashMap<String, WordMastery>>;
    async fn save_mastery(&self, records: &HashMap<String, WordMastery>) -> StoreResult<()>;
}

/// Storage for per-word spaced repetition state.
#[async_trait]
pub trait SrsStore: Send + Sync {
    async fn load_srs_state(&self, word_id: &str) -> StoreResult<Option<SrsState>>;
    async fn load_all_srs_states(&self) -> StoreResult<HashMap<String, SrsState>>;
    async fn save_srs_state(&self, word_id: &str, state: &SrsState) -> StoreResult<()>;
}
