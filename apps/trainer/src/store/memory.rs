//! In-process store for tests and throwaway sessions.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use vocab_core::{SrsState, WordMastery};

use super::{MasteryStore, SrsStore};
use crate::error::StoreResult;

#[derive(Debug, Default)]
pub struct MemoryStore {
    mastery: RwLock<HashMap<String, WordMastery>>,
    srs: RwLock<HashMap<String, SrsState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MasteryStore for MemoryStore {
    async fn load_mastery(&self) -> StoreResult<HashMap<String, WordMastery>> {
        Ok(self.mastery.read().await.clone())
    }

    async fn save_mastery(&self, records: &HashMap<String, WordMastery>) -> StoreResult<()> {
        let mut stored = self.mastery.write().await;
        for (word_id, record) in records {
            stored.insert(word_id.clone(), record.clone());
        }
        Ok(())
    }
}

#[async_trait]
impl SrsStore for MemoryStore {
    async fn load_srs_state(&self, word_id: &str) -> StoreResult<Option<SrsState>> {
        Ok(self.srs.read().await.get(word_id).cloned())
    }

    async fn load_all_srs_states(&self) -> StoreResult<HashMap<String, SrsState>> {
        Ok(self.srs.read().await.clone())
    }

    async fn save_srs_state(&self, word_id: &str, state: &SrsState) -> StoreResult<()> {
        self.srs
            .write()
            .await
            .insert(word_id.to_string(), state.clone());
        Ok(())
    }
}
