//! Word content sources.

use std::path::PathBuf;

use async_trait::async_trait;
use vocab_core::Word;

use crate::error::{StoreError, StoreResult};

/// Supplies the candidate words sessions are built from.
#[async_trait]
pub trait ContentProvider: Send + Sync {
    async fn candidate_words(&self) -> StoreResult<Vec<Word>>;
}

/// Words read from a JSON array on disk.
///
/// ```json
/// [{ "id": "w1", "text": "perro", "meaning": "dog", "difficulty": "beginner" }]
/// ```
#[derive(Debug, Clone)]
pub struct JsonWordFile {
    path: PathBuf,
}

impl JsonWordFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ContentProvider for JsonWordFile {
    async fn candidate_words(&self) -> StoreResult<Vec<Word>> {
        let raw = tokio::fs::read_to_string(&self.path).await?;
        let words: Vec<Word> = serde_json::from_str(&raw)?;

        if let Some(word) = words.iter().find(|w| w.id.trim().is_empty()) {
            return Err(StoreError::InvalidData(format!(
                "word {:?} has an empty id",
                word.text
            )));
        }

        tracing::info!(path = %self.path.display(), count = words.len(), "loaded word list");
        Ok(words)
    }
}

/// A fixed in-memory word list.
#[derive(Debug, Clone, Default)]
pub struct StaticContent(pub Vec<Word>);

#[async_trait]
impl ContentProvider for StaticContent {
    async fn candidate_words(&self) -> StoreResult<Vec<Word>> {
        Ok(self.0.clone())
    }
}
