//! SQLite-backed store.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use vocab_core::{MasteryLevel, SrsState, WordMastery};

use super::schema::{SCHEMA, SCHEMA_VERSION};
use super::{MasteryStore, SrsStore};
use crate::error::{StoreError, StoreResult};

/// SQLite implementation of the mastery and SRS stores.
///
/// The connection is shared behind a mutex; every query runs on the
/// blocking thread pool.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open database at path, creating it and its directory if necessary.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        Self::initialize(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open in-memory database (for testing).
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::initialize(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn initialize(conn: &Connection) -> StoreResult<()> {
        conn.execute_batch(SCHEMA)?;
        conn.execute(
            "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
            params![SCHEMA_VERSION],
        )?;
        Ok(())
    }

    pub async fn schema_version(&self) -> StoreResult<i32> {
        self.with_conn(|conn| {
            let version = conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
            Ok(version)
        })
        .await
    }

    async fn with_conn<T, F>(&self, f: F) -> StoreResult<T>
    where
        F: FnOnce(&mut Connection) -> StoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let mut guard = conn.lock().map_err(|_| StoreError::LockPoisoned)?;
            f(&mut guard)
        })
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?
    }

    fn row_to_mastery(row: &rusqlite::Row) -> rusqlite::Result<WordMastery> {
        Ok(WordMastery {
            word_id: row.get(0)?,
            total_score: row.get(1)?,
            correct_streak: row.get(2)?,
            wrong_streak: row.get(3)?,
            times_asked: row.get(4)?,
            times_correct: row.get(5)?,
            times_wrong: row.get(6)?,
            is_mastered: false,
        })
    }

    fn row_to_srs(row: &rusqlite::Row) -> rusqlite::Result<SrsRow> {
        Ok(SrsRow {
            word_id: row.get(0)?,
            mastery_level: row.get(1)?,
            ease_factor: row.get(2)?,
            repetition: row.get(3)?,
            interval_days: row.get(4)?,
            review_count: row.get(5)?,
            lapses: row.get(6)?,
            next_review_date: row.get(7)?,
            last_review_date: row.get(8)?,
        })
    }
}

/// An `srs_states` row as stored, before its text columns are parsed.
struct SrsRow {
    word_id: String,
    mastery_level: String,
    ease_factor: f64,
    repetition: u32,
    interval_days: f64,
    review_count: u32,
    lapses: u32,
    next_review_date: Option<String>,
    last_review_date: Option<String>,
}

impl SrsRow {
    /// Unknown levels and unreadable timestamps are `InvalidData`.
    fn into_state(self) -> StoreResult<(String, SrsState)> {
        let word_id = self.word_id;
        let mastery_level = MasteryLevel::from_str(&self.mastery_level).ok_or_else(|| {
            invalid_row(&word_id, format!("unknown mastery level {:?}", self.mastery_level))
        })?;
        let next_review_date = parse_optional_timestamp(&word_id, "next_review_date", self.next_review_date)?;
        let last_review_date = parse_optional_timestamp(&word_id, "last_review_date", self.last_review_date)?;

        let state = SrsState {
            mastery_level,
            ease_factor: self.ease_factor,
            repetition: self.repetition,
            interval_days: self.interval_days,
            review_count: self.review_count,
            lapses: self.lapses,
            next_review_date,
            last_review_date,
        };
        Ok((word_id, state))
    }
}

fn invalid_row(word_id: &str, detail: String) -> StoreError {
    tracing::warn!(%word_id, %detail, "corrupt srs row");
    StoreError::InvalidData(format!("srs state for {word_id}: {detail}"))
}

fn parse_optional_timestamp(
    word_id: &str,
    column: &str,
    value: Option<String>,
) -> StoreResult<Option<DateTime<Utc>>> {
    value
        .map(|s| {
            DateTime::parse_from_rfc3339(&s)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| invalid_row(word_id, format!("bad {column} {s:?}: {e}")))
        })
        .transpose()
}

const SRS_COLUMNS: &str = "word_id, mastery_level, ease_factor, repetition, interval_days, review_count, lapses, next_review_date, last_review_date";

#[async_trait]
impl MasteryStore for SqliteStore {
    async fn load_mastery(&self) -> StoreResult<HashMap<String, WordMastery>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT word_id, total_score, correct_streak, wrong_streak, times_asked, times_correct, times_wrong FROM word_mastery",
            )?;
            let records = stmt
                .query_map([], Self::row_to_mastery)?
                .map(|row| row.map(|record| (record.word_id.clone(), record)))
                .collect::<std::result::Result<HashMap<_, _>, _>>()?;
            Ok(records)
        })
        .await
    }

    async fn save_mastery(&self, records: &HashMap<String, WordMastery>) -> StoreResult<()> {
        let records: Vec<WordMastery> = records.values().cloned().collect();
        self.with_conn(move |conn| {
            let now = Utc::now().to_rfc3339();
            let tx = conn.transaction()?;
            for record in &records {
                tx.execute(
                    "INSERT OR REPLACE INTO word_mastery (word_id, total_score, correct_streak, wrong_streak, times_asked, times_correct, times_wrong, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                    params![
                        record.word_id,
                        record.total_score,
                        record.correct_streak,
                        record.wrong_streak,
                        record.times_asked,
                        record.times_correct,
                        record.times_wrong,
                        now
                    ],
                )?;
            }
            tx.commit()?;
            tracing::debug!(count = records.len(), "mastery saved");
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl SrsStore for SqliteStore {
    async fn load_srs_state(&self, word_id: &str) -> StoreResult<Option<SrsState>> {
        let word_id = word_id.to_string();
        self.with_conn(move |conn| {
            let state = conn
                .query_row(
                    &format!("SELECT {SRS_COLUMNS} FROM srs_states WHERE word_id = ?1"),
                    params![word_id],
                    Self::row_to_srs,
                )
                .optional()?;
            state
                .map(|row| row.into_state().map(|(_, state)| state))
                .transpose()
        })
        .await
    }

    async fn load_all_srs_states(&self) -> StoreResult<HashMap<String, SrsState>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!("SELECT {SRS_COLUMNS} FROM srs_states"))?;
            let rows = stmt
                .query_map([], Self::row_to_srs)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            rows.into_iter().map(SrsRow::into_state).collect()
        })
        .await
    }

    async fn save_srs_state(&self, word_id: &str, state: &SrsState) -> StoreResult<()> {
        if !state.ease_factor.is_finite() {
            return Err(StoreError::InvalidData(format!(
                "ease factor for {word_id} is not finite"
            )));
        }
        let word_id = word_id.to_string();
        let state = state.clone();
        self.with_conn(move |conn| {
            conn.execute(
                &format!("INSERT OR REPLACE INTO srs_states ({SRS_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"),
                params![
                    word_id,
                    state.mastery_level.as_str(),
                    state.ease_factor,
                    state.repetition,
                    state.interval_days,
                    state.review_count,
                    state.lapses,
                    state.next_review_date.map(|d| d.to_rfc3339()),
                    state.last_review_date.map(|d| d.to_rfc3339()),
                ],
            )?;
            Ok(())
        })
        .await
    }
}
