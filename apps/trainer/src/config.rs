//! Runtime configuration loaded from the environment.
//!
//! Recognized variables (all optional):
//! - `VOCAB_MASTERY_THRESHOLD`, `VOCAB_MAX_QUESTIONS_PER_WORD`, `VOCAB_WORDS_PER_SESSION`
//! - `VOCAB_CORRECT_INCREMENT`, `VOCAB_WRONG_PENALTY`, `VOCAB_DISTRACTOR_COUNT`
//! - `VOCAB_DAILY_NEW_WORD_LIMIT`, `VOCAB_DAILY_REVIEW_LIMIT`
//! - `VOCAB_EASE_FACTOR_FLOOR`, `VOCAB_SUSPEND_DAYS`, `VOCAB_AUTO_ADVANCE_MS`
//! - `VOCAB_DB_PATH`, `VOCAB_WORDS_FILE`, `RUST_LOG`

use std::path::PathBuf;
use std::str::FromStr;

use vocab_core::{EngineSettings, MAX_INTERVAL_DAYS};

use crate::error::ConfigError;

#[derive(Debug, Clone)]
pub struct Config {
    pub engine: EngineSettings,
    pub db_path: PathBuf,
    pub words_path: Option<PathBuf>,
    pub log_filter: String,
}

impl Config {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = EngineSettings::default();
        let engine = EngineSettings {
            mastery_threshold: parse_var(&lookup, "VOCAB_MASTERY_THRESHOLD", defaults.mastery_threshold)?,
            max_questions_per_word: parse_var(
                &lookup,
                "VOCAB_MAX_QUESTIONS_PER_WORD",
                defaults.max_questions_per_word,
            )?,
            words_per_session: parse_var(&lookup, "VOCAB_WORDS_PER_SESSION", defaults.words_per_session)?,
            correct_increment: parse_var(&lookup, "VOCAB_CORRECT_INCREMENT", defaults.correct_increment)?,
            wrong_penalty: parse_var(&lookup, "VOCAB_WRONG_PENALTY", defaults.wrong_penalty)?,
            distractor_count: parse_var(&lookup, "VOCAB_DISTRACTOR_COUNT", defaults.distractor_count)?,
            daily_new_word_limit: parse_var(
                &lookup,
                "VOCAB_DAILY_NEW_WORD_LIMIT",
                defaults.daily_new_word_limit,
            )?,
            daily_review_limit: parse_var(&lookup, "VOCAB_DAILY_REVIEW_LIMIT", defaults.daily_review_limit)?,
            ease_factor_floor: parse_var(&lookup, "VOCAB_EASE_FACTOR_FLOOR", defaults.ease_factor_floor)?,
            suspend_days: parse_var(&lookup, "VOCAB_SUSPEND_DAYS", defaults.suspend_days)?,
            auto_advance_ms: parse_var(&lookup, "VOCAB_AUTO_ADVANCE_MS", defaults.auto_advance_ms)?,
        };
        validate(&engine)?;

        let db_path = lookup("VOCAB_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(default_db_path);
        let words_path = lookup("VOCAB_WORDS_FILE").map(PathBuf::from);
        let log_filter = lookup("RUST_LOG").unwrap_or_else(|| "info".to_string());

        Ok(Self {
            engine,
            db_path,
            words_path,
            log_filter,
        })
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
            key: key.to_string(),
            value: raw,
        }),
        None => Ok(default),
    }
}

fn validate(engine: &EngineSettings) -> Result<(), ConfigError> {
    if engine.mastery_threshold == 0 {
        return Err(ConfigError::OutOfRange("mastery threshold must be positive".to_string()));
    }
    if engine.max_questions_per_word == 0 {
        return Err(ConfigError::OutOfRange(
            "max questions per word must be at least 1".to_string(),
        ));
    }
    if engine.words_per_session == 0 {
        return Err(ConfigError::OutOfRange("words per session must be at least 1".to_string()));
    }
    if !(engine.ease_factor_floor > 0.0) {
        return Err(ConfigError::OutOfRange("ease factor floor must be positive".to_string()));
    }
    if !(0..=MAX_INTERVAL_DAYS).contains(&engine.suspend_days) {
        return Err(ConfigError::OutOfRange(format!(
            "suspend days must be between 0 and {MAX_INTERVAL_DAYS}"
        )));
    }
    Ok(())
}

fn default_db_path() -> PathBuf {
    // Use the local data directory, fallback to current dir
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("vocab-trainer")
        .join("vocab.db")
}
