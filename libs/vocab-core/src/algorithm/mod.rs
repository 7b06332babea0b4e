//! Spaced repetition algorithm implementations.

pub mod sm2;

use crate::types::{ResponseQuality, SrsState};
use chrono::{DateTime, Duration, Utc};

/// Longest gap any schedule or suspension may produce, about a century.
pub const MAX_INTERVAL_DAYS: i64 = 36_500;

/// `now` plus `days`, with `days` clamped to `0..=MAX_INTERVAL_DAYS`.
pub fn days_after(now: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    let days = days.clamp(0, MAX_INTERVAL_DAYS);
    now.checked_add_signed(Duration::days(days))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Result of scheduling a word after review.
#[derive(Debug, Clone)]
pub struct SchedulingResult {
    pub new_state: SrsState,
    pub next_review: DateTime<Utc>,
}

/// Trait for spaced repetition algorithms.
pub trait SpacedRepetitionAlgorithm: Send + Sync {
    /// Algorithm identifier.
    fn name(&self) -> &'static str;

    /// Calculate next review state after a review.
    fn schedule(&self, state: &SrsState, quality: ResponseQuality, now: DateTime<Utc>) -> SchedulingResult;

    /// Initial state for a word never reviewed.
    fn initial_state(&self) -> SrsState;
}

/// Get algorithm by name.
pub fn get_algorithm(name: &str) -> Option<Box<dyn SpacedRepetitionAlgorithm>> {
    match name {
        "sm2" => Some(Box::new(sm2::Sm2::default())),
        _ => None,
    }
}
