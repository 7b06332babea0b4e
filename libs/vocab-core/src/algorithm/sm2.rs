//! SM-2 spaced repetition algorithm.
//!
//! Based on SuperMemo 2 with configurable intervals, ease floor and
//! mastery-level promotion thresholds.

use super::{days_after, SchedulingResult, SpacedRepetitionAlgorithm, MAX_INTERVAL_DAYS};
use crate::types::{EngineSettings, MasteryLevel, ResponseQuality, SrsState};
use chrono::{DateTime, Utc};

/// SM-2 algorithm with configurable parameters.
#[derive(Debug, Clone)]
pub struct Sm2 {
    pub initial_ease: f64,
    pub minimum_ease: f64,
    /// Interval after a failed recall.
    pub relapse_interval_days: f64,
    pub first_interval_days: f64,
    pub second_interval_days: f64,
    /// Upper bound on any interval.
    pub maximum_interval_days: f64,
    /// Successful repetitions needed to reach `Familiar`.
    pub familiar_repetitions: u32,
    /// Successful repetitions needed to reach `Mastered`.
    pub mastered_repetitions: u32,
    pub mastered_min_ease: f64,
}

impl Default for Sm2 {
    fn default() -> Self {
        Self {
            initial_ease: 2.5,
            minimum_ease: 1.3,
            relapse_interval_days: 1.0,
            first_interval_days: 1.0,
            second_interval_days: 6.0,
            maximum_interval_days: MAX_INTERVAL_DAYS as f64,
            familiar_repetitions: 2,
            mastered_repetitions: 4,
            mastered_min_ease: 2.5,
        }
    }
}

impl From<&EngineSettings> for Sm2 {
    fn from(settings: &EngineSettings) -> Self {
        Self {
            minimum_ease: settings.ease_factor_floor,
            ..Self::default()
        }
    }
}

impl SpacedRepetitionAlgorithm for Sm2 {
    fn name(&self) -> &'static str {
        "sm2"
    }

    fn initial_state(&self) -> SrsState {
        SrsState {
            ease_factor: self.initial_ease,
            ..SrsState::default()
        }
    }

    fn schedule(&self, state: &SrsState, quality: ResponseQuality, now: DateTime<Utc>) -> SchedulingResult {
        let new_ease = self.adjust_ease(state.ease_factor, quality);

        let (repetition, interval, lapses) = if quality.is_pass() {
            let repetition = state.repetition + 1;
            let interval = match repetition {
                1 => self.first_interval_days,
                2 => self.second_interval_days,
                _ => (state.interval_days * new_ease)
                    .round()
                    .max(1.0)
                    .min(self.maximum_interval_days),
            };
            (repetition, interval, state.lapses)
        } else {
            (0, self.relapse_interval_days, state.lapses + 1)
        };

        let next_review = days_after(now, interval.round() as i64);
        let mastery_level = self.promote(state.mastery_level, repetition, new_ease);

        SchedulingResult {
            new_state: SrsState {
                mastery_level,
                ease_factor: new_ease,
                repetition,
                interval_days: interval,
                review_count: state.review_count + 1,
                lapses,
                next_review_date: Some(next_review),
                last_review_date: Some(now),
            },
            next_review,
        }
    }
}

impl Sm2 {
    /// Standard SM-2 ease update, clamped to `minimum_ease`.
    fn adjust_ease(&self, ease: f64, quality: ResponseQuality) -> f64 {
        let miss = 5.0 - f64::from(quality.sm2_grade());
        let adjusted = ease + (0.1 - miss * (0.08 + miss * 0.02));
        adjusted.max(self.minimum_ease)
    }

    /// Levels only move up; a lapse resets the interval, not the level.
    fn promote(&self, current: MasteryLevel, repetition: u32, ease: f64) -> MasteryLevel {
        let earned = if repetition >= self.mastered_repetitions && ease >= self.mastered_min_ease {
            MasteryLevel::Mastered
        } else if repetition >= self.familiar_repetitions {
            MasteryLevel::Familiar
        } else {
            MasteryLevel::Learning
        };
        current.max(earned)
    }
}
