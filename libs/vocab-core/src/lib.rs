//! Adaptive vocabulary mastery engine.
//!
//! Provides:
//! - Per-word quiz mastery scoring
//! - Distractor selection and multiple-choice question building
//! - Quiz sessions that grow until every word is mastered or capped
//! - SM-2 flashcard scheduling and review sessions
//! - Shared types (Word, WordMastery, SrsState, ResponseQuality, etc.)

pub mod algorithm;
pub mod distractor;
pub mod error;
pub mod mastery;
pub mod matching;
pub mod quiz;
pub mod review;
pub mod scheduler;
pub mod types;

pub use algorithm::{get_algorithm, SchedulingResult, SpacedRepetitionAlgorithm, MAX_INTERVAL_DAYS};
pub use distractor::DistractorSelector;
pub use error::{EngineError, Result};
pub use mastery::{MasteryRules, WordMasteryTracker};
pub use matching::{compare_answers, meanings_equivalent, normalize_meaning, MatchResult};
pub use quiz::{
    AnswerOutcome, QuestionBuilder, QuizQuestion, QuizSession, SessionOptions, SessionState,
    SessionSummary,
};
pub use review::{ReviewOutcome, ReviewSession, ReviewState, ReviewTally};
pub use scheduler::SrsScheduler;
pub use types::{
    DailyQueue, DifficultyTier, EngineSettings, MasteryLevel, QuestionDirection, ResponseQuality,
    ReviewItem, SrsState, Word, WordMastery,
};
