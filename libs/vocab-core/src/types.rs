//! Core types for the vocabulary engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Difficulty tier assigned by the content provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyTier {
    Beginner,
    Intermediate,
    Advanced,
}

impl Default for DifficultyTier {
    fn default() -> Self {
        Self::Beginner
    }
}

/// A vocabulary entry. Owned by the content provider; the engine only reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    pub id: String,
    /// Primary-language text.
    pub text: String,
    /// Target-language meaning.
    pub meaning: String,
    #[serde(default)]
    pub difficulty: DifficultyTier,
}

impl Word {
    pub fn new(id: impl Into<String>, text: impl Into<String>, meaning: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            meaning: meaning.into(),
            difficulty: DifficultyTier::default(),
        }
    }

    pub fn with_difficulty(mut self, difficulty: DifficultyTier) -> Self {
        self.difficulty = difficulty;
        self
    }
}

/// Which side of a word a question asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionDirection {
    /// Show the text, pick the meaning.
    Forward,
    /// Show the meaning, pick the text.
    Reverse,
}

impl Default for QuestionDirection {
    fn default() -> Self {
        Self::Forward
    }
}

impl QuestionDirection {
    /// The text shown to the learner.
    pub fn prompt_for<'a>(&self, word: &'a Word) -> &'a str {
        match self {
            Self::Forward => &word.text,
            Self::Reverse => &word.meaning,
        }
    }

    /// The text the learner has to pick.
    pub fn answer_for<'a>(&self, word: &'a Word) -> &'a str {
        match self {
            Self::Forward => &word.meaning,
            Self::Reverse => &word.text,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Self::Forward => Self::Reverse,
            Self::Reverse => Self::Forward,
        }
    }
}

/// Per-word quiz mastery record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordMastery {
    pub word_id: String,
    pub total_score: u32,
    pub correct_streak: u32,
    pub wrong_streak: u32,
    pub times_asked: u32,
    pub times_correct: u32,
    pub times_wrong: u32,
    /// Derived from `total_score` and the tracker's threshold.
    pub is_mastered: bool,
}

impl WordMastery {
    pub fn new(word_id: impl Into<String>) -> Self {
        Self {
            word_id: word_id.into(),
            total_score: 0,
            correct_streak: 0,
            wrong_streak: 0,
            times_asked: 0,
            times_correct: 0,
            times_wrong: 0,
            is_mastered: false,
        }
    }
}

/// Response quality for a flashcard review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseQuality {
    Again,
    Hard,
    Good,
    Easy,
}

impl ResponseQuality {
    /// Convert to the 4-point button value (1-4).
    pub fn to_value(self) -> u8 {
        match self {
            Self::Again => 1,
            Self::Hard => 2,
            Self::Good => 3,
            Self::Easy => 4,
        }
    }

    /// Create from the 4-point button value.
    pub fn from_value(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Again),
            2 => Some(Self::Hard),
            3 => Some(Self::Good),
            4 => Some(Self::Easy),
            _ => None,
        }
    }

    /// SM-2 recall grade on the 0-5 scale.
    pub fn sm2_grade(self) -> u8 {
        match self {
            Self::Again => 1,
            Self::Hard => 3,
            Self::Good => 4,
            Self::Easy => 5,
        }
    }

    /// Whether the review counts as a successful recall.
    pub fn is_pass(self) -> bool {
        !matches!(self, Self::Again)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Again => "again",
            Self::Hard => "hard",
            Self::Good => "good",
            Self::Easy => "easy",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "again" => Some(Self::Again),
            "hard" => Some(Self::Hard),
            "good" => Some(Self::Good),
            "easy" => Some(Self::Easy),
            _ => None,
        }
    }
}

/// Spaced-repetition learning stage of a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MasteryLevel {
    New,
    Learning,
    Familiar,
    Mastered,
}

impl Default for MasteryLevel {
    fn default() -> Self {
        Self::New
    }
}

impl MasteryLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Learning => "learning",
            Self::Familiar => "familiar",
            Self::Mastered => "mastered",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "new" => Some(Self::New),
            "learning" => Some(Self::Learning),
            "familiar" => Some(Self::Familiar),
            // older rows used "known" for the top level
            "mastered" | "known" => Some(Self::Mastered),
            _ => None,
        }
    }
}

/// SRS fields of a word, stored keyed by word id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SrsState {
    pub mastery_level: MasteryLevel,
    pub ease_factor: f64,
    /// Consecutive successful reviews since the last lapse.
    pub repetition: u32,
    pub interval_days: f64,
    pub review_count: u32,
    pub lapses: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_review_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_review_date: Option<DateTime<Utc>>,
}

impl Default for SrsState {
    fn default() -> Self {
        Self {
            mastery_level: MasteryLevel::New,
            ease_factor: 2.5,
            repetition: 0,
            interval_days: 0.0,
            review_count: 0,
            lapses: 0,
            next_review_date: None,
            last_review_date: None,
        }
    }
}

impl SrsState {
    /// Whether the word is due at `now`. New words without a date are never "due".
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review_date.map_or(false, |date| date <= now)
    }
}

/// A word paired with its scheduling state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewItem {
    pub word: Word,
    pub srs: SrsState,
}

impl ReviewItem {
    pub fn new(word: Word, srs: SrsState) -> Self {
        Self { word, srs }
    }
}

/// A day's flashcard workload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyQueue {
    pub new_words: Vec<ReviewItem>,
    pub due_words: Vec<ReviewItem>,
    pub new_remaining: usize,
    pub due_remaining: usize,
}

impl DailyQueue {
    /// Combined workload, due reviews first.
    pub fn into_workload(self) -> Vec<ReviewItem> {
        let mut items = self.due_words;
        items.extend(self.new_words);
        items
    }

    pub fn len(&self) -> usize {
        self.new_words.len() + self.due_words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub mastery_threshold: u32,
    pub max_questions_per_word: u32,
    /// Distinct words drawn into a new quiz session.
    pub words_per_session: usize,
    pub correct_increment: u32,
    pub wrong_penalty: u32,
    pub distractor_count: usize,
    pub daily_new_word_limit: usize,
    pub daily_review_limit: usize,
    pub ease_factor_floor: f64,
    pub suspend_days: i64,
    pub auto_advance_ms: u64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            mastery_threshold: 100,
            max_questions_per_word: 5,
            words_per_session: 10,
            correct_increment: 10,
            wrong_penalty: 20,
            distractor_count: 3,
            daily_new_word_limit: 10,
            daily_review_limit: 50,
            ease_factor_floor: 1.3,
            suspend_days: 30,
            auto_advance_ms: 1500,
        }
    }
}
