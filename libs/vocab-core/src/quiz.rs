//! Multiple-choice quiz sessions that grow until every word is mastered or capped.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::distractor::DistractorSelector;
use crate::error::{EngineError, Result};
use crate::mastery::WordMasteryTracker;
use crate::matching::compare_answers;
use crate::types::{EngineSettings, QuestionDirection, Word, WordMastery};

/// One multiple-choice question. Immutable once answered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizQuestion {
    word: Word,
    direction: QuestionDirection,
    prompt: String,
    correct_answer: String,
    options: Vec<String>,
    selected: Option<String>,
    is_correct: Option<bool>,
    response_time: Option<Duration>,
}

impl QuizQuestion {
    pub fn word(&self) -> &Word {
        &self.word
    }

    pub fn direction(&self) -> QuestionDirection {
        self.direction
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    /// Answer options in display order. Contains the correct answer exactly once.
    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn is_correct(&self) -> Option<bool> {
        self.is_correct
    }

    pub fn response_time(&self) -> Option<Duration> {
        self.response_time
    }

    pub fn is_answered(&self) -> bool {
        self.selected.is_some()
    }

    /// Record the learner's pick. Returns `None` if already answered.
    fn record(&mut self, selected: &str, response_time: Duration) -> Option<bool> {
        if self.is_answered() {
            return None;
        }
        let is_correct = compare_answers(selected, &self.correct_answer).is_correct;
        self.selected = Some(selected.to_string());
        self.is_correct = Some(is_correct);
        self.response_time = Some(response_time);
        Some(is_correct)
    }
}

/// Builds questions for words using distractors drawn from a candidate pool.
#[derive(Debug, Clone)]
pub struct QuestionBuilder {
    pool: Vec<Word>,
    selector: DistractorSelector,
    distractor_count: usize,
}

impl QuestionBuilder {
    pub fn new(pool: Vec<Word>, distractor_count: usize) -> Self {
        Self {
            pool,
            selector: DistractorSelector::new(),
            distractor_count,
        }
    }

    pub fn with_selector(mut self, selector: DistractorSelector) -> Self {
        self.selector = selector;
        self
    }

    pub fn pool(&self) -> &[Word] {
        &self.pool
    }

    /// Build a question with the correct answer shuffled among the distractors.
    pub fn build(&mut self, word: &Word, direction: QuestionDirection) -> QuizQuestion {
        let correct_answer = direction.answer_for(word).to_string();
        let mut options =
            self.selector
                .select(word, &self.pool, self.distractor_count, direction);
        options.push(correct_answer.clone());
        self.selector.shuffle(&mut options);

        QuizQuestion {
            word: word.clone(),
            direction,
            prompt: direction.prompt_for(word).to_string(),
            correct_answer,
            options,
            selected: None,
            is_correct: None,
            response_time: None,
        }
    }

    pub fn build_all(&mut self, words: &[Word], direction: QuestionDirection) -> Vec<QuizQuestion> {
        words.iter().map(|word| self.build(word, direction)).collect()
    }

    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        self.selector.shuffle(items);
    }
}

/// Per-session limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionOptions {
    pub mastery_threshold: u32,
    pub max_questions_per_word: u32,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self::from(&EngineSettings::default())
    }
}

impl From<&EngineSettings> for SessionOptions {
    fn from(settings: &EngineSettings) -> Self {
        Self {
            mastery_threshold: settings.mastery_threshold,
            max_questions_per_word: settings.max_questions_per_word,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Active,
    Completed,
}

/// What happened when an answer was recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerOutcome {
    pub word_id: String,
    pub is_correct: bool,
    pub correct_answer: String,
    pub mastery: WordMastery,
    pub session_score: u32,
}

/// Final counts of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: Uuid,
    pub correct: u32,
    pub wrong: u32,
    pub answered: u32,
    /// `correct / answered`, 0 when nothing was answered.
    pub accuracy: f64,
    pub total_score: u32,
    /// Questions that received an answer. Grown but unanswered ones are left out.
    pub questions_asked: usize,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub duration_ms: i64,
}

/// A quiz session.
///
/// Questions are answered in order. Once the last question is passed, the
/// session appends one more question for every word that is neither mastered
/// nor at its per-word cap; it completes only when that growth step adds
/// nothing. Every answer either raises a word's score or moves it toward the
/// cap, so growth always runs dry.
#[derive(Debug)]
pub struct QuizSession {
    id: Uuid,
    questions: Vec<QuizQuestion>,
    position: usize,
    options: SessionOptions,
    tracker: WordMasteryTracker,
    builder: QuestionBuilder,
    score: u32,
    correct: u32,
    wrong: u32,
    state: SessionState,
    started_at: DateTime<Utc>,
    ended_at: Option<DateTime<Utc>>,
}

impl QuizSession {
    /// Start a session over a shuffled copy of `questions`.
    ///
    /// Questions beyond `max_questions_per_word` for the same word are
    /// dropped. Fails with `ContentUnavailable` when nothing is left.
    pub fn create(
        questions: Vec<QuizQuestion>,
        tracker: WordMasteryTracker,
        mut builder: QuestionBuilder,
        options: SessionOptions,
    ) -> Result<Self> {
        let mut questions = questions;
        builder.shuffle(&mut questions);

        let mut per_word: HashMap<String, u32> = HashMap::new();
        questions.retain(|question| {
            let count = per_word.entry(question.word.id.clone()).or_insert(0);
            *count += 1;
            *count <= options.max_questions_per_word
        });

        if questions.is_empty() {
            return Err(EngineError::ContentUnavailable(
                "no eligible questions for a quiz session".to_string(),
            ));
        }

        let id = Uuid::new_v4();
        tracing::debug!(session_id = %id, questions = questions.len(), "quiz session created");

        Ok(Self {
            id,
            questions,
            position: 0,
            options,
            tracker: tracker.with_threshold(options.mastery_threshold),
            builder,
            score: 0,
            correct: 0,
            wrong: 0,
            state: SessionState::Active,
            started_at: Utc::now(),
            ended_at: None,
        })
    }

    /// Build one question per word and start a session over them.
    pub fn from_words(
        words: &[Word],
        direction: QuestionDirection,
        tracker: WordMasteryTracker,
        mut builder: QuestionBuilder,
        options: SessionOptions,
    ) -> Result<Self> {
        if words.is_empty() {
            return Err(EngineError::ContentUnavailable(
                "no candidate words".to_string(),
            ));
        }
        let questions = builder.build_all(words, direction);
        Self::create(questions, tracker, builder, options)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_completed(&self) -> bool {
        self.state == SessionState::Completed
    }

    pub fn current_question(&self) -> Option<&QuizQuestion> {
        match self.state {
            SessionState::Active => self.questions.get(self.position),
            SessionState::Completed => None,
        }
    }

    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Fraction of questions passed. Recomputed against the current length,
    /// so it can stall or drop after growth.
    pub fn progress(&self) -> f64 {
        if self.questions.is_empty() {
            return 1.0;
        }
        self.position as f64 / self.questions.len() as f64
    }

    pub fn total_score(&self) -> u32 {
        self.score
    }

    pub fn correct_count(&self) -> u32 {
        self.correct
    }

    pub fn wrong_count(&self) -> u32 {
        self.wrong
    }

    pub fn mastery_threshold(&self) -> u32 {
        self.options.mastery_threshold
    }

    pub fn max_questions_per_word(&self) -> u32 {
        self.options.max_questions_per_word
    }

    pub fn tracker(&self) -> &WordMasteryTracker {
        &self.tracker
    }

    /// Hand the tracker back, e.g. to seed the next session.
    pub fn into_tracker(self) -> WordMasteryTracker {
        self.tracker
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    /// How many questions for `word_id` the session holds, answered or not.
    pub fn asked_count(&self, word_id: &str) -> u32 {
        self.questions
            .iter()
            .filter(|question| question.word.id == word_id)
            .count() as u32
    }

    /// Answer the current question and move on.
    ///
    /// Returns `None` without touching anything when there is no current
    /// question or it was already answered.
    pub fn answer(&mut self, selected: &str, response_time: Duration) -> Option<AnswerOutcome> {
        let outcome = self.record_answer(selected, response_time)?;
        self.advance();
        Some(outcome)
    }

    /// Record an answer for the current question without advancing.
    pub fn record_answer(
        &mut self,
        selected: &str,
        response_time: Duration,
    ) -> Option<AnswerOutcome> {
        if self.state == SessionState::Completed {
            return None;
        }
        let question = self.questions.get_mut(self.position)?;
        let is_correct = question.record(selected, response_time)?;
        let word_id = question.word.id.clone();
        let correct_answer = question.correct_answer.clone();

        let rules = self.tracker.rules();
        if is_correct {
            self.correct += 1;
            self.score = self.score.saturating_add(rules.correct_increment);
        } else {
            self.wrong += 1;
            self.score = self.score.saturating_sub(rules.wrong_penalty);
        }
        let mastery = self.tracker.record_answer(&word_id, is_correct);

        Some(AnswerOutcome {
            word_id,
            is_correct,
            correct_answer,
            mastery,
            session_score: self.score,
        })
    }

    /// Move past the current question if it has been answered.
    ///
    /// Runs the growth step when the end of the list is reached. Returns
    /// whether the position moved.
    pub fn advance(&mut self) -> bool {
        if self.state == SessionState::Completed {
            return false;
        }
        match self.questions.get(self.position) {
            Some(question) if question.is_answered() => {}
            _ => return false,
        }

        self.position += 1;
        if self.position >= self.questions.len() && self.grow() == 0 {
            self.state = SessionState::Completed;
            tracing::debug!(session_id = %self.id, questions = self.questions.len(), "quiz session exhausted");
        }
        true
    }

    /// Append one question per word still worth asking. Returns how many were added.
    fn grow(&mut self) -> usize {
        let mut seen = HashSet::new();
        let mut order = Vec::new();
        let mut last_direction: HashMap<&str, QuestionDirection> = HashMap::new();
        let mut counts: HashMap<&str, u32> = HashMap::new();

        for question in &self.questions {
            let id = question.word.id.as_str();
            if seen.insert(id) {
                order.push(&question.word);
            }
            last_direction.insert(id, question.direction);
            *counts.entry(id).or_insert(0) += 1;
        }

        let pending: Vec<(Word, QuestionDirection)> = order
            .into_iter()
            .filter(|word| !self.tracker.is_mastered(&word.id))
            .filter(|word| counts[word.id.as_str()] < self.options.max_questions_per_word)
            .map(|word| {
                let direction = last_direction[word.id.as_str()].flipped();
                (word.clone(), direction)
            })
            .collect();

        let added = pending.len();
        for (word, direction) in pending {
            let question = self.builder.build(&word, direction);
            self.questions.push(question);
        }

        if added > 0 {
            tracing::debug!(session_id = %self.id, added, total = self.questions.len(), "quiz session grew");
        }
        added
    }

    /// Freeze the session and report its totals. Safe to call more than once.
    pub fn end_session(&mut self) -> SessionSummary {
        self.state = SessionState::Completed;
        let ended_at = *self.ended_at.get_or_insert_with(Utc::now);
        self.summary_at(ended_at)
    }

    fn summary_at(&self, ended_at: DateTime<Utc>) -> SessionSummary {
        let answered = self.correct + self.wrong;
        let accuracy = if answered > 0 {
            self.correct as f64 / answered as f64
        } else {
            0.0
        };

        SessionSummary {
            session_id: self.id,
            correct: self.correct,
            wrong: self.wrong,
            answered,
            accuracy,
            total_score: self.score,
            questions_asked: self.questions.iter().filter(|q| q.is_answered()).count(),
            started_at: self.started_at,
            ended_at,
            duration_ms: (ended_at - self.started_at).num_milliseconds(),
        }
    }
}
