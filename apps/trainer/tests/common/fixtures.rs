//! Test fixtures and factory functions for creating sessions.

use vocab_core::{
    DistractorSelector, EngineSettings, MasteryRules, QuestionBuilder, QuestionDirection,
    QuizSession, ReviewItem, ReviewSession, SessionOptions, SrsScheduler, SrsState, Word,
    WordMasteryTracker,
};

/// Generate `n` words with ids `w0..`, texts `word0..` and meanings `meaning 0..`.
pub fn sample_words(n: usize) -> Vec<Word> {
    (0..n)
        .map(|i| Word::new(format!("w{i}"), format!("word{i}"), format!("meaning {i}")))
        .collect()
}

/// Settings where a single correct answer masters a word.
pub fn one_shot_settings() -> EngineSettings {
    EngineSettings {
        mastery_threshold: 10,
        auto_advance_ms: 0,
        ..Default::default()
    }
}

/// Quiz over the first `session_words` of a `pool_size` word pool with a
/// seeded distractor selector.
pub fn quiz_session(pool_size: usize, session_words: usize, settings: &EngineSettings) -> QuizSession {
    let pool = sample_words(pool_size);
    let builder = QuestionBuilder::new(pool.clone(), settings.distractor_count)
        .with_selector(DistractorSelector::seeded(7));
    QuizSession::from_words(
        &pool[..session_words],
        QuestionDirection::Forward,
        WordMasteryTracker::new(MasteryRules::from(settings)),
        builder,
        SessionOptions::from(settings),
    )
    .expect("fixture session has words")
}

/// Review over `n` fresh words, in id order.
pub fn review_session(n: usize) -> ReviewSession {
    let items = sample_words(n)
        .into_iter()
        .map(|word| ReviewItem::new(word, SrsState::default()))
        .collect();
    ReviewSession::create(items, SrsScheduler::default(), WordMasteryTracker::default())
        .expect("fixture review has words")
}
