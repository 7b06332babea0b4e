//! Quiz runner tests: auto-advance, cancellation and persistence reporting.

mod common;

use std::time::Duration;

use pretty_assertions::assert_eq;
use vocab_core::{EngineSettings, SessionState};
use vocab_trainer::persist::{PersistTarget, PersistenceReport};
use vocab_trainer::runner::{QuizRunner, SessionEvent};
use vocab_trainer::store::MasteryStore;

use common::fixtures;
use common::TestContext;

async fn correct_answer(runner: &QuizRunner) -> String {
    runner
        .snapshot()
        .await
        .current_question
        .expect("question available")
        .correct_answer()
        .to_string()
}

/// Test an answer is followed by an automatic advance after the delay.
#[tokio::test]
async fn test_answer_auto_advances() {
    let ctx = TestContext::new();
    let session = fixtures::quiz_session(4, 2, &EngineSettings::default());
    let (mut runner, mut events) =
        QuizRunner::new(session, ctx.persister.clone(), Duration::from_millis(20));

    let answer = correct_answer(&runner).await;
    let outcome = runner.answer(&answer, Duration::from_millis(800)).await.unwrap();
    assert!(outcome.is_correct);
    assert_eq!(outcome.session_score, 10);

    assert!(matches!(common::next(&mut events).await, SessionEvent::AnswerRecorded(_)));
    match common::next(&mut events).await {
        SessionEvent::Advanced { position, len, .. } => {
            assert_eq!(position, 1);
            assert_eq!(len, 2);
        }
        other => panic!("expected advance, got {other:?}"),
    }

    let snapshot = runner.snapshot().await;
    assert_eq!(snapshot.position, 1);
    assert!(!snapshot.advance_pending);
}

/// Test a second answer while the advance is pending changes nothing.
#[tokio::test]
async fn test_duplicate_answer_while_pending_is_ignored() {
    let ctx = TestContext::new();
    let session = fixtures::quiz_session(4, 2, &EngineSettings::default());
    let (mut runner, _events) =
        QuizRunner::new(session, ctx.persister.clone(), Duration::from_secs(5));

    let answer = correct_answer(&runner).await;
    assert!(runner.answer(&answer, Duration::ZERO).await.is_some());
    assert!(runner.answer("anything", Duration::ZERO).await.is_none());

    let snapshot = runner.snapshot().await;
    assert_eq!(snapshot.total_score, 10);
    assert_eq!(snapshot.position, 0);
    assert!(snapshot.advance_pending);
}

/// Test ending the session cancels the pending advance.
#[tokio::test]
async fn test_end_session_cancels_pending_advance() {
    let ctx = TestContext::new();
    let session = fixtures::quiz_session(4, 2, &EngineSettings::default());
    let (mut runner, mut events) =
        QuizRunner::new(session, ctx.persister.clone(), Duration::from_millis(100));

    let answer = correct_answer(&runner).await;
    runner.answer(&answer, Duration::ZERO).await.unwrap();
    let summary = runner.end_session().await;
    assert_eq!(summary.correct, 1);
    assert_eq!(summary.answered, 1);

    assert!(matches!(common::next(&mut events).await, SessionEvent::AnswerRecorded(_)));
    assert!(matches!(common::next(&mut events).await, SessionEvent::QuizCompleted(_)));

    tokio::time::sleep(Duration::from_millis(250)).await;
    assert!(events.try_recv().is_err());

    let snapshot = runner.snapshot().await;
    assert_eq!(snapshot.state, SessionState::Completed);
    assert_eq!(snapshot.position, 0);
    assert!(snapshot.current_question.is_none());

    // Ending twice reports once.
    let again = runner.end_session().await;
    assert_eq!(again.ended_at, summary.ended_at);
    assert!(events.try_recv().is_err());
}

/// Test mastering the only word completes the session and persists it.
#[tokio::test]
async fn test_completion_persists_mastery() {
    let mut ctx = TestContext::new();
    let settings = fixtures::one_shot_settings();
    let session = fixtures::quiz_session(4, 1, &settings);
    let (mut runner, mut events) = QuizRunner::new(session, ctx.persister.clone(), Duration::ZERO);

    runner.answer("meaning 0", Duration::from_secs(1)).await.unwrap();

    assert!(matches!(common::next(&mut events).await, SessionEvent::AnswerRecorded(_)));
    match common::next(&mut events).await {
        SessionEvent::QuizCompleted(summary) => {
            assert_eq!(summary.correct, 1);
            assert_eq!(summary.questions_asked, 1);
            assert_eq!(summary.accuracy, 1.0);
        }
        other => panic!("expected completion, got {other:?}"),
    }
    assert!(runner.is_completed().await);

    let reports = common::take(&mut ctx.reports, 2).await;
    assert!(reports
        .iter()
        .all(|r| *r == PersistenceReport::Saved(PersistTarget::Mastery)));

    let stored = ctx.store.load_mastery().await.unwrap();
    assert_eq!(stored["w0"].total_score, 10);
    assert_eq!(stored["w0"].times_correct, 1);
}

/// Test a failed save is reported while the in-memory session keeps its state.
#[tokio::test]
async fn test_failed_save_keeps_state() {
    let (persister, mut reports) = TestContext::failing();
    let session = fixtures::quiz_session(4, 2, &EngineSettings::default());
    let (mut runner, _events) = QuizRunner::new(session, persister, Duration::from_secs(5));

    let answer = correct_answer(&runner).await;
    let outcome = runner.answer(&answer, Duration::ZERO).await.unwrap();
    assert_eq!(outcome.mastery.total_score, 10);

    match common::next(&mut reports).await {
        PersistenceReport::Failed { target, error } => {
            assert_eq!(target, PersistTarget::Mastery);
            assert!(error.contains("disk full"));
        }
        other => panic!("expected failure, got {other:?}"),
    }

    let snapshot = runner.snapshot().await;
    assert_eq!(snapshot.total_score, 10);
    assert_eq!(snapshot.state, SessionState::Active);
}

/// Test a wrong answer keeps the word in rotation through growth.
#[tokio::test]
async fn test_wrong_answer_grows_session() {
    let ctx = TestContext::new();
    let settings = EngineSettings {
        auto_advance_ms: 0,
        ..Default::default()
    };
    let session = fixtures::quiz_session(4, 1, &settings);
    let (mut runner, mut events) = QuizRunner::new(session, ctx.persister.clone(), Duration::ZERO);

    let outcome = runner.answer("not it", Duration::ZERO).await.unwrap();
    assert!(!outcome.is_correct);
    assert_eq!(outcome.correct_answer, "meaning 0");

    assert!(matches!(common::next(&mut events).await, SessionEvent::AnswerRecorded(_)));
    match common::next(&mut events).await {
        SessionEvent::Advanced { position, len, .. } => {
            assert_eq!(position, 1);
            assert_eq!(len, 2);
        }
        other => panic!("expected growth, got {other:?}"),
    }

    // Grown questions ask the other way round.
    let question = runner.snapshot().await.current_question.unwrap();
    assert_eq!(question.prompt(), "meaning 0");
    assert_eq!(question.correct_answer(), "word0");
}
