pub mod advance;
pub mod config;
pub mod content;
pub mod error;
pub mod persist;
pub mod runner;
pub mod store;
pub mod terminal;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::content::JsonWordFile;
use crate::persist::{Persister, PersistenceReport};
use crate::runner::{QuizRunner, ReviewRunner};
use crate::store::SqliteStore;

/// Session kind picked on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Quiz,
    Review,
}

impl Mode {
    pub fn from_arg(arg: Option<&str>) -> Option<Self> {
        match arg.unwrap_or("quiz") {
            "quiz" => Some(Mode::Quiz),
            "review" => Some(Mode::Review),
            _ => None,
        }
    }
}

pub fn init_tracing(filter: &str) {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

pub async fn run() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_tracing(&config.log_filter);

    let arg = std::env::args().nth(1);
    let mode = Mode::from_arg(arg.as_deref())
        .with_context(|| format!("unknown mode {:?}, expected quiz or review", arg))?;

    let words_path = config
        .words_path
        .clone()
        .context("VOCAB_WORDS_FILE must be set")?;
    let content = JsonWordFile::new(words_path);

    tracing::info!(path = %config.db_path.display(), "Opening database...");
    let store = Arc::new(SqliteStore::open(&config.db_path)?);
    let (persister, mut reports) = Persister::new(store.clone(), store.clone());

    // Ends once every persister clone, including in-flight saves, is gone.
    let reporter = tokio::spawn(async move {
        while let Some(report) = reports.recv().await {
            if let PersistenceReport::Failed { target, error } = report {
                eprintln!("warning: could not save {:?}: {}", target, error);
            }
        }
    });

    let delay = Duration::from_millis(config.engine.auto_advance_ms);
    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();

    match mode {
        Mode::Quiz => {
            let session = runner::prepare_quiz(&content, store.as_ref(), &config.engine).await?;
            tracing::info!(session_id = %session.id(), questions = session.len(), "Starting quiz");
            let (mut runner, mut events) = QuizRunner::new(session, persister, delay);
            terminal::run_quiz(&mut runner, &mut events, stdin, &mut stdout).await?;
        }
        Mode::Review => {
            let session = runner::prepare_review(
                &content,
                store.as_ref(),
                store.as_ref(),
                &config.engine,
                chrono::Utc::now(),
            )
            .await?;
            tracing::info!(session_id = %session.id(), words = session.len(), "Starting review");
            let (mut runner, mut events) = ReviewRunner::new(session, persister, delay);
            terminal::run_review(&mut runner, &mut events, stdin, &mut stdout).await?;
        }
    }

    reporter.await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_from_arg() {
        assert_eq!(Mode::from_arg(None), Some(Mode::Quiz));
        assert_eq!(Mode::from_arg(Some("review")), Some(Mode::Review));
        assert_eq!(Mode::from_arg(Some("exam")), None);
    }
}
