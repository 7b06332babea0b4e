//! Line-based terminal driver for quiz and review sessions.

use std::time::Instant;

use chrono::Utc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, Lines};
use tokio::sync::mpsc;
use vocab_core::ResponseQuality;

use crate::runner::{QuizRunner, ReviewRunner, SessionEvent};

type Events = mpsc::UnboundedReceiver<SessionEvent>;

/// Drive a quiz from `input` until it completes, input ends or `q` is entered.
///
/// Options can be picked by number or typed out.
pub async fn run_quiz<R, W>(
    runner: &mut QuizRunner,
    events: &mut Events,
    input: R,
    output: &mut W,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();

    loop {
        let snapshot = runner.snapshot().await;
        let Some(question) = snapshot.current_question else {
            break;
        };

        let mut screen = format!(
            "\n[{}/{}] {}\n",
            snapshot.position + 1,
            snapshot.len,
            question.prompt()
        );
        for (i, option) in question.options().iter().enumerate() {
            screen.push_str(&format!("  {}) {}\n", i + 1, option));
        }
        screen.push_str("> ");
        output.write_all(screen.as_bytes()).await?;
        output.flush().await?;

        let started = Instant::now();
        let Some(line) = next_command(&mut lines).await? else {
            runner.end_session().await;
            break;
        };
        if line == "q" {
            runner.end_session().await;
            break;
        }

        let selected = match line.parse::<usize>() {
            Ok(n) if (1..=question.options().len()).contains(&n) => question.options()[n - 1].clone(),
            _ => line,
        };
        if runner.answer(&selected, started.elapsed()).await.is_none() {
            continue;
        }
        if !print_until_advanced(events, output).await? {
            break;
        }
    }

    print_pending(events, output).await
}

/// Drive a review: reveal the meaning, then grade 1 to 4.
pub async fn run_review<R, W>(
    runner: &mut ReviewRunner,
    events: &mut Events,
    input: R,
    output: &mut W,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();

    'session: loop {
        let snapshot = runner.snapshot().await;
        let Some(item) = snapshot.current_item else {
            break;
        };

        let screen = format!(
            "\n[{}/{}] {}\n(enter = reveal, s = skip, q = quit) > ",
            snapshot.position + 1,
            snapshot.len,
            item.word.text
        );
        output.write_all(screen.as_bytes()).await?;
        output.flush().await?;

        match next_command(&mut lines).await?.as_deref() {
            None | Some("q") => {
                runner.end_session().await;
                break;
            }
            Some("s") => {
                runner.skip().await;
                print_pending(events, output).await?;
                continue;
            }
            Some(_) => {}
        }

        let reveal = format!(
            "  {}\n  grade: 1 again, 2 hard, 3 good, 4 easy > ",
            item.word.meaning
        );
        output.write_all(reveal.as_bytes()).await?;
        output.flush().await?;

        let quality = loop {
            let Some(line) = next_command(&mut lines).await? else {
                runner.end_session().await;
                break 'session;
            };
            match line.parse::<u8>().ok().and_then(ResponseQuality::from_value) {
                Some(quality) => break quality,
                None => output.write_all(b"  enter 1, 2, 3 or 4 > ").await?,
            }
            output.flush().await?;
        };

        if runner.submit_review(quality, Utc::now()).await.is_none() {
            continue;
        }
        if !print_until_advanced(events, output).await? {
            break;
        }
    }

    print_pending(events, output).await
}

async fn next_command<R>(lines: &mut Lines<R>) -> std::io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    Ok(lines.next_line().await?.map(|line| line.trim().to_string()))
}

/// Print events until the session moves on. `false` when the channel closed.
async fn print_until_advanced<W>(events: &mut Events, output: &mut W) -> std::io::Result<bool>
where
    W: AsyncWrite + Unpin,
{
    while let Some(event) = events.recv().await {
        let moved_on = matches!(
            event,
            SessionEvent::Advanced { .. }
                | SessionEvent::QuizCompleted(_)
                | SessionEvent::ReviewCompleted(_)
        );
        print_event(&event, output).await?;
        if moved_on {
            return Ok(true);
        }
    }
    Ok(false)
}

async fn print_pending<W>(events: &mut Events, output: &mut W) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Ok(event) = events.try_recv() {
        print_event(&event, output).await?;
    }
    output.flush().await
}

async fn print_event<W>(event: &SessionEvent, output: &mut W) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let text = match event {
        SessionEvent::AnswerRecorded(outcome) if outcome.is_correct => {
            let mut text = format!("  correct (score {})\n", outcome.session_score);
            if outcome.mastery.is_mastered {
                text.push_str("  word mastered\n");
            }
            text
        }
        SessionEvent::AnswerRecorded(outcome) => format!(
            "  wrong, answer: {} (score {})\n",
            outcome.correct_answer, outcome.session_score
        ),
        SessionEvent::ReviewRecorded(outcome) => format!(
            "  next review {}\n",
            outcome.next_review.format("%Y-%m-%d")
        ),
        SessionEvent::Skipped { word_id } => format!("  skipped {word_id}\n"),
        SessionEvent::Advanced { .. } => return Ok(()),
        SessionEvent::QuizCompleted(summary) => format!(
            "\nquiz finished: {} correct, {} wrong, accuracy {:.0}%, score {}\n",
            summary.correct,
            summary.wrong,
            summary.accuracy * 100.0,
            summary.total_score
        ),
        SessionEvent::ReviewCompleted(tally) => format!(
            "\nreview finished: {} reviewed (again {}, hard {}, good {}, easy {})\n",
            tally.total(),
            tally.again,
            tally.hard,
            tally.good,
            tally.easy
        ),
    };
    output.write_all(text.as_bytes()).await
}
