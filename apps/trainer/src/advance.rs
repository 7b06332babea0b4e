//! Cancellable delayed advance after an answer.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Holds at most one pending advance. Scheduling a new one or dropping the
/// holder cancels the previous one.
///
/// The task receives its token and must re-check it after taking the
/// session lock; cancellation can race with the timer firing.
#[derive(Debug)]
pub struct AutoAdvance {
    delay: Duration,
    pending: Option<(CancellationToken, JoinHandle<()>)>,
}

impl AutoAdvance {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// True while a scheduled advance has neither fired nor been cancelled.
    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .map_or(false, |(token, handle)| !token.is_cancelled() && !handle.is_finished())
    }

    pub fn schedule<F, Fut>(&mut self, task: F)
    where
        F: FnOnce(CancellationToken) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.cancel();

        let token = CancellationToken::new();
        let watch = token.clone();
        let handed = token.clone();
        let delay = self.delay;
        let handle = tokio::spawn(async move {
            tokio::select! {
                _ = watch.cancelled() => {}
                _ = tokio::time::sleep(delay) => task(handed).await,
            }
        });
        self.pending = Some((token, handle));
    }

    pub fn cancel(&mut self) {
        if let Some((token, handle)) = self.pending.take() {
            token.cancel();
            handle.abort();
        }
    }
}

impl Drop for AutoAdvance {
    fn drop(&mut self) {
        self.cancel();
    }
}
