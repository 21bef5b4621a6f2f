//! Cancellable fixed-interval polling task.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use super::state::{JobReport, JobState};
use crate::config::POLL_INTERVAL;

/// Latest observation published by a poller.
#[derive(Debug, Clone)]
pub struct PollUpdate<R> {
    pub state: JobState,
    /// Last successfully fetched report
    pub report: Option<R>,
    /// Number of fetches attempted so far
    pub attempts: u64,
}

impl<R> Default for PollUpdate<R> {
    fn default() -> Self {
        Self {
            state: JobState::Pending,
            report: None,
            attempts: 0,
        }
    }
}

/// Polls a status endpoint until the job reaches a terminal state.
///
/// The first fetch happens immediately, then one per interval. There is no
/// backoff and no cap on duration. A failed fetch is logged and the next
/// tick tries again.
#[derive(Debug, Clone)]
pub struct JobPoller {
    label: String,
    interval: Duration,
}

impl JobPoller {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            interval: POLL_INTERVAL,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Spawns the polling task. Must be called within a tokio runtime.
    pub fn start<F, Fut, R, E>(self, mut fetch: F) -> PollHandle<R>
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = Result<R, E>> + Send + 'static,
        R: JobReport + Clone + Send + Sync + 'static,
        E: Display + Send + 'static,
    {
        let (tx, rx) = watch::channel(PollUpdate::default());
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let JobPoller { label, interval: period } = self;

        let task = tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => {
                        log::debug!("Polling of {label} cancelled");
                        break;
                    }
                    _ = ticker.tick() => {}
                }

                let result = tokio::select! {
                    biased;
                    _ = token.cancelled() => {
                        log::debug!("Polling of {label} cancelled mid-request");
                        break;
                    }
                    result = fetch() => result,
                };

                let mut terminal = false;
                tx.send_modify(|update| {
                    update.attempts += 1;
                    match result {
                        Ok(report) => {
                            let observed = report.job_state();
                            if update.state.advance(observed) {
                                log::debug!("{label}: {}", update.state);
                            }
                            update.report = Some(report);
                        }
                        Err(e) => log::warn!("Failed to poll {label}: {e}"),
                    }
                    terminal = update.state.is_terminal();
                });

                if terminal {
                    log::info!("{label} finished: {}", tx.borrow().state);
                    break;
                }
            }
        });

        PollHandle {
            rx,
            cancel,
            task: Some(task),
        }
    }
}

/// Handle to a running poller. Dropping it cancels polling.
#[derive(Debug)]
pub struct PollHandle<R> {
    rx: watch::Receiver<PollUpdate<R>>,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl<R: Clone> PollHandle<R> {
    /// Current state.
    pub fn state(&self) -> JobState {
        self.rx.borrow().state.clone()
    }

    /// Latest published update.
    pub fn latest(&self) -> PollUpdate<R> {
        self.rx.borrow().clone()
    }

    /// Waits for the next update. `None` once the task has exited.
    pub async fn changed(&mut self) -> Option<PollUpdate<R>> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    /// Waits until the job is terminal or polling stops, then returns the
    /// last update.
    pub async fn wait(&mut self) -> PollUpdate<R> {
        loop {
            if self.rx.borrow_and_update().state.is_terminal() {
                break;
            }
            tokio::select! {
                changed = self.rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
                _ = self.cancel.cancelled() => break,
            }
        }
        self.latest()
    }

    /// Requests cancellation without waiting for the task.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Cancels polling and waits for the task to exit.
    pub async fn stop(mut self) -> PollUpdate<R> {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                log::warn!("Polling task ended abnormally: {e}");
            }
        }
        self.latest()
    }
}

impl<R> Drop for PollHandle<R> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
