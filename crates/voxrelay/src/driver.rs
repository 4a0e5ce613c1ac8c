//! Run/Poll Driver - waits for an assistant answer
//!
//! Submits an utterance through [`AssistantRelay::create_run`] and then polls
//! the thread at a fixed interval until an answer appears. Polls are strictly
//! sequential: request, await, decide, then sleep or return.
//!
//! The loop is bounded by an attempt count and an optional wall-clock
//! deadline, and can be cancelled between polls.

use std::time::Duration;

use thiserror::Error;
use tokio::time::{sleep, Instant};
use tokio_util::sync::CancellationToken;

use crate::domain::entities::{PollResult, RunHandle};
use crate::domain::errors::DomainError;
use crate::ports::AssistantRelay;

/// Default wait between polls
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1500);

/// Default cap on the number of polls for one run
pub const DEFAULT_MAX_ATTEMPTS: u32 = 40;

/// Polling cadence and bounds
#[derive(Debug, Clone)]
pub struct PollSettings {
    /// Wait between a pending poll and the next one
    pub interval: Duration,
    /// Give up after this many polls (`None` = no cap)
    pub max_attempts: Option<u32>,
    /// Give up once this much time has passed since the first poll
    pub deadline: Option<Duration>,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: Some(DEFAULT_MAX_ATTEMPTS),
            deadline: None,
        }
    }
}

/// Driver failures
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("Assistant failed to start")]
    FailedToStart,

    #[error("Assistant did not answer after {attempts} polls ({elapsed:?})")]
    Timeout { attempts: u32, elapsed: Duration },

    #[error("Polling cancelled")]
    Cancelled,

    #[error(transparent)]
    Relay(DomainError),
}

impl From<DomainError> for DriverError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::FailedToStart => DriverError::FailedToStart,
            other => DriverError::Relay(other),
        }
    }
}

/// Client-side coordinator for one relay
pub struct RunDriver<R> {
    relay: R,
    settings: PollSettings,
}

impl<R: AssistantRelay> RunDriver<R> {
    pub fn new(relay: R) -> Self {
        Self {
            relay,
            settings: PollSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: PollSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn relay(&self) -> &R {
        &self.relay
    }

    pub fn settings(&self) -> &PollSettings {
        &self.settings
    }

    /// Ask the assistant and wait for its answer
    pub async fn ask(&self, text: &str) -> Result<String, DriverError> {
        self.ask_with_cancel(text, &CancellationToken::new()).await
    }

    /// Like [`ask`](Self::ask), but stops before the next poll once `cancel`
    /// fires. A poll already in flight is allowed to finish.
    pub async fn ask_with_cancel(
        &self,
        text: &str,
        cancel: &CancellationToken,
    ) -> Result<String, DriverError> {
        if cancel.is_cancelled() {
            return Err(DriverError::Cancelled);
        }

        let handle = self.relay.create_run(text).await?.into_handle()?;
        tracing::debug!(
            thread_id = handle.thread_id(),
            run_id = handle.run_id(),
            "Assistant run started"
        );

        self.wait_for_answer(&handle, cancel).await
    }

    /// Poll an existing run until it completes, times out or is cancelled
    pub async fn wait_for_answer(
        &self,
        handle: &RunHandle,
        cancel: &CancellationToken,
    ) -> Result<String, DriverError> {
        let started = Instant::now();
        let mut attempts: u32 = 0;

        loop {
            attempts += 1;
            let result = self.relay.poll_run(handle.thread_id()).await?;
            tracing::debug!(
                thread_id = handle.thread_id(),
                attempts,
                status = %result.status(),
                "Polled assistant run"
            );

            if let PollResult::Completed { answer } = result {
                return Ok(answer);
            }

            let elapsed = started.elapsed();
            let out_of_attempts = self
                .settings
                .max_attempts
                .is_some_and(|max| attempts >= max);
            let past_deadline = self
                .settings
                .deadline
                .is_some_and(|deadline| elapsed + self.settings.interval > deadline);

            if out_of_attempts || past_deadline {
                tracing::warn!(
                    thread_id = handle.thread_id(),
                    attempts,
                    "Assistant run timed out"
                );
                return Err(DriverError::Timeout { attempts, elapsed });
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(DriverError::Cancelled),
                _ = sleep(self.settings.interval) => {}
            }
        }
    }
}
