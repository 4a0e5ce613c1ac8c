//! Run - Assistant run protocol records
//!
//! A run is created once per utterance and then observed through polls.
//! No state is kept server-side: every poll reconstructs the status from
//! the upstream thread's message history.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::errors::DomainError;

/// Handle to a started assistant run.
///
/// The thread id is the only key used for polling and cannot change once
/// issued, so fields are private.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RunHandle {
    thread_id: String,
    run_id: Option<String>,
}

impl RunHandle {
    pub fn new(thread_id: impl Into<String>, run_id: Option<String>) -> Self {
        Self {
            thread_id: thread_id.into(),
            run_id,
        }
    }

    pub fn thread_id(&self) -> &str {
        &self.thread_id
    }

    pub fn run_id(&self) -> Option<&str> {
        self.run_id.as_deref()
    }
}

/// Create-run response as seen by a client, before the thread id is checked
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RunStarted {
    #[serde(default)]
    pub thread_id: Option<String>,
    #[serde(default)]
    pub run_id: Option<String>,
}

impl RunStarted {
    /// Without a thread id there is nothing to poll.
    pub fn into_handle(self) -> Result<RunHandle, DomainError> {
        match self.thread_id {
            Some(thread_id) if !thread_id.trim().is_empty() => {
                Ok(RunHandle::new(thread_id, self.run_id))
            }
            _ => Err(DomainError::FailedToStart),
        }
    }
}

/// Client-observed run status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Pending,
    Completed,
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunStatus::Pending => write!(f, "pending"),
            RunStatus::Completed => write!(f, "completed"),
        }
    }
}

/// Outcome of a single poll.
///
/// Serialized as `{"status":"pending"}` or
/// `{"status":"completed","answer":"..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PollResult {
    Pending,
    Completed { answer: String },
}

impl PollResult {
    pub fn completed(answer: impl Into<String>) -> Self {
        Self::Completed {
            answer: answer.into(),
        }
    }

    pub fn status(&self) -> RunStatus {
        match self {
            PollResult::Pending => RunStatus::Pending,
            PollResult::Completed { .. } => RunStatus::Completed,
        }
    }

    pub fn answer(&self) -> Option<&str> {
        match self {
            PollResult::Pending => None,
            PollResult::Completed { answer } => Some(answer),
        }
    }
}
