//! Assistant Relay Port
//!
//! The two relay endpoints the run/poll driver chains together.

use async_trait::async_trait;

use crate::domain::entities::{PollResult, RunStarted};
use crate::domain::errors::DomainError;

/// Create-run / poll-run interface of a relay
///
/// # Example
///
/// ```rust,ignore
/// use voxrelay::ports::AssistantRelay;
///
/// struct HttpRelay { /* ... */ }
///
/// #[async_trait]
/// impl AssistantRelay for HttpRelay {
///     async fn create_run(&self, text: &str) -> Result<RunStarted, DomainError> {
///         // POST /api/assistant/runs
///     }
///     async fn poll_run(&self, thread_id: &str) -> Result<PollResult, DomainError> {
///         // GET /api/assistant/runs?thread_id=...
///     }
/// }
/// ```
#[async_trait]
pub trait AssistantRelay: Send + Sync {
    /// Submit an utterance and start an assistant run
    async fn create_run(&self, text: &str) -> Result<RunStarted, DomainError>;

    /// Ask whether the run on `thread_id` has produced an answer yet
    async fn poll_run(&self, thread_id: &str) -> Result<PollResult, DomainError>;
}

#[async_trait]
impl<T: AssistantRelay + ?Sized> AssistantRelay for std::sync::Arc<T> {
    async fn create_run(&self, text: &str) -> Result<RunStarted, DomainError> {
        (**self).create_run(text).await
    }

    async fn poll_run(&self, thread_id: &str) -> Result<PollResult, DomainError> {
        (**self).poll_run(thread_id).await
    }
}
