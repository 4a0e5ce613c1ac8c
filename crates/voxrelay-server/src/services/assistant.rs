//! Assistant Service - OpenAI Assistants (threads / messages / runs)
//!
//! Starting a run is three dependent calls, each awaited before the next:
//! create a thread, post the user message, start a run. Polling reads the
//! thread's message list and looks for the assistant's reply; no state is
//! kept between polls.

use reqwest::{Client, RequestBuilder};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use voxrelay::{DomainError, PollResult, RunHandle};

use crate::config::{OPENAI_API_KEY, OPENAI_ASSISTANT_ID};
use crate::services::describe_failure;

const ASSISTANTS_BETA: &str = "assistants=v2";

/// OpenAI Assistants relay client
#[derive(Clone)]
pub struct AssistantService {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    assistant_id: Option<String>,
}

// ============================================
// Request/Response Types
// ============================================

#[derive(Serialize)]
struct MessageBody<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct RunBody<'a> {
    assistant_id: &'a str,
}

/// Any object whose only interesting field is its id
#[derive(Debug, Default, Deserialize)]
struct IdObject {
    #[serde(default)]
    id: Option<String>,
}

impl AssistantService {
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        api_key: Option<String>,
        assistant_id: Option<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key,
            assistant_id,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some() && self.assistant_id.is_some()
    }

    fn api_key(&self) -> Result<&str, DomainError> {
        self.api_key
            .as_deref()
            .ok_or_else(|| DomainError::missing_secret(OPENAI_API_KEY))
    }

    fn assistant_id(&self) -> Result<&str, DomainError> {
        self.assistant_id
            .as_deref()
            .ok_or_else(|| DomainError::missing_secret(OPENAI_ASSISTANT_ID))
    }

    fn authorized(&self, request: RequestBuilder, api_key: &str) -> RequestBuilder {
        request
            .bearer_auth(api_key)
            .header("OpenAI-Beta", ASSISTANTS_BETA)
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, DomainError> {
        let response = request.send().await.map_err(DomainError::upstream)?;

        if !response.status().is_success() {
            return Err(DomainError::Upstream(
                describe_failure("OpenAI", response).await,
            ));
        }

        response.json::<T>().await.map_err(DomainError::upstream)
    }

    fn thread_url(&self, thread_id: &str, tail: &str) -> String {
        format!(
            "{}/v1/threads/{}/{}",
            self.base_url,
            urlencoding::encode(thread_id),
            tail
        )
    }

    /// Create a thread, post `text` into it and start a run.
    ///
    /// Fails with [`DomainError::FailedToStart`] when the thread comes back
    /// without an id. A run without an id still yields a handle, since
    /// polling only needs the thread.
    pub async fn start_run(&self, text: &str) -> Result<RunHandle, DomainError> {
        let api_key = self.api_key()?;
        let assistant_id = self.assistant_id()?;

        let thread: IdObject = self
            .send_json(self.authorized(
                self.client
                    .post(format!("{}/v1/threads", self.base_url))
                    .json(&serde_json::json!({})),
                api_key,
            ))
            .await?;
        let thread_id = thread
            .id
            .filter(|id| !id.is_empty())
            .ok_or(DomainError::FailedToStart)?;

        tracing::info!(thread_id = %thread_id, "Assistant thread created");

        let _message: IdObject = self
            .send_json(self.authorized(
                self.client
                    .post(self.thread_url(&thread_id, "messages"))
                    .json(&MessageBody {
                        role: "user",
                        content: text,
                    }),
                api_key,
            ))
            .await?;

        let run: IdObject = self
            .send_json(self.authorized(
                self.client
                    .post(self.thread_url(&thread_id, "runs"))
                    .json(&RunBody { assistant_id }),
                api_key,
            ))
            .await?;

        if run.id.is_none() {
            tracing::warn!(thread_id = %thread_id, "Run response carried no id");
        }

        Ok(RunHandle::new(thread_id, run.id))
    }

    /// Look up the assistant's reply on a thread
    pub async fn poll(&self, thread_id: &str) -> Result<PollResult, DomainError> {
        let api_key = self.api_key()?;

        let messages: Value = self
            .send_json(self.authorized(
                self.client.get(self.thread_url(thread_id, "messages")),
                api_key,
            ))
            .await?;

        let result = match extract_answer(&messages) {
            Some(answer) => PollResult::completed(answer),
            None => PollResult::Pending,
        };

        tracing::debug!(thread_id, status = %result.status(), "Polled thread");

        Ok(result)
    }
}

// ============================================
// Helper Functions
// ============================================

/// First text value of the first assistant-authored message, verbatim.
///
/// The message list is newest-first, so this is the latest reply. A reply
/// whose text is still blank counts as no answer yet.
fn extract_answer(root: &Value) -> Option<String> {
    let reply = root
        .get("data")?
        .as_array()?
        .iter()
        .find(|message| message.get("role").and_then(|r| r.as_str()) == Some("assistant"))?;

    reply
        .get("content")?
        .as_array()?
        .iter()
        .find_map(|part| part.get("text")?.get("value")?.as_str())
        .filter(|value| !value.trim().is_empty())
        .map(str::to_string)
}
