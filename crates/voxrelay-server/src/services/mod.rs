//! Upstream adapters
//!
//! - `voice`: ElevenLabs voice catalog and text-to-speech
//! - `assistant`: OpenAI Assistants threads, messages and runs

pub mod assistant;
pub mod voice;

use std::time::Duration;

use reqwest::Client;

/// Shared HTTP client for all upstream calls.
///
/// Only connecting is bounded; speech bodies keep streaming after the
/// status line has gone out.
pub fn upstream_client() -> reqwest::Result<Client> {
    Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .user_agent(concat!("voxrelay/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Turn a non-success upstream response into a readable message
pub(crate) async fn describe_failure(service: &str, response: reqwest::Response) -> String {
    let status = response.status();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Failed to read error body".to_string());

    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|json| {
            let err = json.get("error").or_else(|| json.get("detail"))?;
            err.get("message")
                .unwrap_or(err)
                .as_str()
                .map(|msg| msg.to_string())
        })
        .unwrap_or(body);

    format!("{service} API error ({status}): {message}")
}
