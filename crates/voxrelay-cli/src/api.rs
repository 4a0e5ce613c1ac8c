//! voxrelay API Client

use std::path::Path;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tokio::io::AsyncWriteExt;
use voxrelay::{
    AssistantRelay, CreateRunPayload, DomainError, PollResult, RunStarted, SpeechPayload,
    VoiceCatalog,
};

/// API Client for a voxrelay server
#[derive(Clone)]
pub struct RelayClient {
    client: Client,
    base_url: String,
}

// ============================================
// API Response Types
// ============================================

#[derive(Debug, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    #[serde(default)]
    pub voice_configured: bool,
    #[serde(default)]
    pub assistant_configured: bool,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

impl RelayClient {
    /// Create a new API client
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Health check
    pub async fn health(&self) -> Result<HealthResponse> {
        let url = format!("{}/health", self.base_url);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Could not reach {}", self.base_url))?;

        if !resp.status().is_success() {
            bail!("Health check failed ({})", resp.status());
        }

        resp.json().await.context("Failed to parse health response")
    }

    /// List available voices
    pub async fn list_voices(&self) -> Result<VoiceCatalog> {
        let url = format!("{}/api/voices", self.base_url);
        let resp = self.client.get(&url).send().await?;

        if !resp.status().is_success() {
            bail!("{}", relay_error(resp).await);
        }

        resp.json().await.context("Failed to parse voice catalog")
    }

    /// Synthesize speech and stream the audio into `out`.
    /// Returns the number of bytes written.
    pub async fn synthesize_to_file(&self, payload: &SpeechPayload, out: &Path) -> Result<u64> {
        let url = format!("{}/api/speech", self.base_url);
        let mut resp = self.client.post(&url).json(payload).send().await?;

        if !resp.status().is_success() {
            bail!("{}", relay_error(resp).await);
        }

        let mut file = tokio::fs::File::create(out)
            .await
            .with_context(|| format!("Failed to create {:?}", out))?;

        let mut written = 0u64;
        while let Some(chunk) = resp.chunk().await.context("Audio stream interrupted")? {
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;

        Ok(written)
    }
}

/// Status and relay error body, or the status reason when the body is not `{error}`
async fn read_error(resp: reqwest::Response) -> (StatusCode, String) {
    let status = resp.status();
    let message = match resp.json::<ErrorResponse>().await {
        Ok(body) => body.error,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string(),
    };
    (status, message)
}

async fn relay_error(resp: reqwest::Response) -> String {
    let (status, message) = read_error(resp).await;
    format!("Relay error ({}): {}", status, message)
}

#[async_trait]
impl AssistantRelay for RelayClient {
    async fn create_run(&self, text: &str) -> Result<RunStarted, DomainError> {
        let url = format!("{}/api/assistant/runs", self.base_url);
        let payload = CreateRunPayload {
            text: Some(text.to_string()),
        };

        let resp = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(DomainError::upstream)?;

        if !resp.status().is_success() {
            let (status, message) = read_error(resp).await;
            if status == StatusCode::INTERNAL_SERVER_ERROR
                && message == DomainError::FailedToStart.to_string()
            {
                return Err(DomainError::FailedToStart);
            }
            return Err(DomainError::Upstream(format!(
                "Relay error ({}): {}",
                status, message
            )));
        }

        resp.json().await.map_err(DomainError::upstream)
    }

    async fn poll_run(&self, thread_id: &str) -> Result<PollResult, DomainError> {
        let url = format!("{}/api/assistant/runs", self.base_url);

        let resp = self
            .client
            .get(&url)
            .query(&[("thread_id", thread_id)])
            .send()
            .await
            .map_err(DomainError::upstream)?;

        if !resp.status().is_success() {
            return Err(DomainError::Upstream(relay_error(resp).await));
        }

        resp.json().await.map_err(DomainError::upstream)
    }
}
