//! Voice Service - ElevenLabs voice catalog and speech synthesis
//!
//! Both calls hand back the raw upstream response: the catalog is passed
//! through verbatim and synthesized audio is streamed, never buffered.

use reqwest::{Client, Response};
use serde::Serialize;
use voxrelay::{DomainError, SpeechRequest};

use crate::config::ELEVENLABS_API_KEY;

/// ElevenLabs relay client
#[derive(Clone)]
pub struct VoiceService {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    default_model: String,
}

#[derive(Serialize)]
struct SynthesisBody<'a> {
    text: &'a str,
    model_id: &'a str,
}

impl VoiceService {
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        api_key: Option<String>,
        default_model: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key,
            default_model: default_model.into(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn api_key(&self) -> Result<&str, DomainError> {
        self.api_key
            .as_deref()
            .ok_or_else(|| DomainError::missing_secret(ELEVENLABS_API_KEY))
    }

    /// GET /v1/voices
    pub async fn list_voices(&self) -> Result<Response, DomainError> {
        let api_key = self.api_key()?;
        let url = format!("{}/v1/voices", self.base_url);

        tracing::info!("Fetching voice catalog");

        self.client
            .get(&url)
            .header("xi-api-key", api_key)
            .send()
            .await
            .map_err(DomainError::upstream)
    }

    /// POST /v1/text-to-speech/{voice_id}
    pub async fn synthesize(&self, request: &SpeechRequest) -> Result<Response, DomainError> {
        let api_key = self.api_key()?;
        let url = format!(
            "{}/v1/text-to-speech/{}",
            self.base_url,
            urlencoding::encode(&request.voice_id)
        );
        let model_id = request.model_or(&self.default_model);

        tracing::info!(
            voice_id = %request.voice_id,
            model_id,
            chars = request.text.chars().count(),
            "Synthesizing speech"
        );

        self.client
            .post(&url)
            .header("xi-api-key", api_key)
            .header("Accept", "audio/mpeg")
            .json(&SynthesisBody {
                text: &request.text,
                model_id,
            })
            .send()
            .await
            .map_err(DomainError::upstream)
    }
}
