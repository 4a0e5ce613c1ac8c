//! Request payloads and boundary validation
//!
//! Wire payloads keep every field optional so that a missing field becomes
//! a readable validation error instead of a serde message. `Validate`
//! turns a wire payload into its typed request.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::errors::DomainError;

/// Voice model used when the client does not pick one
pub const DEFAULT_TTS_MODEL: &str = "eleven_monolingual_v1";

/// Boundary check producing a typed request or a validation error
pub trait Validate {
    type Output;

    fn validate(self) -> Result<Self::Output, DomainError>;
}

fn required(value: Option<String>, field: &str) -> Result<String, DomainError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(DomainError::validation(format!("{field} is required"))),
    }
}

fn optional(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// ============================================
// Synthesize speech
// ============================================

/// Body of a synthesize-speech request
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SpeechPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_id: Option<String>,
}

/// Validated synthesize-speech request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechRequest {
    pub text: String,
    pub voice_id: String,
    pub model_id: Option<String>,
}

impl SpeechRequest {
    /// Requested model, or the given fallback
    pub fn model_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.model_id.as_deref().unwrap_or(fallback)
    }
}

impl Validate for SpeechPayload {
    type Output = SpeechRequest;

    fn validate(self) -> Result<SpeechRequest, DomainError> {
        Ok(SpeechRequest {
            text: required(self.text, "text")?,
            voice_id: required(self.voice_id, "voiceId")?,
            model_id: optional(self.model_id),
        })
    }
}

// ============================================
// Create assistant run
// ============================================

/// Body of a create-run request
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CreateRunPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Validated create-run request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRunRequest {
    pub text: String,
}

impl Validate for CreateRunPayload {
    type Output = CreateRunRequest;

    fn validate(self) -> Result<CreateRunRequest, DomainError> {
        Ok(CreateRunRequest {
            text: required(self.text, "text")?,
        })
    }
}

// ============================================
// Poll assistant run
// ============================================

/// Query string of a poll request
#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PollQuery {
    /// Thread returned by create-run
    #[serde(default)]
    pub thread_id: Option<String>,
}

impl Validate for PollQuery {
    type Output = String;

    fn validate(self) -> Result<String, DomainError> {
        required(self.thread_id, "thread_id")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_speech_payload_reads_camel_case() {
        let payload: SpeechPayload = serde_json::from_value(json!({
            "text": "hi",
            "voiceId": "v1",
            "modelId": "m1"
        }))
        .unwrap();
        let request = payload.validate().unwrap();
        assert_eq!(request.voice_id, "v1");
        assert_eq!(request.model_or(DEFAULT_TTS_MODEL), "m1");
    }

    #[test]
    fn test_speech_missing_voice_id() {
        let payload: SpeechPayload = serde_json::from_value(json!({ "text": "hi" })).unwrap();
        let err = payload.validate().unwrap_err();
        assert_eq!(err.to_string(), "voiceId is required");
    }

    #[test]
    fn test_speech_blank_model_falls_back() {
        let payload = SpeechPayload {
            text: Some("hi".to_string()),
            voice_id: Some("v1".to_string()),
            model_id: Some("".to_string()),
        };
        let request = payload.validate().unwrap();
        assert_eq!(request.model_or(DEFAULT_TTS_MODEL), DEFAULT_TTS_MODEL);
    }

    #[test]
    fn test_create_run_requires_text() {
        assert!(CreateRunPayload::default().validate().is_err());
        let blank = CreateRunPayload {
            text: Some("   ".to_string()),
        };
        assert!(blank.validate().is_err());
    }

    #[test]
    fn test_poll_query_requires_thread_id() {
        let err = PollQuery::default().validate().unwrap_err();
        assert_eq!(err.to_string(), "thread_id is required");

        let query = PollQuery {
            thread_id: Some("t1".to_string()),
        };
        assert_eq!(query.validate().unwrap(), "t1");
    }
}
