//! Speech Route - text-to-speech relay
//!
//! Audio is streamed straight from the upstream body so playback can start
//! before synthesis has finished.

use axum::{
    body::Body,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use voxrelay::SpeechPayload;

use crate::error::{method_not_allowed, ApiError, ErrorBody};
use crate::extract::ValidJson;
use crate::AppState;

/// Synthesize speech for a piece of text
#[utoipa::path(
    post,
    path = "/api/speech",
    request_body = SpeechPayload,
    responses(
        (status = 200, description = "audio/mpeg stream; upstream status is preserved"),
        (status = 400, description = "Missing text or voiceId", body = ErrorBody),
        (status = 500, description = "Missing credential or upstream unreachable", body = ErrorBody)
    ),
    tag = "Voice"
)]
pub async fn synthesize_speech(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<SpeechPayload>,
) -> Result<Response, ApiError> {
    let upstream = state.voice.synthesize(&request).await?;
    let status = upstream.status();

    if !status.is_success() {
        tracing::warn!(%status, voice_id = %request.voice_id, "Speech synthesis was not successful");
    }

    Ok((
        status,
        [(header::CONTENT_TYPE, "audio/mpeg")],
        Body::from_stream(upstream.bytes_stream()),
    )
        .into_response())
}

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/api/speech",
        post(synthesize_speech).fallback(method_not_allowed),
    )
}

#[cfg(test)]
mod tests {
    use crate::config::RelayConfig;
    use crate::test_support::{app, call, config_for, get_request, json_request, TEST_ORIGIN};
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::{json, Value};
    use voxrelay::DEFAULT_TTS_MODEL;
    use wiremock::matchers::{body_json, header as header_matcher, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const AUDIO: &[u8] = b"ID3\x04\x00fake-mpeg-frames";

    #[tokio::test]
    async fn test_audio_is_streamed_back() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/text-to-speech/voice-1"))
            .and(header_matcher("xi-api-key", "xi-test-key"))
            .and(body_json(json!({ "text": "Hello there", "model_id": DEFAULT_TTS_MODEL })))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "audio/mpeg")
                    .set_body_bytes(AUDIO),
            )
            .expect(1)
            .mount(&server)
            .await;

        let request = json_request(
            Method::POST,
            "/api/speech",
            json!({ "text": "Hello there", "voiceId": "voice-1" }),
        );
        let (status, headers, body) = call(app(config_for(&server)), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CONTENT_TYPE], "audio/mpeg");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], TEST_ORIGIN);
        assert_eq!(headers[header::VARY], "origin");
        assert_eq!(&body[..], AUDIO);
    }

    #[tokio::test]
    async fn test_slow_synthesis_is_not_cut_off() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/text-to-speech/voice-1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "audio/mpeg")
                    .set_body_bytes(AUDIO)
                    .set_delay(std::time::Duration::from_secs(31)),
            )
            .expect(1)
            .mount(&server)
            .await;

        let request = json_request(
            Method::POST,
            "/api/speech",
            json!({ "text": "A very long answer", "voiceId": "voice-1" }),
        );
        let (status, _, body) = call(app(config_for(&server)), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(&body[..], AUDIO);
    }

    #[tokio::test]
    async fn test_explicit_model_is_forwarded() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/text-to-speech/voice-1"))
            .and(body_json(json!({ "text": "Hi", "model_id": "eleven_turbo_v2" })))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(AUDIO))
            .expect(1)
            .mount(&server)
            .await;

        let request = json_request(
            Method::POST,
            "/api/speech",
            json!({ "text": "Hi", "voiceId": "voice-1", "modelId": "eleven_turbo_v2" }),
        );
        let (status, _, _) = call(app(config_for(&server)), request).await;

        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_missing_voice_id_makes_no_upstream_call() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let request = json_request(Method::POST, "/api/speech", json!({ "text": "Hello" }));
        let (status, headers, body) = call(app(config_for(&server)), request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], TEST_ORIGIN);
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "voiceId is required");
    }

    #[tokio::test]
    async fn test_invalid_json_is_bad_request() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/speech")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{ not json"))
            .unwrap();
        let (status, _, body) = call(app(config_for(&server)), request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert!(json["error"].is_string());
    }

    #[tokio::test]
    async fn test_upstream_error_status_is_preserved() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/text-to-speech/unknown"))
            .respond_with(ResponseTemplate::new(404).set_body_string("voice not found"))
            .mount(&server)
            .await;

        let request = json_request(
            Method::POST,
            "/api/speech",
            json!({ "text": "Hello", "voiceId": "unknown" }),
        );
        let (status, _, body) = call(app(config_for(&server)), request).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(&body[..], b"voice not found");
    }

    #[tokio::test]
    async fn test_missing_key_fails_closed() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let config = RelayConfig {
            elevenlabs_api_key: None,
            ..config_for(&server)
        };
        let request = json_request(
            Method::POST,
            "/api/speech",
            json!({ "text": "Hello", "voiceId": "voice-1" }),
        );
        let (status, _, body) = call(app(config), request).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "ELEVENLABS_API_KEY is not configured");
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_server_error() {
        // Nothing listens on the reserved port 9
        let config = RelayConfig {
            elevenlabs_base_url: "http://127.0.0.1:9".to_string(),
            ..config_for(&MockServer::start().await)
        };
        let request = json_request(
            Method::POST,
            "/api/speech",
            json!({ "text": "Hello", "voiceId": "voice-1" }),
        );
        let (status, _, body) = call(app(config), request).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert!(json["error"].as_str().unwrap().starts_with("Upstream error"));
    }

    #[tokio::test]
    async fn test_get_is_not_allowed() {
        let server = MockServer::start().await;

        let (status, headers, _) = call(app(config_for(&server)), get_request("/api/speech")).await;

        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], TEST_ORIGIN);
    }
}
