//! OpenAPI Documentation
//!
//! Centralized API documentation using utoipa.

use utoipa::OpenApi;
use voxrelay::{CreateRunPayload, RunHandle, RunStatus, SpeechPayload};

use crate::error::ErrorBody;

use super::health::HealthCheck;

#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        super::health::health_check,
        // Voice endpoints
        super::voices::list_voices,
        super::speech::synthesize_speech,
        // Assistant endpoints
        super::assistant::create_run,
        super::assistant::poll_run,
    ),
    info(
        title = "voxrelay API",
        version = "0.1.0",
        description = "Credential-bearing relay between a voice chat front-end, an assistant API and a voice synthesis API.",
        license(name = "MIT"),
    ),
    servers(
        (url = "/", description = "Current server"),
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Voice", description = "Voice catalog and text-to-speech"),
        (name = "Assistant", description = "Assistant runs: create and poll"),
    ),
    components(
        schemas(
            HealthCheck,
            SpeechPayload,
            CreateRunPayload,
            RunHandle,
            RunStatus,
            ErrorBody,
        )
    ),
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_relay_paths() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        assert!(paths.contains_key("/health"));
        assert!(paths.contains_key("/api/voices"));
        assert!(paths.contains_key("/api/speech"));
        assert!(paths.contains_key("/api/assistant/runs"));
    }
}
