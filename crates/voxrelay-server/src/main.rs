use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod cors;
mod error;
mod extract;
mod routes;
mod services;
#[cfg(test)]
mod test_support;

use config::RelayConfig;
use cors::CorsPolicy;
use services::assistant::AssistantService;
use services::voice::VoiceService;

/// Application state shared across all routes
#[derive(Clone)]
pub struct AppState {
    pub cors: Arc<CorsPolicy>,
    pub voice: VoiceService,
    pub assistant: AssistantService,
}

impl AppState {
    pub fn from_config(config: &RelayConfig) -> anyhow::Result<Self> {
        let client = services::upstream_client().context("Failed to build HTTP client")?;

        Ok(Self {
            cors: Arc::new(CorsPolicy::new(config.allowed_origins.clone())),
            voice: VoiceService::new(
                client.clone(),
                &config.elevenlabs_base_url,
                config.elevenlabs_api_key.clone(),
                &config.default_tts_model,
            ),
            assistant: AssistantService::new(
                client,
                &config.openai_base_url,
                config.openai_api_key.clone(),
                config.assistant_id.clone(),
            ),
        })
    }
}

/// Build the relay router
pub fn build_router(state: AppState) -> Router {
    // Credentialed relay routes sit behind the origin allow-list;
    // the voice catalog carries its own wildcard gate
    let relay_routes = cors::allow_listed(
        Router::new()
            .merge(routes::speech::router())
            .merge(routes::assistant::router()),
        &state.cors,
    );

    let openapi = routes::swagger::ApiDoc::openapi();

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
        .merge(routes::health::router())
        .merge(routes::voices::router())
        .merge(relay_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[shuttle_runtime::main]
async fn main(
    #[shuttle_runtime::Secrets] secrets: shuttle_runtime::SecretStore,
) -> shuttle_axum::ShuttleAxum {
    tracing::info!("🎙️ voxrelay initializing...");

    // Local .env fills anything the secret store does not provide
    if dotenvy::dotenv().is_ok() {
        tracing::info!("Loaded .env file");
    }

    let config =
        RelayConfig::from_lookup(|key| secrets.get(key).or_else(|| std::env::var(key).ok()));

    if config.elevenlabs_api_key.is_none() {
        tracing::warn!("⚠️  No ELEVENLABS_API_KEY set - voice endpoints will fail closed");
    }
    if config.openai_api_key.is_none() {
        tracing::warn!("⚠️  No OPENAI_API_KEY set - assistant endpoints will fail closed");
    }
    if config.assistant_id.is_none() {
        tracing::warn!("⚠️  No OPENAI_ASSISTANT_ID set - runs cannot be started");
    }

    let state = AppState::from_config(&config)?;
    tracing::info!("🌐 Allowed origins: {:?}", state.cors.origins());
    let router = build_router(state);

    tracing::info!("📚 Swagger UI: /swagger-ui");
    tracing::info!("✅ voxrelay ready");

    Ok(router.into())
}
