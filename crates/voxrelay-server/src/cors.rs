//! Cross-Origin Policy Gate
//!
//! Built on `tower_http::cors::CorsLayer`. The calling origin is echoed only
//! when it is on the exact-match allow-list, and preflight requests are
//! answered by the layer without reaching a handler. `CorsLayer` declares
//! allowed methods and headers on preflight responses only, so both are also
//! set on every response with `SetResponseHeaderLayer`.
//!
//! [`public`] is the single wildcard variant, used only for the voice
//! catalog, which carries no credentials.

use axum::{
    http::{header, HeaderValue, Method},
    Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;

const ALLOW_METHODS: &str = "GET, POST, OPTIONS";
const ALLOW_HEADERS: &str = "Content-Type";

/// Exact-match origin allow-list
#[derive(Debug, Clone, Default)]
pub struct CorsPolicy {
    allowed_origins: Vec<String>,
}

impl CorsPolicy {
    pub fn new(allowed_origins: Vec<String>) -> Self {
        Self { allowed_origins }
    }

    pub fn origins(&self) -> &[String] {
        &self.allowed_origins
    }

    fn layer(&self) -> CorsLayer {
        let origins: Vec<HeaderValue> = self
            .allowed_origins
            .iter()
            .filter_map(|origin| {
                if origin == "*" {
                    tracing::warn!("Ignoring wildcard in allowed origins");
                    return None;
                }
                HeaderValue::from_str(origin)
                    .map_err(|_| tracing::warn!(origin = %origin, "Ignoring invalid origin"))
                    .ok()
            })
            .collect();

        base_layer().allow_origin(AllowOrigin::list(origins))
    }
}

fn base_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .vary([header::ORIGIN])
}

fn declared<S>(router: Router<S>, cors: CorsLayer) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .layer(cors)
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOW_METHODS),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOW_HEADERS),
        ))
}

/// Allow-list gate for credentialed endpoints
pub fn allow_listed<S>(router: Router<S>, policy: &CorsPolicy) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    declared(router, policy.layer())
}

/// Wildcard gate, reserved for the voice catalog
pub fn public<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    declared(router, base_layer().allow_origin(AllowOrigin::any()))
}
