//! Route modules for the Bharat server

pub mod auth;
pub mod health;
pub mod notes;
pub mod transliterate;

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    Router,
};
use tower_http::cors::{AllowHeaders, AllowMethods, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::CorsConfig;
use crate::state::AppState;

/// Build the full application router
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config().cors);
    let body_limit = state.config().uploads.max_upload_bytes;

    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(notes::router())
        .merge(transliterate::router())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// `*` allows any origin without credentials; anything else allows exactly
/// that origin with credentials
fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origin = config.allowed_origin.trim();

    if origin == "*" {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    match HeaderValue::from_str(origin) {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_credentials(true)
            .allow_methods(AllowMethods::mirror_request())
            .allow_headers(AllowHeaders::mirror_request()),
        Err(e) => {
            tracing::warn!("Ignoring invalid FRONTEND_ORIGIN '{}': {}", origin, e);
            CorsLayer::new()
        }
    }
}
