use axum::http::{HeaderName, HeaderValue, Method};
use axum::{Router, middleware, routing::get};
use gatehouse_config::CorsConfig;
use gatehouse_core::ApiResponse;
use gatehouse_observability::logging_middleware;
use serde_json::{Value, json};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::modules::auth::router::{init_auth_router, init_identity_router};
use crate::state::AppState;

pub fn init_router(state: AppState) -> Router {
    let mut api = init_identity_router(&state);
    if state.config.server.token_endpoint_enabled {
        tracing::warn!("Token endpoint enabled, do not use in production");
        api = api.nest("/auth", init_auth_router());
    }

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .with_state(state.clone())
        .layer(cors_layer(&state.config.cors))
        .layer(middleware::from_fn(logging_middleware))
}

async fn health() -> ApiResponse<Value> {
    ApiResponse::ok("OK", json!({ "status": "healthy" }))
}

/// CORS layer for the configured origins, methods and headers.
///
/// `*` as an origin allows any origin. Browsers refuse credentials with a
/// wildcard origin, so that combination drops credentials with a warning.
/// Entries that are not valid header values, methods or names are skipped.
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let any_origin = config.allows_any_origin();

    let origin = if any_origin {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        AllowOrigin::list(origins)
    };

    let methods: Vec<Method> = config
        .allowed_methods
        .iter()
        .filter_map(|method| method.parse().ok())
        .collect();

    let headers: Vec<HeaderName> = config
        .allowed_headers
        .iter()
        .filter_map(|header| header.parse().ok())
        .collect();

    let allow_credentials = if config.allow_credentials && any_origin {
        tracing::warn!("CORS credentials cannot be combined with a wildcard origin, disabling credentials");
        false
    } else {
        config.allow_credentials
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(methods)
        .allow_headers(headers)
        .allow_credentials(allow_credentials)
}
