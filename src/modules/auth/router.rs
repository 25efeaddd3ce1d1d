use axum::{
    Router,
    body::Body,
    middleware,
    routing::{get, post},
};

use super::controller::{claims, issue_token, me};
use crate::middleware::auth::require_bearer;
use crate::state::AppState;
use crate::transport::bearer_layer;

/// `POST /token`. Only mounted when `TOKEN_ENDPOINT_ENABLED` is set.
pub fn init_auth_router() -> Router<AppState> {
    Router::new().route("/token", post(issue_token))
}

/// Protected identity routes, one per binding:
/// `/me` behind the axum middleware, `/claims` behind the tower layer.
pub fn init_identity_router(state: &AppState) -> Router<AppState> {
    let middleware_routes = Router::new()
        .route("/me", get(me))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_bearer));

    let layer_routes = Router::new()
        .route("/claims", get(claims))
        .route_layer(bearer_layer::<Body>(state.authorizer.clone()));

    middleware_routes.merge(layer_routes)
}
