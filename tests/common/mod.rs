#![allow(dead_code)]

use axum::{Router, body::Body, http::Request, response::Response};
use chrono::{DateTime, TimeDelta, Utc};
use gatehouse::router::init_router;
use gatehouse::state::AppState;
use gatehouse_auth::{ClaimSet, SigningKey, TokenIssuer};
use gatehouse_config::{AppConfig, JwtConfig};
use http_body_util::BodyExt;
use serde_json::Value;

pub const TEST_SECRET: &str = "test_secret_key_for_testing_purposes";

pub fn test_config() -> AppConfig {
    AppConfig::new(JwtConfig::new(TEST_SECRET))
}

pub fn test_app() -> Router {
    init_router(AppState::new(test_config()).unwrap())
}

pub fn test_app_with(config: AppConfig) -> Router {
    init_router(AppState::new(config).unwrap())
}

/// Token for `subject` signed with `secret`, issued at `issued_at` with a 15 minute lifetime.
pub fn token_at(secret: &str, subject: &str, issued_at: DateTime<Utc>) -> String {
    TokenIssuer::new(SigningKey::new(secret), TimeDelta::minutes(15))
        .issue_at(subject, ClaimSet::new().with("role", "admin"), issued_at)
        .unwrap()
        .token
}

pub fn fresh_token(subject: &str) -> String {
    token_at(TEST_SECRET, subject, Utc::now())
}

pub fn get(uri: &str, authorization: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(value) = authorization {
        builder = builder.header("Authorization", value);
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
