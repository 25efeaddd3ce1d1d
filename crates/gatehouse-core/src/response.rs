//! JSON response envelopes.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

/// Success envelope: `{"message": ..., "body": ...}`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ApiResponse<T> {
    pub message: String,
    pub body: T,
    #[serde(skip)]
    pub status: StatusCode,
}

impl<T> ApiResponse<T> {
    pub fn new(status: StatusCode, message: impl Into<String>, body: T) -> Self {
        Self {
            message: message.into(),
            body,
            status,
        }
    }

    pub fn ok(message: impl Into<String>, body: T) -> Self {
        Self::new(StatusCode::OK, message, body)
    }

    pub fn created(message: impl Into<String>, body: T) -> Self {
        Self::new(StatusCode::CREATED, message, body)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

/// Failure envelope: `{"error": ..., "message": ..., "status": ...}`.
///
/// `error` is a short machine readable code, `message` is meant for humans.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiError {
    pub error: String,
    pub message: String,
    pub status: u16,
}

impl ApiError {
    pub fn new(status: StatusCode, error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status: status.as_u16(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Serialized envelope, for transports that write raw bodies.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(
                r#"{{"error":"internal_error","message":"failed to encode error","status":{}}}"#,
                self.status
            )
        })
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self)).into_response()
    }
}
