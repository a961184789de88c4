//! Handler errors

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chartview_service::ServiceError;
use serde_json::json;

/// A failed request, answered as `500 {"error": message}`
#[derive(Debug)]
pub struct ApiError {
    kind: &'static str,
    message: String,
}

impl ApiError {
    /// Wrap a service failure behind a context line
    pub fn service(context: impl std::fmt::Display, err: ServiceError) -> Self {
        Self {
            kind: err.kind(),
            message: format!("{}: {}", context, err),
        }
    }

    pub fn invalid_body(message: impl Into<String>) -> Self {
        Self {
            kind: "invalid_input",
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!(kind = self.kind, error = %self.message, "request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": self.message })),
        )
            .into_response()
    }
}
