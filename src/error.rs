use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PlannerError>;

#[derive(Debug, Error)]
pub enum PlannerError {
    /// Required request fields that are absent or unusable. Raised before any
    /// outbound call is made.
    #[error("validation failed (missing: {missing:?}, invalid: {invalid:?})")]
    Validation {
        missing: Vec<String>,
        invalid: Vec<String>,
    },

    #[error("bad request: {0}")]
    BadRequest(String),

    /// A flight or hotel provider call failed. The orchestrator treats this
    /// as a soft failure for the affected category.
    #[error("{service} upstream error: {message}")]
    Upstream {
        service: &'static str,
        message: String,
    },

    #[error("completion request failed: {0}")]
    Completion(String),

    #[error("completion request timed out after {}s", .0.as_secs())]
    CompletionTimeout(Duration),

    #[error("completion returned no text")]
    EmptyCompletion,

    #[error("malformed destination suggestions: {0}")]
    MalformedSuggestions(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl PlannerError {
    pub fn upstream(service: &'static str, message: impl Into<String>) -> Self {
        Self::Upstream {
            service,
            message: message.into(),
        }
    }

    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::BadRequest(_))
    }
}

impl IntoResponse for PlannerError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            PlannerError::Validation { missing, invalid } => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "Missing or invalid required fields",
                    "missing": missing,
                    "invalid": invalid,
                }),
            ),
            PlannerError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            other => {
                tracing::error!(error = %other, "Internal Server Error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal Server Error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
