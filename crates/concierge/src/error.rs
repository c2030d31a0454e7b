//! Unified error handling for the HTTP surface.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::agent::AgentError;

/// Message returned when the request has no usable question.
pub const QUESTION_REQUIRED: &str = "Question is required";

/// Message returned when the agent run fails.
pub const INTERNAL_ERROR: &str = "Internal server error";

/// Message returned when the agent task panics or is cancelled.
pub const UNKNOWN_ERROR: &str = "Unknown error occurred";

/// Application-level error type for the concierge API.
#[derive(Debug, Error)]
pub enum AppError {
    /// The request body was missing, malformed or had an empty question.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The agent run failed.
    #[error("Agent error: {0}")]
    Agent(#[from] AgentError),

    /// The agent task did not complete.
    #[error("Task error: {0}")]
    Unknown(String),
}

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Client-facing message.
    pub error: &'static str,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log server errors with Sentry
        if matches!(self, Self::Agent(_) | Self::Unknown(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Ask request error"
            );
        } else {
            tracing::debug!(error = %self, "Rejected ask request");
        }

        // Don't expose internal error details to clients
        let (status, message) = match &self {
            Self::Validation(_) => (StatusCode::BAD_REQUEST, QUESTION_REQUIRED),
            Self::Agent(_) => (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR),
            Self::Unknown(_) => (StatusCode::INTERNAL_SERVER_ERROR, UNKNOWN_ERROR),
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
