//! Error types for the Claude API client.

use serde_json::json;
use thiserror::Error;

/// Errors that can occur when interacting with the Claude API.
#[derive(Debug, Error)]
pub enum ClaudeError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Claude API returned an error.
    #[error("API error ({error_type}): {message}")]
    Api {
        /// Error type from the API.
        error_type: String,
        /// Error message.
        message: String,
    },

    /// Rate limited by the API.
    #[error("rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Authentication failed.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Failed to parse response.
    #[error("parse error: {0}")]
    Parse(String),
}

impl ClaudeError {
    /// Short machine-readable name for the error variant.
    #[must_use]
    pub fn kind(&self) -> &str {
        match self {
            Self::Http(_) => "http_error",
            Self::Api { error_type, .. } => error_type,
            Self::RateLimited(_) => "rate_limited",
            Self::Unauthorized(_) => "unauthorized",
            Self::Parse(_) => "parse_error",
        }
    }

    /// Whether repeating the same request could succeed.
    ///
    /// Authentication and malformed-request failures are permanent.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Unauthorized(_) => false,
            Self::Api { error_type, .. } => !matches!(
                error_type.as_str(),
                "invalid_request_error" | "authentication_error" | "permission_error"
            ),
            Self::Http(_) | Self::RateLimited(_) | Self::Parse(_) => true,
        }
    }

    /// Structured dump recorded in the agent trace.
    #[must_use]
    pub fn to_dump(&self) -> serde_json::Value {
        json!({
            "type": self.kind(),
            "message": self.to_string(),
            "retryable": self.is_retryable(),
        })
    }
}

/// API error response from Claude.
#[derive(Debug, serde::Deserialize)]
pub struct ApiErrorResponse {
    /// Error type.
    #[serde(rename = "type")]
    pub error_type: String,
    /// Nested error details.
    pub error: ApiError,
}

/// Nested error details.
#[derive(Debug, serde::Deserialize)]
pub struct ApiError {
    /// Error type.
    #[serde(rename = "type")]
    pub error_type: String,
    /// Error message.
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claude_error_display() {
        let err = ClaudeError::RateLimited(60);
        assert_eq!(err.to_string(), "rate limited, retry after 60 seconds");

        let err = ClaudeError::Api {
            error_type: "overloaded_error".to_string(),
            message: "Overloaded".to_string(),
        };
        assert_eq!(err.to_string(), "API error (overloaded_error): Overloaded");
    }

    #[test]
    fn test_retryable_classification() {
        assert!(ClaudeError::RateLimited(1).is_retryable());
        assert!(
            ClaudeError::Api {
                error_type: "overloaded_error".to_string(),
                message: String::new(),
            }
            .is_retryable()
        );
        assert!(!ClaudeError::Unauthorized("bad key".to_string()).is_retryable());
        assert!(
            !ClaudeError::Api {
                error_type: "invalid_request_error".to_string(),
                message: String::new(),
            }
            .is_retryable()
        );
    }

    #[test]
    fn test_dump_shape() {
        let dump = ClaudeError::Parse("truncated body".to_string()).to_dump();
        assert_eq!(dump["type"], "parse_error");
        assert_eq!(dump["message"], "parse error: truncated body");
        assert_eq!(dump["retryable"], true);
    }

    #[test]
    fn test_api_error_deserialization() {
        let json = r#"{
            "type": "error",
            "error": {
                "type": "invalid_request_error",
                "message": "max_tokens is too large"
            }
        }"#;

        let response: ApiErrorResponse = serde_json::from_str(json).expect("deserialize");
        assert_eq!(response.error_type, "error");
        assert_eq!(response.error.error_type, "invalid_request_error");
        assert_eq!(response.error.message, "max_tokens is too large");
    }
}
