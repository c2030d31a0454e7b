//! Agent run trace entries.

use serde::{Deserialize, Serialize};

/// Step kind recorded when the language model call fails.
pub const STEP_ERROR: &str = "error";

/// Step kind recorded before a failed model call is retried.
pub const STEP_RETRY: &str = "retry";

/// One entry in the ordered trace of an agent run.
///
/// `kind` is `error`, `retry`, or the key of an update event (for example
/// `tool_call`). Serializes as `{"type": ..., "content": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationStep {
    /// Step kind.
    #[serde(rename = "type")]
    pub kind: String,
    /// Step payload as text.
    pub content: String,
}

impl ConversationStep {
    /// Create a step.
    #[must_use]
    pub fn new(kind: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            content: content.into(),
        }
    }

    /// Whether this step records a failure.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.kind == STEP_ERROR
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_serializes_kind_as_type() {
        let step = ConversationStep::new("tool_call", "brewing_guide");
        let json = serde_json::to_value(&step).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({"type": "tool_call", "content": "brewing_guide"})
        );
    }

    #[test]
    fn test_is_error() {
        assert!(ConversationStep::new(STEP_ERROR, "{}").is_error());
        assert!(!ConversationStep::new(STEP_RETRY, "").is_error());
    }
}
