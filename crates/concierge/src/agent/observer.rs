//! Step trace collection for a single agent run.
//!
//! The agent emits [`AgentEvent`]s into an [`EventSink`]; the request handler
//! drains the paired [`StepTrace`] once the run finishes. Each request gets its
//! own unbounded channel, so steps keep their emission order and never mix
//! across requests.

use serde_json::Value;
use tokio::sync::mpsc;
use tracing::debug;

use brew_concierge_core::{ConversationStep, STEP_ERROR, STEP_RETRY};

/// Content of every `retry` step.
pub const RETRY_MESSAGE: &str = "Retrying request to the language model";

/// Update key for text produced by the model.
pub const UPDATE_AGENT: &str = "agent";

/// Update key for a tool call requested by the model.
pub const UPDATE_TOOL_CALL: &str = "tool_call";

/// Update key for the text a tool returned.
pub const UPDATE_TOOL_RESULT: &str = "tool_result";

/// Something that happened during a run.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentEvent {
    /// A failure, as a structured `{"type", "message"}` dump.
    Error(Value),
    /// A failed model call is about to be retried.
    Retry,
    /// Intermediate progress keyed by kind.
    Update {
        /// Step kind (e.g. `tool_call`).
        key: String,
        /// Step content.
        value: String,
    },
}

impl From<AgentEvent> for ConversationStep {
    fn from(event: AgentEvent) -> Self {
        match event {
            AgentEvent::Error(dump) => Self::new(STEP_ERROR, dump.to_string()),
            AgentEvent::Retry => Self::new(STEP_RETRY, RETRY_MESSAGE),
            AgentEvent::Update { key, value } => Self::new(key, value),
        }
    }
}

/// Sending half of a run's event channel.
#[derive(Debug, Clone)]
pub struct EventSink {
    tx: mpsc::UnboundedSender<AgentEvent>,
}

impl EventSink {
    /// Create a sink and the trace that collects from it.
    #[must_use]
    pub fn channel() -> (Self, StepTrace) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, StepTrace { rx })
    }

    /// Emit an event. Dropped silently if the trace is gone.
    pub fn emit(&self, event: AgentEvent) {
        if self.tx.send(event).is_err() {
            debug!("Step trace closed, event dropped");
        }
    }

    /// Emit an `error` event.
    pub fn error(&self, dump: Value) {
        self.emit(AgentEvent::Error(dump));
    }

    /// Emit a `retry` event.
    pub fn retry(&self) {
        self.emit(AgentEvent::Retry);
    }

    /// Emit an `update` event.
    pub fn update(&self, key: &str, value: impl Into<String>) {
        self.emit(AgentEvent::Update {
            key: key.to_string(),
            value: value.into(),
        });
    }
}

/// Receiving half of a run's event channel.
#[derive(Debug)]
pub struct StepTrace {
    rx: mpsc::UnboundedReceiver<AgentEvent>,
}

impl StepTrace {
    /// Wait for every sink to drop and return the steps in emission order.
    pub async fn collect(mut self) -> Vec<ConversationStep> {
        let mut steps = Vec::new();
        while let Some(event) = self.rx.recv().await {
            steps.push(event.into());
        }
        steps
    }
}
