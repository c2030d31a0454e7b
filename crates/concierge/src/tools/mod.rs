//! Lookup tools exposed to the language model.
//!
//! Each tool is an independent [`ToolHandler`]: it declares a JSON Schema,
//! validates its input into a typed struct, runs one or two lookups against
//! the [`LookupStore`], and formats a text result. Handlers share no state.
//!
//! The [`ToolRegistry`] maps tool names to handlers. The agent asks it for the
//! tool manifest once and dispatches every `tool_use` block through it.

pub mod brewing;
pub mod club;
pub mod shipping;
pub mod stores;
pub mod support;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{instrument, warn};

use crate::claude::Tool;
use crate::db::{LookupStore, RepositoryError};

pub use brewing::BrewingGuide;
pub use club::{COFFEE_CLUB_SIGNUP_MARKER, CoffeeClub};
pub use shipping::ShippingEstimate;
pub use stores::StoreLocations;
pub use support::SupportRouting;

// =============================================================================
// Errors
// =============================================================================

/// Errors raised while dispatching or running a tool.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The model asked for a tool that is not registered.
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// The tool input did not match the declared schema.
    #[error("invalid input for {tool}: {message}")]
    InvalidInput {
        /// Tool that rejected the input.
        tool: &'static str,
        /// What was wrong with it.
        message: String,
    },

    /// An expected row was absent or the query failed.
    #[error("retrieval failed: {0}")]
    Retrieval(String),
}

impl ToolError {
    /// Whether the error should be handed back to the model as a tool result
    /// instead of failing the run.
    ///
    /// Argument problems are the model's to fix; retrieval failures are not.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::UnknownTool(_) | Self::InvalidInput { .. })
    }

    /// Short machine-readable name for the error variant.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::UnknownTool(_) => "unknown_tool",
            Self::InvalidInput { .. } => "invalid_input",
            Self::Retrieval(_) => "retrieval_error",
        }
    }

    /// Structured dump recorded in the agent trace.
    #[must_use]
    pub fn to_dump(&self) -> serde_json::Value {
        serde_json::json!({
            "type": self.kind(),
            "message": self.to_string(),
        })
    }

    /// Build an `InvalidInput` error.
    pub fn invalid(tool: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            tool,
            message: message.into(),
        }
    }
}

impl From<RepositoryError> for ToolError {
    fn from(err: RepositoryError) -> Self {
        Self::Retrieval(err.to_string())
    }
}

// =============================================================================
// Handler trait
// =============================================================================

/// A single lookup tool.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// Name the model uses to call this tool.
    fn name(&self) -> &'static str;

    /// Manifest entry: name, description and input schema.
    fn definition(&self) -> Tool;

    /// Validate `input` and run the lookup.
    ///
    /// # Errors
    ///
    /// Returns `ToolError::InvalidInput` if `input` does not match the schema
    /// and `ToolError::Retrieval` if a required row is missing or a query
    /// fails.
    async fn invoke(&self, input: &Value, store: &dyn LookupStore) -> Result<String, ToolError>;
}

/// Deserialize a tool's raw input into its typed form.
///
/// # Errors
///
/// Returns `ToolError::InvalidInput` with the serde message when the input
/// has missing fields, unknown enum values or wrong types.
pub fn parse_input<T: DeserializeOwned>(tool: &'static str, input: &Value) -> Result<T, ToolError> {
    serde_json::from_value(input.clone()).map_err(|e| ToolError::invalid(tool, e.to_string()))
}

// =============================================================================
// Registry
// =============================================================================

/// The record of one tool call.
#[derive(Debug)]
pub struct ToolInvocation {
    /// Tool name as requested by the model.
    pub name: String,
    /// Raw input as sent by the model.
    pub input: Value,
    /// Formatted result text or the failure.
    pub outcome: Result<String, ToolError>,
}

impl ToolInvocation {
    /// Text to feed back to the model for this call.
    #[must_use]
    pub fn result_text(&self) -> String {
        match &self.outcome {
            Ok(text) => text.clone(),
            Err(e) => format!("Error: {e}"),
        }
    }
}

/// Name to handler mapping, built once at startup.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    order: Vec<&'static str>,
    handlers: HashMap<&'static str, Arc<dyn ToolHandler>>,
}

impl ToolRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the five customer-service tools.
    #[must_use]
    pub fn customer_service() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(BrewingGuide));
        registry.register(Arc::new(ShippingEstimate));
        registry.register(Arc::new(StoreLocations));
        registry.register(Arc::new(CoffeeClub));
        registry.register(Arc::new(SupportRouting));
        registry
    }

    /// Add a handler. A handler with the same name replaces the old one.
    pub fn register(&mut self, handler: Arc<dyn ToolHandler>) {
        let name = handler.name();
        if self.handlers.insert(name, handler).is_none() {
            self.order.push(name);
        }
    }

    /// Number of registered tools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether no tools are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Tool manifest in registration order.
    #[must_use]
    pub fn manifest(&self) -> Vec<Tool> {
        self.order
            .iter()
            .filter_map(|name| self.handlers.get(name))
            .map(|handler| handler.definition())
            .collect()
    }

    /// Look up the handler for `name` and run it.
    #[instrument(skip(self, input, store), fields(tool_name = %name))]
    pub async fn dispatch(
        &self,
        name: &str,
        input: &Value,
        store: &dyn LookupStore,
    ) -> ToolInvocation {
        let outcome = match self.handlers.get(name) {
            Some(handler) => handler.invoke(input, store).await,
            None => Err(ToolError::UnknownTool(name.to_string())),
        };

        if let Err(e) = &outcome {
            warn!(error = %e, "Tool call failed");
        }

        ToolInvocation {
            name: name.to_string(),
            input: input.clone(),
            outcome,
        }
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.order)
            .finish()
    }
}
