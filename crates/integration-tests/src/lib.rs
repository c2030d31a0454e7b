//! Integration tests for Brew Concierge.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p brew-concierge-integration-tests
//! ```
//!
//! No database or API key is needed. The fixtures from
//! `brew_concierge::testing` stand in for both:
//!
//! - [`MemoryStore`] serves the shipped reference-data file from memory
//! - [`ScriptedModel`] replays canned Claude responses
//!
//! # Test Categories
//!
//! - `lookup_tools` - Tool behavior against the shipped reference data
//! - `ask_endpoint` - The HTTP surface driven through the router
//! - `reference_data` - Validity of the shipped reference-data file

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;
use std::time::Duration;

use brew_concierge::agent::Agent;
use brew_concierge::claude::LanguageModel;
use brew_concierge::config::AgentSettings;
use brew_concierge::db::{LookupStore, ReferenceData};
use brew_concierge::state::AppState;
use brew_concierge::tools::ToolRegistry;

pub use brew_concierge::testing::{MemoryStore, ScriptedModel, response, text, tool_use};

/// The reference-data file loaded by `bc-cli seed`.
pub const REFERENCE_DATA_YAML: &str = include_str!("../../cli/data/reference_data.yaml");

/// Parse [`REFERENCE_DATA_YAML`].
///
/// # Panics
///
/// Panics if the shipped file does not parse.
#[must_use]
pub fn reference_data() -> ReferenceData {
    ReferenceData::from_yaml(REFERENCE_DATA_YAML).expect("shipped reference data parses")
}

/// In-memory store holding the shipped reference data.
#[must_use]
pub fn shipped_store() -> MemoryStore {
    MemoryStore::new(reference_data())
}

/// Application state around `model` and `store` with no retry delay.
#[must_use]
pub fn app_state(model: Arc<dyn LanguageModel>, store: Arc<dyn LookupStore>) -> AppState {
    let settings = AgentSettings {
        retry_backoff: Duration::ZERO,
        max_retry_delay: Duration::ZERO,
        ..AgentSettings::default()
    };
    AppState::new(Agent::new(
        model,
        store,
        ToolRegistry::customer_service(),
        settings,
        "Brew & Co.",
    ))
}
