//! Application state shared across handlers.

use std::sync::Arc;

use crate::agent::Agent;
use crate::db::LookupStore;

/// Application state shared across all handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

#[derive(Debug)]
struct AppStateInner {
    agent: Arc<Agent>,
}

impl AppState {
    /// Create application state around a configured agent.
    #[must_use]
    pub fn new(agent: Agent) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                agent: Arc::new(agent),
            }),
        }
    }

    /// Shared handle to the agent, for moving into spawned tasks.
    #[must_use]
    pub fn agent(&self) -> Arc<Agent> {
        Arc::clone(&self.inner.agent)
    }

    /// The reference-data store behind the tools.
    #[must_use]
    pub fn store(&self) -> &dyn LookupStore {
        self.inner.agent.store()
    }
}
