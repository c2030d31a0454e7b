//! HTTP route handlers for the concierge.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (pings the database)
//! POST /ask                    - Answer a customer question
//! ```

pub mod ask;
pub mod health;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Routes without state, for composition.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .route("/ask", post(ask::ask))
}

/// Routes bound to `state`.
pub fn router(state: AppState) -> Router {
    routes().with_state(state)
}
