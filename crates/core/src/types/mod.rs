//! Core types for Brew Concierge.
//!
//! This module provides the closed input sets the lookup tools accept and the
//! trace entry type returned to HTTP callers.

pub mod brewing;
pub mod key;
pub mod shipping;
pub mod step;
pub mod support;

pub use brewing::{BrewMethod, Strength};
pub use key::UnknownKey;
pub use shipping::{ShippingMethod, ShippingRegion};
pub use step::{ConversationStep, STEP_ERROR, STEP_RETRY};
pub use support::{City, SupportCategory, Urgency};
