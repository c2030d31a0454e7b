//! Brew Concierge Core - Shared types library.
//!
//! This crate provides common types used across all Brew Concierge components:
//! - `concierge` - HTTP service fronting the language-model agent
//! - `cli` - Command-line tools for migrations and reference data
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Lookup key enums and the agent trace step

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
