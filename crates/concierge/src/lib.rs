//! Brew Concierge library.
//!
//! A customer-service agent for a coffee roaster, served over HTTP. The agent
//! answers questions with the help of five lookup tools backed by `PostgreSQL`
//! reference tables:
//!
//! - `brewing_guide` - recipe for a brewing method, strength and serving count
//! - `shipping_estimate` - delivery window and cost per region
//! - `store_locations` - cafes in a city
//! - `coffee_club` - membership benefits and signup prompt
//! - `support_routing` - the right support channel for an issue
//!
//! The binary in `main.rs` wires configuration, the database pool and the
//! Claude client into [`routes::router`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod agent;
pub mod claude;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;
pub mod tools;

#[cfg(any(test, feature = "testing"))]
pub mod testing;
