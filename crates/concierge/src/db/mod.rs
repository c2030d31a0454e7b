//! Database operations for the concierge `PostgreSQL` database.
//!
//! ## Tables
//!
//! - `brewing_methods` - Grind, temperature and steps per brewing method
//! - `brewing_ratios` - Water-to-coffee ratio per strength
//! - `shipping_regions` - Delivery windows and cost per region
//! - `support_categories` - Response-time commitment per support queue
//! - `store_locations` - Cafes by city
//! - `coffee_club_benefits` - Membership benefits
//!
//! All tables are read-only reference data for the service. They are
//! populated with `bc-cli seed`.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/concierge/migrations/` and run via:
//! ```bash
//! cargo run -p brew-concierge-cli -- migrate
//! ```

pub mod lookups;
pub mod seed;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use brew_concierge_core::{BrewMethod, City, ShippingRegion, Strength, SupportCategory};

use crate::models::{
    BrewingMethodRow, BrewingRatioRow, ClubBenefitRow, ShippingRegionRow, StoreLocationRow,
    SupportCategoryRow,
};

pub use lookups::PgLookupRepository;
pub use seed::{ReferenceData, SeedSummary, seed_reference_data, validate_reference_data};

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Read access to the reference tables.
///
/// Every method is a single exact-key read. `Ok(None)` or an empty `Vec`
/// means the row does not exist; errors mean the query itself failed.
#[async_trait]
pub trait LookupStore: Send + Sync {
    /// Parameters for a brewing method.
    async fn brewing_method(
        &self,
        method: BrewMethod,
    ) -> Result<Option<BrewingMethodRow>, RepositoryError>;

    /// Ratio for a brew strength.
    async fn brewing_ratio(
        &self,
        strength: Strength,
    ) -> Result<Option<BrewingRatioRow>, RepositoryError>;

    /// Delivery windows for a region.
    async fn shipping_region(
        &self,
        region: ShippingRegion,
    ) -> Result<Option<ShippingRegionRow>, RepositoryError>;

    /// Cafes in a city, ordered by name.
    async fn store_locations(&self, city: City) -> Result<Vec<StoreLocationRow>, RepositoryError>;

    /// All coffee club benefits, in display order.
    async fn club_benefits(&self) -> Result<Vec<ClubBenefitRow>, RepositoryError>;

    /// Routing metadata for a support category.
    async fn support_category(
        &self,
        category: SupportCategory,
    ) -> Result<Option<SupportCategoryRow>, RepositoryError>;

    /// Check that the store is reachable.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
