//! `PostgreSQL` implementation of [`LookupStore`].
//!
//! Runtime-checked queries; no database is needed at compile time.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use brew_concierge_core::{BrewMethod, City, ShippingRegion, Strength, SupportCategory};

use super::{LookupStore, RepositoryError};
use crate::models::{
    BrewingMethodRow, BrewingRatioRow, ClubBenefitRow, ShippingRegionRow, StoreLocationRow,
    SupportCategoryRow,
};

/// Repository for the reference tables.
#[derive(Clone)]
pub struct PgLookupRepository {
    pool: PgPool,
}

impl PgLookupRepository {
    /// Create a new lookup repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LookupStore for PgLookupRepository {
    #[instrument(skip(self), fields(method = %method))]
    async fn brewing_method(
        &self,
        method: BrewMethod,
    ) -> Result<Option<BrewingMethodRow>, RepositoryError> {
        let row = sqlx::query_as::<_, BrewingMethodRow>(
            r"
            SELECT method, display_name, grind_size, water_temp, brew_time, instructions
            FROM brewing_methods
            WHERE method = $1
            ",
        )
        .bind(method.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    #[instrument(skip(self), fields(strength = %strength))]
    async fn brewing_ratio(
        &self,
        strength: Strength,
    ) -> Result<Option<BrewingRatioRow>, RepositoryError> {
        let row = sqlx::query_as::<_, BrewingRatioRow>(
            r"
            SELECT strength, ratio, description
            FROM brewing_ratios
            WHERE strength = $1
            ",
        )
        .bind(strength.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    #[instrument(skip(self), fields(region = %region))]
    async fn shipping_region(
        &self,
        region: ShippingRegion,
    ) -> Result<Option<ShippingRegionRow>, RepositoryError> {
        let row = sqlx::query_as::<_, ShippingRegionRow>(
            r"
            SELECT region, display_name, standard_delivery, express_delivery, cost, notes
            FROM shipping_regions
            WHERE region = $1
            ",
        )
        .bind(region.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    #[instrument(skip(self), fields(city = %city))]
    async fn store_locations(&self, city: City) -> Result<Vec<StoreLocationRow>, RepositoryError> {
        let rows = sqlx::query_as::<_, StoreLocationRow>(
            r"
            SELECT id, city, name, address, hours, phone, features
            FROM store_locations
            WHERE city = $1
            ORDER BY name
            ",
        )
        .bind(city.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    #[instrument(skip(self))]
    async fn club_benefits(&self) -> Result<Vec<ClubBenefitRow>, RepositoryError> {
        let rows = sqlx::query_as::<_, ClubBenefitRow>(
            r"
            SELECT id, title, description, sort_order
            FROM coffee_club_benefits
            ORDER BY sort_order, id
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    #[instrument(skip(self), fields(category = %category))]
    async fn support_category(
        &self,
        category: SupportCategory,
    ) -> Result<Option<SupportCategoryRow>, RepositoryError> {
        let row = sqlx::query_as::<_, SupportCategoryRow>(
            r"
            SELECT category, display_name, response_time, email
            FROM support_categories
            WHERE category = $1
            ",
        )
        .bind(category.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
