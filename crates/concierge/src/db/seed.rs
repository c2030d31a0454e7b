//! Load reference data from YAML into the lookup tables.
//!
//! ## YAML Format
//!
//! ```yaml
//! brewing_methods:
//!   - method: pourover
//!     display_name: Pour-Over
//!     grind_size: Medium-fine
//!     water_temp: 93-96°C
//!     brew_time: 3-4 minutes
//!     instructions: Rinse the filter, bloom for 30 seconds, pour in slow circles.
//! brewing_ratios:
//!   - strength: medium
//!     ratio: 16.0
//!     description: Balanced and sweet
//! shipping_regions: [...]
//! support_categories: [...]
//! store_locations: [...]
//! club_benefits: [...]
//! ```
//!
//! Keyed tables are upserted; store locations and club benefits are replaced
//! wholesale. Everything runs in one transaction.

use std::collections::HashSet;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use tracing::{info, instrument};

use brew_concierge_core::{BrewMethod, City, ShippingRegion, Strength, SupportCategory};

use super::RepositoryError;
use crate::models::{
    BrewingMethodRow, BrewingRatioRow, ClubBenefitRow, ShippingRegionRow, StoreLocationRow,
    SupportCategoryRow,
};

/// Full reference-data file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReferenceData {
    #[serde(default)]
    pub brewing_methods: Vec<BrewingMethodRow>,
    #[serde(default)]
    pub brewing_ratios: Vec<BrewingRatioRow>,
    #[serde(default)]
    pub shipping_regions: Vec<ShippingRegionRow>,
    #[serde(default)]
    pub support_categories: Vec<SupportCategoryRow>,
    #[serde(default)]
    pub store_locations: Vec<StoreLocationRow>,
    #[serde(default)]
    pub club_benefits: Vec<ClubBenefitRow>,
}

impl ReferenceData {
    /// Parse a reference-data YAML document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid YAML or does not match
    /// the expected structure.
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }
}

/// Row counts written by a seed run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub brewing_methods: u64,
    pub brewing_ratios: u64,
    pub shipping_regions: u64,
    pub support_categories: u64,
    pub store_locations: u64,
    pub club_benefits: u64,
}

impl SeedSummary {
    /// Total rows written.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.brewing_methods
            + self.brewing_ratios
            + self.shipping_regions
            + self.support_categories
            + self.store_locations
            + self.club_benefits
    }
}

/// Validate reference data before touching the database.
///
/// Checks that every key belongs to its closed set, keys are unique, ratios
/// are positive, costs are not negative, and every brew method, strength,
/// region and support category is covered.
#[must_use]
pub fn validate_reference_data(data: &ReferenceData) -> Vec<String> {
    let mut errors = Vec::new();

    check_keys::<BrewMethod>(
        "brewing_methods",
        data.brewing_methods.iter().map(|r| r.method.as_str()),
        BrewMethod::keys(),
        &mut errors,
    );
    check_keys::<Strength>(
        "brewing_ratios",
        data.brewing_ratios.iter().map(|r| r.strength.as_str()),
        Strength::keys(),
        &mut errors,
    );
    check_keys::<ShippingRegion>(
        "shipping_regions",
        data.shipping_regions.iter().map(|r| r.region.as_str()),
        ShippingRegion::keys(),
        &mut errors,
    );
    check_keys::<SupportCategory>(
        "support_categories",
        data.support_categories.iter().map(|r| r.category.as_str()),
        SupportCategory::keys(),
        &mut errors,
    );

    for ratio in &data.brewing_ratios {
        if !(ratio.ratio.is_finite() && ratio.ratio > 0.0) {
            errors.push(format!(
                "brewing_ratios: ratio for '{}' must be positive (got {})",
                ratio.strength, ratio.ratio
            ));
        }
    }

    for region in &data.shipping_regions {
        if region.cost < Decimal::ZERO {
            errors.push(format!(
                "shipping_regions: cost for '{}' must not be negative",
                region.region
            ));
        }
    }

    for store in &data.store_locations {
        if let Err(e) = City::from_str(&store.city) {
            errors.push(format!("store_locations: '{}': {e}", store.name));
        }
    }

    errors
}

/// Check one keyed table: keys parse, are unique, and cover the whole set.
fn check_keys<'a, K: FromStr>(
    table: &str,
    keys: impl Iterator<Item = &'a str>,
    expected: Vec<&'static str>,
    errors: &mut Vec<String>,
) where
    K::Err: std::fmt::Display,
{
    let mut seen = HashSet::new();
    for key in keys {
        if let Err(e) = K::from_str(key) {
            errors.push(format!("{table}: {e}"));
        }
        if !seen.insert(key) {
            errors.push(format!("{table}: duplicate key '{key}'"));
        }
    }
    for key in expected {
        if !seen.contains(key) {
            errors.push(format!("{table}: missing key '{key}'"));
        }
    }
}

/// Write reference data to the database in a single transaction.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if any statement fails; nothing is
/// committed in that case.
#[instrument(skip(pool, data))]
pub async fn seed_reference_data(
    pool: &PgPool,
    data: &ReferenceData,
) -> Result<SeedSummary, RepositoryError> {
    let mut tx = pool.begin().await?;
    let mut summary = SeedSummary::default();

    for row in &data.brewing_methods {
        summary.brewing_methods += sqlx::query(
            r"
            INSERT INTO brewing_methods
                (method, display_name, grind_size, water_temp, brew_time, instructions)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (method) DO UPDATE SET
                display_name = EXCLUDED.display_name,
                grind_size = EXCLUDED.grind_size,
                water_temp = EXCLUDED.water_temp,
                brew_time = EXCLUDED.brew_time,
                instructions = EXCLUDED.instructions
            ",
        )
        .bind(&row.method)
        .bind(&row.display_name)
        .bind(&row.grind_size)
        .bind(&row.water_temp)
        .bind(&row.brew_time)
        .bind(&row.instructions)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    }

    for row in &data.brewing_ratios {
        summary.brewing_ratios += sqlx::query(
            r"
            INSERT INTO brewing_ratios (strength, ratio, description)
            VALUES ($1, $2, $3)
            ON CONFLICT (strength) DO UPDATE SET
                ratio = EXCLUDED.ratio,
                description = EXCLUDED.description
            ",
        )
        .bind(&row.strength)
        .bind(row.ratio)
        .bind(&row.description)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    }

    for row in &data.shipping_regions {
        summary.shipping_regions += sqlx::query(
            r"
            INSERT INTO shipping_regions
                (region, display_name, standard_delivery, express_delivery, cost, notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (region) DO UPDATE SET
                display_name = EXCLUDED.display_name,
                standard_delivery = EXCLUDED.standard_delivery,
                express_delivery = EXCLUDED.express_delivery,
                cost = EXCLUDED.cost,
                notes = EXCLUDED.notes
            ",
        )
        .bind(&row.region)
        .bind(&row.display_name)
        .bind(&row.standard_delivery)
        .bind(&row.express_delivery)
        .bind(row.cost)
        .bind(&row.notes)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    }

    for row in &data.support_categories {
        summary.support_categories += sqlx::query(
            r"
            INSERT INTO support_categories (category, display_name, response_time, email)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (category) DO UPDATE SET
                display_name = EXCLUDED.display_name,
                response_time = EXCLUDED.response_time,
                email = EXCLUDED.email
            ",
        )
        .bind(&row.category)
        .bind(&row.display_name)
        .bind(&row.response_time)
        .bind(&row.email)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    }

    sqlx::query("DELETE FROM store_locations")
        .execute(&mut *tx)
        .await?;
    for row in &data.store_locations {
        summary.store_locations += sqlx::query(
            r"
            INSERT INTO store_locations (city, name, address, hours, phone, features)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(&row.city)
        .bind(&row.name)
        .bind(&row.address)
        .bind(&row.hours)
        .bind(&row.phone)
        .bind(&row.features)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    }

    sqlx::query("DELETE FROM coffee_club_benefits")
        .execute(&mut *tx)
        .await?;
    for row in &data.club_benefits {
        summary.club_benefits += sqlx::query(
            r"
            INSERT INTO coffee_club_benefits (title, description, sort_order)
            VALUES ($1, $2, $3)
            ",
        )
        .bind(&row.title)
        .bind(&row.description)
        .bind(row.sort_order)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    }

    tx.commit().await?;

    info!(rows = summary.total(), "Reference data seeded");
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r"
brewing_ratios:
  - strength: light
    ratio: 17.0
    description: Delicate
  - strength: medium
    ratio: 16.0
    description: Balanced
  - strength: strong
    ratio: 15.0
    description: Bold
shipping_regions:
  - region: canada
    display_name: Canada
    standard_delivery: 7-10 business days
    express_delivery: 3-5 business days
    cost: '14.99'
store_locations:
  - city: seattle
    name: Pike Place Roastery
    address: 1 Pike St
    hours: 7am-7pm
    phone: 206-555-0100
";

    #[test]
    fn test_from_yaml_parses_rows() {
        let data = ReferenceData::from_yaml(MINIMAL).expect("parse");
        assert_eq!(data.brewing_ratios.len(), 3);
        assert_eq!(data.shipping_regions[0].cost, Decimal::new(1499, 2));
        assert_eq!(data.shipping_regions[0].notes, None);
        assert_eq!(data.store_locations[0].id, 0);
        assert!(data.club_benefits.is_empty());
    }

    #[test]
    fn test_from_yaml_rejects_unknown_table() {
        let result = ReferenceData::from_yaml("espresso_machines: []");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_reports_missing_keys() {
        let data = ReferenceData::from_yaml(MINIMAL).expect("parse");
        let errors = validate_reference_data(&data);

        assert!(errors.contains(&"brewing_methods: missing key 'pourover'".to_string()));
        assert!(errors.contains(&"shipping_regions: missing key 'northeast'".to_string()));
        assert!(!errors.iter().any(|e| e.starts_with("brewing_ratios")));
    }

    #[test]
    fn test_validate_reports_unknown_and_duplicate_keys() {
        let mut data = ReferenceData::from_yaml(MINIMAL).expect("parse");
        let mut extra = data.brewing_ratios[0].clone();
        data.brewing_ratios.push(extra.clone());
        extra.strength = "decaf".to_string();
        data.brewing_ratios.push(extra);

        let errors = validate_reference_data(&data);
        assert!(errors.contains(&"brewing_ratios: duplicate key 'light'".to_string()));
        assert!(errors.contains(&"brewing_ratios: invalid strength: decaf".to_string()));
    }

    #[test]
    fn test_validate_rejects_bad_ratio_cost_and_city() {
        let mut data = ReferenceData::from_yaml(MINIMAL).expect("parse");
        data.brewing_ratios[0].ratio = 0.0;
        data.shipping_regions[0].cost = Decimal::new(-1, 0);
        data.store_locations[0].city = "boise".to_string();

        let errors = validate_reference_data(&data);
        assert!(errors.iter().any(|e| e.contains("ratio for 'light' must be positive")));
        assert!(errors.iter().any(|e| e.contains("cost for 'canada' must not be negative")));
        assert!(
            errors.contains(
                &"store_locations: 'Pike Place Roastery': invalid city: boise".to_string()
            )
        );
    }

    #[test]
    fn test_summary_total() {
        let summary = SeedSummary {
            brewing_methods: 6,
            brewing_ratios: 3,
            shipping_regions: 9,
            support_categories: 5,
            store_locations: 4,
            club_benefits: 5,
        };
        assert_eq!(summary.total(), 32);
    }
}
