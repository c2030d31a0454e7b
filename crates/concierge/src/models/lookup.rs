//! Reference rows read by the lookup tools.
//!
//! Rows are fetched by exact key and never cached. They also deserialize
//! from the YAML reference-data file used by `bc-cli seed`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Parameters for one brewing method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct BrewingMethodRow {
    /// Method key (e.g. `french-press`).
    pub method: String,
    /// Name shown to customers.
    pub display_name: String,
    /// Grind size description.
    pub grind_size: String,
    /// Water temperature description.
    pub water_temp: String,
    /// Brew time description.
    pub brew_time: String,
    /// Step-by-step instructions.
    pub instructions: String,
}

/// Water-to-coffee ratio for a brew strength.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct BrewingRatioRow {
    /// Strength key (e.g. `medium`).
    pub strength: String,
    /// Millilitres of water per gram of coffee.
    pub ratio: f64,
    /// Tasting note for this strength.
    pub description: String,
}

/// Delivery windows and pricing for a shipping region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ShippingRegionRow {
    /// Region key (e.g. `west-coast`).
    pub region: String,
    /// Name shown to customers.
    pub display_name: String,
    /// Standard delivery window (e.g. "3-5 business days").
    pub standard_delivery: String,
    /// Express delivery window.
    pub express_delivery: String,
    /// Flat shipping cost in USD.
    pub cost: Decimal,
    /// Region-specific notes (customs, carriers).
    pub notes: Option<String>,
}

/// Routing metadata for a support category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct SupportCategoryRow {
    /// Category key (e.g. `order-issue`).
    pub category: String,
    /// Name shown to customers.
    pub display_name: String,
    /// Response-time commitment (e.g. "within 24 hours").
    pub response_time: String,
    /// Team inbox for this category.
    pub email: String,
}

/// A physical cafe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct StoreLocationRow {
    /// Database ID (assigned on insert).
    #[serde(default)]
    pub id: i32,
    /// City key (e.g. `seattle`).
    pub city: String,
    /// Store name.
    pub name: String,
    /// Street address.
    pub address: String,
    /// Opening hours.
    pub hours: String,
    /// Phone number.
    pub phone: String,
    /// Amenities (e.g. "Roastery tours, Wi-Fi").
    pub features: Option<String>,
}

/// One coffee club membership benefit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ClubBenefitRow {
    /// Database ID (assigned on insert).
    #[serde(default)]
    pub id: i32,
    /// Short benefit title.
    pub title: String,
    /// Benefit details.
    pub description: String,
    /// Display order (ascending).
    pub sort_order: i32,
}
