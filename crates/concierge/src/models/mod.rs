//! Domain models for the concierge.

pub mod lookup;

pub use lookup::{
    BrewingMethodRow, BrewingRatioRow, ClubBenefitRow, ShippingRegionRow, StoreLocationRow,
    SupportCategoryRow,
};
