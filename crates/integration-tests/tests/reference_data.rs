//! The shipped reference-data file is complete and valid.

use brew_concierge::db::validate_reference_data;
use brew_concierge_core::{BrewMethod, City, ShippingRegion, Strength, SupportCategory};
use brew_concierge_integration_tests::reference_data;

#[test]
fn test_shipped_file_validates() {
    let errors = validate_reference_data(&reference_data());
    assert!(errors.is_empty(), "validation errors: {errors:?}");
}

#[test]
fn test_every_keyed_table_is_complete() {
    let data = reference_data();
    assert_eq!(data.brewing_methods.len(), BrewMethod::ALL.len());
    assert_eq!(data.brewing_ratios.len(), Strength::ALL.len());
    assert_eq!(data.shipping_regions.len(), ShippingRegion::ALL.len());
    assert_eq!(data.support_categories.len(), SupportCategory::ALL.len());
}

#[test]
fn test_at_least_one_city_has_no_stores() {
    let data = reference_data();
    let empty = City::ALL
        .iter()
        .filter(|city| !data.store_locations.iter().any(|s| s.city == city.as_str()))
        .count();
    assert!(empty >= 1, "keep a city without stores to exercise the empty reply");
}

#[test]
fn test_benefit_order_is_unique() {
    let data = reference_data();
    let mut orders: Vec<i32> = data.club_benefits.iter().map(|b| b.sort_order).collect();
    orders.sort_unstable();
    orders.dedup();
    assert_eq!(orders.len(), data.club_benefits.len());
}
