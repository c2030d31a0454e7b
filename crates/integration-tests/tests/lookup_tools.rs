//! Lookup tools against the shipped reference data.
//!
//! Every tool is dispatched through the registry, the same path the agent
//! takes, so validation and error classification are exercised too.

use serde_json::{Value, json};

use brew_concierge::tools::brewing::compute_recipe;
use brew_concierge::tools::stores::no_stores_message;
use brew_concierge::tools::support::{
    EMERGENCY_PHONE, HELP_CENTER_URL, SUPPORT_PHONE, fallback_message,
};
use brew_concierge::tools::{COFFEE_CLUB_SIGNUP_MARKER, ToolError, ToolRegistry};
use brew_concierge_core::{BrewMethod, City, Strength, SupportCategory};
use brew_concierge_integration_tests::{MemoryStore, reference_data, shipped_store};

async fn call(store: &MemoryStore, tool: &str, input: Value) -> Result<String, ToolError> {
    ToolRegistry::customer_service()
        .dispatch(tool, &input, store)
        .await
        .outcome
}

// =============================================================================
// Brewing guide
// =============================================================================

#[tokio::test]
async fn test_brewing_dose_for_every_input() {
    let store = shipped_store();
    let data = reference_data();

    for method in BrewMethod::ALL {
        for strength in Strength::ALL {
            let ratio = data
                .brewing_ratios
                .iter()
                .find(|r| r.strength == strength.as_str())
                .expect("ratio row")
                .ratio;

            for servings in 1..=8_u32 {
                let text = call(
                    &store,
                    "brewing_guide",
                    json!({"method": method, "strength": strength, "servings": servings}),
                )
                .await
                .expect("recipe");

                let recipe = compute_recipe(servings, ratio);
                assert_eq!(recipe.coffee_grams, servings * 15);
                assert!((recipe.water_ml - f64::from(servings * 15) * ratio).abs() < f64::EPSILON);
                assert!(
                    text.contains(&format!("Coffee: {}g", recipe.coffee_grams)),
                    "{method} {strength} {servings}: {text}"
                );
                assert!(text.contains(&format!("Water: {}ml", recipe.water_ml)));
            }
        }
    }
}

#[tokio::test]
async fn test_brewing_rejects_nine_servings() {
    let store = shipped_store();
    let err = call(
        &store,
        "brewing_guide",
        json!({"method": "pourover", "strength": "light", "servings": 9}),
    )
    .await
    .expect_err("out of range");

    assert!(err.is_recoverable());
    assert_eq!(store.queries(), 0, "validation happens before any query");
}

// =============================================================================
// Store locations
// =============================================================================

#[tokio::test]
async fn test_city_without_stores_returns_message() {
    let store = shipped_store();
    let text = call(&store, "store_locations", json!({"city": "austin"}))
        .await
        .expect("not an error");

    assert_eq!(text, no_stores_message(City::Austin));
}

#[tokio::test]
async fn test_city_with_stores_lists_each() {
    let store = shipped_store();
    let text = call(&store, "store_locations", json!({"city": "seattle"}))
        .await
        .expect("stores");

    assert!(text.contains("Capitol Hill Cafe"));
    assert!(text.contains("Pike Place Roastery"));
    assert!(text.contains("Phone: 206-555-0142"));
}

// =============================================================================
// Shipping estimate
// =============================================================================

#[tokio::test]
async fn test_shipping_express_and_default() {
    let store = shipped_store();

    let express = call(
        &store,
        "shipping_estimate",
        json!({"region": "canada", "method": "express"}),
    )
    .await
    .expect("express");
    assert!(express.contains("4-6 business days"));
    assert!(!express.contains("7-12 business days"));

    let default = call(&store, "shipping_estimate", json!({"region": "canada"}))
        .await
        .expect("default");
    assert!(default.contains("(standard): 7-12 business days"));
    assert!(default.contains("Cost: $16.99"));
    assert!(default.contains("Duties and taxes"));
}

#[tokio::test]
async fn test_shipping_query_failure_propagates() {
    let store = shipped_store();
    store.set_failing(true);

    let err = call(&store, "shipping_estimate", json!({"region": "midwest"}))
        .await
        .expect_err("propagates");
    assert!(matches!(err, ToolError::Retrieval(_)));
}

// =============================================================================
// Coffee club
// =============================================================================

#[tokio::test]
async fn test_club_lists_benefits_in_order_with_marker() {
    let store = shipped_store();
    let text = call(&store, "coffee_club", json!({"action": "join"}))
        .await
        .expect("benefits");

    let monthly = text.find("Monthly coffee").expect("first benefit");
    let flexible = text.find("Flexible plan").expect("last benefit");
    assert!(monthly < flexible);
    assert!(text.ends_with(COFFEE_CLUB_SIGNUP_MARKER));
}

// =============================================================================
// Support routing
// =============================================================================

#[tokio::test]
async fn test_high_urgency_is_phone_for_every_category() {
    let store = shipped_store();
    for category in SupportCategory::ALL {
        let text = call(
            &store,
            "support_routing",
            json!({"topic": "Need help now", "urgency": "high", "category": category}),
        )
        .await
        .expect("routing");
        assert!(text.contains(SUPPORT_PHONE), "{category}: {text}");
    }
}

#[tokio::test]
async fn test_omitted_urgency_is_email_with_response_time() {
    let store = shipped_store();
    let text = call(
        &store,
        "support_routing",
        json!({"topic": "Stale beans", "category": "product-quality"}),
    )
    .await
    .expect("routing");

    assert!(text.contains("quality@brewandco.example"));
    assert!(text.contains("within 48 hours"));
}

#[tokio::test]
async fn test_low_urgency_is_help_center() {
    let store = shipped_store();
    let text = call(
        &store,
        "support_routing",
        json!({"topic": "Gift cards", "urgency": "low", "category": "general"}),
    )
    .await
    .expect("routing");

    assert!(text.contains(HELP_CENTER_URL));
}

#[tokio::test]
async fn test_support_lookup_failure_is_fallback() {
    let store = shipped_store();
    store.set_failing(true);

    for urgency in ["low", "medium", "high"] {
        let text = call(
            &store,
            "support_routing",
            json!({"topic": "Late order", "urgency": urgency, "category": "order-issue"}),
        )
        .await
        .expect("never an error");
        assert_eq!(text, fallback_message());
        assert!(text.contains(EMERGENCY_PHONE));
    }
}
