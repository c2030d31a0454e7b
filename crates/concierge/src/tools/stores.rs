//! `store_locations`: cafes in a city.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

use brew_concierge_core::City;

use super::{ToolError, ToolHandler, parse_input};
use crate::claude::Tool;
use crate::db::LookupStore;
use crate::models::StoreLocationRow;

const NAME: &str = "store_locations";

#[derive(Debug, Deserialize)]
struct StoreInput {
    city: City,
}

/// Reply when a city has no cafes.
#[must_use]
pub fn no_stores_message(city: City) -> String {
    format!(
        "Store locations in {city} are not yet available. You can still order online and we will ship fresh coffee to your door."
    )
}

fn format_store(store: &StoreLocationRow) -> String {
    let mut text = format!(
        "{}\nAddress: {}\nHours: {}\nPhone: {}",
        store.name, store.address, store.hours, store.phone
    );
    if let Some(features) = store.features.as_deref().filter(|f| !f.is_empty()) {
        text.push_str("\nFeatures: ");
        text.push_str(features);
    }
    text
}

/// Store locator.
#[derive(Debug, Clone, Copy, Default)]
pub struct StoreLocations;

#[async_trait]
impl ToolHandler for StoreLocations {
    fn name(&self) -> &'static str {
        NAME
    }

    fn definition(&self) -> Tool {
        Tool {
            name: NAME.to_string(),
            description: "Find our cafe locations in a city. Returns the name, address, opening hours, phone number and features of each cafe.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "city": {
                        "type": "string",
                        "enum": City::keys(),
                        "description": "City to search"
                    }
                },
                "required": ["city"]
            }),
        }
    }

    async fn invoke(&self, input: &Value, store: &dyn LookupStore) -> Result<String, ToolError> {
        let input: StoreInput = parse_input(NAME, input)?;
        let locations = store.store_locations(input.city).await?;

        if locations.is_empty() {
            return Ok(no_stores_message(input.city));
        }

        Ok(locations
            .iter()
            .map(format_store)
            .collect::<Vec<_>>()
            .join("\n\n"))
    }
}
