//! `shipping_estimate`: delivery window and cost for a region.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

use brew_concierge_core::{ShippingMethod, ShippingRegion};

use super::{ToolError, ToolHandler, parse_input};
use crate::claude::Tool;
use crate::db::LookupStore;

const NAME: &str = "shipping_estimate";

/// Appended to every estimate.
pub const PROMO_FOOTER: &str =
    "Coffee Club members get free shipping on every order. Ask me about the Coffee Club to learn more!";

#[derive(Debug, Deserialize)]
struct ShippingInput {
    region: ShippingRegion,
    #[serde(default)]
    method: Option<ShippingMethod>,
}

/// Shipping estimate lookup.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShippingEstimate;

#[async_trait]
impl ToolHandler for ShippingEstimate {
    fn name(&self) -> &'static str {
        NAME
    }

    fn definition(&self) -> Tool {
        Tool {
            name: NAME.to_string(),
            description: "Estimate delivery time and shipping cost to a region. Returns the delivery window for the chosen shipping method, the flat shipping cost and any notes for the region.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "region": {
                        "type": "string",
                        "enum": ShippingRegion::keys(),
                        "description": "Destination region"
                    },
                    "method": {
                        "type": "string",
                        "enum": ShippingMethod::keys(),
                        "description": "Shipping method (default standard)"
                    }
                },
                "required": ["region"]
            }),
        }
    }

    async fn invoke(&self, input: &Value, store: &dyn LookupStore) -> Result<String, ToolError> {
        let input: ShippingInput = parse_input(NAME, input)?;
        let method = input.method.unwrap_or_default();

        let region = store
            .shipping_region(input.region)
            .await?
            .ok_or_else(|| ToolError::Retrieval(format!("no shipping region '{}'", input.region)))?;

        let delivery = if method.is_express() {
            &region.express_delivery
        } else {
            &region.standard_delivery
        };

        let mut text = format!(
            "Shipping to {} ({method}): {delivery}\nCost: ${}",
            region.display_name, region.cost
        );
        if let Some(notes) = region.notes.as_deref().filter(|n| !n.is_empty()) {
            text.push_str("\nNotes: ");
            text.push_str(notes);
        }
        text.push_str("\n\n");
        text.push_str(PROMO_FOOTER);

        Ok(text)
    }
}
