//! `support_routing`: send the customer to the right support channel.
//!
//! Unlike the other tools, a failed or empty category lookup is not an error
//! here. The customer still needs a way to reach a person, so the tool falls
//! back to the emergency line.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::warn;

use brew_concierge_core::{SupportCategory, Urgency};

use super::{ToolError, ToolHandler, parse_input};
use crate::claude::Tool;
use crate::db::LookupStore;
use crate::models::SupportCategoryRow;

const NAME: &str = "support_routing";

/// Phone line for high-urgency issues.
pub const SUPPORT_PHONE: &str = "1-800-555-0199";

/// Self-service help center for low-urgency questions.
pub const HELP_CENTER_URL: &str = "https://help.brewandco.example";

/// Line given out when routing metadata is unavailable.
pub const EMERGENCY_PHONE: &str = "1-800-555-0911";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SupportInput {
    topic: String,
    #[serde(default)]
    urgency: Option<Urgency>,
    category: SupportCategory,
    #[serde(default)]
    customer_name: Option<String>,
    #[serde(default)]
    order_number: Option<String>,
}

/// Reply used when the category cannot be looked up.
#[must_use]
pub fn fallback_message() -> String {
    format!(
        "I wasn't able to reach our support directory just now. For immediate help, please call our emergency support line at {EMERGENCY_PHONE}."
    )
}

fn route(input: &SupportInput, category: &SupportCategoryRow) -> String {
    let greeting = input
        .customer_name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map_or_else(String::new, |name| format!("Thanks, {name}. "));
    let reference = input
        .order_number
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map_or_else(String::new, |order| {
            format!(" Please have order #{order} ready.")
        });

    match input.urgency.unwrap_or_default() {
        Urgency::High => format!(
            "{greeting}This sounds urgent, so please call our {team} team at {SUPPORT_PHONE} and we'll help with \"{topic}\" right away.{reference}",
            team = category.display_name,
            topic = input.topic,
        ),
        Urgency::Low => format!(
            "{greeting}You can find answers about \"{topic}\" in our help center at {HELP_CENTER_URL}.{reference}",
            topic = input.topic,
        ),
        Urgency::Medium => format!(
            "{greeting}Please email our {team} team at {email} about \"{topic}\". They respond {response_time}.{reference}",
            team = category.display_name,
            email = category.email,
            response_time = category.response_time,
            topic = input.topic,
        ),
    }
}

/// Support channel router.
#[derive(Debug, Clone, Copy, Default)]
pub struct SupportRouting;

#[async_trait]
impl ToolHandler for SupportRouting {
    fn name(&self) -> &'static str {
        NAME
    }

    fn definition(&self) -> Tool {
        Tool {
            name: NAME.to_string(),
            description: "Route a customer to the right support channel for their issue. Use this when the customer needs help from a person: order problems, product quality complaints, subscription changes or wholesale inquiries.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "topic": {
                        "type": "string",
                        "description": "Short summary of the customer's issue"
                    },
                    "urgency": {
                        "type": "string",
                        "enum": Urgency::keys(),
                        "description": "How urgent the issue is (default medium)"
                    },
                    "category": {
                        "type": "string",
                        "enum": SupportCategory::keys(),
                        "description": "Support category"
                    },
                    "customerName": {
                        "type": "string",
                        "description": "Customer's name, if given"
                    },
                    "orderNumber": {
                        "type": "string",
                        "description": "Order number, if given"
                    }
                },
                "required": ["topic", "category"]
            }),
        }
    }

    async fn invoke(&self, input: &Value, store: &dyn LookupStore) -> Result<String, ToolError> {
        let input: SupportInput = parse_input(NAME, input)?;

        let category = match store.support_category(input.category).await {
            Ok(Some(row)) => row,
            Ok(None) => {
                warn!(category = %input.category, "Support category missing, using fallback");
                return Ok(fallback_message());
            }
            Err(e) => {
                warn!(
                    error = %e,
                    category = %input.category,
                    "Support lookup failed, using fallback"
                );
                return Ok(fallback_message());
            }
        };

        Ok(route(&input, &category))
    }
}
