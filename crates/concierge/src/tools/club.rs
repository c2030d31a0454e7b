//! `coffee_club`: membership benefits.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;

use super::{ToolError, ToolHandler, parse_input};
use crate::claude::Tool;
use crate::db::LookupStore;

const NAME: &str = "coffee_club";

/// Marker the chat widget watches for to open the signup form.
pub const COFFEE_CLUB_SIGNUP_MARKER: &str = "[[SHOW_COFFEE_CLUB_SIGNUP]]";

#[derive(Debug, Deserialize)]
struct ClubInput {
    // Logged only; every action gets the same reply.
    action: String,
}

/// Coffee club information.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoffeeClub;

#[async_trait]
impl ToolHandler for CoffeeClub {
    fn name(&self) -> &'static str {
        NAME
    }

    fn definition(&self) -> Tool {
        Tool {
            name: NAME.to_string(),
            description: "Get information about the Coffee Club membership and offer to sign the customer up. Use this whenever a customer asks about subscriptions, memberships or joining the club.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "action": {
                        "type": "string",
                        "description": "What the customer wants (e.g. 'info', 'join')"
                    }
                },
                "required": ["action"]
            }),
        }
    }

    async fn invoke(&self, input: &Value, store: &dyn LookupStore) -> Result<String, ToolError> {
        let input: ClubInput = parse_input(NAME, input)?;
        debug!(action = %input.action, "Coffee club requested");
        let benefits = store.club_benefits().await?;

        let mut text = String::from("Coffee Club membership benefits:");
        for benefit in &benefits {
            text.push_str(&format!("\n- {}: {}", benefit.title, benefit.description));
        }
        text.push_str("\n\n");
        text.push_str(COFFEE_CLUB_SIGNUP_MARKER);

        Ok(text)
    }
}
