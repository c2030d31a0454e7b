//! `brewing_guide`: a recipe for a method, strength and number of servings.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

use brew_concierge_core::{BrewMethod, Strength};

use super::{ToolError, ToolHandler, parse_input};
use crate::claude::Tool;
use crate::db::LookupStore;
use crate::models::{BrewingMethodRow, BrewingRatioRow};

const NAME: &str = "brewing_guide";

/// Grams of coffee per serving.
pub const GRAMS_PER_SERVING: u32 = 15;

/// Smallest accepted serving count.
pub const MIN_SERVINGS: u32 = 1;

/// Largest accepted serving count.
pub const MAX_SERVINGS: u32 = 8;

#[derive(Debug, Deserialize)]
struct BrewingInput {
    method: BrewMethod,
    strength: Strength,
    servings: u32,
}

/// Dose and water volume for a batch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Recipe {
    pub coffee_grams: u32,
    pub water_ml: f64,
}

/// Compute the dose for `servings` at `ratio` millilitres of water per gram.
#[must_use]
pub fn compute_recipe(servings: u32, ratio: f64) -> Recipe {
    let coffee_grams = servings * GRAMS_PER_SERVING;
    Recipe {
        coffee_grams,
        water_ml: f64::from(coffee_grams) * ratio,
    }
}

fn format_recipe(
    method: &BrewingMethodRow,
    ratio: &BrewingRatioRow,
    servings: u32,
    recipe: Recipe,
) -> String {
    let cups = if servings == 1 { "serving" } else { "servings" };
    format!(
        "{name} guide ({strength}, {servings} {cups})\n\
         Coffee: {grams}g\n\
         Water: {water}ml (1:{ratio})\n\
         Grind size: {grind}\n\
         Water temperature: {temp}\n\
         Brew time: {time}\n\
         Flavor: {flavor}\n\
         Instructions: {instructions}",
        name = method.display_name,
        strength = ratio.strength,
        grams = recipe.coffee_grams,
        water = recipe.water_ml,
        ratio = ratio.ratio,
        grind = method.grind_size,
        temp = method.water_temp,
        time = method.brew_time,
        flavor = ratio.description,
        instructions = method.instructions,
    )
}

/// Brewing recipe lookup.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrewingGuide;

#[async_trait]
impl ToolHandler for BrewingGuide {
    fn name(&self) -> &'static str {
        NAME
    }

    fn definition(&self) -> Tool {
        Tool {
            name: NAME.to_string(),
            description: "Get a brewing recipe for a coffee brewing method. Returns the coffee dose, water volume, grind size, water temperature, brew time and step-by-step instructions.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "method": {
                        "type": "string",
                        "enum": BrewMethod::keys(),
                        "description": "Brewing method"
                    },
                    "strength": {
                        "type": "string",
                        "enum": Strength::keys(),
                        "description": "How strong the coffee should be"
                    },
                    "servings": {
                        "type": "integer",
                        "minimum": MIN_SERVINGS,
                        "maximum": MAX_SERVINGS,
                        "description": "Number of cups to brew"
                    }
                },
                "required": ["method", "strength", "servings"]
            }),
        }
    }

    async fn invoke(&self, input: &Value, store: &dyn LookupStore) -> Result<String, ToolError> {
        let input: BrewingInput = parse_input(NAME, input)?;
        if !(MIN_SERVINGS..=MAX_SERVINGS).contains(&input.servings) {
            return Err(ToolError::invalid(
                NAME,
                format!(
                    "servings must be between {MIN_SERVINGS} and {MAX_SERVINGS} (got {})",
                    input.servings
                ),
            ));
        }

        let method = store
            .brewing_method(input.method)
            .await?
            .ok_or_else(|| ToolError::Retrieval(format!("no brewing method '{}'", input.method)))?;
        let ratio = store
            .brewing_ratio(input.strength)
            .await?
            .ok_or_else(|| ToolError::Retrieval(format!("no brewing ratio '{}'", input.strength)))?;

        let recipe = compute_recipe(input.servings, ratio.ratio);
        Ok(format_recipe(&method, &ratio, input.servings, recipe))
    }
}
