//! Test doubles: an in-memory [`LookupStore`] and a scripted [`LanguageModel`].
//!
//! Compiled for this crate's unit tests and, behind the `testing` feature,
//! for the integration-tests crate.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::Value;

use brew_concierge_core::{BrewMethod, City, ShippingRegion, Strength, SupportCategory};

use crate::claude::{
    ChatResponse, ClaudeError, ContentBlock, LanguageModel, Message, StopReason, Tool, Usage,
};
use crate::db::{LookupStore, ReferenceData, RepositoryError};
use crate::models::{
    BrewingMethodRow, BrewingRatioRow, ClubBenefitRow, ShippingRegionRow, StoreLocationRow,
    SupportCategoryRow,
};

// =============================================================================
// In-memory lookup store
// =============================================================================

/// [`LookupStore`] over an in-memory copy of the reference data.
///
/// Counts every query and can be switched into a failing mode where each
/// query returns a closed-pool error.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: ReferenceData,
    failing: AtomicBool,
    queries: AtomicUsize,
}

impl MemoryStore {
    /// Store holding `data`.
    #[must_use]
    pub fn new(data: ReferenceData) -> Self {
        Self {
            data,
            ..Self::default()
        }
    }

    /// Small fixture: one method, two strengths, one region, one support
    /// category, two Seattle cafes and two club benefits.
    #[must_use]
    pub fn seeded() -> Self {
        Self::new(ReferenceData {
            brewing_methods: vec![BrewingMethodRow {
                method: "french-press".into(),
                display_name: "French Press".into(),
                grind_size: "Coarse".into(),
                water_temp: "93°C".into(),
                brew_time: "4 minutes".into(),
                instructions: "Steep, then press slowly.".into(),
            }],
            brewing_ratios: vec![
                BrewingRatioRow {
                    strength: "medium".into(),
                    ratio: 16.0,
                    description: "Balanced".into(),
                },
                BrewingRatioRow {
                    strength: "strong".into(),
                    ratio: 14.5,
                    description: "Bold".into(),
                },
            ],
            shipping_regions: vec![ShippingRegionRow {
                region: "west-coast".into(),
                display_name: "West Coast".into(),
                standard_delivery: "3-5 business days".into(),
                express_delivery: "1-2 business days".into(),
                cost: Decimal::new(599, 2),
                notes: Some("Ships from our Portland roastery.".into()),
            }],
            support_categories: vec![SupportCategoryRow {
                category: "order-issue".into(),
                display_name: "Order Support".into(),
                response_time: "within 24 hours".into(),
                email: "orders@brewandco.example".into(),
            }],
            store_locations: vec![
                StoreLocationRow {
                    id: 2,
                    city: "seattle".into(),
                    name: "Pike Place Roastery".into(),
                    address: "1912 Pike Pl".into(),
                    hours: "7am-7pm daily".into(),
                    phone: "206-555-0142".into(),
                    features: Some("Roastery tours".into()),
                },
                StoreLocationRow {
                    id: 1,
                    city: "seattle".into(),
                    name: "Capitol Hill Cafe".into(),
                    address: "500 E Pine St".into(),
                    hours: "6am-6pm daily".into(),
                    phone: "206-555-0101".into(),
                    features: None,
                },
            ],
            club_benefits: vec![
                ClubBenefitRow {
                    id: 2,
                    title: "Free shipping".into(),
                    description: "On every order.".into(),
                    sort_order: 2,
                },
                ClubBenefitRow {
                    id: 1,
                    title: "Monthly bag".into(),
                    description: "A fresh single origin each month.".into(),
                    sort_order: 1,
                },
            ],
        })
    }

    /// Empty store whose every query fails.
    #[must_use]
    pub fn failing() -> Self {
        let store = Self::default();
        store.set_failing(true);
        store
    }

    /// Make every subsequent query fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of queries served or failed so far.
    #[must_use]
    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    fn begin(&self) -> Result<(), RepositoryError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            Err(RepositoryError::Database(sqlx::Error::PoolClosed))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl LookupStore for MemoryStore {
    async fn brewing_method(
        &self,
        method: BrewMethod,
    ) -> Result<Option<BrewingMethodRow>, RepositoryError> {
        self.begin()?;
        Ok(self
            .data
            .brewing_methods
            .iter()
            .find(|r| r.method == method.as_str())
            .cloned())
    }

    async fn brewing_ratio(
        &self,
        strength: Strength,
    ) -> Result<Option<BrewingRatioRow>, RepositoryError> {
        self.begin()?;
        Ok(self
            .data
            .brewing_ratios
            .iter()
            .find(|r| r.strength == strength.as_str())
            .cloned())
    }

    async fn shipping_region(
        &self,
        region: ShippingRegion,
    ) -> Result<Option<ShippingRegionRow>, RepositoryError> {
        self.begin()?;
        Ok(self
            .data
            .shipping_regions
            .iter()
            .find(|r| r.region == region.as_str())
            .cloned())
    }

    async fn store_locations(&self, city: City) -> Result<Vec<StoreLocationRow>, RepositoryError> {
        self.begin()?;
        let mut rows: Vec<_> = self
            .data
            .store_locations
            .iter()
            .filter(|r| r.city == city.as_str())
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    async fn club_benefits(&self) -> Result<Vec<ClubBenefitRow>, RepositoryError> {
        self.begin()?;
        let mut rows = self.data.club_benefits.clone();
        rows.sort_by_key(|r| (r.sort_order, r.id));
        Ok(rows)
    }

    async fn support_category(
        &self,
        category: SupportCategory,
    ) -> Result<Option<SupportCategoryRow>, RepositoryError> {
        self.begin()?;
        Ok(self
            .data
            .support_categories
            .iter()
            .find(|r| r.category == category.as_str())
            .cloned())
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        self.begin()
    }
}

// =============================================================================
// Scripted model
// =============================================================================

/// Model that replays canned responses, then ends the turn silently.
#[derive(Debug, Default)]
pub struct ScriptedModel {
    script: Mutex<VecDeque<Result<ChatResponse, ClaudeError>>>,
    calls: AtomicUsize,
    seen: Mutex<Vec<Vec<Message>>>,
}

impl ScriptedModel {
    /// Model that returns `script` one response per call.
    #[must_use]
    pub fn new(script: Vec<Result<ChatResponse, ClaudeError>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            ..Self::default()
        })
    }

    /// Number of calls made so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Messages sent on each call, oldest call first.
    #[must_use]
    pub fn seen(&self) -> Vec<Vec<Message>> {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn chat(
        &self,
        messages: Vec<Message>,
        _system: Option<String>,
        _tools: Option<Vec<Tool>>,
    ) -> Result<ChatResponse, ClaudeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(messages);
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| Ok(response(StopReason::EndTurn, Vec::new())))
    }
}

/// A response with the given stop reason and content.
#[must_use]
pub fn response(stop: StopReason, content: Vec<ContentBlock>) -> ChatResponse {
    ChatResponse {
        id: "msg_test".into(),
        model: "test-model".into(),
        stop_reason: Some(stop),
        content,
        usage: Usage::default(),
    }
}

/// A final text answer.
///
/// # Errors
///
/// Never; the `Result` matches the model's return type.
pub fn text(answer: &str) -> Result<ChatResponse, ClaudeError> {
    Ok(response(
        StopReason::EndTurn,
        vec![ContentBlock::Text {
            text: answer.into(),
        }],
    ))
}

/// A single tool call.
///
/// # Errors
///
/// Never; the `Result` matches the model's return type.
pub fn tool_use(id: &str, name: &str, input: Value) -> Result<ChatResponse, ClaudeError> {
    Ok(response(
        StopReason::ToolUse,
        vec![ContentBlock::ToolUse {
            id: id.into(),
            name: name.into(),
            input,
        }],
    ))
}
