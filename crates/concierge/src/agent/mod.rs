//! Customer-service agent loop.
//!
//! The agent sends the customer's question to the language model together
//! with the tool manifest, runs any tools the model asks for, feeds the
//! results back, and repeats until the model answers in text.
//!
//! # Bounds
//!
//! - `max_step_retries`: retries for a single model call
//! - `max_total_retries`: retries across the whole run
//! - `max_iterations`: model turns before the run gives up
//!
//! Everything that happens is reported to an [`EventSink`] so the caller can
//! return an ordered step trace.

pub mod memory;
pub mod observer;

use std::sync::Arc;
use std::time::Duration;

use askama::Template;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing::{info, instrument, warn};

use brew_concierge_core::ConversationStep;

use crate::claude::{ChatResponse, ClaudeError, ContentBlock, LanguageModel, Tool};
use crate::config::AgentSettings;
use crate::db::LookupStore;
use crate::tools::{ToolError, ToolRegistry};

pub use memory::ConversationMemory;
pub use observer::{
    AgentEvent, EventSink, RETRY_MESSAGE, StepTrace, UPDATE_AGENT, UPDATE_TOOL_CALL,
    UPDATE_TOOL_RESULT,
};

/// System prompt template for the customer-service agent.
#[derive(Template)]
#[template(path = "agent/system_prompt.txt")]
struct SystemPromptTemplate<'a> {
    company_name: &'a str,
}

/// Render the system prompt for `company_name`.
#[must_use]
pub fn render_system_prompt(company_name: &str) -> String {
    SystemPromptTemplate { company_name }
        .render()
        .unwrap_or_else(|_| {
            format!(
                "You are a customer service representative for {company_name}. You cannot place orders."
            )
        })
}

/// Errors that end an agent run.
#[derive(Debug, Error)]
pub enum AgentError {
    /// The language model failed and retries were exhausted or pointless.
    #[error("language model error: {0}")]
    Model(#[from] ClaudeError),

    /// A tool failed in a way the model cannot correct.
    #[error("tool error: {0}")]
    Tool(#[from] ToolError),

    /// The model kept calling tools for every allowed turn.
    #[error("no final answer after {0} iterations")]
    MaxIterations(u32),
}

/// Outcome of one question.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AgentRunResult {
    /// Final answer, if the model produced any text.
    pub answer: Option<String>,
    /// Steps in emission order.
    pub steps: Vec<ConversationStep>,
}

/// Delay before retry number `attempt` (1-based) of a failed model call.
///
/// Linear backoff, raised to the server's `Retry-After` on a 429 and capped
/// at `max_retry_delay`.
#[must_use]
pub fn retry_delay(settings: &AgentSettings, err: &ClaudeError, attempt: u32) -> Duration {
    let backoff = settings.retry_backoff * attempt;
    let delay = match err {
        ClaudeError::RateLimited(secs) => backoff.max(Duration::from_secs(*secs)),
        _ => backoff,
    };
    delay.min(settings.max_retry_delay)
}

/// Retries spent so far in a run.
#[derive(Debug, Default)]
struct RetryBudget {
    used: u32,
}

/// The customer-service agent.
///
/// One instance is shared by all requests; per-run state lives in
/// [`ConversationMemory`] and the caller's [`EventSink`].
pub struct Agent {
    model: Arc<dyn LanguageModel>,
    store: Arc<dyn LookupStore>,
    registry: ToolRegistry,
    tools: Vec<Tool>,
    settings: AgentSettings,
    system_prompt: String,
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("registry", &self.registry)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl Agent {
    /// Create an agent.
    #[must_use]
    pub fn new(
        model: Arc<dyn LanguageModel>,
        store: Arc<dyn LookupStore>,
        registry: ToolRegistry,
        settings: AgentSettings,
        company_name: &str,
    ) -> Self {
        let tools = registry.manifest();
        Self {
            model,
            store,
            registry,
            tools,
            settings,
            system_prompt: render_system_prompt(company_name),
        }
    }

    /// The store the tools read from.
    #[must_use]
    pub fn store(&self) -> &dyn LookupStore {
        self.store.as_ref()
    }

    /// Answer a question and collect the step trace.
    ///
    /// # Errors
    ///
    /// Returns the error that ended the run; see [`Agent::run`].
    pub async fn ask(&self, question: &str) -> Result<AgentRunResult, AgentError> {
        let (events, trace) = EventSink::channel();
        let answer = self.run(question, &events).await?;
        drop(events);

        Ok(AgentRunResult {
            answer,
            steps: trace.collect().await,
        })
    }

    /// Answer a question, reporting progress to `events`.
    ///
    /// Returns `Ok(None)` when the model ended its turn without text.
    ///
    /// # Errors
    ///
    /// Returns `AgentError::Model` when a model call fails permanently or the
    /// retry budget runs out, `AgentError::Tool` when a tool lookup fails, and
    /// `AgentError::MaxIterations` when the model is still calling tools after
    /// the last allowed turn.
    #[instrument(skip_all, fields(question_len = question.len()))]
    pub async fn run(
        &self,
        question: &str,
        events: &EventSink,
    ) -> Result<Option<String>, AgentError> {
        let mut memory = ConversationMemory::new(question);
        let mut budget = RetryBudget::default();

        for iteration in 1..=self.settings.max_iterations {
            let response = self.call_model(&memory, &mut budget, events).await?;

            info!(
                iteration,
                stop_reason = ?response.stop_reason,
                content_blocks = response.content.len(),
                "Model response received"
            );

            for text in response.texts().filter(|t| !t.trim().is_empty()) {
                events.update(UPDATE_AGENT, text);
            }

            if !response.wants_tools() {
                let answer = response.texts().collect::<String>();
                let answer = answer.trim();
                return Ok((!answer.is_empty()).then(|| answer.to_string()));
            }

            let results = self.run_tools(&response, events).await?;
            memory.push_assistant(response.content);
            memory.push_tool_results(results);
        }

        warn!(
            max_iterations = self.settings.max_iterations,
            "Agent reached the iteration limit without a final answer"
        );
        events.error(json!({
            "type": "max_iterations",
            "message": format!(
                "stopped after {} iterations without a final answer",
                self.settings.max_iterations
            ),
        }));
        Err(AgentError::MaxIterations(self.settings.max_iterations))
    }

    /// Call the model, retrying transient failures within both budgets.
    async fn call_model(
        &self,
        memory: &ConversationMemory,
        budget: &mut RetryBudget,
        events: &EventSink,
    ) -> Result<ChatResponse, AgentError> {
        let mut attempt = 0;
        loop {
            let result = self
                .model
                .chat(
                    memory.messages().to_vec(),
                    Some(self.system_prompt.clone()),
                    Some(self.tools.clone()),
                )
                .await;

            let err = match result {
                Ok(response) => return Ok(response),
                Err(e) => e,
            };

            warn!(error = %err, attempt, "Model call failed");
            events.error(err.to_dump());

            let exhausted = attempt >= self.settings.max_step_retries
                || budget.used >= self.settings.max_total_retries;
            if !err.is_retryable() || exhausted {
                return Err(err.into());
            }

            attempt += 1;
            budget.used += 1;
            events.retry();
            tokio::time::sleep(retry_delay(&self.settings, &err, attempt)).await;
        }
    }

    /// Run every tool call in `response` and build the result blocks.
    async fn run_tools(
        &self,
        response: &ChatResponse,
        events: &EventSink,
    ) -> Result<Vec<ContentBlock>, AgentError> {
        let mut results = Vec::new();

        for block in &response.content {
            let ContentBlock::ToolUse { id, name, input } = block else {
                continue;
            };

            events.update(UPDATE_TOOL_CALL, format!("{name} {input}"));
            let invocation = self.registry.dispatch(name, input, self.store()).await;

            let content = invocation.result_text();
            let is_error = match invocation.outcome {
                Ok(_) => {
                    events.update(UPDATE_TOOL_RESULT, content.clone());
                    false
                }
                Err(e) if e.is_recoverable() => {
                    events.error(e.to_dump());
                    true
                }
                Err(e) => {
                    events.error(e.to_dump());
                    return Err(e.into());
                }
            };

            results.push(ContentBlock::ToolResult {
                tool_use_id: id.clone(),
                content,
                is_error: Some(is_error),
            });
        }

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::*;
    use crate::testing::{MemoryStore, ScriptedModel, text, tool_use};

    fn settings() -> AgentSettings {
        AgentSettings {
            max_step_retries: 2,
            max_total_retries: 3,
            max_iterations: 4,
            retry_backoff: Duration::ZERO,
            max_retry_delay: Duration::ZERO,
        }
    }

    fn agent(model: Arc<ScriptedModel>, store: MemoryStore) -> Agent {
        Agent::new(
            model,
            Arc::new(store),
            ToolRegistry::customer_service(),
            settings(),
            "Brew & Co.",
        )
    }

    fn kinds(result: &AgentRunResult) -> Vec<&str> {
        result.steps.iter().map(|s| s.kind.as_str()).collect()
    }

    #[test]
    fn test_system_prompt_names_company() {
        let prompt = render_system_prompt("Brew & Co.");
        assert!(prompt.contains("Brew & Co."));
        assert!(prompt.contains("cannot place"));
    }

    #[tokio::test]
    async fn test_direct_answer() {
        let model = ScriptedModel::new(vec![text("We roast every Monday.")]);
        let result = agent(model.clone(), MemoryStore::seeded())
            .ask("When do you roast?")
            .await
            .expect("run");

        assert_eq!(result.answer.as_deref(), Some("We roast every Monday."));
        assert_eq!(kinds(&result), vec!["agent"]);
        assert_eq!(model.calls(), 1);
    }

    #[tokio::test]
    async fn test_tool_round_trip_feeds_result_back() {
        let model = ScriptedModel::new(vec![
            tool_use("toolu_1", "store_locations", serde_json::json!({"city": "austin"})),
            text("No Austin cafe yet."),
        ]);
        let result = agent(model.clone(), MemoryStore::seeded())
            .ask("Any cafes in Austin?")
            .await
            .expect("run");

        assert_eq!(result.answer.as_deref(), Some("No Austin cafe yet."));
        assert_eq!(kinds(&result), vec!["tool_call", "tool_result", "agent"]);
        assert!(result.steps[1].content.contains("not yet available"));

        let seen = model.seen();
        let second_turn = seen.get(1).expect("second call");
        assert_eq!(second_turn.len(), 3);
        let last = second_turn.last().expect("tool results");
        let crate::claude::MessageContent::Blocks(blocks) = &last.content else {
            panic!("tool results are sent as blocks");
        };
        assert!(matches!(
            blocks.first(),
            Some(ContentBlock::ToolResult {
                tool_use_id,
                is_error: Some(false),
                ..
            }) if tool_use_id == "toolu_1"
        ));
    }

    #[tokio::test]
    async fn test_invalid_tool_input_goes_back_to_model() {
        let model = ScriptedModel::new(vec![
            tool_use("toolu_1", "store_locations", serde_json::json!({"city": "boise"})),
            text("We only have cafes in five cities."),
        ]);
        let result = agent(model.clone(), MemoryStore::seeded())
            .ask("Boise?")
            .await
            .expect("run continues");

        assert_eq!(kinds(&result), vec!["tool_call", "error", "agent"]);
        let dump: Value = serde_json::from_str(&result.steps[1].content).expect("json");
        assert_eq!(dump["type"], "invalid_input");
        assert_eq!(model.calls(), 2);
    }

    #[tokio::test]
    async fn test_unknown_tool_goes_back_to_model() {
        let model = ScriptedModel::new(vec![
            tool_use("toolu_1", "place_order", serde_json::json!({})),
            text("I can't place orders."),
        ]);
        let result = agent(model, MemoryStore::seeded())
            .ask("Order me a bag")
            .await
            .expect("run continues");

        assert_eq!(result.answer.as_deref(), Some("I can't place orders."));
        assert!(result.steps.iter().any(|s| s.is_error() && s.content.contains("unknown_tool")));
    }

    #[tokio::test]
    async fn test_retrieval_failure_fails_run() {
        let model = ScriptedModel::new(vec![tool_use(
            "toolu_1",
            "coffee_club",
            serde_json::json!({"action": "info"}),
        )]);
        let err = agent(model.clone(), MemoryStore::failing())
            .ask("Tell me about the club")
            .await
            .expect_err("retrieval error");

        assert!(matches!(err, AgentError::Tool(ToolError::Retrieval(_))));
        assert_eq!(model.calls(), 1);
    }

    #[tokio::test]
    async fn test_transient_error_is_retried() {
        let model = ScriptedModel::new(vec![
            Err(ClaudeError::RateLimited(1)),
            text("Here you go."),
        ]);
        let result = agent(model.clone(), MemoryStore::seeded())
            .ask("hi")
            .await
            .expect("retried");

        assert_eq!(kinds(&result), vec!["error", "retry", "agent"]);
        assert_eq!(result.steps[1].content, RETRY_MESSAGE);
        assert_eq!(model.calls(), 2);
    }

    #[tokio::test]
    async fn test_step_retries_exhausted() {
        let model = ScriptedModel::new(vec![
            Err(ClaudeError::Parse("a".into())),
            Err(ClaudeError::Parse("b".into())),
            Err(ClaudeError::Parse("c".into())),
            text("never reached"),
        ]);
        let (events, trace) = EventSink::channel();
        let err = agent(model.clone(), MemoryStore::seeded())
            .run("hi", &events)
            .await
            .expect_err("exhausted");
        drop(events);

        assert!(matches!(err, AgentError::Model(ClaudeError::Parse(ref m)) if m == "c"));
        assert_eq!(model.calls(), 3);
        let steps = trace.collect().await;
        let kinds: Vec<&str> = steps.iter().map(|s| s.kind.as_str()).collect();
        assert_eq!(kinds, vec!["error", "retry", "error", "retry", "error"]);
    }

    #[tokio::test]
    async fn test_total_retry_budget_spans_turns() {
        let model = ScriptedModel::new(vec![
            Err(ClaudeError::RateLimited(1)),
            Err(ClaudeError::RateLimited(1)),
            tool_use("toolu_1", "store_locations", serde_json::json!({"city": "austin"})),
            Err(ClaudeError::RateLimited(1)),
            Err(ClaudeError::RateLimited(1)),
            text("never reached"),
        ]);
        let err = agent(model.clone(), MemoryStore::seeded())
            .ask("hi")
            .await
            .expect_err("total budget of 3");

        assert!(matches!(err, AgentError::Model(ClaudeError::RateLimited(_))));
        assert_eq!(model.calls(), 5);
    }

    #[tokio::test]
    async fn test_unauthorized_fails_fast() {
        let model = ScriptedModel::new(vec![
            Err(ClaudeError::Unauthorized("bad key".into())),
            text("never reached"),
        ]);
        let err = agent(model.clone(), MemoryStore::seeded())
            .ask("hi")
            .await
            .expect_err("unauthorized");

        assert!(matches!(err, AgentError::Model(ClaudeError::Unauthorized(_))));
        assert_eq!(model.calls(), 1);
    }

    #[tokio::test]
    async fn test_empty_text_is_no_answer() {
        let model = ScriptedModel::new(vec![text("   ")]);
        let result = agent(model, MemoryStore::seeded())
            .ask("hi")
            .await
            .expect("run");

        assert_eq!(result.answer, None);
        assert!(result.steps.is_empty());
    }

    #[tokio::test]
    async fn test_iteration_limit_fails_run() {
        let script = (0..10)
            .map(|i| {
                tool_use(
                    &format!("toolu_{i}"),
                    "store_locations",
                    serde_json::json!({"city": "austin"}),
                )
            })
            .collect();
        let model = ScriptedModel::new(script);
        let (events, trace) = EventSink::channel();
        let err = agent(model.clone(), MemoryStore::seeded())
            .run("loop forever", &events)
            .await
            .expect_err("limit fails the run");
        drop(events);

        assert!(matches!(err, AgentError::MaxIterations(4)));
        assert_eq!(model.calls(), 4);
        let steps = trace.collect().await;
        let last = steps.last().expect("steps");
        assert!(last.is_error());
        assert!(last.content.contains("max_iterations"));
    }

    #[test]
    fn test_retry_delay_is_linear_backoff() {
        let settings = AgentSettings::default();
        let err = ClaudeError::Parse("bad json".into());
        assert_eq!(retry_delay(&settings, &err, 1), Duration::from_millis(250));
        assert_eq!(retry_delay(&settings, &err, 2), Duration::from_millis(500));
    }

    #[test]
    fn test_retry_delay_honours_retry_after() {
        let settings = AgentSettings::default();
        let err = ClaudeError::RateLimited(5);
        assert_eq!(retry_delay(&settings, &err, 1), Duration::from_secs(5));
    }

    #[test]
    fn test_retry_delay_is_capped() {
        let settings = AgentSettings {
            max_retry_delay: Duration::from_secs(10),
            ..AgentSettings::default()
        };
        assert_eq!(
            retry_delay(&settings, &ClaudeError::RateLimited(60), 1),
            Duration::from_secs(10)
        );
    }

    #[tokio::test]
    async fn test_runs_do_not_share_memory() {
        let model = ScriptedModel::new(vec![text("one"), text("two")]);
        let agent = agent(model.clone(), MemoryStore::seeded());

        agent.ask("first").await.expect("first");
        agent.ask("second").await.expect("second");

        let seen = model.seen();
        assert!(seen.iter().all(|messages| messages.len() == 1));
    }
}
