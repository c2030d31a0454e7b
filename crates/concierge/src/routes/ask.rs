//! `POST /ask`: answer a customer question with the agent.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use brew_concierge_core::ConversationStep;

use crate::error::AppError;
use crate::state::AppState;

/// Answer returned when the agent produced no text.
pub const NO_ANSWER: &str = "No answer available.";

/// Request body.
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    /// The customer's question.
    #[serde(default)]
    pub question: Option<String>,
}

/// Response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct AskResponse {
    /// Final answer, or [`NO_ANSWER`].
    pub answer: String,
    /// Agent steps in emission order.
    pub steps: Vec<ConversationStep>,
}

/// Validate the question, run the agent on its own task and return the
/// answer with its step trace.
///
/// # Errors
///
/// - `AppError::Validation` if the body is not JSON or has no question
/// - `AppError::Agent` if the agent run fails
/// - `AppError::Unknown` if the agent task panics
#[instrument(skip_all, fields(request_id = %Uuid::new_v4()))]
pub async fn ask(
    State(state): State<AppState>,
    body: Result<Json<AskRequest>, JsonRejection>,
) -> Result<Json<AskResponse>, AppError> {
    let Json(request) = body.map_err(|e| AppError::Validation(e.body_text()))?;
    let question = request
        .question
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| AppError::Validation("question missing or empty".to_string()))?
        .to_string();

    let agent = state.agent();
    let result = tokio::spawn(async move { agent.ask(&question).await })
        .await
        .map_err(|e| AppError::Unknown(e.to_string()))??;

    info!(
        steps = result.steps.len(),
        answered = result.answer.is_some(),
        "Question answered"
    );

    Ok(Json(AskResponse {
        answer: result.answer.unwrap_or_else(|| NO_ANSWER.to_string()),
        steps: result.steps,
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use axum::response::Response;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::agent::Agent;
    use crate::claude::{ChatResponse, ClaudeError, LanguageModel, Message, Tool};
    use crate::config::AgentSettings;
    use crate::routes::router;
    use crate::state::AppState;
    use crate::testing::{MemoryStore, ScriptedModel, text, tool_use};
    use crate::tools::ToolRegistry;

    fn state(model: Arc<dyn LanguageModel>, store: MemoryStore) -> AppState {
        let settings = AgentSettings {
            retry_backoff: std::time::Duration::ZERO,
            max_retry_delay: std::time::Duration::ZERO,
            ..AgentSettings::default()
        };
        AppState::new(Agent::new(
            model,
            Arc::new(store),
            ToolRegistry::customer_service(),
            settings,
            "Brew & Co.",
        ))
    }

    async fn post(state: AppState, body: &str) -> Response {
        router(state)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/ask")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .expect("request"),
            )
            .await
            .expect("response")
    }

    async fn json_body(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[tokio::test]
    async fn test_missing_question_is_rejected_without_model_call() {
        for body in ["{}", r#"{"question": "   "}"#, r#"{"question": 7}"#, "not json", ""] {
            let model = ScriptedModel::new(vec![text("unused")]);
            let response = post(state(model.clone(), MemoryStore::seeded()), body).await;

            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");
            assert_eq!(
                json_body(response).await,
                json!({"error": "Question is required"})
            );
            assert_eq!(model.calls(), 0);
        }
    }

    #[tokio::test]
    async fn test_answer_with_steps_in_order() {
        let model = ScriptedModel::new(vec![
            Err(ClaudeError::RateLimited(1)),
            tool_use("toolu_1", "coffee_club", json!({"action": "info"})),
            text("Join the club!"),
        ]);
        let response = post(
            state(model, MemoryStore::seeded()),
            r#"{"question": "What is the coffee club?"}"#,
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["answer"], "Join the club!");

        let kinds: Vec<&str> = body["steps"]
            .as_array()
            .expect("steps")
            .iter()
            .map(|s| s["type"].as_str().expect("type"))
            .collect();
        assert_eq!(kinds, vec!["error", "retry", "tool_call", "tool_result", "agent"]);
    }

    #[tokio::test]
    async fn test_no_text_gives_sentinel() {
        let model = ScriptedModel::new(Vec::new());
        let response = post(
            state(model, MemoryStore::seeded()),
            r#"{"question": "Hello?"}"#,
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({"answer": "No answer available.", "steps": []})
        );
    }

    #[tokio::test]
    async fn test_agent_failure_is_internal_error() {
        let model = ScriptedModel::new(vec![tool_use(
            "toolu_1",
            "coffee_club",
            json!({"action": "info"}),
        )]);
        let response = post(
            state(model, MemoryStore::failing()),
            r#"{"question": "Club?"}"#,
        )
        .await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            json_body(response).await,
            json!({"error": "Internal server error"})
        );
    }

    struct PanickingModel;

    #[async_trait]
    impl LanguageModel for PanickingModel {
        async fn chat(
            &self,
            _messages: Vec<Message>,
            _system: Option<String>,
            _tools: Option<Vec<Tool>>,
        ) -> Result<ChatResponse, ClaudeError> {
            panic!("model exploded")
        }
    }

    #[tokio::test]
    async fn test_panicked_task_is_unknown_error() {
        let response = post(
            state(Arc::new(PanickingModel), MemoryStore::seeded()),
            r#"{"question": "Boom?"}"#,
        )
        .await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            json_body(response).await,
            json!({"error": "Unknown error occurred"})
        );
    }
}
