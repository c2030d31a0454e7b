//! Claude API integration for the customer-service agent.
//!
//! # Features
//!
//! - Non-streaming Messages API calls with tool use
//! - Deterministic sampling (temperature 0)
//! - Error classification for the agent's retry policy
//!
//! The [`LanguageModel`] trait is the seam between the agent loop and the
//! provider, so the loop can be driven by a scripted model in tests.

pub mod client;
pub mod error;
pub mod types;

use async_trait::async_trait;

pub use client::ClaudeClient;
pub use error::ClaudeError;
pub use types::{
    ChatRequest, ChatResponse, ContentBlock, Message, MessageContent, StopReason, Tool, Usage,
};

/// A chat model that can answer with text or request tool calls.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Send one turn of a conversation and return the complete response.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the provider rejects it.
    async fn chat(
        &self,
        messages: Vec<Message>,
        system: Option<String>,
        tools: Option<Vec<Tool>>,
    ) -> Result<ChatResponse, ClaudeError>;
}
