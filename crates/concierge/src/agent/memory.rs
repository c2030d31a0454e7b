//! Per-run conversation memory.

use crate::claude::{ContentBlock, Message};

/// Messages exchanged with the model during one run.
///
/// Unbounded, and created fresh for every question so concurrent requests
/// never see each other's turns.
#[derive(Debug, Clone, Default)]
pub struct ConversationMemory {
    messages: Vec<Message>,
}

impl ConversationMemory {
    /// Start a conversation with the customer's question.
    #[must_use]
    pub fn new(question: &str) -> Self {
        Self {
            messages: vec![Message::user_text(question)],
        }
    }

    /// Record an assistant turn.
    pub fn push_assistant(&mut self, blocks: Vec<ContentBlock>) {
        self.messages.push(Message::assistant_blocks(blocks));
    }

    /// Record the tool results answering the previous assistant turn.
    pub fn push_tool_results(&mut self, results: Vec<ContentBlock>) {
        if !results.is_empty() {
            self.messages.push(Message::user_blocks(results));
        }
    }

    /// All messages so far, oldest first.
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Number of messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the memory holds no messages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claude::MessageContent;

    #[test]
    fn test_new_starts_with_question() {
        let memory = ConversationMemory::new("Do you ship to Canada?");
        assert_eq!(memory.len(), 1);
        let first = memory.messages().first().expect("question");
        assert_eq!(first.role, "user");
        assert!(matches!(&first.content, MessageContent::Text(t) if t == "Do you ship to Canada?"));
    }

    #[test]
    fn test_turns_alternate() {
        let mut memory = ConversationMemory::new("hi");
        memory.push_assistant(vec![ContentBlock::ToolUse {
            id: "toolu_1".into(),
            name: "coffee_club".into(),
            input: serde_json::json!({"action": "info"}),
        }]);
        memory.push_tool_results(vec![ContentBlock::ToolResult {
            tool_use_id: "toolu_1".into(),
            content: "benefits".into(),
            is_error: Some(false),
        }]);

        let roles: Vec<&str> = memory.messages().iter().map(|m| m.role.as_str()).collect();
        assert_eq!(roles, vec!["user", "assistant", "user"]);
    }

    #[test]
    fn test_empty_results_not_recorded() {
        let mut memory = ConversationMemory::new("hi");
        memory.push_tool_results(Vec::new());
        assert_eq!(memory.len(), 1);
    }
}
