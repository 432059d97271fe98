//! Conversation Messages
//!
//! Content blocks are a closed tagged union. A block whose `type` tag is not
//! one of `text`, `tool_use` or `tool_result` fails to deserialize.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{AgentError, Result};
use crate::tool::{ToolCall, ToolResult};

/// Role of a message sender
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// User input
    User,
    /// Assistant (LLM) response
    Assistant,
    /// Tool results injected back into the exchange
    Tool,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
            Role::Tool => write!(f, "tool-result"),
        }
    }
}

/// One block of message content
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// Plain text
    Text { text: String },

    /// Model-emitted request to run a tool
    ToolUse {
        id: String,
        name: String,
        #[serde(default)]
        input: serde_json::Value,
    },

    /// Result of a tool run, answering a `ToolUse` by id
    ToolResult {
        tool_use_id: String,
        content: String,
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        is_error: bool,
    },
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        ContentBlock::Text { text: text.into() }
    }

    /// Text of a text block
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentBlock::Text { text } => Some(text),
            ContentBlock::ToolUse { .. } | ContentBlock::ToolResult { .. } => None,
        }
    }

    /// Tool call carried by a tool-use block
    pub fn as_tool_call(&self) -> Option<ToolCall> {
        match self {
            ContentBlock::ToolUse { id, name, input } => {
                Some(ToolCall::new(id.clone(), name.clone(), input.clone()))
            }
            ContentBlock::Text { .. } | ContentBlock::ToolResult { .. } => None,
        }
    }
}

/// A single message in a conversation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Message role
    pub role: Role,

    /// Ordered content blocks
    pub content: Vec<ContentBlock>,
}

impl Message {
    /// Create a user text message
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: vec![ContentBlock::text(text)],
        }
    }

    /// Create an assistant message from response blocks
    pub fn assistant(content: Vec<ContentBlock>) -> Self {
        Self {
            role: Role::Assistant,
            content,
        }
    }

    /// Concatenated text of all text blocks
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(ContentBlock::as_text)
            .collect::<Vec<_>>()
            .join("")
    }

    /// Tool calls in source order
    pub fn tool_calls(&self) -> Vec<ToolCall> {
        self.content.iter().filter_map(ContentBlock::as_tool_call).collect()
    }
}

/// Append-only message sequence scoped to one orchestration
#[derive(Clone, Debug, Default)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a conversation with a user message
    pub fn from_user(text: impl Into<String>) -> Self {
        let mut conv = Self::new();
        conv.push(Message::user(text));
        conv
    }

    /// Append a user or assistant message
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Append the results for the immediately preceding assistant turn.
    ///
    /// Every result must answer exactly one tool call of that turn, and every
    /// tool call must be answered.
    pub fn push_tool_results(&mut self, results: &[ToolResult]) -> Result<()> {
        let last = self
            .messages
            .last()
            .filter(|m| m.role == Role::Assistant)
            .ok_or_else(|| {
                AgentError::Conversation("tool results must follow an assistant turn".into())
            })?;

        let expected: HashSet<String> = last.tool_calls().into_iter().map(|c| c.id).collect();
        let mut seen = HashSet::new();

        for result in results {
            if !expected.contains(&result.tool_call_id) {
                return Err(AgentError::Conversation(format!(
                    "tool result '{}' has no matching tool call",
                    result.tool_call_id
                )));
            }
            if !seen.insert(result.tool_call_id.clone()) {
                return Err(AgentError::Conversation(format!(
                    "duplicate tool result for '{}'",
                    result.tool_call_id
                )));
            }
        }

        if seen.len() != expected.len() {
            return Err(AgentError::Conversation(format!(
                "{} tool call(s) left unanswered",
                expected.len() - seen.len()
            )));
        }

        self.messages.push(Message {
            role: Role::Tool,
            content: results.iter().map(ToolResult::to_block).collect(),
        });
        Ok(())
    }

    /// Get all messages
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Get the last message
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Number of messages
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::ToolOutput;
    use serde_json::json;

    fn tool_use(id: &str) -> ContentBlock {
        ContentBlock::ToolUse {
            id: id.into(),
            name: "get_weather".into(),
            input: json!({"city": "Tokyo"}),
        }
    }

    fn ok_result(id: &str) -> ToolResult {
        let call = ToolCall::new(id, "get_weather", json!({}));
        ToolResult::success(&call, ToolOutput::text("done"))
    }

    #[test]
    fn test_block_wire_shape() {
        let block: ContentBlock = serde_json::from_value(json!({
            "type": "tool_use",
            "id": "toolu_1",
            "name": "get_weather",
            "input": {"city": "Tokyo"}
        }))
        .unwrap();
        assert_eq!(block, tool_use("toolu_1"));

        let result = ContentBlock::ToolResult {
            tool_use_id: "toolu_1".into(),
            content: "ok".into(),
            is_error: false,
        };
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"type": "tool_result", "tool_use_id": "toolu_1", "content": "ok"})
        );
    }

    #[test]
    fn test_unknown_block_tag_rejected() {
        let parsed = serde_json::from_value::<ContentBlock>(json!({
            "type": "thinking",
            "thinking": "hmm"
        }));
        assert!(parsed.is_err());
    }

    #[test]
    fn test_tool_results_follow_assistant() {
        let mut conv = Conversation::from_user("Weather in Tokyo?");
        conv.push(Message::assistant(vec![ContentBlock::text("Checking"), tool_use("t1")]));

        conv.push_tool_results(&[ok_result("t1")]).unwrap();

        assert_eq!(conv.len(), 3);
        let last = conv.last().unwrap();
        assert_eq!(last.role, Role::Tool);
        assert!(matches!(
            &last.content[0],
            ContentBlock::ToolResult { tool_use_id, .. } if tool_use_id == "t1"
        ));
    }

    #[test]
    fn test_orphan_tool_result_rejected() {
        let mut conv = Conversation::from_user("hi");
        conv.push(Message::assistant(vec![tool_use("t1")]));

        let err = conv.push_tool_results(&[ok_result("other")]).unwrap_err();
        assert!(matches!(err, AgentError::Conversation(_)));
        assert_eq!(conv.len(), 2);
    }

    #[test]
    fn test_tool_result_without_assistant_rejected() {
        let mut conv = Conversation::from_user("hi");
        assert!(conv.push_tool_results(&[ok_result("t1")]).is_err());
    }

    #[test]
    fn test_unanswered_and_duplicate_rejected() {
        let mut conv = Conversation::from_user("hi");
        conv.push(Message::assistant(vec![tool_use("t1"), tool_use("t2")]));

        assert!(conv.push_tool_results(&[ok_result("t1")]).is_err());
        assert!(conv
            .push_tool_results(&[ok_result("t1"), ok_result("t1")])
            .is_err());
        assert!(conv
            .push_tool_results(&[ok_result("t1"), ok_result("t2")])
            .is_ok());
    }
}
