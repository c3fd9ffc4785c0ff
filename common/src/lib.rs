//! Shared types for the investment board workspace
//!
//! Chat messages are the only thing that crosses the boundary between the
//! board pipeline and the generation client, so they live here.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Who a chat message is attributed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Persona / instruction message
    System,
    /// Context the model should treat as its own prior output
    Assistant,
    /// The task to address
    User,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MessageRole::System => "system",
            MessageRole::Assistant => "assistant",
            MessageRole::User => "user",
        };
        f.write_str(label)
    }
}

/// A single role-tagged message sent to the generation service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }
}

/// Content of the last user message in a conversation, if any
pub fn last_user_content(messages: &[ChatMessage]) -> Option<&str> {
    messages
        .iter()
        .rev()
        .find(|m| m.role == MessageRole::User)
        .map(|m| m.content.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serializes_lowercase() {
        let msg = ChatMessage::assistant("Discussion so far: ");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "assistant");
        assert_eq!(json["content"], "Discussion so far: ");
    }

    #[test]
    fn test_last_user_content() {
        let messages = vec![
            ChatMessage::system("persona"),
            ChatMessage::user("first"),
            ChatMessage::assistant("context"),
            ChatMessage::user("second"),
        ];
        assert_eq!(last_user_content(&messages), Some("second"));
        assert_eq!(last_user_content(&messages[..1]), None);
    }
}
