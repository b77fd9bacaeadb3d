use async_trait::async_trait;

use crate::domain::entities::{ChatMessage, MessageRole};

#[derive(Debug)]
pub enum ChatModelError {
    NetworkError(String),
    ApiError(String),
    EmptyResponse,
}

impl std::fmt::Display for ChatModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChatModelError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            ChatModelError::ApiError(msg) => write!(f, "API error: {}", msg),
            ChatModelError::EmptyResponse => write!(f, "Model returned no choices"),
        }
    }
}

impl std::error::Error for ChatModelError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// One turn of a chat-completion request, independent of any provider's wire
/// format.
#[derive(Debug, Clone)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

impl ChatTurn {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

impl From<&ChatMessage> for ChatTurn {
    fn from(message: &ChatMessage) -> Self {
        match message.role {
            MessageRole::Student => ChatTurn::user(message.content.clone()),
            MessageRole::Assistant => ChatTurn::assistant(message.content.clone()),
        }
    }
}

#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(&self, turns: &[ChatTurn]) -> Result<String, ChatModelError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_message_maps_to_turn() {
        let turn = ChatTurn::from(&ChatMessage::student("Bonjour"));
        assert_eq!(turn.role, ChatRole::User);
        assert_eq!(turn.content, "Bonjour");

        let turn = ChatTurn::from(&ChatMessage::assistant("Bonjour !"));
        assert_eq!(turn.role, ChatRole::Assistant);
    }
}
