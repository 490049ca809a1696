//! Conversation turns exchanged between the student and the assistant.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Speaker of a [`ConversationTurn`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single message in the conversation history (Value Object).
///
/// Content is never empty; construction through [`ConversationTurn::new`]
/// enforces this. History order is the causal order of the dialogue, so
/// turns are only ever appended, never edited in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    role: Role,
    content: String,
}

impl ConversationTurn {
    pub fn new(role: Role, content: impl Into<String>) -> Result<Self, DomainError> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(DomainError::EmptyContent);
        }
        Ok(Self { role, content })
    }

    pub fn user(content: impl Into<String>) -> Result<Self, DomainError> {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Result<Self, DomainError> {
        Self::new(Role::Assistant, content)
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_content() {
        assert_eq!(
            ConversationTurn::user("   \n").unwrap_err(),
            DomainError::EmptyContent
        );
        assert!(ConversationTurn::assistant("").is_err());
    }

    #[test]
    fn keeps_content_verbatim() {
        let turn = ConversationTurn::user("  How do I price my product? ").unwrap();
        assert_eq!(turn.content(), "  How do I price my product? ");
        assert_eq!(turn.role(), Role::User);
    }

    #[test]
    fn role_serializes_lowercase() {
        let turn = ConversationTurn::assistant("Start with costs.").unwrap();
        let json = serde_json::to_value(&turn).unwrap();
        assert_eq!(json["role"], "assistant");
        assert_eq!(json["content"], "Start with costs.");
    }
}
