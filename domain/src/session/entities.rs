//! Chat session entity

use crate::conversation::turn::ConversationTurn;
use crate::core::error::DomainError;

/// A student's chat session (Entity)
///
/// Holds the conversation history and the pending-feedback flag. The session
/// is owned by the caller of the streaming core; the core only ever sees the
/// history slice passed to it.
#[derive(Debug, Clone)]
pub struct ChatSession {
    user_id: String,
    session_id: String,
    messages: Vec<ConversationTurn>,
    feedback_pending: bool,
    answered_by: Option<String>,
}

impl ChatSession {
    pub fn new(user_id: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            session_id: session_id.into(),
            messages: Vec::new(),
            feedback_pending: false,
            answered_by: None,
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn messages(&self) -> &[ConversationTurn] {
        &self.messages
    }

    pub fn last_message(&self) -> Option<&ConversationTurn> {
        self.messages.last()
    }

    /// Index of the most recent message, as used by transcript records.
    pub fn last_index(&self) -> Option<usize> {
        self.messages.len().checked_sub(1)
    }

    pub fn is_feedback_pending(&self) -> bool {
        self.feedback_pending
    }

    pub fn set_feedback_pending(&mut self, pending: bool) {
        self.feedback_pending = pending;
    }

    /// Label of the provider that produced the latest answer.
    pub fn answered_by(&self) -> Option<&str> {
        self.answered_by.as_deref()
    }

    pub fn set_answered_by(&mut self, provider_label: impl Into<String>) {
        self.answered_by = Some(provider_label.into());
    }

    pub fn push_user(&mut self, content: impl Into<String>) -> Result<(), DomainError> {
        self.messages.push(ConversationTurn::user(content)?);
        Ok(())
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) -> Result<(), DomainError> {
        self.messages.push(ConversationTurn::assistant(content)?);
        Ok(())
    }

    /// Start over with an empty history under a new session id.
    pub fn reset(&mut self, session_id: impl Into<String>) {
        self.session_id = session_id.into();
        self.messages.clear();
        self.feedback_pending = false;
        self.answered_by = None;
    }

    /// Continue a previously persisted session.
    pub fn restore(&mut self, session_id: impl Into<String>, messages: Vec<ConversationTurn>) {
        self.session_id = session_id.into();
        self.messages = messages;
        self.feedback_pending = false;
        self.answered_by = None;
    }
}
