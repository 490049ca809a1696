//! Chat parameters: directive, user identity and provider preference.
//!
//! [`ChatConfig`] is what a chat front end needs besides the provider roster.
//! It is built by the infrastructure config loader and handed to
//! [`RunChatTurnUseCase`](crate::use_cases::run_chat_turn::RunChatTurnUseCase).

/// System directive used when none is configured.
pub const DEFAULT_DIRECTIVE: &str = "You are a helpful Business Planning Assistant. \
Provide clear, professional, and actionable advice.";

/// User id used when none is configured or given on the command line.
pub const DEFAULT_USER_ID: &str = "guest";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatConfig {
    /// Instruction sent with every request.
    pub directive: String,
    /// Label to try first; unknown labels fall back to roster order.
    pub preferred_provider: Option<String>,
    /// Owner of persisted transcripts.
    pub user_id: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            directive: DEFAULT_DIRECTIVE.to_string(),
            preferred_provider: None,
            user_id: DEFAULT_USER_ID.to_string(),
        }
    }
}

impl ChatConfig {
    // ==================== Builder Methods ====================

    pub fn with_directive(mut self, directive: impl Into<String>) -> Self {
        self.directive = directive.into();
        self
    }

    pub fn with_preferred_provider(mut self, label: impl Into<String>) -> Self {
        self.preferred_provider = Some(label.into());
        self
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }
}
