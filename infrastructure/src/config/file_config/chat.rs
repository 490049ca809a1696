//! Chat configuration from TOML (`[chat]` section)

use planwise_application::config::{ChatConfig, DEFAULT_DIRECTIVE, DEFAULT_USER_ID};
use serde::{Deserialize, Serialize};

/// Raw chat configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileChatConfig {
    /// System directive sent with every request
    pub directive: String,
    /// Roster label to try first
    pub preferred_provider: Option<String>,
    /// Owner of persisted transcripts
    pub user_id: String,
}

impl Default for FileChatConfig {
    fn default() -> Self {
        Self {
            directive: DEFAULT_DIRECTIVE.to_string(),
            preferred_provider: None,
            user_id: DEFAULT_USER_ID.to_string(),
        }
    }
}

impl FileChatConfig {
    pub fn to_chat_config(&self) -> ChatConfig {
        let config = ChatConfig::default()
            .with_directive(self.directive.clone())
            .with_user_id(self.user_id.trim());
        match self.preferred_provider.as_deref().map(str::trim) {
            Some(label) if !label.is_empty() => config.with_preferred_provider(label),
            _ => config,
        }
    }
}
