//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into domain and application
//! types once validated.

mod chat;
mod providers;
mod repl;
mod roster;
mod transcript;

pub use chat::FileChatConfig;
pub use providers::{FileGeminiConfig, FileOpenAiConfig, FileProvidersConfig};
pub use repl::FileReplConfig;
pub use roster::FileRosterEntry;
pub use transcript::FileTranscriptConfig;

use crate::providers::ProviderKind;
use planwise_application::config::ChatConfig;
use planwise_domain::{GeminiProviderConfig, OpenAiProviderConfig, ProviderConfig};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Configuration validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("roster must contain at least one provider")]
    EmptyRoster,

    #[error("roster label cannot be empty")]
    EmptyLabel,

    #[error("duplicate roster label '{0}'")]
    DuplicateLabel(String),

    #[error("roster entry '{0}' has an empty model name")]
    EmptyModelName(String),

    #[error("roster entry '{label}' has unknown provider kind '{kind}' (expected gemini or openai)")]
    UnknownKind { label: String, kind: String },

    #[error("providers.connect_timeout_secs cannot be 0")]
    InvalidTimeout,

    #[error("chat.user_id cannot be empty")]
    EmptyUserId,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Directive, user and provider preference
    pub chat: FileChatConfig,
    /// Backend credentials and endpoints
    pub providers: FileProvidersConfig,
    /// Failover order
    pub roster: Vec<FileRosterEntry>,
    /// Transcript persistence
    pub transcript: FileTranscriptConfig,
    /// REPL settings
    pub repl: FileReplConfig,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            chat: FileChatConfig::default(),
            providers: FileProvidersConfig::default(),
            roster: FileRosterEntry::default_roster(),
            transcript: FileTranscriptConfig::default(),
            repl: FileReplConfig::default(),
        }
    }
}

impl FileConfig {
    /// Validate the configuration, reporting the first problem found.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.providers.connect_timeout_secs == 0 {
            return Err(ConfigValidationError::InvalidTimeout);
        }
        if self.chat.user_id.trim().is_empty() {
            return Err(ConfigValidationError::EmptyUserId);
        }
        if self.roster.is_empty() {
            return Err(ConfigValidationError::EmptyRoster);
        }

        let mut seen = HashSet::new();
        for entry in &self.roster {
            let label = entry.label.trim();
            if label.is_empty() {
                return Err(ConfigValidationError::EmptyLabel);
            }
            if !seen.insert(label) {
                return Err(ConfigValidationError::DuplicateLabel(label.to_string()));
            }
            if entry.model.trim().is_empty() {
                return Err(ConfigValidationError::EmptyModelName(label.to_string()));
            }
            if entry.kind.parse::<ProviderKind>().is_err() {
                return Err(ConfigValidationError::UnknownKind {
                    label: label.to_string(),
                    kind: entry.kind.clone(),
                });
            }
        }

        Ok(())
    }

    pub fn to_provider_config(&self) -> ProviderConfig {
        ProviderConfig {
            roster: self.roster.iter().map(FileRosterEntry::to_entry_config).collect(),
            gemini: GeminiProviderConfig {
                api_key_env: self.providers.gemini.api_key_env.clone(),
                api_key: self.providers.gemini.api_key.clone(),
                base_url: self.providers.gemini.base_url.clone(),
            },
            openai: OpenAiProviderConfig {
                api_key_env: self.providers.openai.api_key_env.clone(),
                api_key: self.providers.openai.api_key.clone(),
                base_url: self.providers.openai.base_url.clone(),
            },
            connect_timeout_secs: self.providers.connect_timeout_secs,
        }
    }

    pub fn to_chat_config(&self) -> ChatConfig {
        self.chat.to_chat_config()
    }

    /// Effective configuration as TOML, with direct API keys masked.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        let mut masked = self.clone();
        for key in [
            &mut masked.providers.gemini.api_key,
            &mut masked.providers.openai.api_key,
        ] {
            if key.is_some() {
                *key = Some("********".to_string());
            }
        }
        toml::to_string_pretty(&masked)
    }
}
