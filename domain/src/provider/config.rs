//! Provider configuration types (provider-neutral, serde-free).
//!
//! These types define the shape of provider settings without depending
//! on any serialization format (TOML, JSON, etc.).

/// Label of the default primary provider.
pub const DEFAULT_PRIMARY_LABEL: &str = "gemini-3-pro-preview";

/// Label of the default backup provider.
pub const DEFAULT_BACKUP_LABEL: &str = "ChatGPT 5.2";

/// Top-level provider configuration.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Failover roster in default order. Labels must be unique.
    pub roster: Vec<RosterEntryConfig>,
    /// Google Gemini API settings.
    pub gemini: GeminiProviderConfig,
    /// OpenAI API settings.
    pub openai: OpenAiProviderConfig,
    /// Connect timeout for provider requests, in seconds.
    pub connect_timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            roster: RosterEntryConfig::default_roster(),
            gemini: GeminiProviderConfig::default(),
            openai: OpenAiProviderConfig::default(),
            connect_timeout_secs: 15,
        }
    }
}

/// One roster slot: which backend serves a label and with which model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntryConfig {
    /// Display label, e.g. "ChatGPT 5.2".
    pub label: String,
    /// Backend kind name: "gemini" or "openai".
    pub kind: String,
    /// Model identifier sent to the backend.
    pub model: String,
}

impl RosterEntryConfig {
    pub fn new(
        label: impl Into<String>,
        kind: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            kind: kind.into(),
            model: model.into(),
        }
    }

    /// Gemini first, OpenAI as backup.
    pub fn default_roster() -> Vec<Self> {
        vec![
            Self::new(DEFAULT_PRIMARY_LABEL, "gemini", "gemini-3-pro-preview"),
            Self::new(DEFAULT_BACKUP_LABEL, "openai", "gpt-5"),
        ]
    }
}

/// Google Gemini API provider configuration.
#[derive(Debug, Clone)]
pub struct GeminiProviderConfig {
    /// Environment variable name for the API key (default: "GEMINI_API_KEY").
    pub api_key_env: String,
    /// Direct API key (not recommended: use env var instead).
    pub api_key: Option<String>,
    /// Base URL for the Generative Language API.
    pub base_url: String,
}

impl Default for GeminiProviderConfig {
    fn default() -> Self {
        Self {
            api_key_env: "GEMINI_API_KEY".to_string(),
            api_key: None,
            base_url: "https://generativelanguage.googleapis.com".to_string(),
        }
    }
}

/// OpenAI API provider configuration.
#[derive(Debug, Clone)]
pub struct OpenAiProviderConfig {
    /// Environment variable name for the API key (default: "OPENAI_API_KEY").
    pub api_key_env: String,
    /// Direct API key (not recommended: use env var instead).
    pub api_key: Option<String>,
    /// Base URL for the OpenAI API.
    pub base_url: String,
}

impl Default for OpenAiProviderConfig {
    fn default() -> Self {
        Self {
            api_key_env: "OPENAI_API_KEY".to_string(),
            api_key: None,
            base_url: "https://api.openai.com".to_string(),
        }
    }
}
