//! Provider configuration from TOML (`[providers]` section)

use serde::{Deserialize, Serialize};

/// Google Gemini API provider configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGeminiConfig {
    /// Environment variable name for the API key (default: "GEMINI_API_KEY").
    pub api_key_env: String,
    /// Direct API key (not recommended, use the env var instead).
    pub api_key: Option<String>,
    /// Base URL for the Generative Language API.
    pub base_url: String,
}

impl Default for FileGeminiConfig {
    fn default() -> Self {
        let defaults = planwise_domain::GeminiProviderConfig::default();
        Self {
            api_key_env: defaults.api_key_env,
            api_key: defaults.api_key,
            base_url: defaults.base_url,
        }
    }
}

/// OpenAI API provider configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOpenAiConfig {
    /// Environment variable name for the API key (default: "OPENAI_API_KEY").
    pub api_key_env: String,
    /// Direct API key (not recommended, use the env var instead).
    pub api_key: Option<String>,
    /// Base URL for the OpenAI API (can be overridden for compatible gateways).
    pub base_url: String,
}

impl Default for FileOpenAiConfig {
    fn default() -> Self {
        let defaults = planwise_domain::OpenAiProviderConfig::default();
        Self {
            api_key_env: defaults.api_key_env,
            api_key: defaults.api_key,
            base_url: defaults.base_url,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProvidersConfig {
    /// Seconds allowed for establishing a provider connection.
    pub connect_timeout_secs: u64,
    /// Gemini API settings.
    pub gemini: FileGeminiConfig,
    /// OpenAI API settings.
    pub openai: FileOpenAiConfig,
}

impl Default for FileProvidersConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: planwise_domain::ProviderConfig::default().connect_timeout_secs,
            gemini: FileGeminiConfig::default(),
            openai: FileOpenAiConfig::default(),
        }
    }
}
