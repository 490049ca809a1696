//! Provider adapters and roster construction.
//!
//! Each backend kind has one adapter implementing
//! [`ProviderAdapter`](planwise_application::ProviderAdapter). A roster entry
//! pairs a label with an adapter and a model id; adapters of the same kind
//! are shared between entries.

pub mod gemini;
pub mod http;
pub mod openai;
pub mod sse;

#[cfg(test)]
pub(crate) mod test_server;

use gemini::GeminiAdapter;
use openai::OpenAiAdapter;
use planwise_application::ports::provider_adapter::ProviderAdapter;
use planwise_application::use_cases::failover::ProviderEntry;
use planwise_domain::{DomainError, ProviderConfig};
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Gemini,
    OpenAi,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "gemini",
            ProviderKind::OpenAi => "openai",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gemini" | "google" => Ok(ProviderKind::Gemini),
            "openai" | "chatgpt" => Ok(ProviderKind::OpenAi),
            other => Err(DomainError::UnknownProviderKind(other.to_string())),
        }
    }
}

/// Errors raised while turning provider settings into a roster.
#[derive(Error, Debug)]
pub enum RosterBuildError {
    #[error(transparent)]
    Invalid(#[from] DomainError),

    #[error("Could not create HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Build the roster entries described by `config`, in configured order.
pub fn build_roster(config: &ProviderConfig) -> Result<Vec<ProviderEntry>, RosterBuildError> {
    let client = http::build_client(config.connect_timeout_secs)?;
    let gemini: Arc<dyn ProviderAdapter> =
        Arc::new(GeminiAdapter::new(client.clone(), config.gemini.clone()));
    let openai: Arc<dyn ProviderAdapter> =
        Arc::new(OpenAiAdapter::new(client, config.openai.clone()));

    config
        .roster
        .iter()
        .map(|entry| {
            let adapter = match entry.kind.parse::<ProviderKind>()? {
                ProviderKind::Gemini => Arc::clone(&gemini),
                ProviderKind::OpenAi => Arc::clone(&openai),
            };
            debug!(label = %entry.label, kind = %entry.kind, model = %entry.model, "Roster entry");
            Ok(ProviderEntry::new(
                entry.label.clone(),
                adapter,
                entry.model.clone(),
            ))
        })
        .collect()
}
