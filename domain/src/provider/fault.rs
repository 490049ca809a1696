//! Provider fault taxonomy.
//!
//! Every fault is recoverable at the failover level: the orchestrator moves on
//! to the next provider regardless of kind. The kind only matters for logs and
//! for the message shown when every provider has failed.

use thiserror::Error;

/// A failure raised by a provider while opening or consuming a stream.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderFault {
    /// Missing or rejected credential, or a request the provider refuses
    /// because of configuration (unknown model, bad endpoint).
    #[error("authentication error: {0}")]
    Auth(String),

    /// Connection reset, timeout, DNS failure, or a server-side outage.
    #[error("transport error: {0}")]
    Transport(String),

    /// Rate limit or quota exhausted.
    #[error("quota exceeded: {0}")]
    Quota(String),

    /// The provider answered with a payload we could not interpret.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl ProviderFault {
    /// Short machine-friendly name of the fault kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderFault::Auth(_) => "auth",
            ProviderFault::Transport(_) => "transport",
            ProviderFault::Quota(_) => "quota",
            ProviderFault::MalformedResponse(_) => "malformed_response",
        }
    }

    /// Classify an HTTP status code returned by a provider endpoint.
    pub fn from_status(status: u16, detail: impl Into<String>) -> Self {
        let detail = format!("HTTP {}: {}", status, detail.into());
        match status {
            400 | 401 | 403 | 404 => ProviderFault::Auth(detail),
            429 => ProviderFault::Quota(detail),
            _ => ProviderFault::Transport(detail),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_classification() {
        assert!(matches!(
            ProviderFault::from_status(401, "bad key"),
            ProviderFault::Auth(_)
        ));
        assert!(matches!(
            ProviderFault::from_status(404, "no such model"),
            ProviderFault::Auth(_)
        ));
        assert!(matches!(
            ProviderFault::from_status(429, "slow down"),
            ProviderFault::Quota(_)
        ));
        assert!(matches!(
            ProviderFault::from_status(503, "overloaded"),
            ProviderFault::Transport(_)
        ));
    }

    #[test]
    fn display_includes_status_and_detail() {
        let fault = ProviderFault::from_status(429, "Resource has been exhausted");
        assert_eq!(
            fault.to_string(),
            "quota exceeded: HTTP 429: Resource has been exhausted"
        );
        assert_eq!(fault.kind(), "quota");
    }
}
