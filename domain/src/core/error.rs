//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("No providers configured")]
    EmptyRoster,

    #[error("Duplicate provider label: {0}")]
    DuplicateProviderLabel(String),

    #[error("Message content cannot be empty")]
    EmptyContent,

    #[error("Unknown provider kind: {0}")]
    UnknownProviderKind(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_label_display() {
        let error = DomainError::DuplicateProviderLabel("ChatGPT 5.2".to_string());
        assert_eq!(error.to_string(), "Duplicate provider label: ChatGPT 5.2");
    }

    #[test]
    fn test_empty_roster_display() {
        assert_eq!(DomainError::EmptyRoster.to_string(), "No providers configured");
    }
}
