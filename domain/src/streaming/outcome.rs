//! The result of one orchestration call.

use crate::provider::fault::ProviderFault;

/// A fault recorded against one provider attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptFault {
    pub label: String,
    pub description: String,
}

impl AttemptFault {
    pub fn new(label: impl Into<String>, fault: &ProviderFault) -> Self {
        Self {
            label: label.into(),
            description: fault.to_string(),
        }
    }
}

/// Summary of one orchestration call, handed to persistence by the caller.
///
/// `full_text` holds only the text of the attempt that finished. Text from
/// abandoned attempts was relayed live but is not part of the record. When
/// every provider failed, `full_text` is the composite failure message that
/// was emitted as the final fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutcomeRecord {
    pub full_text: String,
    pub provider_label_used: String,
    pub attempt_faults: Vec<AttemptFault>,
    /// Whether some provider completed its stream normally.
    pub completed: bool,
}

impl OutcomeRecord {
    pub fn completed(
        full_text: impl Into<String>,
        provider_label_used: impl Into<String>,
        attempt_faults: Vec<AttemptFault>,
    ) -> Self {
        Self {
            full_text: full_text.into(),
            provider_label_used: provider_label_used.into(),
            attempt_faults,
            completed: true,
        }
    }

    pub fn failed(provider_label_used: impl Into<String>, attempt_faults: Vec<AttemptFault>) -> Self {
        Self {
            full_text: failure_message(&attempt_faults),
            provider_label_used: provider_label_used.into(),
            attempt_faults,
            completed: false,
        }
    }

    /// Whether at least one provider had to be skipped.
    pub fn failed_over(&self) -> bool {
        !self.attempt_faults.is_empty()
    }
}

/// Human-readable summary of every recorded fault, in attempt order.
///
/// Never empty, so a display always has something to render.
pub fn failure_message(faults: &[AttemptFault]) -> String {
    if faults.is_empty() {
        return "Error: no provider produced a response.".to_string();
    }
    let causes = faults
        .iter()
        .map(|f| format!("{}: {}", f.label, f.description))
        .collect::<Vec<_>>()
        .join("; ");
    format!("Error: all providers failed ({})", causes)
}
