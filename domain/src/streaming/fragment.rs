//! Incremental text fragments relayed to the caller during streaming.

/// One piece of generated text, tagged with the provider that produced it.
///
/// The concatenation of all fragments of a successful attempt, in emission
/// order, is that attempt's full response text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamFragment {
    pub text: String,
    pub provider_label: String,
}

impl StreamFragment {
    pub fn new(text: impl Into<String>, provider_label: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            provider_label: provider_label.into(),
        }
    }
}

impl std::fmt::Display for StreamFragment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}
