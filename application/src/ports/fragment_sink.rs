//! Fragment sink port
//!
//! Defines how streamed fragments reach a live display while a chat turn
//! is running.

use planwise_domain::{OutcomeRecord, StreamFragment};

/// Callback for live rendering of a streaming response.
///
/// Implementations live in the presentation layer. Fragments that were
/// already handed to the sink are never retracted, even if the provider that
/// produced them fails afterwards.
pub trait FragmentSink: Send + Sync {
    /// Called before the first provider attempt starts.
    fn on_stream_start(&self, _provider_label: &str) {}

    /// Called for each fragment, as soon as it arrives.
    fn on_fragment(&self, fragment: &StreamFragment);

    /// Called when fragments start arriving from a different provider.
    fn on_provider_switch(&self, _from: &str, _to: &str) {}

    /// Called once the stream is exhausted.
    fn on_stream_end(&self, _outcome: &OutcomeRecord) {}
}

/// No-op sink for when nothing is displayed.
pub struct NoFragmentSink;

impl FragmentSink for NoFragmentSink {
    fn on_fragment(&self, _fragment: &StreamFragment) {}
}
