//! Provider adapter port
//!
//! Defines the `StreamGenerate` capability every model provider implements.

use async_trait::async_trait;
use futures::stream::BoxStream;
use planwise_domain::{ConversationTurn, ProviderFault};

/// Lazy, finite, forward-only sequence of text fragments from one provider.
///
/// A mid-stream failure is yielded as an `Err` item; the stream should not be
/// polled after that. Dropping the stream closes the underlying connection,
/// whether it was exhausted or not.
pub type FragmentStream = BoxStream<'static, Result<String, ProviderFault>>;

/// Streaming access to one LLM provider.
///
/// This port defines how the application layer talks to model providers.
/// Implementations (adapters) live in the infrastructure layer; they differ
/// only in how they shape the wire request.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Backend name used in logs (e.g. "gemini", "openai").
    fn name(&self) -> &str;

    /// Open a streaming generation call.
    ///
    /// Returns once the provider has accepted the request; fragments are then
    /// pulled from the returned stream. `history` may be empty. Failures to
    /// establish the stream are returned directly rather than as stream items.
    async fn stream_generate(
        &self,
        model_id: &str,
        history: &[ConversationTurn],
        directive: &str,
    ) -> Result<FragmentStream, ProviderFault>;
}
