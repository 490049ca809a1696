//! Application layer for planwise
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{ChatConfig, DEFAULT_DIRECTIVE, DEFAULT_USER_ID};
pub use ports::{
    fragment_sink::{FragmentSink, NoFragmentSink},
    provider_adapter::{FragmentStream, ProviderAdapter},
    transcript_store::{NoTranscriptStore, TranscriptError, TranscriptStore},
};
pub use use_cases::failover::{FailoverOrchestrator, ProviderEntry, ResponseStream};
pub use use_cases::run_chat_turn::{
    ChatTurnOutput, RunChatTurnError, RunChatTurnUseCase, new_session_id,
};
