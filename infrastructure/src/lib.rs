//! Infrastructure layer for planwise
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: streaming provider clients, configuration
//! file loading, and transcript storage.

pub mod config;
pub mod providers;
pub mod transcript;

// Re-export commonly used types
pub use config::{ConfigLoader, ConfigValidationError, FileConfig, FileReplConfig};
pub use providers::{
    ProviderKind, RosterBuildError, build_roster, gemini::GeminiAdapter, openai::OpenAiAdapter,
};
pub use transcript::{JsonlTranscriptStore, StoredEntry};
