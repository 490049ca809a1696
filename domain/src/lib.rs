//! Domain layer for planwise
//!
//! This crate contains the core types, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Conversation
//!
//! An ordered history of [`ConversationTurn`]s plus a system directive is all
//! a provider ever needs to produce an answer.
//!
//! ## Failover streaming
//!
//! Answers arrive as [`StreamFragment`]s tagged with the provider that produced
//! them. When a provider fails, its [`ProviderFault`] is recorded and the next
//! provider takes over; the call ends with one [`OutcomeRecord`].

pub mod conversation;
pub mod core;
pub mod provider;
pub mod session;
pub mod streaming;
pub mod util;

// Re-export commonly used types
pub use conversation::{
    interaction::{CLARIFICATION_PROMPT, InteractionType},
    turn::{ConversationTurn, Role},
};
pub use core::error::DomainError;
pub use provider::{
    config::{
        DEFAULT_BACKUP_LABEL, DEFAULT_PRIMARY_LABEL, GeminiProviderConfig, OpenAiProviderConfig,
        ProviderConfig, RosterEntryConfig,
    },
    fault::ProviderFault,
};
pub use session::{entities::ChatSession, transcript::TranscriptRecord};
pub use streaming::{
    fragment::StreamFragment,
    outcome::{AttemptFault, OutcomeRecord, failure_message},
};
