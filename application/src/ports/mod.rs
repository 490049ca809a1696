//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure and presentation adapters
//! must implement.

pub mod fragment_sink;
pub mod provider_adapter;
pub mod transcript_store;
