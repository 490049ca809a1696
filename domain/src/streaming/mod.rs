//! Streaming response types.
//!
//! - [`fragment::StreamFragment`]: one relayed piece of generated text
//! - [`outcome::OutcomeRecord`]: committed text, provider used and faults

pub mod fragment;
pub mod outcome;
