//! Chat session domain.
//!
//! - [`entities::ChatSession`]: a student's conversation and feedback state
//! - [`transcript::TranscriptRecord`]: one entry handed to persistence

pub mod entities;
pub mod transcript;
