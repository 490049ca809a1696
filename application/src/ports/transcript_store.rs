//! Port for transcript persistence.
//!
//! Defines the [`TranscriptStore`] trait for appending transcript entries to a
//! log keyed by user and session, and for reading sessions back.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostics, while this port keeps the audit transcript
//! that reviewers read. There is no transactional guarantee; when the same
//! message index is written twice the later write wins.

use planwise_domain::{ConversationTurn, TranscriptRecord};
use thiserror::Error;

/// Errors raised by transcript stores.
#[derive(Error, Debug)]
pub enum TranscriptError {
    #[error("Transcript I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not encode transcript entry: {0}")]
    Encode(String),

    #[error("Session not found: {0}")]
    SessionNotFound(String),
}

/// Port for persisting chat transcripts.
pub trait TranscriptStore: Send + Sync {
    /// Write (or overwrite) the entry at `record.index`.
    fn append(&self, record: &TranscriptRecord) -> Result<(), TranscriptError>;

    /// Set the `user_understood` flag of an existing entry.
    fn record_feedback(
        &self,
        user_id: &str,
        session_id: &str,
        index: usize,
        understood: bool,
    ) -> Result<(), TranscriptError>;

    /// Read a session's messages back, in index order.
    fn load_session(
        &self,
        user_id: &str,
        session_id: &str,
    ) -> Result<Vec<ConversationTurn>, TranscriptError>;

    /// Session ids stored for a user, newest first.
    fn list_sessions(&self, user_id: &str) -> Result<Vec<String>, TranscriptError>;
}

/// No-op implementation for tests and when persistence is disabled.
pub struct NoTranscriptStore;

impl TranscriptStore for NoTranscriptStore {
    fn append(&self, _record: &TranscriptRecord) -> Result<(), TranscriptError> {
        Ok(())
    }

    fn record_feedback(
        &self,
        _user_id: &str,
        _session_id: &str,
        _index: usize,
        _understood: bool,
    ) -> Result<(), TranscriptError> {
        Ok(())
    }

    fn load_session(
        &self,
        _user_id: &str,
        session_id: &str,
    ) -> Result<Vec<ConversationTurn>, TranscriptError> {
        Err(TranscriptError::SessionNotFound(session_id.to_string()))
    }

    fn list_sessions(&self, _user_id: &str) -> Result<Vec<String>, TranscriptError> {
        Ok(Vec::new())
    }
}
