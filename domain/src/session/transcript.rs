//! Transcript records forwarded to the persistence adapter.

use super::entities::ChatSession;
use crate::conversation::interaction::InteractionType;
use crate::conversation::turn::ConversationTurn;

/// One transcript entry: the message at `index` of a session's history.
///
/// Records are keyed by user and session; writing the same index twice
/// replaces the earlier entry (last write wins).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptRecord {
    pub user_id: String,
    pub session_id: String,
    pub index: usize,
    pub turn: ConversationTurn,
    /// Label of the provider that served the turn.
    pub provider_label: String,
    pub interaction: InteractionType,
    /// Whether the student reported understanding this message.
    pub user_understood: Option<bool>,
}

impl TranscriptRecord {
    /// Build a record for the most recent message of `session`.
    ///
    /// Returns `None` for a session without messages.
    pub fn latest(
        session: &ChatSession,
        provider_label: impl Into<String>,
        interaction: InteractionType,
    ) -> Option<Self> {
        let index = session.last_index()?;
        let turn = session.last_message()?.clone();
        Some(Self {
            user_id: session.user_id().to_string(),
            session_id: session.session_id().to_string(),
            index,
            turn,
            provider_label: provider_label.into(),
            interaction,
            user_understood: None,
        })
    }

    pub fn with_understood(mut self, understood: bool) -> Self {
        self.user_understood = Some(understood);
        self
    }
}
