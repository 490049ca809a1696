//! Conversation domain.
//!
//! - [`turn::ConversationTurn`]: one message of the dialogue history
//! - [`interaction::InteractionType`]: why a transcript entry was written

pub mod interaction;
pub mod turn;
