//! Interaction types recorded alongside each transcript entry.

use serde::{Deserialize, Serialize};

/// Fixed prompt appended on the student's behalf when they report that the
/// previous explanation was not understood.
pub const CLARIFICATION_PROMPT: &str =
    "I don't understand the previous explanation. Please break it down further.";

/// Why a transcript entry was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InteractionType {
    /// A question typed by the student and the answer to it.
    InitialQuery,
    /// The follow-up answer after the student asked for a simpler explanation.
    ClarificationResponse,
    /// The student confirmed they understood the last answer.
    UnderstoodFeedback,
}

impl InteractionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionType::InitialQuery => "INITIAL_QUERY",
            InteractionType::ClarificationResponse => "CLARIFICATION_RESPONSE",
            InteractionType::UnderstoodFeedback => "UNDERSTOOD_FEEDBACK",
        }
    }
}

impl std::fmt::Display for InteractionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_uses_screaming_snake_case() {
        let json = serde_json::to_string(&InteractionType::ClarificationResponse).unwrap();
        assert_eq!(json, "\"CLARIFICATION_RESPONSE\"");
        let parsed: InteractionType = serde_json::from_str("\"UNDERSTOOD_FEEDBACK\"").unwrap();
        assert_eq!(parsed, InteractionType::UnderstoodFeedback);
    }

    #[test]
    fn display_matches_wire_name() {
        assert_eq!(InteractionType::InitialQuery.to_string(), "INITIAL_QUERY");
        assert_eq!(
            InteractionType::UnderstoodFeedback.as_str(),
            "UNDERSTOOD_FEEDBACK"
        );
    }
}
