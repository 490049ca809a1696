//! Failover roster from TOML (`[[roster]]` tables)

use planwise_domain::RosterEntryConfig;
use serde::{Deserialize, Serialize};

/// One `[[roster]]` entry, in failover order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRosterEntry {
    /// Display label, unique within the roster
    pub label: String,
    /// Backend kind: "gemini" or "openai"
    pub kind: String,
    /// Model identifier sent to the backend
    pub model: String,
}

impl FileRosterEntry {
    pub fn default_roster() -> Vec<Self> {
        RosterEntryConfig::default_roster()
            .into_iter()
            .map(Self::from)
            .collect()
    }

    pub fn to_entry_config(&self) -> RosterEntryConfig {
        RosterEntryConfig::new(self.label.trim(), self.kind.trim(), self.model.trim())
    }
}

impl From<RosterEntryConfig> for FileRosterEntry {
    fn from(entry: RosterEntryConfig) -> Self {
        Self {
            label: entry.label,
            kind: entry.kind,
            model: entry.model,
        }
    }
}
