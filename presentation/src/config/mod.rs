//! Presentation-level configuration
//!
//! Configuration for REPL and console behavior.

use std::path::PathBuf;

/// REPL configuration for the presentation layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplConfig {
    /// Show a spinner while waiting for the first fragment
    pub show_progress: bool,
    /// Path to history file
    pub history_file: Option<PathBuf>,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            show_progress: true,
            history_file: None,
        }
    }
}

impl ReplConfig {
    /// Configured history file, or `<data dir>/planwise/history.txt`.
    pub fn history_path(&self) -> Option<PathBuf> {
        self.history_file
            .clone()
            .or_else(|| dirs::data_dir().map(|p| p.join("planwise").join("history.txt")))
    }
}
