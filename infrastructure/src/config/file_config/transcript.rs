//! Transcript storage configuration from TOML (`[transcript]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw transcript configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileTranscriptConfig {
    /// Persist chat transcripts
    pub enabled: bool,
    /// Root directory for transcripts (default: `<data dir>/planwise/transcripts`)
    pub directory: Option<String>,
}

impl Default for FileTranscriptConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            directory: None,
        }
    }
}

impl FileTranscriptConfig {
    /// Resolved root directory, with a leading `~/` expanded.
    pub fn resolved_directory(&self) -> PathBuf {
        match self.directory.as_deref().map(str::trim) {
            Some(dir) if !dir.is_empty() => expand_home(dir),
            _ => dirs::data_dir()
                .map(|d| d.join("planwise").join("transcripts"))
                .unwrap_or_else(|| PathBuf::from("transcripts")),
        }
    }
}

fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_directory_is_used() {
        let config = FileTranscriptConfig {
            enabled: true,
            directory: Some("/var/lib/planwise".to_string()),
        };
        assert_eq!(config.resolved_directory(), PathBuf::from("/var/lib/planwise"));
    }

    #[test]
    fn default_directory_ends_with_transcripts() {
        let config = FileTranscriptConfig::default();
        assert!(config.resolved_directory().ends_with("transcripts"));
    }
}
