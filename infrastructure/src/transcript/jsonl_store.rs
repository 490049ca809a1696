//! JSONL transcript store.
//!
//! One append-only file per session at
//! `<root>/<user key>/<session id>.jsonl`, where the user key is the user id
//! with dots replaced by underscores. Every line is a JSON object with a
//! `type` field and a `timestamp`:
//!
//! - `turn`: the message at `index`, with role, content, provider label,
//!   interaction and `user_understood`
//! - `feedback`: a patch setting `user_understood` of the message at `index`
//!
//! Reading folds the lines in order, so the last write for an index wins.

use planwise_application::ports::transcript_store::{TranscriptError, TranscriptStore};
use planwise_domain::util::storage_key;
use planwise_domain::{ConversationTurn, InteractionType, Role, TranscriptRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

const EXTENSION: &str = "jsonl";

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum LogLine {
    Turn {
        index: usize,
        role: Role,
        content: String,
        model_name: String,
        interaction: InteractionType,
        user_understood: Option<bool>,
        timestamp: String,
    },
    Feedback {
        index: usize,
        user_understood: bool,
        timestamp: String,
    },
}

/// A message as reconstructed from the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredEntry {
    pub role: Role,
    pub content: String,
    pub model_name: String,
    pub interaction: InteractionType,
    pub user_understood: Option<bool>,
    pub timestamp: String,
}

/// File-backed [`TranscriptStore`].
///
/// Writes are serialized through a process-wide lock; each write is flushed
/// before returning.
pub struct JsonlTranscriptStore {
    root: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonlTranscriptStore {
    /// Create a store rooted at `root`. Directories are created lazily.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            write_lock: Mutex::new(()),
        }
    }

    fn user_dir(&self, user_id: &str) -> PathBuf {
        self.root.join(storage_key(user_id))
    }

    /// Path of the log file for one session.
    pub fn session_path(&self, user_id: &str, session_id: &str) -> PathBuf {
        self.user_dir(user_id)
            .join(format!("{}.{}", storage_key(session_id), EXTENSION))
    }

    fn write_line(&self, path: &Path, line: &LogLine) -> Result<(), TranscriptError> {
        let json =
            serde_json::to_string(line).map_err(|e| TranscriptError::Encode(e.to_string()))?;

        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| TranscriptError::Encode("transcript lock poisoned".to_string()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let mut writer = BufWriter::new(file);
        writeln!(writer, "{}", json)?;
        writer.flush()?;
        Ok(())
    }

    /// Fold a session log into its messages, keyed by index.
    pub fn entries(
        &self,
        user_id: &str,
        session_id: &str,
    ) -> Result<BTreeMap<usize, StoredEntry>, TranscriptError> {
        let path = self.session_path(user_id, session_id);
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(TranscriptError::SessionNotFound(session_id.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        let mut entries = BTreeMap::new();
        for (line_no, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<LogLine>(&line) {
                Ok(LogLine::Turn {
                    index,
                    role,
                    content,
                    model_name,
                    interaction,
                    user_understood,
                    timestamp,
                }) => {
                    entries.insert(
                        index,
                        StoredEntry {
                            role,
                            content,
                            model_name,
                            interaction,
                            user_understood,
                            timestamp,
                        },
                    );
                }
                Ok(LogLine::Feedback {
                    index,
                    user_understood,
                    ..
                }) => match entries.get_mut(&index) {
                    Some(entry) => entry.user_understood = Some(user_understood),
                    None => debug!(index, "Feedback for unknown transcript index"),
                },
                Err(e) => warn!(
                    "Skipping unreadable line {} in {}: {}",
                    line_no + 1,
                    path.display(),
                    e
                ),
            }
        }
        Ok(entries)
    }
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

impl TranscriptStore for JsonlTranscriptStore {
    fn append(&self, record: &TranscriptRecord) -> Result<(), TranscriptError> {
        let path = self.session_path(&record.user_id, &record.session_id);
        self.write_line(
            &path,
            &LogLine::Turn {
                index: record.index,
                role: record.turn.role(),
                content: record.turn.content().to_string(),
                model_name: record.provider_label.clone(),
                interaction: record.interaction,
                user_understood: record.user_understood,
                timestamp: now(),
            },
        )
    }

    fn record_feedback(
        &self,
        user_id: &str,
        session_id: &str,
        index: usize,
        understood: bool,
    ) -> Result<(), TranscriptError> {
        let path = self.session_path(user_id, session_id);
        if !path.exists() {
            return Err(TranscriptError::SessionNotFound(session_id.to_string()));
        }
        self.write_line(
            &path,
            &LogLine::Feedback {
                index,
                user_understood: understood,
                timestamp: now(),
            },
        )
    }

    fn load_session(
        &self,
        user_id: &str,
        session_id: &str,
    ) -> Result<Vec<ConversationTurn>, TranscriptError> {
        let entries = self.entries(user_id, session_id)?;
        let turns = entries
            .into_values()
            .filter_map(|entry| ConversationTurn::new(entry.role, entry.content).ok())
            .collect();
        Ok(turns)
    }

    fn list_sessions(&self, user_id: &str) -> Result<Vec<String>, TranscriptError> {
        let dir = self.user_dir(user_id);
        let read_dir = match std::fs::read_dir(&dir) {
            Ok(read_dir) => read_dir,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut sessions = Vec::new();
        for entry in read_dir {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                sessions.push(stem.to_string());
            }
        }
        // Session ids are timestamps, so reverse lexical order is newest first.
        sessions.sort_unstable_by(|a, b| b.cmp(a));
        Ok(sessions)
    }
}
