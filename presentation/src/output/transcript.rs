//! Plain-text transcript export

use planwise_domain::ConversationTurn;
use std::path::Path;

pub const TRANSCRIPT_TITLE: &str = "Business Planning Assistant Transcript";

/// Render messages as `ROLE: content` blocks under a title line.
pub fn render_transcript(messages: &[ConversationTurn]) -> String {
    let mut text = String::from(TRANSCRIPT_TITLE);
    text.push('\n');
    text.push_str(&"=".repeat(30));
    for message in messages {
        text.push_str(&format!(
            "\n{}: {}\n",
            message.role().as_str().to_uppercase(),
            message.content()
        ));
    }
    text
}

/// Write the rendered transcript to `path`, replacing any existing file.
pub fn export_transcript(messages: &[ConversationTurn], path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, render_transcript(messages))
}
