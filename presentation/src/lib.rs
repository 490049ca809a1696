//! Presentation layer for planwise
//!
//! This crate contains the CLI definition, live console output,
//! transcript export, and the interactive chat interface.

pub mod chat;
pub mod cli;
pub mod config;
pub mod output;

// Re-export commonly used types
pub use chat::ChatRepl;
pub use cli::commands::Cli;
pub use config::ReplConfig;
pub use output::console::ConsoleFragmentSink;
pub use output::transcript::{export_transcript, render_transcript};
