//! Interactive chat module
//!
//! Provides a line-editor based chat interface with feedback commands.

mod repl;

pub use repl::ChatRepl;
