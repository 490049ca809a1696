//! Configuration file loading for planwise
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `PLANWISE_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./planwise.toml` or `./.planwise.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/planwise/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileChatConfig, FileConfig, FileGeminiConfig, FileOpenAiConfig,
    FileProvidersConfig, FileReplConfig, FileRosterEntry, FileTranscriptConfig,
};
pub use loader::ConfigLoader;
