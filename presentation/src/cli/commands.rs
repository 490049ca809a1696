//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for planwise
#[derive(Parser, Debug)]
#[command(name = "planwise")]
#[command(author, version, about = "Business planning assistant with streaming provider failover")]
#[command(long_about = r#"
Planwise answers business planning questions by streaming from a roster of
LLM providers. If the active provider fails, the next one takes over and the
answer keeps streaming.

Without a question, an interactive chat starts. After every answer, reply
with /understood or /clarify before asking something new.

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./planwise.toml     Project-level config
3. ~/.config/planwise/config.toml   Global config

API keys are read from GEMINI_API_KEY and OPENAI_API_KEY by default.

Example:
  planwise "How do I estimate market size for a food truck?"
  planwise --provider "ChatGPT 5.2" --user amy.k
"#)]
pub struct Cli {
    /// Ask a single question and exit (starts chat mode when omitted)
    pub question: Option<String>,

    /// User id that owns the saved transcripts
    #[arg(short, long, value_name = "ID")]
    pub user: Option<String>,

    /// Roster label to try first
    #[arg(short, long, value_name = "LABEL")]
    pub provider: Option<String>,

    /// Override the system directive
    #[arg(long, value_name = "TEXT")]
    pub directive: Option<String>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration sources and the effective configuration, then exit
    #[arg(long)]
    pub show_config: bool,

    /// Write logs to a file instead of stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Do not save transcripts
    #[arg(long)]
    pub no_transcript: bool,
}
