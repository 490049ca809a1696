//! CLI entrypoint for planwise
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use planwise_application::{FailoverOrchestrator, RunChatTurnUseCase, new_session_id};
use planwise_domain::ChatSession;
use planwise_infrastructure::{ConfigLoader, FileConfig, JsonlTranscriptStore, build_roster};
use planwise_presentation::{ChatRepl, Cli, ConsoleFragmentSink, ReplConfig};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Initialize logging based on verbosity level.
///
/// The returned guard flushes the file writer when dropped.
fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let Some(path) = log_file else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
        return Ok(None);
    };

    let file_name = path
        .file_name()
        .with_context(|| format!("--log-file must name a file: {}", path.display()))?;
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Could not create log directory {}", dir.display()))?;

    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(writer)
        .init();
    Ok(Some(guard))
}

fn load_config(cli: &Cli) -> Result<FileConfig> {
    if cli.no_config {
        return Ok(ConfigLoader::load_defaults());
    }
    if let Some(path) = &cli.config
        && !path.exists()
    {
        bail!("Config file not found: {}", path.display());
    }
    ConfigLoader::load(cli.config.as_ref())
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))
}

/// Command line flags take precedence over every config source.
fn apply_overrides(config: &mut FileConfig, cli: &Cli) {
    if let Some(user) = &cli.user {
        config.chat.user_id = user.clone();
    }
    if let Some(provider) = &cli.provider {
        config.chat.preferred_provider = Some(provider.clone());
    }
    if let Some(directive) = &cli.directive {
        config.chat.directive = directive.clone();
    }
    if cli.no_transcript {
        config.transcript.enabled = false;
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let _log_guard = init_logging(cli.verbose, cli.log_file.as_deref())?;

    info!("Starting planwise");

    let mut config = load_config(&cli)?;
    apply_overrides(&mut config, &cli);

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        println!();
        println!("{}", config.to_toml_string()?);
        if let Err(e) = config.validate() {
            println!("Configuration problem: {}", e);
            return Ok(ExitCode::FAILURE);
        }
        return Ok(ExitCode::SUCCESS);
    }

    config.validate().context("Invalid configuration")?;

    // === Dependency Injection ===
    let chat = config.to_chat_config();
    let roster = build_roster(&config.to_provider_config())?;
    let orchestrator =
        FailoverOrchestrator::with_preferred(&roster, chat.preferred_provider.as_deref())?;
    info!(providers = ?orchestrator.labels(), "Failover order");

    let mut use_case = RunChatTurnUseCase::new(orchestrator, chat.directive.clone());
    if config.transcript.enabled {
        let directory = config.transcript.resolved_directory();
        info!(directory = %directory.display(), "Saving transcripts");
        use_case = use_case.with_transcript_store(Arc::new(JsonlTranscriptStore::new(directory)));
    }

    let repl_config = ReplConfig {
        show_progress: !cli.quiet && config.repl.show_progress,
        history_file: config.repl.history_file.as_ref().map(PathBuf::from),
    };

    // Single question mode
    if let Some(question) = cli.question {
        let mut session = ChatSession::new(chat.user_id, new_session_id());
        let sink = ConsoleFragmentSink::new(repl_config.show_progress);
        let output = use_case.ask(&mut session, &question, &sink).await?;
        return Ok(if output.outcome.completed {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        });
    }

    ChatRepl::new(use_case, chat.user_id)
        .with_config(repl_config)
        .run()
        .await?;

    Ok(ExitCode::SUCCESS)
}
