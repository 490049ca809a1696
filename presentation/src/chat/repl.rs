//! REPL (Read-Eval-Print Loop) for interactive chat

use crate::config::ReplConfig;
use crate::output::console::ConsoleFragmentSink;
use crate::output::transcript::export_transcript;
use colored::Colorize;
use planwise_application::{RunChatTurnError, RunChatTurnUseCase, new_session_id};
use planwise_domain::{ChatSession, Role};
use reedline::{DefaultPrompt, DefaultPromptSegment, FileBackedHistory, Reedline, Signal};
use std::path::Path;

const HISTORY_CAPACITY: usize = 1000;

/// What the loop should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// A parsed slash command.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Understood,
    Clarify,
    New,
    Sessions,
    Load(String),
    Export(String),
    Providers,
    Help,
    Quit,
    Unknown(String),
}

impl Command {
    fn parse(line: &str) -> Self {
        let (name, arg) = match line.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (line, ""),
        };
        match name {
            "/understood" | "/u" => Command::Understood,
            "/clarify" | "/c" => Command::Clarify,
            "/new" => Command::New,
            "/sessions" => Command::Sessions,
            "/load" if !arg.is_empty() => Command::Load(arg.to_string()),
            "/export" if !arg.is_empty() => Command::Export(arg.to_string()),
            "/providers" => Command::Providers,
            "/help" | "/h" | "/?" => Command::Help,
            "/quit" | "/exit" | "/q" => Command::Quit,
            _ => Command::Unknown(line.to_string()),
        }
    }
}

/// Show a `%Y%m%d_%H%M%S` session id as a readable local time.
fn display_session_id(session_id: &str) -> String {
    chrono::NaiveDateTime::parse_from_str(session_id, "%Y%m%d_%H%M%S")
        .map(|dt| dt.format("%b %d, %Y - %I:%M %p").to_string())
        .unwrap_or_else(|_| session_id.to_string())
}

/// Open the line history file, creating its directory first.
fn file_history(path: &Path) -> Result<FileBackedHistory, String> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| {
            format!("cannot create history directory {}: {}", parent.display(), e)
        })?;
    }
    FileBackedHistory::with_file(HISTORY_CAPACITY, path.to_path_buf())
        .map_err(|e| format!("cannot open history file {}: {}", path.display(), e))
}

/// Interactive chat REPL
pub struct ChatRepl {
    use_case: RunChatTurnUseCase,
    session: ChatSession,
    config: ReplConfig,
}

impl ChatRepl {
    /// Create a new ChatRepl with a fresh session for `user_id`
    pub fn new(use_case: RunChatTurnUseCase, user_id: impl Into<String>) -> Self {
        Self {
            use_case,
            session: ChatSession::new(user_id, new_session_id()),
            config: ReplConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ReplConfig) -> Self {
        self.config = config;
        self
    }

    fn line_editor(&self) -> Reedline {
        let editor = Reedline::create();
        let Some(path) = self.config.history_path() else {
            return editor;
        };
        match file_history(&path) {
            Ok(history) => editor.with_history(Box::new(history)),
            Err(e) => {
                eprintln!("{} {}", "Warning:".yellow().bold(), e);
                eprintln!("Line history will not be saved this session.");
                editor
            }
        }
    }

    /// Run the interactive REPL
    pub async fn run(&mut self) -> std::io::Result<()> {
        let mut editor = self.line_editor();
        let prompt = DefaultPrompt::new(
            DefaultPromptSegment::Basic("planwise".to_string()),
            DefaultPromptSegment::Empty,
        );

        self.print_welcome();

        loop {
            match editor.read_line(&prompt)? {
                Signal::Success(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }

                    if line.starts_with('/') {
                        if self.handle_command(Command::parse(line)).await == Flow::Quit {
                            break;
                        }
                        continue;
                    }

                    self.process_question(line).await;
                }
                Signal::CtrlD => {
                    println!("Bye!");
                    break;
                }
                _ => {
                    println!("^C");
                    continue;
                }
            }
        }

        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│        Business Planning Assistant          │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        println!("User:      {}", self.session.user_id());
        println!("Providers: {}", self.use_case.orchestrator().labels().join(" -> "));
        println!();
        println!("Ask a question, then reply with /understood or /clarify.");
        println!("Type /help for all commands.");
        println!();
    }

    fn print_help(&self) {
        println!();
        println!("Commands:");
        println!("  /understood, /u   - Mark the last answer as understood");
        println!("  /clarify, /c      - Ask for a simpler explanation");
        println!("  /new              - Start a new chat");
        println!("  /sessions         - List saved chats");
        println!("  /load <ID>        - Continue a saved chat");
        println!("  /export <PATH>    - Save this chat as text");
        println!("  /providers        - Show the failover order");
        println!("  /help, /h, /?     - Show this help");
        println!("  /quit, /exit, /q  - Exit chat");
        println!();
    }

    fn print_feedback_hint(&self) {
        println!();
        println!(
            "{}",
            "Did you understand the answer? Reply /understood or /clarify.".cyan()
        );
        println!();
    }

    fn report(&self, err: &RunChatTurnError) {
        match err {
            RunChatTurnError::FeedbackPending => {
                eprintln!("{}", err.to_string().yellow());
                eprintln!("Reply /understood or /clarify.");
            }
            _ => eprintln!("{} {}", "Error:".red().bold(), err),
        }
    }

    /// Handle slash commands.
    async fn handle_command(&mut self, command: Command) -> Flow {
        match command {
            Command::Quit => {
                println!("Bye!");
                return Flow::Quit;
            }
            Command::Help => self.print_help(),
            Command::Understood => match self.use_case.acknowledge(&mut self.session) {
                Ok(()) => println!("{}", "Great! Ask your next question.".green()),
                Err(e) => self.report(&e),
            },
            Command::Clarify => {
                println!();
                let sink = ConsoleFragmentSink::new(self.config.show_progress);
                match self.use_case.clarify(&mut self.session, &sink).await {
                    Ok(_) => self.print_feedback_hint(),
                    Err(e) => self.report(&e),
                }
            }
            Command::New => {
                self.session.reset(new_session_id());
                println!("Started a new chat ({}).", self.session.session_id());
            }
            Command::Sessions => self.list_sessions(),
            Command::Load(session_id) => self.load_session(&session_id),
            Command::Export(path) => {
                match export_transcript(self.session.messages(), Path::new(&path)) {
                    Ok(()) => println!("Transcript saved to {}", path),
                    Err(e) => eprintln!("{} {}", "Error:".red().bold(), e),
                }
            }
            Command::Providers => {
                println!();
                println!("Failover order:");
                for (i, label) in self.use_case.orchestrator().labels().iter().enumerate() {
                    println!("  {}. {}", i + 1, label);
                }
                if let Some(label) = self.session.answered_by() {
                    println!("Last answer from: {}", label);
                }
                println!();
            }
            Command::Unknown(cmd) => {
                println!("Unknown command: {}", cmd);
                println!("Type /help for available commands");
            }
        }
        Flow::Continue
    }

    fn list_sessions(&self) {
        match self.use_case.sessions(self.session.user_id()) {
            Ok(sessions) if sessions.is_empty() => println!("No saved chats yet."),
            Ok(sessions) => {
                println!();
                println!("Saved chats (newest first):");
                for id in sessions {
                    let marker = if id == self.session.session_id() { "*" } else { " " };
                    println!(" {} {}  {}", marker, id, display_session_id(&id).dimmed());
                }
                println!();
            }
            Err(e) => self.report(&e),
        }
    }

    fn load_session(&mut self, session_id: &str) {
        match self.use_case.resume(&mut self.session, session_id) {
            Ok(count) => {
                println!(
                    "Loaded {} ({} messages).",
                    display_session_id(session_id),
                    count
                );
                for message in self.session.messages().iter().rev().take(2).rev() {
                    let role = match message.role() {
                        Role::User => "User".bold(),
                        Role::Assistant => "Assistant".cyan().bold(),
                    };
                    let preview = planwise_domain::util::truncate_str(message.content(), 100);
                    println!("  {}: {}...", role, preview);
                }
            }
            Err(e) => self.report(&e),
        }
    }

    async fn process_question(&mut self, question: &str) {
        println!();
        let sink = ConsoleFragmentSink::new(self.config.show_progress);
        match self.use_case.ask(&mut self.session, question, &sink).await {
            Ok(_) => self.print_feedback_hint(),
            Err(e) => self.report(&e),
        }
    }
}
