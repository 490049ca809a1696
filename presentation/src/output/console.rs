//! Live console rendering of streamed answers

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use planwise_application::ports::fragment_sink::FragmentSink;
use planwise_domain::{OutcomeRecord, StreamFragment};
use std::io::Write;
use std::sync::Mutex;
use std::time::Duration;

/// Prints fragments to stdout as they arrive.
///
/// A spinner is shown until the first fragment; provider switches are
/// announced on stderr so the answer text on stdout stays clean.
pub struct ConsoleFragmentSink {
    show_progress: bool,
    spinner: Mutex<Option<ProgressBar>>,
    printed_any: Mutex<bool>,
}

impl ConsoleFragmentSink {
    pub fn new(show_progress: bool) -> Self {
        Self {
            show_progress,
            spinner: Mutex::new(None),
            printed_any: Mutex::new(false),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn start_spinner(&self, message: String) {
        if !self.show_progress {
            return;
        }
        let pb = ProgressBar::new_spinner();
        pb.set_style(Self::spinner_style());
        pb.set_message(message);
        pb.enable_steady_tick(Duration::from_millis(100));
        if let Ok(mut spinner) = self.spinner.lock() {
            *spinner = Some(pb);
        }
    }

    fn clear_spinner(&self) {
        if let Ok(mut spinner) = self.spinner.lock()
            && let Some(pb) = spinner.take()
        {
            pb.finish_and_clear();
        }
    }
}

impl FragmentSink for ConsoleFragmentSink {
    fn on_stream_start(&self, provider_label: &str) {
        if let Ok(mut printed) = self.printed_any.lock() {
            *printed = false;
        }
        println!("{}", "Business Planning Assistant:".cyan().bold());
        self.start_spinner(format!("Waiting for {}...", provider_label));
    }

    fn on_fragment(&self, fragment: &StreamFragment) {
        self.clear_spinner();
        if let Ok(mut printed) = self.printed_any.lock() {
            *printed = true;
        }
        let mut stdout = std::io::stdout().lock();
        let _ = write!(stdout, "{}", fragment.text);
        let _ = stdout.flush();
    }

    fn on_provider_switch(&self, from: &str, to: &str) {
        self.clear_spinner();
        let printed = self.printed_any.lock().map(|p| *p).unwrap_or(false);
        if printed {
            println!();
        }
        eprintln!(
            "{}",
            format!("[{} stopped responding, continuing with {}]", from, to).yellow()
        );
    }

    fn on_stream_end(&self, outcome: &OutcomeRecord) {
        self.clear_spinner();
        println!();
        if outcome.completed {
            let note = if outcome.failed_over() {
                format!("(answered by {} after failover)", outcome.provider_label_used)
            } else {
                format!("(answered by {})", outcome.provider_label_used)
            };
            println!("{}", note.dimmed());
        } else {
            eprintln!("{}", "No provider could answer this question.".red().bold());
        }
    }
}
