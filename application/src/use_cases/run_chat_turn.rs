//! Run Chat Turn use case.
//!
//! Drives one question/answer exchange of a [`ChatSession`]: the user turn is
//! appended and persisted, the answer is streamed through the
//! [`FailoverOrchestrator`] to a [`FragmentSink`], and the committed text is
//! appended as the assistant turn. After every answer the session waits for
//! feedback; a new question is refused until the student either acknowledges
//! the answer or asks for a clarification.

use crate::ports::fragment_sink::FragmentSink;
use crate::ports::transcript_store::{NoTranscriptStore, TranscriptError, TranscriptStore};
use crate::use_cases::failover::FailoverOrchestrator;
use futures::StreamExt;
use planwise_domain::util::truncate_str;
use planwise_domain::{
    CLARIFICATION_PROMPT, ChatSession, ConversationTurn, DomainError, InteractionType,
    OutcomeRecord, TranscriptRecord,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur during a chat turn.
#[derive(Error, Debug)]
pub enum RunChatTurnError {
    #[error("Please give feedback on the last answer first")]
    FeedbackPending,

    #[error("There is no answer waiting for feedback")]
    NoPendingFeedback,

    #[error("Invalid message: {0}")]
    InvalidTurn(#[from] DomainError),

    #[error(transparent)]
    Transcript(#[from] TranscriptError),
}

/// Result of a streamed turn.
#[derive(Debug, Clone)]
pub struct ChatTurnOutput {
    pub interaction: InteractionType,
    pub outcome: OutcomeRecord,
}

/// New session id from the local clock (`YYYYMMDD_HHMMSS`).
pub fn new_session_id() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Use case for running chat turns against a failover roster.
#[derive(Clone)]
pub struct RunChatTurnUseCase {
    orchestrator: FailoverOrchestrator,
    directive: String,
    transcript_store: Arc<dyn TranscriptStore>,
}

impl RunChatTurnUseCase {
    pub fn new(orchestrator: FailoverOrchestrator, directive: impl Into<String>) -> Self {
        Self {
            orchestrator,
            directive: directive.into(),
            transcript_store: Arc::new(NoTranscriptStore),
        }
    }

    /// Create with a transcript store.
    pub fn with_transcript_store(mut self, store: Arc<dyn TranscriptStore>) -> Self {
        self.transcript_store = store;
        self
    }

    pub fn orchestrator(&self) -> &FailoverOrchestrator {
        &self.orchestrator
    }

    pub fn directive(&self) -> &str {
        &self.directive
    }

    /// Ask a new question.
    pub async fn ask(
        &self,
        session: &mut ChatSession,
        question: &str,
        sink: &dyn FragmentSink,
    ) -> Result<ChatTurnOutput, RunChatTurnError> {
        if session.is_feedback_pending() {
            return Err(RunChatTurnError::FeedbackPending);
        }
        info!(
            session = session.session_id(),
            "New question: {}",
            truncate_str(question, 100)
        );
        session.push_user(question)?;
        Ok(self
            .stream_answer(session, InteractionType::InitialQuery, sink)
            .await)
    }

    /// Mark the last answer as understood.
    pub fn acknowledge(&self, session: &mut ChatSession) -> Result<(), RunChatTurnError> {
        if !session.is_feedback_pending() {
            return Err(RunChatTurnError::NoPendingFeedback);
        }
        let label = self.answer_label(session);
        if let Some(record) =
            TranscriptRecord::latest(session, label, InteractionType::UnderstoodFeedback)
        {
            self.persist(&record.with_understood(true));
        }
        session.set_feedback_pending(false);
        debug!(session = session.session_id(), "Answer acknowledged");
        Ok(())
    }

    /// Mark the last answer as not understood and stream a simpler one.
    pub async fn clarify(
        &self,
        session: &mut ChatSession,
        sink: &dyn FragmentSink,
    ) -> Result<ChatTurnOutput, RunChatTurnError> {
        if !session.is_feedback_pending() {
            return Err(RunChatTurnError::NoPendingFeedback);
        }
        if let Some(index) = session.last_index()
            && let Err(e) = self.transcript_store.record_feedback(
                session.user_id(),
                session.session_id(),
                index,
                false,
            )
        {
            warn!(session = session.session_id(), "Failed to record feedback: {}", e);
        }
        session.set_feedback_pending(false);
        session.push_user(CLARIFICATION_PROMPT)?;
        info!(session = session.session_id(), "Clarification requested");
        Ok(self
            .stream_answer(session, InteractionType::ClarificationResponse, sink)
            .await)
    }

    /// Continue a persisted session.
    pub fn resume(
        &self,
        session: &mut ChatSession,
        session_id: &str,
    ) -> Result<usize, RunChatTurnError> {
        let messages: Vec<ConversationTurn> = self
            .transcript_store
            .load_session(session.user_id(), session_id)?;
        let count = messages.len();
        session.restore(session_id, messages);
        info!(session = session_id, messages = count, "Session resumed");
        Ok(count)
    }

    /// Persisted session ids of `user_id`, newest first.
    pub fn sessions(&self, user_id: &str) -> Result<Vec<String>, RunChatTurnError> {
        Ok(self.transcript_store.list_sessions(user_id)?)
    }

    async fn stream_answer(
        &self,
        session: &mut ChatSession,
        interaction: InteractionType,
        sink: &dyn FragmentSink,
    ) -> ChatTurnOutput {
        let primary = self.orchestrator.primary_label().to_string();
        if let Some(record) = TranscriptRecord::latest(session, primary.clone(), interaction) {
            self.persist(&record);
        }

        sink.on_stream_start(&primary);
        let mut stream = self
            .orchestrator
            .get_response_stream(session.messages(), &self.directive);
        let mut current = primary;
        while let Some(fragment) = stream.next().await {
            if fragment.provider_label != current {
                sink.on_provider_switch(&current, &fragment.provider_label);
                current = fragment.provider_label.clone();
            }
            sink.on_fragment(&fragment);
        }
        let outcome = stream.into_outcome();
        sink.on_stream_end(&outcome);

        // full_text is never empty: an empty completion counts as a fault.
        if let Err(e) = session.push_assistant(outcome.full_text.clone()) {
            warn!(session = session.session_id(), "Discarding empty answer: {}", e);
        } else if let Some(record) =
            TranscriptRecord::latest(session, outcome.provider_label_used.clone(), interaction)
        {
            self.persist(&record);
        }
        session.set_answered_by(outcome.provider_label_used.clone());
        session.set_feedback_pending(true);

        info!(
            session = session.session_id(),
            provider = %outcome.provider_label_used,
            completed = outcome.completed,
            failed_attempts = outcome.attempt_faults.len(),
            "Turn finished"
        );
        ChatTurnOutput {
            interaction,
            outcome,
        }
    }

    fn answer_label(&self, session: &ChatSession) -> String {
        session
            .answered_by()
            .unwrap_or_else(|| self.orchestrator.primary_label())
            .to_string()
    }

    fn persist(&self, record: &TranscriptRecord) {
        if let Err(e) = self.transcript_store.append(record) {
            warn!(
                session = %record.session_id,
                index = record.index,
                "Failed to persist transcript entry: {}",
                e
            );
        }
    }
}
