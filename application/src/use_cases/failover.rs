//! Failover streaming orchestrator.
//!
//! [`FailoverOrchestrator`] tries an ordered list of providers and relays the
//! fragments of whichever one is currently streaming. The returned
//! [`ResponseStream`] is a small state machine, one state per roster index:
//!
//! - **Connecting(i)**: waiting for provider `i` to accept the request
//! - **Streaming(i)**: relaying provider `i`'s fragments as they arrive
//! - **Done**: a provider finished, or every provider failed
//!
//! A fault in Connecting(i) or Streaming(i) records the fault and moves to
//! Connecting(i + 1). A fault on the last index emits one final fragment
//! carrying a readable summary of every fault, so the caller never sees an
//! error value, only fragments.
//!
//! # Committed text
//!
//! Accumulation restarts with every attempt. Fragments from a failed attempt
//! have already been relayed and stay visible to the caller, but they are not
//! part of [`OutcomeRecord::full_text`].

use crate::ports::provider_adapter::{FragmentStream, ProviderAdapter};
use futures::future::BoxFuture;
use futures::stream::{FusedStream, Stream};
use futures::{FutureExt, StreamExt, ready};
use planwise_domain::{
    AttemptFault, ConversationTurn, DomainError, OutcomeRecord, ProviderFault, StreamFragment,
};
use std::collections::HashSet;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tracing::{debug, info, warn};

/// One roster slot: a label, the adapter serving it and the model to request.
#[derive(Clone)]
pub struct ProviderEntry {
    pub label: String,
    pub adapter: Arc<dyn ProviderAdapter>,
    pub model_id: String,
}

impl ProviderEntry {
    pub fn new(
        label: impl Into<String>,
        adapter: Arc<dyn ProviderAdapter>,
        model_id: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            adapter,
            model_id: model_id.into(),
        }
    }
}

impl std::fmt::Debug for ProviderEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderEntry")
            .field("label", &self.label)
            .field("adapter", &self.adapter.name())
            .field("model_id", &self.model_id)
            .finish()
    }
}

/// Ordered failover list for one request context.
///
/// Cheap to clone; entries are shared.
#[derive(Debug, Clone)]
pub struct FailoverOrchestrator {
    entries: Arc<[ProviderEntry]>,
}

impl FailoverOrchestrator {
    /// Use `entries` in the given order.
    ///
    /// Fails on an empty list or on duplicate labels.
    pub fn new(entries: Vec<ProviderEntry>) -> Result<Self, DomainError> {
        if entries.is_empty() {
            return Err(DomainError::EmptyRoster);
        }
        let mut seen = HashSet::new();
        for entry in &entries {
            if !seen.insert(entry.label.as_str()) {
                return Err(DomainError::DuplicateProviderLabel(entry.label.clone()));
            }
        }
        Ok(Self {
            entries: entries.into(),
        })
    }

    /// Put the preferred label first, keeping the rest of `roster` in order.
    ///
    /// An unknown or absent preferred label leaves the roster order as is.
    pub fn with_preferred(
        roster: &[ProviderEntry],
        preferred: Option<&str>,
    ) -> Result<Self, DomainError> {
        let preferred_index =
            preferred.and_then(|label| roster.iter().position(|e| e.label == label));

        if let (Some(label), None) = (preferred, preferred_index) {
            warn!(preferred = label, "Preferred provider not in roster, using default order");
        }

        let mut ordered = Vec::with_capacity(roster.len());
        if let Some(index) = preferred_index {
            ordered.push(roster[index].clone());
        }
        ordered.extend(
            roster
                .iter()
                .enumerate()
                .filter(|(i, _)| Some(*i) != preferred_index)
                .map(|(_, entry)| entry.clone()),
        );

        Self::new(ordered)
    }

    /// Labels in failover order.
    pub fn labels(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.label.as_str()).collect()
    }

    /// Label of the first provider to be attempted.
    pub fn primary_label(&self) -> &str {
        &self.entries[0].label
    }

    /// Start streaming a response for `history`.
    ///
    /// Nothing is sent until the returned stream is first polled. Dropping the
    /// stream at any point closes the active provider connection.
    pub fn get_response_stream(
        &self,
        history: &[ConversationTurn],
        directive: &str,
    ) -> ResponseStream {
        ResponseStream::new(Arc::clone(&self.entries), history.into(), directive.into())
    }
}

type ConnectFuture = BoxFuture<'static, Result<FragmentStream, ProviderFault>>;

enum Attempt {
    Connecting(ConnectFuture),
    Streaming(FragmentStream),
    Done,
}

/// Fragments of one orchestration call, across however many providers it
/// took. See the module docs for the state machine.
pub struct ResponseStream {
    entries: Arc<[ProviderEntry]>,
    history: Arc<[ConversationTurn]>,
    directive: Arc<str>,
    index: usize,
    attempt: Attempt,
    committed: String,
    faults: Vec<AttemptFault>,
    outcome: Option<OutcomeRecord>,
}

impl ResponseStream {
    fn new(entries: Arc<[ProviderEntry]>, history: Arc<[ConversationTurn]>, directive: Arc<str>) -> Self {
        let mut stream = Self {
            entries,
            history,
            directive,
            index: 0,
            attempt: Attempt::Done,
            committed: String::new(),
            faults: Vec::new(),
            outcome: None,
        };
        stream.attempt = Attempt::Connecting(stream.connect());
        stream
    }

    fn connect(&self) -> ConnectFuture {
        let entry = self.entries[self.index].clone();
        let history = Arc::clone(&self.history);
        let directive = Arc::clone(&self.directive);
        let attempt = self.index + 1;
        Box::pin(async move {
            info!(
                provider = %entry.label,
                backend = entry.adapter.name(),
                model = %entry.model_id,
                attempt,
                "Opening provider stream"
            );
            entry
                .adapter
                .stream_generate(&entry.model_id, &history, &directive)
                .await
        })
    }

    fn label(&self) -> &str {
        &self.entries[self.index].label
    }

    /// Label of the provider currently being attempted, if any.
    pub fn active_label(&self) -> Option<&str> {
        match self.attempt {
            Attempt::Done => None,
            _ => Some(self.label()),
        }
    }

    /// The outcome, once the stream has ended.
    pub fn outcome(&self) -> Option<&OutcomeRecord> {
        self.outcome.as_ref()
    }

    /// Consume the stream and return its outcome.
    ///
    /// If the stream was abandoned before it ended, the record holds the
    /// current attempt's text so far and `completed` is false.
    pub fn into_outcome(self) -> OutcomeRecord {
        if let Some(outcome) = self.outcome {
            return outcome;
        }
        OutcomeRecord {
            full_text: self.committed,
            provider_label_used: self.entries[self.index].label.clone(),
            attempt_faults: self.faults,
            completed: false,
        }
    }

    /// Drain the remaining fragments and return the outcome.
    pub async fn collect_outcome(mut self) -> OutcomeRecord {
        while self.next().await.is_some() {}
        self.into_outcome()
    }

    /// Record a fault against the current entry and move on.
    ///
    /// Returns the final summary fragment when no entry is left.
    fn on_fault(&mut self, fault: ProviderFault) -> Option<StreamFragment> {
        let label = self.label().to_string();
        warn!(
            provider = %label,
            attempt = self.index + 1,
            kind = fault.kind(),
            "Provider attempt failed: {}",
            fault
        );
        if !self.committed.is_empty() {
            debug!(
                provider = %label,
                discarded_bytes = self.committed.len(),
                "Dropping partial text of failed attempt from the record"
            );
            self.committed.clear();
        }
        self.faults.push(AttemptFault::new(label.clone(), &fault));

        if self.index + 1 < self.entries.len() {
            self.index += 1;
            info!(from = %label, to = %self.label(), "Failing over to next provider");
            self.attempt = Attempt::Connecting(self.connect());
            return None;
        }

        self.attempt = Attempt::Done;
        let outcome = OutcomeRecord::failed(label.clone(), self.faults.clone());
        let fragment = StreamFragment::new(outcome.full_text.clone(), label);
        self.outcome = Some(outcome);
        Some(fragment)
    }

    fn on_complete(&mut self) {
        let label = self.label().to_string();
        info!(
            provider = %label,
            bytes = self.committed.len(),
            failed_attempts = self.faults.len(),
            "Response completed"
        );
        self.attempt = Attempt::Done;
        self.outcome = Some(OutcomeRecord::completed(
            std::mem::take(&mut self.committed),
            label,
            std::mem::take(&mut self.faults),
        ));
    }
}

impl Stream for ResponseStream {
    type Item = StreamFragment;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        loop {
            match &mut this.attempt {
                Attempt::Connecting(connect) => match ready!(connect.poll_unpin(cx)) {
                    Ok(stream) => {
                        debug!(provider = %this.label(), "Provider stream opened");
                        this.attempt = Attempt::Streaming(stream);
                    }
                    Err(fault) => {
                        this.attempt = Attempt::Done;
                        if let Some(fragment) = this.on_fault(fault) {
                            return Poll::Ready(Some(fragment));
                        }
                    }
                },
                Attempt::Streaming(stream) => match ready!(stream.poll_next_unpin(cx)) {
                    Some(Ok(text)) => {
                        if text.is_empty() {
                            continue;
                        }
                        this.committed.push_str(&text);
                        return Poll::Ready(Some(StreamFragment::new(text, this.label())));
                    }
                    Some(Err(fault)) => {
                        // The failed connection is closed before the next one opens.
                        this.attempt = Attempt::Done;
                        if let Some(fragment) = this.on_fault(fault) {
                            return Poll::Ready(Some(fragment));
                        }
                    }
                    None => {
                        this.attempt = Attempt::Done;
                        if this.committed.is_empty() {
                            let fault = ProviderFault::MalformedResponse(
                                "stream ended without any text".to_string(),
                            );
                            if let Some(fragment) = this.on_fault(fault) {
                                return Poll::Ready(Some(fragment));
                            }
                        } else {
                            this.on_complete();
                            return Poll::Ready(None);
                        }
                    }
                },
                Attempt::Done => return Poll::Ready(None),
            }
        }
    }
}

impl FusedStream for ResponseStream {
    fn is_terminated(&self) -> bool {
        matches!(self.attempt, Attempt::Done)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::{EventLog, ScriptedAdapter, entry};

    fn history() -> Vec<ConversationTurn> {
        vec![ConversationTurn::user("How should I price a new bakery product?").unwrap()]
    }

    async fn drain(stream: &mut ResponseStream) -> Vec<(String, String)> {
        let mut out = Vec::new();
        while let Some(fragment) = stream.next().await {
            out.push((fragment.text, fragment.provider_label));
        }
        out
    }

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(t, l)| (t.to_string(), l.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn single_provider_success_keeps_one_label() {
        let log = EventLog::default();
        let a = ScriptedAdapter::texts("A", &["Start ", "with ", "costs."], &log);
        let orchestrator = FailoverOrchestrator::new(vec![entry("A", a)]).unwrap();

        let mut stream = orchestrator.get_response_stream(&history(), "Be concise.");
        let fragments = drain(&mut stream).await;

        assert!(fragments.iter().all(|(_, label)| label == "A"));
        let text: String = fragments.iter().map(|(t, _)| t.as_str()).collect();
        assert_eq!(text, "Start with costs.");

        let outcome = stream.into_outcome();
        assert!(outcome.completed);
        assert_eq!(outcome.full_text, "Start with costs.");
        assert_eq!(outcome.provider_label_used, "A");
        assert!(outcome.attempt_faults.is_empty());
    }

    #[tokio::test]
    async fn fails_over_when_primary_faults_before_first_fragment() {
        let log = EventLog::default();
        let a = ScriptedAdapter::refuse("A", ProviderFault::Transport("dns".into()), &log);
        let b = ScriptedAdapter::texts("B", &["Use ", "cost-plus."], &log);
        let orchestrator =
            FailoverOrchestrator::new(vec![entry("A", a), entry("B", b)]).unwrap();

        let mut stream = orchestrator.get_response_stream(&history(), "");
        let fragments = drain(&mut stream).await;

        assert_eq!(fragments, pairs(&[("Use ", "B"), ("cost-plus.", "B")]));
        let outcome = stream.into_outcome();
        assert_eq!(outcome.full_text, "Use cost-plus.");
        assert_eq!(outcome.provider_label_used, "B");
        assert_eq!(outcome.attempt_faults.len(), 1);
        assert_eq!(outcome.attempt_faults[0].label, "A");
    }

    #[tokio::test]
    async fn mid_stream_failover_preserves_order() {
        let log = EventLog::default();
        let a = ScriptedAdapter::texts_then_fault(
            "A",
            &["Hello", " wor"],
            ProviderFault::Transport("connection reset".into()),
            &log,
        );
        let b = ScriptedAdapter::texts("B", &["Full", " answer."], &log);
        let orchestrator =
            FailoverOrchestrator::new(vec![entry("A", a), entry("B", b)]).unwrap();

        let mut stream = orchestrator.get_response_stream(&history(), "");
        let fragments = drain(&mut stream).await;

        assert_eq!(
            fragments,
            pairs(&[
                ("Hello", "A"),
                (" wor", "A"),
                ("Full", "B"),
                (" answer.", "B"),
            ])
        );
        // Text of the abandoned attempt is not part of the committed record.
        let outcome = stream.into_outcome();
        assert_eq!(outcome.full_text, "Full answer.");
        assert!(outcome.completed);
        assert!(outcome.failed_over());
    }

    #[tokio::test]
    async fn exhaustion_emits_single_summary_fragment() {
        let log = EventLog::default();
        let a = ScriptedAdapter::refuse("A", ProviderFault::Auth("missing GEMINI_API_KEY".into()), &log);
        let b = ScriptedAdapter::refuse("B", ProviderFault::Quota("HTTP 429".into()), &log);
        let orchestrator =
            FailoverOrchestrator::new(vec![entry("A", a), entry("B", b)]).unwrap();

        let mut stream = orchestrator.get_response_stream(&history(), "");
        let fragments = drain(&mut stream).await;

        assert_eq!(fragments.len(), 1);
        let (text, label) = &fragments[0];
        assert_eq!(label, "B");
        assert!(text.contains("missing GEMINI_API_KEY"));
        assert!(text.contains("HTTP 429"));

        let outcome = stream.into_outcome();
        assert!(!outcome.completed);
        assert_eq!(outcome.provider_label_used, "B");
        assert_eq!(&outcome.full_text, text);
        assert_eq!(outcome.attempt_faults.len(), 2);
    }

    #[tokio::test]
    async fn fault_after_last_fragment_counts_as_failure() {
        let log = EventLog::default();
        let a = ScriptedAdapter::texts_then_fault(
            "A",
            &["Almost done."],
            ProviderFault::MalformedResponse("truncated frame".into()),
            &log,
        );
        let orchestrator = FailoverOrchestrator::new(vec![entry("A", a)]).unwrap();

        let mut stream = orchestrator.get_response_stream(&history(), "");
        let fragments = drain(&mut stream).await;

        assert_eq!(fragments.len(), 2);
        assert_eq!(fragments[0], ("Almost done.".to_string(), "A".to_string()));
        assert!(fragments[1].0.contains("truncated frame"));
        assert!(!stream.into_outcome().completed);
    }

    #[tokio::test]
    async fn attempts_never_overlap() {
        let log = EventLog::default();
        let a = ScriptedAdapter::texts_then_fault(
            "A",
            &["Hello"],
            ProviderFault::Transport("reset".into()),
            &log,
        );
        let b = ScriptedAdapter::refuse("B", ProviderFault::Quota("429".into()), &log);
        let c = ScriptedAdapter::texts("C", &["ok"], &log);
        let orchestrator =
            FailoverOrchestrator::new(vec![entry("A", a), entry("B", b), entry("C", c)])
                .unwrap();

        let stream = orchestrator.get_response_stream(&history(), "");
        let _ = stream.collect_outcome().await;

        assert_eq!(
            log.events(),
            vec!["open:A", "close:A", "open:B", "fault:B", "open:C", "close:C"]
        );
    }

    #[tokio::test]
    async fn nothing_opens_until_polled() {
        let log = EventLog::default();
        let a = ScriptedAdapter::texts("A", &["hi"], &log);
        let orchestrator = FailoverOrchestrator::new(vec![entry("A", a)]).unwrap();

        let stream = orchestrator.get_response_stream(&history(), "");
        assert!(log.events().is_empty());
        drop(stream);
        assert!(log.events().is_empty());
    }

    #[tokio::test]
    async fn dropping_mid_stream_closes_active_connection() {
        let log = EventLog::default();
        let a = ScriptedAdapter::texts("A", &["one", "two", "three"], &log);
        let b = ScriptedAdapter::texts("B", &["never"], &log);
        let orchestrator =
            FailoverOrchestrator::new(vec![entry("A", a), entry("B", b)]).unwrap();

        let mut stream = orchestrator.get_response_stream(&history(), "");
        let first = stream.next().await.unwrap();
        assert_eq!(first.text, "one");
        assert_eq!(stream.active_label(), Some("A"));
        assert_eq!(log.events(), vec!["open:A"]);

        drop(stream);

        assert_eq!(log.events(), vec!["open:A", "close:A"]);
    }

    #[tokio::test]
    async fn empty_completion_is_treated_as_fault() {
        let log = EventLog::default();
        let a = ScriptedAdapter::texts("A", &[], &log);
        let b = ScriptedAdapter::texts("B", &["", "Real answer"], &log);
        let orchestrator =
            FailoverOrchestrator::new(vec![entry("A", a), entry("B", b)]).unwrap();

        let mut stream = orchestrator.get_response_stream(&history(), "");
        let fragments = drain(&mut stream).await;

        assert_eq!(fragments, pairs(&[("Real answer", "B")]));
        let outcome = stream.into_outcome();
        assert!(outcome.attempt_faults[0].description.contains("without any text"));
    }

    #[tokio::test]
    async fn stream_is_fused_after_end() {
        let log = EventLog::default();
        let a = ScriptedAdapter::texts("A", &["x"], &log);
        let orchestrator = FailoverOrchestrator::new(vec![entry("A", a)]).unwrap();

        let mut stream = orchestrator.get_response_stream(&history(), "");
        let _ = drain(&mut stream).await;
        assert!(stream.is_terminated());
        assert!(stream.next().await.is_none());
        assert!(stream.outcome().is_some());
    }

    #[test]
    fn preferred_label_moves_to_front_deterministically() {
        let log = EventLog::default();
        let roster = vec![
            entry("A", ScriptedAdapter::texts("A", &["a"], &log)),
            entry("B", ScriptedAdapter::texts("B", &["b"], &log)),
            entry("C", ScriptedAdapter::texts("C", &["c"], &log)),
        ];

        let first = FailoverOrchestrator::with_preferred(&roster, Some("B")).unwrap();
        let second = FailoverOrchestrator::with_preferred(&roster, Some("B")).unwrap();
        assert_eq!(first.labels(), vec!["B", "A", "C"]);
        assert_eq!(first.labels(), second.labels());
        assert_eq!(first.primary_label(), "B");
    }

    #[test]
    fn unknown_preferred_label_keeps_roster_order() {
        let log = EventLog::default();
        let roster = vec![
            entry("A", ScriptedAdapter::texts("A", &["a"], &log)),
            entry("B", ScriptedAdapter::texts("B", &["b"], &log)),
        ];

        let unknown = FailoverOrchestrator::with_preferred(&roster, Some("Z")).unwrap();
        let absent = FailoverOrchestrator::with_preferred(&roster, None).unwrap();
        assert_eq!(unknown.labels(), vec!["A", "B"]);
        assert_eq!(absent.labels(), vec!["A", "B"]);
    }

    #[test]
    fn rejects_empty_and_duplicate_rosters() {
        let log = EventLog::default();
        assert_eq!(
            FailoverOrchestrator::new(vec![]).unwrap_err(),
            DomainError::EmptyRoster
        );

        let roster = vec![
            entry("A", ScriptedAdapter::texts("A", &["a"], &log)),
            entry("A", ScriptedAdapter::texts("A", &["b"], &log)),
        ];
        assert_eq!(
            FailoverOrchestrator::new(roster).unwrap_err(),
            DomainError::DuplicateProviderLabel("A".to_string())
        );
    }
}
