//! Scripted provider adapters shared by use case tests.

use crate::ports::provider_adapter::{FragmentStream, ProviderAdapter};
use crate::use_cases::failover::ProviderEntry;
use async_trait::async_trait;
use futures::stream::{self, Stream, StreamExt};
use planwise_domain::{ConversationTurn, ProviderFault};
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

/// Ordered record of connection events across adapters.
#[derive(Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<String>>>);

impl EventLog {
    fn push(&self, event: String) {
        self.0.lock().unwrap().push(event);
    }

    pub fn events(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

enum Script {
    Refuse(ProviderFault),
    Stream(Vec<Result<String, ProviderFault>>),
}

/// Request as seen by a scripted adapter.
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub model_id: String,
    pub history: Vec<ConversationTurn>,
    pub directive: String,
}

pub struct ScriptedAdapter {
    name: String,
    script: Script,
    log: EventLog,
    requests: Mutex<Vec<SeenRequest>>,
}

impl ScriptedAdapter {
    fn build(name: &str, script: Script, log: &EventLog) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            script,
            log: log.clone(),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Streams `texts`, then ends normally.
    pub fn texts(name: &str, texts: &[&str], log: &EventLog) -> Arc<Self> {
        let items = texts.iter().map(|t| Ok(t.to_string())).collect();
        Self::build(name, Script::Stream(items), log)
    }

    /// Streams `texts`, then yields `fault`.
    pub fn texts_then_fault(
        name: &str,
        texts: &[&str],
        fault: ProviderFault,
        log: &EventLog,
    ) -> Arc<Self> {
        let mut items: Vec<_> = texts.iter().map(|t| Ok(t.to_string())).collect();
        items.push(Err(fault));
        Self::build(name, Script::Stream(items), log)
    }

    /// Fails before any stream is opened.
    pub fn refuse(name: &str, fault: ProviderFault, log: &EventLog) -> Arc<Self> {
        Self::build(name, Script::Refuse(fault), log)
    }

    pub fn requests(&self) -> Vec<SeenRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProviderAdapter for ScriptedAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    async fn stream_generate(
        &self,
        model_id: &str,
        history: &[ConversationTurn],
        directive: &str,
    ) -> Result<FragmentStream, ProviderFault> {
        self.requests.lock().unwrap().push(SeenRequest {
            model_id: model_id.to_string(),
            history: history.to_vec(),
            directive: directive.to_string(),
        });
        self.log.push(format!("open:{}", self.name));

        match &self.script {
            Script::Refuse(fault) => {
                self.log.push(format!("fault:{}", self.name));
                Err(fault.clone())
            }
            Script::Stream(items) => Ok(TrackedStream {
                inner: stream::iter(items.clone()),
                name: self.name.clone(),
                log: self.log.clone(),
            }
            .boxed()),
        }
    }
}

/// Logs `close:<name>` when dropped, standing in for a closed connection.
struct TrackedStream {
    inner: stream::Iter<std::vec::IntoIter<Result<String, ProviderFault>>>,
    name: String,
    log: EventLog,
}

impl Stream for TrackedStream {
    type Item = Result<String, ProviderFault>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.poll_next_unpin(cx)
    }
}

impl Drop for TrackedStream {
    fn drop(&mut self) {
        self.log.push(format!("close:{}", self.name));
    }
}

pub fn entry(label: &str, adapter: Arc<ScriptedAdapter>) -> ProviderEntry {
    ProviderEntry::new(label, adapter, format!("{}-model", label.to_lowercase()))
}
