//! Server-sent events framing shared by the streaming adapters.
//!
//! Both backends answer with `data: <json>` lines. Only `data` fields are
//! kept; comments, `event:` and `id:` lines are ignored. A `data: [DONE]`
//! line ends the stream early.

use super::http::fault_from_body_error;
use futures::stream::{self, BoxStream, StreamExt};
use planwise_domain::ProviderFault;
use std::collections::VecDeque;

const DONE_MARKER: &str = "[DONE]";

/// Incremental line splitter for an SSE byte stream.
///
/// Bytes are buffered until a full line is available, so multi-byte
/// characters and `data:` lines split across network chunks decode intact.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a network chunk, returning the payloads of completed `data:` lines.
    pub fn push(&mut self, chunk: &[u8]) -> Result<Vec<String>, ProviderFault> {
        self.buffer.extend_from_slice(chunk);
        let mut payloads = Vec::new();
        while let Some(newline) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=newline).collect();
            if let Some(payload) = data_payload(&line)? {
                payloads.push(payload);
            }
        }
        Ok(payloads)
    }

    /// Flush a trailing line that was not newline-terminated.
    pub fn finish(&mut self) -> Result<Option<String>, ProviderFault> {
        if self.buffer.is_empty() {
            return Ok(None);
        }
        let line = std::mem::take(&mut self.buffer);
        data_payload(&line)
    }
}

fn data_payload(line: &[u8]) -> Result<Option<String>, ProviderFault> {
    let line = std::str::from_utf8(line)
        .map_err(|e| ProviderFault::MalformedResponse(format!("invalid UTF-8 in stream: {e}")))?;
    let line = line.trim();
    let Some(rest) = line.strip_prefix("data:") else {
        return Ok(None);
    };
    let payload = rest.trim_start();
    if payload.is_empty() {
        return Ok(None);
    }
    Ok(Some(payload.to_string()))
}

type ChunkStream = BoxStream<'static, Result<Vec<u8>, ProviderFault>>;

struct EventState {
    body: ChunkStream,
    decoder: SseDecoder,
    pending: VecDeque<String>,
    finished: bool,
}

/// Turn a streaming HTTP response into its `data:` payloads.
///
/// The stream ends after `[DONE]` or when the body ends. A transport error
/// while reading the body is yielded as an `Err` item. Dropping the returned
/// stream drops the response and closes the connection.
pub fn data_events(response: reqwest::Response) -> BoxStream<'static, Result<String, ProviderFault>> {
    let body = response
        .bytes_stream()
        .map(|chunk| chunk.map(|bytes| bytes.to_vec()).map_err(fault_from_body_error))
        .boxed();
    let state = EventState {
        body,
        decoder: SseDecoder::new(),
        pending: VecDeque::new(),
        finished: false,
    };

    stream::unfold(state, |mut state| async move {
        loop {
            if let Some(payload) = state.pending.pop_front() {
                if payload == DONE_MARKER {
                    return None;
                }
                return Some((Ok(payload), state));
            }
            if state.finished {
                return None;
            }
            match state.body.next().await {
                Some(Ok(chunk)) => match state.decoder.push(&chunk) {
                    Ok(payloads) => state.pending.extend(payloads),
                    Err(fault) => {
                        state.finished = true;
                        return Some((Err(fault), state));
                    }
                },
                Some(Err(fault)) => {
                    state.finished = true;
                    return Some((Err(fault), state));
                }
                None => {
                    state.finished = true;
                    match state.decoder.finish() {
                        Ok(Some(payload)) => state.pending.push_back(payload),
                        Ok(None) => {}
                        Err(fault) => return Some((Err(fault), state)),
                    }
                }
            }
        }
    })
    .boxed()
}
