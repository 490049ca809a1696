//! OpenAI adapter (chat completions with `stream: true`).
//!
//! The directive is sent as a leading `system` message, followed by the
//! history in order.

use super::http::{ensure_success, fault_from_reqwest, resolve_api_key};
use super::sse::data_events;
use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt, future};
use planwise_application::ports::provider_adapter::{FragmentStream, ProviderAdapter};
use planwise_domain::{ConversationTurn, OpenAiProviderConfig, ProviderFault};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Sampling temperature sent with every OpenAI request.
pub const OPENAI_TEMPERATURE: f32 = 1.0;

pub struct OpenAiAdapter {
    client: reqwest::Client,
    config: OpenAiProviderConfig,
}

impl OpenAiAdapter {
    pub fn new(client: reqwest::Client, config: OpenAiProviderConfig) -> Self {
        Self { client, config }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

fn request_body<'a>(
    model_id: &'a str,
    history: &'a [ConversationTurn],
    directive: &'a str,
) -> ChatRequest<'a> {
    let mut messages = Vec::with_capacity(history.len() + 1);
    messages.push(ChatMessage {
        role: "system",
        content: directive,
    });
    messages.extend(history.iter().map(|turn| ChatMessage {
        role: turn.role().as_str(),
        content: turn.content(),
    }));
    ChatRequest {
        model: model_id,
        messages,
        stream: true,
        temperature: OPENAI_TEMPERATURE,
    }
}

#[derive(Debug, Deserialize)]
struct StreamChunk {
    #[serde(default)]
    choices: Vec<Choice>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    delta: Option<Delta>,
}

#[derive(Debug, Deserialize)]
struct Delta {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    message: String,
    #[serde(rename = "type")]
    kind: Option<String>,
}

fn parse_chunk(payload: &str) -> Result<String, ProviderFault> {
    let chunk: StreamChunk = serde_json::from_str(payload)
        .map_err(|e| ProviderFault::MalformedResponse(format!("unexpected OpenAI chunk: {e}")))?;

    if let Some(error) = chunk.error {
        return Err(match error.kind.as_deref() {
            Some("insufficient_quota") | Some("rate_limit_exceeded") => {
                ProviderFault::Quota(error.message)
            }
            Some("invalid_request_error") | Some("authentication_error") => {
                ProviderFault::Auth(error.message)
            }
            _ => ProviderFault::Transport(error.message),
        });
    }

    Ok(chunk
        .choices
        .iter()
        .filter_map(|c| c.delta.as_ref())
        .filter_map(|d| d.content.as_deref())
        .collect())
}

#[async_trait]
impl ProviderAdapter for OpenAiAdapter {
    fn name(&self) -> &str {
        "openai"
    }

    async fn stream_generate(
        &self,
        model_id: &str,
        history: &[ConversationTurn],
        directive: &str,
    ) -> Result<FragmentStream, ProviderFault> {
        let api_key = resolve_api_key(self.config.api_key.as_deref(), &self.config.api_key_env)?;
        let body = request_body(model_id, history, directive);
        debug!(model = model_id, turns = history.len(), "Sending OpenAI request");

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(fault_from_reqwest)?;
        let response = ensure_success(response).await?;

        Ok(data_events(response)
            .map(|event| event.and_then(|payload| parse_chunk(&payload)))
            .try_filter(|text| future::ready(!text.is_empty()))
            .boxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::test_server::{serve_once, serve_truncated, test_client};

    fn config(base_url: &str) -> OpenAiProviderConfig {
        OpenAiProviderConfig {
            api_key: Some("sk-test".to_string()),
            base_url: base_url.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn request_leads_with_system_message() {
        let history = vec![
            ConversationTurn::user("Name three pricing strategies.").unwrap(),
            ConversationTurn::assistant("Cost-plus, value-based, penetration.").unwrap(),
        ];
        let body = serde_json::to_value(request_body("gpt-5", &history, "Be brief.")).unwrap();

        assert_eq!(body["model"], "gpt-5");
        assert_eq!(body["stream"], true);
        assert_eq!(body["temperature"], 1.0);
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[0]["content"], "Be brief.");
        assert_eq!(messages[1]["role"], "user");
        assert_eq!(messages[2]["role"], "assistant");
    }

    #[test]
    fn empty_history_still_sends_directive() {
        let body = serde_json::to_value(request_body("gpt-5", &[], "Be brief.")).unwrap();
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn parses_deltas_and_errors() {
        assert_eq!(
            parse_chunk(r#"{"choices":[{"index":0,"delta":{"content":"Hi"}}]}"#).unwrap(),
            "Hi"
        );
        assert_eq!(
            parse_chunk(r#"{"choices":[{"index":0,"delta":{"role":"assistant"}}]}"#).unwrap(),
            ""
        );
        assert_eq!(parse_chunk(r#"{"choices":[]}"#).unwrap(), "");

        let err = parse_chunk(r#"{"error":{"message":"slow down","type":"rate_limit_exceeded"}}"#)
            .unwrap_err();
        assert_eq!(err.kind(), "quota");
    }

    #[tokio::test]
    async fn streams_until_done_marker() {
        let body = concat!(
            "data: {\"choices\":[{\"delta\":{\"role\":\"assistant\"}}]}\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"Start \"}}]}\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"small.\"}}]}\n\n",
            "data: [DONE]\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"ignored\"}}]}\n\n",
        );
        let (base_url, server) = serve_once(200, "text/event-stream", body.to_string()).await;
        let adapter = OpenAiAdapter::new(test_client(), config(&base_url));

        let stream = adapter.stream_generate("gpt-test", &[], "Be brief.").await.unwrap();
        let fragments: Vec<String> = stream.try_collect().await.unwrap();
        assert_eq!(fragments, vec!["Start ", "small."]);

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /v1/chat/completions"));
        assert!(request.to_lowercase().contains("authorization: bearer sk-test"));
        assert!(request.contains("\"stream\":true"));
    }

    #[tokio::test]
    async fn rate_limit_status_is_quota_fault() {
        let body = r#"{"error":{"message":"Rate limit reached","type":"requests"}}"#;
        let (base_url, _server) = serve_once(429, "application/json", body.to_string()).await;
        let adapter = OpenAiAdapter::new(test_client(), config(&base_url));

        let err = match adapter.stream_generate("gpt-test", &[], "").await {
            Err(err) => err,
            Ok(_) => panic!("expected a fault"),
        };
        assert_eq!(err.kind(), "quota");
        assert!(err.to_string().contains("Rate limit reached"));
    }

    #[tokio::test]
    async fn error_chunk_mid_stream_ends_with_fault() {
        let body = concat!(
            "data: {\"choices\":[{\"delta\":{\"content\":\"Hel\"}}]}\n\n",
            "data: {\"error\":{\"message\":\"Rate limit reached\",\"type\":\"rate_limit_exceeded\"}}\n\n",
        );
        let (base_url, _server) = serve_once(200, "text/event-stream", body.to_string()).await;
        let adapter = OpenAiAdapter::new(test_client(), config(&base_url));

        let stream = adapter.stream_generate("gpt-test", &[], "").await.unwrap();
        let items: Vec<_> = stream.collect().await;
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].as_deref().unwrap(), "Hel");
        assert_eq!(items[1].as_ref().unwrap_err().kind(), "quota");
    }

    #[tokio::test]
    async fn dropped_connection_is_transport_fault() {
        let body = "data: {\"choices\":[{\"delta\":{\"content\":\"Hel\"}}]}\n\n";
        let (base_url, _server) = serve_truncated("text/event-stream", body.to_string(), 10_000).await;
        let adapter = OpenAiAdapter::new(test_client(), config(&base_url));

        let stream = adapter.stream_generate("gpt-test", &[], "").await.unwrap();
        let items: Vec<_> = stream.collect().await;
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].as_deref().unwrap(), "Hel");
        assert_eq!(items[1].as_ref().unwrap_err().kind(), "transport");
    }
}
