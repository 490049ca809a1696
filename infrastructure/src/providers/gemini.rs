//! Google Gemini adapter (`streamGenerateContent` over SSE).
//!
//! The directive travels as `systemInstruction`; history turns are sent as
//! `contents` with the user role kept and every other role mapped to `model`.

use super::http::{ensure_success, fault_from_reqwest, resolve_api_key};
use super::sse::data_events;
use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt, future};
use planwise_application::ports::provider_adapter::{FragmentStream, ProviderAdapter};
use planwise_domain::{ConversationTurn, GeminiProviderConfig, ProviderFault, Role};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Sampling temperature sent with every Gemini request.
pub const GEMINI_TEMPERATURE: f32 = 0.7;

pub struct GeminiAdapter {
    client: reqwest::Client,
    config: GeminiProviderConfig,
}

impl GeminiAdapter {
    pub fn new(client: reqwest::Client, config: GeminiProviderConfig) -> Self {
        Self { client, config }
    }

    fn endpoint(&self, model_id: &str) -> String {
        format!(
            "{}/v1beta/models/{}:streamGenerateContent?alt=sse",
            self.config.base_url.trim_end_matches('/'),
            model_id
        )
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<SystemInstruction<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct SystemInstruction<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

fn gemini_role(role: Role) -> &'static str {
    match role {
        Role::User => "user",
        _ => "model",
    }
}

fn request_body<'a>(history: &'a [ConversationTurn], directive: &'a str) -> GenerateRequest<'a> {
    GenerateRequest {
        contents: history
            .iter()
            .map(|turn| Content {
                role: gemini_role(turn.role()),
                parts: vec![Part {
                    text: turn.content(),
                }],
            })
            .collect(),
        system_instruction: (!directive.trim().is_empty()).then(|| SystemInstruction {
            parts: vec![Part { text: directive }],
        }),
        generation_config: GenerationConfig {
            temperature: GEMINI_TEMPERATURE,
        },
    }
}

#[derive(Debug, Deserialize)]
struct StreamChunk {
    #[serde(default)]
    candidates: Vec<Candidate>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: Option<u16>,
    #[serde(default)]
    message: String,
}

/// Text carried by one SSE payload; empty when the chunk has no text parts.
fn parse_chunk(payload: &str) -> Result<String, ProviderFault> {
    let chunk: StreamChunk = serde_json::from_str(payload)
        .map_err(|e| ProviderFault::MalformedResponse(format!("unexpected Gemini chunk: {e}")))?;

    if let Some(error) = chunk.error {
        return Err(match error.code {
            Some(code) => ProviderFault::from_status(code, error.message),
            None => ProviderFault::Transport(error.message),
        });
    }

    Ok(chunk
        .candidates
        .iter()
        .filter_map(|c| c.content.as_ref())
        .flat_map(|c| c.parts.iter())
        .filter_map(|p| p.text.as_deref())
        .collect())
}

#[async_trait]
impl ProviderAdapter for GeminiAdapter {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn stream_generate(
        &self,
        model_id: &str,
        history: &[ConversationTurn],
        directive: &str,
    ) -> Result<FragmentStream, ProviderFault> {
        let api_key = resolve_api_key(self.config.api_key.as_deref(), &self.config.api_key_env)?;
        let body = request_body(history, directive);
        debug!(model = model_id, turns = history.len(), "Sending Gemini request");

        let response = self
            .client
            .post(self.endpoint(model_id))
            .header("x-goog-api-key", api_key)
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
