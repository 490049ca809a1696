//! HTTP helpers shared by the provider adapters.

use planwise_domain::ProviderFault;
use planwise_domain::util::truncate_str;
use std::time::Duration;

/// Build the client shared by every adapter of a roster.
///
/// Only connecting is bounded; a healthy stream may run as long as the
/// provider keeps sending.
pub fn build_client(connect_timeout_secs: u64) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(connect_timeout_secs))
        .build()
}

/// Resolve an API key: a configured key wins, otherwise the environment.
///
/// Resolved per request so a key exported mid-session is picked up, and a
/// missing key fails only the provider that needs it.
pub fn resolve_api_key(direct: Option<&str>, env_var: &str) -> Result<String, ProviderFault> {
    if let Some(key) = direct.map(str::trim).filter(|k| !k.is_empty()) {
        return Ok(key.to_string());
    }
    match std::env::var(env_var) {
        Ok(key) if !key.trim().is_empty() => Ok(key.trim().to_string()),
        _ => Err(ProviderFault::Auth(format!(
            "API key not set (expected environment variable {})",
            env_var
        ))),
    }
}

pub fn fault_from_reqwest(err: reqwest::Error) -> ProviderFault {
    if let Some(status) = err.status() {
        return ProviderFault::from_status(status.as_u16(), err.to_string());
    }
    if err.is_connect() || err.is_timeout() || err.is_request() || err.is_body() {
        return ProviderFault::Transport(err.to_string());
    }
    if err.is_decode() {
        return ProviderFault::MalformedResponse(err.to_string());
    }
    ProviderFault::Transport(err.to_string())
}

/// Fault for an error while reading the raw body bytes.
///
/// No content decoding happens at this level, so reqwest's "decode" errors
/// here are a cut or reset connection. Unparseable payloads are reported by
/// the adapters themselves.
pub fn fault_from_body_error(err: reqwest::Error) -> ProviderFault {
    ProviderFault::Transport(format!("connection lost mid-stream: {err}"))
}

/// Pass a successful response through, or turn an error status into a fault.
pub async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ProviderFault> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ProviderFault::from_status(
        status.as_u16(),
        error_detail(&body),
    ))
}

/// Pull a readable message out of an error body.
///
/// Both backends wrap errors as `{"error": {"message": ...}}`.
pub fn error_detail(body: &str) -> String {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.pointer("/error/message")
                .and_then(|m| m.as_str())
                .map(str::to_string)
        });
    match message {
        Some(message) => message,
        None if body.trim().is_empty() => "empty response body".to_string(),
        None => truncate_str(body.trim(), 200).to_string(),
    }
}
