use std::env;
use std::time::Duration;

use reqwest::Client;
use tracing::{debug, warn};

use super::types::{ChatRequest, ChatResponse, ErrorResponse, Message};

const API_KEY_VAR: &str = "DEEPSEEK_API_KEY";
// Completions are slow; give them more room than the shared client default.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(90);

#[derive(Debug, thiserror::Error)]
pub enum DeepSeekError {
    #[error("DEEPSEEK_API_KEY not set. Get one at https://platform.deepseek.com/api_keys")]
    ApiKeyNotSet,

    #[error("API rate limit exceeded. Please retry later.")]
    RateLimited,

    #[error("API quota exhausted: {0}")]
    QuotaExhausted(String),

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("API error ({code}): {message}")]
    Api { code: u16, message: String },

    #[error("model returned an empty reply")]
    EmptyReply,

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Single-turn chat completion against a language model.
/// Implemented by `DeepSeekClient` for production; mock implementations
/// used in enrichment and pipeline tests.
pub trait ChatClient {
    async fn complete(&self, prompt: &str) -> Result<String, DeepSeekError>;
}

#[derive(Clone)]
struct ApiKey(String);

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}

#[derive(Clone)]
pub struct DeepSeekClient {
    http: Client,
    api_key: ApiKey,
    model: String,
    base_url: String,
}

impl DeepSeekClient {
    /// Build a client from `DEEPSEEK_API_KEY` plus the configured model and
    /// base URL. Fails before any network call when the key is missing.
    pub fn from_env(http: Client, model: &str, base_url: &str) -> Result<Self, DeepSeekError> {
        let api_key = env::var(API_KEY_VAR).map_err(|_| DeepSeekError::ApiKeyNotSet)?;
        if api_key.trim().is_empty() {
            return Err(DeepSeekError::ApiKeyNotSet);
        }
        Ok(Self {
            http,
            api_key: ApiKey(api_key.trim().to_string()),
            model: model.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    #[cfg(test)]
    pub(crate) fn with_base_url(http: Client, base_url: &str) -> Self {
        Self {
            http,
            api_key: ApiKey("test-key".to_string()),
            model: "deepseek-chat".to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

impl ChatClient for DeepSeekClient {
    async fn complete(&self, prompt: &str) -> Result<String, DeepSeekError> {
        let url = format!("{}/chat/completions", self.base_url);

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![Message::user(prompt)],
        };

        let response = self
            .http
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key.0))
            .header("User-Agent", crate::USER_AGENT)
            .json(&request)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let classified = classify_error(status.as_u16(), &text);
            warn!(error = %classified, "chat API error");
            return Err(classified);
        }

        let body: ChatResponse = response.json().await?;
        let reply = body
            .choices
            .and_then(|mut choices| {
                if choices.is_empty() {
                    None
                } else {
                    choices.swap_remove(0).message
                }
            })
            .map(|m| m.content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or(DeepSeekError::EmptyReply)?;

        debug!(model = %self.model, chars = reply.len(), "completion received");
        Ok(reply)
    }
}

fn classify_error(code: u16, body: &str) -> DeepSeekError {
    let message = serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .and_then(|b| b.error)
        .and_then(|e| e.message)
        .unwrap_or_else(|| {
            let snippet: String = body.chars().take(200).collect();
            format!("HTTP {code}: {snippet}")
        });

    match code {
        401 => DeepSeekError::Auth(message),
        // DeepSeek reports an exhausted balance as 402.
        402 => DeepSeekError::QuotaExhausted(message),
        429 => DeepSeekError::RateLimited,
        _ => DeepSeekError::Api { code, message },
    }
}
