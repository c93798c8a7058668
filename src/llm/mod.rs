//! Language model client
//!
//! Chat completions over an OpenAI-compatible HTTP API. The model is asked
//! (via the system prompt) to either reply in plain language or emit a tool
//! call payload; deciding which happened is the router's job, not ours.

pub mod history;

pub use history::{ConversationHistory, Turn};

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::LlmConfig;
use crate::{Error, Result};

/// Bounded ceiling for a completion request
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Sampling temperature for the livelier retry pass
const RETRY_TEMPERATURE: f64 = 0.7;

/// One chat message
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

impl ChatMessage {
    /// System-role message
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system",
            content: content.into(),
        }
    }

    /// User-role message
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user",
            content: content.into(),
        }
    }

    /// Assistant-role message
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant",
            content: content.into(),
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u32,
    temperature: f64,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Chat-completion client for an OpenAI-compatible endpoint.
pub struct LlmClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
    max_tokens: u32,
    temperature: f64,
}

impl LlmClient {
    /// Create a client from configuration.
    #[must_use]
    pub fn new(config: &LlmConfig, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }

    /// Generate a reply for the given message window.
    ///
    /// A first pass runs at the configured (low) temperature; if the model
    /// returns an empty reply, one retry runs with sampling at a higher
    /// temperature before giving the empty result back to the caller.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be
    /// parsed.
    pub async fn generate(&self, messages: &[ChatMessage]) -> Result<String> {
        let reply = self.complete(messages, self.temperature).await?;
        if !reply.trim().is_empty() {
            return Ok(reply);
        }

        tracing::debug!("empty completion, retrying with sampling");
        self.complete(messages, RETRY_TEMPERATURE).await
    }

    async fn complete(&self, messages: &[ChatMessage], temperature: f64) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages,
            max_tokens: self.max_tokens,
            temperature,
        };

        let mut builder = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .timeout(REQUEST_TIMEOUT)
            .json(&request);

        if let Some(key) = &self.api_key {
            builder = builder.header("Authorization", format!("Bearer {key}"));
        }

        let response = builder.send().await.map_err(|e| {
            tracing::error!(error = %e, "chat completion request failed");
            e
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "chat completion API error");
            return Err(Error::Llm(format!("chat API error {status}: {body}")));
        }

        let parsed: ChatResponse = response.json().await?;
        let reply = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        Ok(reply.trim().to_string())
    }
}
