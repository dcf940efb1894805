//! Chat-completion client for the generative backend

use async_trait::async_trait;
use mindhaven_core::{Result, Turn};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Trait for generative chat-completion backends
///
/// The production implementation talks to an OpenAI-compatible router over
/// HTTP; tests substitute doubles with canned replies or failures.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Request a completion for the given ordered conversation
    ///
    /// Returns the model's text content, which may be empty; the caller
    /// decides how to handle empty replies.
    async fn complete(&self, turns: &[Turn]) -> Result<String>;

    /// Identifier of the generative model in use
    fn model(&self) -> &str;
}

/// OpenAI-compatible chat completions request
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireMessage {
    role: String,
    content: Option<String>,
}

/// OpenAI-compatible chat completions response
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: WireMessage,
}

/// Client for the Hugging Face inference router (OpenAI-compatible API)
pub struct HfRouterClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl HfRouterClient {
    /// Create a new router client
    ///
    /// `timeout` bounds the whole completion call; an elapsed timeout maps
    /// to `Error::Timeout` and is recoverable per request.
    pub fn new(
        base_url: impl Into<String>,
        token: impl Into<String>,
        model: impl Into<String>,
        temperature: f32,
        max_tokens: u32,
        timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                mindhaven_core::Error::config(format!("Failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            model: model.into(),
            temperature,
            max_tokens,
        })
    }
}

#[async_trait]
impl ChatClient for HfRouterClient {
    async fn complete(&self, turns: &[Turn]) -> Result<String> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages: turns
                .iter()
                .map(|turn| WireMessage {
                    role: turn.role.as_str().to_string(),
                    content: Some(turn.content.clone()),
                })
                .collect(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    mindhaven_core::Error::Timeout
                } else {
                    mindhaven_core::Error::generator(format!("completion request failed: {e}"))
                }
            })?;

        if !response.status().is_success() {
            return Err(mindhaven_core::Error::generator(format!(
                "completion request failed with status {}",
                response.status()
            )));
        }

        let body: ChatCompletionResponse = response.json().await.map_err(|e| {
            mindhaven_core::Error::generator(format!("invalid completion response: {e}"))
        })?;

        Ok(body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default())
    }

    fn model(&self) -> &str {
        &self.model
    }
}
