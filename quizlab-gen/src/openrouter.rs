//! OpenRouter chat-completion client.
//!
//! This module is only available when the `openrouter` feature is enabled.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::error::{GenError, Result};
use crate::model::{ChatMessage, LanguageModel};

/// The default OpenRouter API base URL.
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// The default chat model.
pub const DEFAULT_MODEL: &str = "anthropic/claude-3-haiku";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

const PROVIDER: &str = "OpenRouter";

/// Settings for [`OpenRouterClient`].
#[derive(Debug, Clone, PartialEq)]
pub struct OpenRouterConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub top_p: f32,
    /// Sent as `HTTP-Referer` for OpenRouter app attribution.
    pub referer: Option<String>,
    pub timeout: Duration,
}

impl OpenRouterConfig {
    /// Create a config with the given API key and default model settings.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            top_p: 0.9,
            referer: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Read `OPENROUTER_API_KEY` (required), `OPENROUTER_MODEL`,
    /// `OPENROUTER_BASE_URL` and `OPENROUTER_REFERER`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENROUTER_API_KEY").map_err(|_| {
            GenError::ConfigError("OPENROUTER_API_KEY environment variable not set".into())
        })?;
        let mut config = Self::new(api_key);
        if let Ok(model) = std::env::var("OPENROUTER_MODEL") {
            config.model = model;
        }
        if let Ok(base_url) = std::env::var("OPENROUTER_BASE_URL") {
            config.base_url = base_url;
        }
        config.referer = std::env::var("OPENROUTER_REFERER").ok();
        Ok(config)
    }

    /// Set the model name (e.g. `openai/gpt-4o-mini`).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the `HTTP-Referer` header value.
    pub fn with_referer(mut self, referer: impl Into<String>) -> Self {
        self.referer = Some(referer.into());
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

/// A [`LanguageModel`] backed by the OpenRouter chat-completions API.
///
/// # Example
///
/// ```rust,ignore
/// use quizlab_gen::openrouter::{OpenRouterClient, OpenRouterConfig};
///
/// let model = OpenRouterClient::new(OpenRouterConfig::from_env()?)?;
/// ```
pub struct OpenRouterClient {
    client: reqwest::Client,
    config: OpenRouterConfig,
    endpoint: String,
}

impl OpenRouterClient {
    pub fn new(config: OpenRouterConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(GenError::ConfigError("OpenRouter API key must not be empty".into()));
        }
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GenError::model(PROVIDER, format!("failed to build client: {e}")))?;
        let endpoint = config.endpoint();
        Ok(Self { client, config, endpoint })
    }

    pub fn config(&self) -> &OpenRouterConfig {
        &self.config
    }
}

// ── Chat API request/response types ────────────────────────────────

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    top_p: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Deserialize)]
struct AssistantMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

fn first_choice_content(response: ChatResponse) -> Result<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty())
        .ok_or_else(|| GenError::MalformedResponse("response contained no message content".into()))
}

#[async_trait]
impl LanguageModel for OpenRouterClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        debug!(
            provider = PROVIDER,
            model = %self.config.model,
            message_count = messages.len(),
            "sending chat completion"
        );

        let body = ChatRequest {
            model: &self.config.model,
            messages,
            temperature: self.config.temperature,
            top_p: self.config.top_p,
        };

        let mut request = self.client.post(&self.endpoint).bearer_auth(&self.config.api_key).json(&body);
        if let Some(referer) = &self.config.referer {
            request = request.header("HTTP-Referer", referer);
        }

        let response = request.send().await.map_err(|e| {
            error!(provider = PROVIDER, error = %e, "request failed");
            GenError::model(PROVIDER, format!("request failed: {e}"))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);

            error!(provider = PROVIDER, %status, "API error");
            return Err(GenError::model(PROVIDER, format!("API returned {status}: {detail}")));
        }

        let chat_response: ChatResponse = response.json().await.map_err(|e| {
            error!(provider = PROVIDER, error = %e, "failed to parse response");
            GenError::model(PROVIDER, format!("failed to parse response: {e}"))
        })?;

        first_choice_content(chat_response)
    }

    fn name(&self) -> &str {
        PROVIDER
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_matches_chat_api() {
        let messages = vec![ChatMessage::system("s"), ChatMessage::user("u")];
        let body = ChatRequest { model: "m", messages: &messages, temperature: 0.5, top_p: 0.25 };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "m");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "u");
        assert_eq!(json["temperature"], 0.5);
        assert_eq!(json["top_p"], 0.25);
    }

    #[test]
    fn first_choice_content_is_trimmed() {
        let response: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"role":"assistant","content":"  [] \n"}}]}"#)
                .unwrap();
        assert_eq!(first_choice_content(response).unwrap(), "[]");
    }

    #[test]
    fn missing_content_is_malformed() {
        let response: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(matches!(first_choice_content(response), Err(GenError::MalformedResponse(_))));
    }

    #[test]
    fn defaults_follow_quiz_settings() {
        let config = OpenRouterConfig::new("key");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.temperature, 0.7);
        assert_eq!(config.top_p, 0.9);
        assert_eq!(config.endpoint(), "https://openrouter.ai/api/v1/chat/completions");
    }

    #[test]
    fn empty_api_key_is_rejected() {
        assert!(matches!(
            OpenRouterClient::new(OpenRouterConfig::new("")),
            Err(GenError::ConfigError(_))
        ));
    }
}
