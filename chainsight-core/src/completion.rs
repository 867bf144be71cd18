//! Chat-completion client for the upstream analyst model.
//!
//! One synchronous request per call, bearer-token auth, fixed generation
//! parameters from config. There is deliberately no retry layer: every
//! accepted gateway request maps to exactly one upstream call, and failures
//! terminate at the gateway boundary.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::config::OpenAiConfig;

/// Upstream call errors
#[derive(Error, Debug)]
pub enum CompletionError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({code}): {message}")]
    Api { code: u16, message: String },

    #[error("Upstream request timed out")]
    Timeout,

    #[error("Missing API key")]
    MissingApiKey,
}

// ============================================================================
// Chat completions API structs (private)
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: Option<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

// ============================================================================
// ChatCompletionClient
// ============================================================================

/// Client for an OpenAI-style `/chat/completions` endpoint.
#[derive(Debug, Clone)]
pub struct ChatCompletionClient {
    client: Client,
    config: OpenAiConfig,
    api_key: String,
    base_url: String,
}

impl ChatCompletionClient {
    /// Fails fast with `MissingApiKey` when no credential is configured, so
    /// misconfiguration surfaces at service start rather than per request.
    pub fn new(config: &OpenAiConfig) -> Result<Self, CompletionError> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        Self::build(config, base_url)
    }

    /// Create a client with a custom base URL (for testing / integration)
    pub fn with_base_url(config: &OpenAiConfig, base_url: String) -> Result<Self, CompletionError> {
        Self::build(config, base_url.trim_end_matches('/').to_string())
    }

    fn build(config: &OpenAiConfig, base_url: String) -> Result<Self, CompletionError> {
        let api_key = config
            .resolved_api_key()
            .ok_or(CompletionError::MissingApiKey)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            config: config.clone(),
            api_key,
            base_url,
        })
    }

    /// Issue one completion call and extract the first choice's text.
    ///
    /// Returns `Ok(None)` when the upstream succeeds but yields no usable
    /// content (`choices: []`, missing message, empty string) — callers treat
    /// that as a successful response with a placeholder, not as an error.
    pub async fn complete(
        &self,
        system: &str,
        user: &str,
    ) -> Result<Option<String>, CompletionError> {
        let url = format!("{}/chat/completions", self.base_url);

        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user.to_string(),
                },
            ],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CompletionError::Timeout
                } else {
                    CompletionError::Http(e)
                }
            })?;

        let status = response.status();

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorResponse>(&error_body)
                .ok()
                .and_then(|e| e.error)
                .map(|e| e.message)
                .unwrap_or(error_body);

            tracing::error!(code = status.as_u16(), message = %message, "Completions API error");

            return Err(CompletionError::Api {
                code: status.as_u16(),
                message,
            });
        }

        let chat_response: ChatResponse = response.json().await?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .filter(|c| !c.is_empty());

        Ok(content)
    }

    /// Model identifier sent with every request, for health reporting.
    pub fn model(&self) -> &str {
        &self.config.model
    }
}

// ============================================================================
// TESTS
// ============================================================================
