//! HTTP client for an OpenAI-compatible chat-completions collaborator.
//!
//! Targets a locally hosted model server (vLLM, Ollama-OpenAI, or any
//! gateway speaking the same protocol). The client is blocking — the
//! evolution loop is single-threaded and strictly generational — and carries
//! its own request timeout so an unresponsive server costs one bounded wait,
//! after which the engine falls back to an identity mutation.

use super::{MutationOracle, OracleError};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Connection settings for the chat-completions collaborator.
#[derive(Debug, Clone)]
pub struct OracleConfig {
    /// Base URL up to and including the API version segment.
    pub base_url: String,
    /// Model identifier as known to the server.
    pub model: String,
    /// Bearer token; local servers usually accept none.
    pub api_key: Option<String>,
    /// Whole-request timeout.
    pub timeout: Duration,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:10062/v1".to_string(),
            model: "Qwen/Qwen3-8B".to_string(),
            api_key: None,
            timeout: Duration::from_secs(30),
            temperature: 0.7,
            max_tokens: 1024,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

/// Blocking chat-completions client implementing [`MutationOracle`].
pub struct HttpOracle {
    client: reqwest::blocking::Client,
    config: OracleConfig,
}

impl HttpOracle {
    pub fn new(config: OracleConfig) -> Result<HttpOracle, OracleError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(HttpOracle { client, config })
    }

    pub fn config(&self) -> &OracleConfig {
        &self.config
    }
}

impl MutationOracle for HttpOracle {
    fn propose(&self, constraints: &str) -> Result<String, OracleError> {
        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage {
                role: "user",
                content: constraints.to_string(),
            }],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        debug!(
            model = %self.config.model,
            prompt_len = constraints.len(),
            "requesting assignment proposal"
        );

        let mut builder = self.client.post(&url).json(&request);
        if let Some(key) = &self.config.api_key {
            builder = builder.bearer_auth(key);
        }
        let response = builder.send()?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().unwrap_or_default();
            return Err(OracleError::Status { status, body });
        }

        let parsed: ChatResponse = response.json()?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(OracleError::EmptyResponse)?;

        debug!(response_len = content.len(), "assignment proposal received");
        Ok(content)
    }
}
