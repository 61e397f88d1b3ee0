//! LLM client: the single point of entry for all model calls in the engine.
//!
//! ARCHITECTURAL RULE: no other module may talk to the Ollama API directly.
//! All generation goes through [`LlmClient`], which tries its transports in a
//! fixed order: the chat endpoint first, then the plain generate endpoint with
//! the message list flattened into one prompt. Both transport failures collapse
//! into a single `Unavailable` error carrying the last underlying cause.
//!
//! Schema-constrained calls pass the caller's JSON schema through unmodified;
//! validating what comes back is [`structured`]'s job, not the transport's.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::Config;

pub mod structured;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("model backend unavailable: {0}")]
    Unavailable(String),

    #[error("malformed model output: {0}")]
    Malformed(String),

    #[error("model returned empty content")]
    EmptyContent,
}

// ────────────────────────────────────────────────────────────────────────────
// Chat request model
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One role-tagged entry in an ordered chat request. Earlier entries are
/// standing context (persona, instructions); later entries are recent turns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Sampling configuration sent with every generation call.
/// Low temperature keeps the interviewer consistent across a session.
#[derive(Debug, Clone, Serialize)]
pub struct SamplingConfig {
    pub temperature: f32,
    pub num_ctx: u32,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            temperature: 0.15,
            num_ctx: 10_000,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Backend capability
// ────────────────────────────────────────────────────────────────────────────

/// The generation capability. `LlmClient` implements it by chaining its
/// transports; each transport implements it against one Ollama endpoint.
/// Session and feedback code only ever sees `&dyn ChatBackend`, which is also
/// the seam the tests script against.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn chat(
        &self,
        messages: &[ChatMessage],
        sampling: &SamplingConfig,
        format: Option<&Value>,
    ) -> Result<String, LlmError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Ollama wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
    options: &'a SamplingConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<&'a Value>,
}

#[derive(Deserialize)]
struct OllamaChatResponse {
    message: OllamaChatResponseMessage,
}

#[derive(Deserialize)]
struct OllamaChatResponseMessage {
    content: String,
}

#[derive(Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    stream: bool,
    options: &'a SamplingConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<&'a Value>,
}

#[derive(Deserialize)]
struct OllamaGenerateResponse {
    response: String,
}

#[derive(Deserialize)]
struct OllamaTagsResponse {
    #[serde(default)]
    models: Vec<OllamaModelTag>,
}

#[derive(Deserialize)]
struct OllamaModelTag {
    name: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Transports
// ────────────────────────────────────────────────────────────────────────────

/// Primary transport: POST /api/chat with the message list as-is.
struct OllamaChatTransport {
    http: Client,
    host: String,
    model: String,
}

#[async_trait]
impl ChatBackend for OllamaChatTransport {
    async fn chat(
        &self,
        messages: &[ChatMessage],
        sampling: &SamplingConfig,
        format: Option<&Value>,
    ) -> Result<String, LlmError> {
        let body = OllamaChatRequest {
            model: &self.model,
            messages,
            stream: false,
            options: sampling,
            format,
        };

        let response = self
            .http
            .post(format!("{}/api/chat", self.host))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: OllamaChatResponse = response.json().await?;
        if parsed.message.content.trim().is_empty() {
            return Err(LlmError::EmptyContent);
        }
        Ok(parsed.message.content)
    }
}

/// Fallback transport: POST /api/generate against the same backend, with the
/// message list flattened into a single role-labelled prompt.
struct OllamaGenerateTransport {
    http: Client,
    host: String,
    model: String,
}

#[async_trait]
impl ChatBackend for OllamaGenerateTransport {
    async fn chat(
        &self,
        messages: &[ChatMessage],
        sampling: &SamplingConfig,
        format: Option<&Value>,
    ) -> Result<String, LlmError> {
        let body = OllamaGenerateRequest {
            model: &self.model,
            prompt: flatten_messages(messages),
            stream: false,
            options: sampling,
            format,
        };

        let response = self
            .http
            .post(format!("{}/api/generate", self.host))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: OllamaGenerateResponse = response.json().await?;
        if parsed.response.trim().is_empty() {
            return Err(LlmError::EmptyContent);
        }
        Ok(parsed.response)
    }
}

/// Flattens an ordered chat into a single prompt for the generate endpoint.
/// System messages keep their position; the role label preserves turn order
/// for the model.
fn flatten_messages(messages: &[ChatMessage]) -> String {
    let mut prompt = String::new();
    for message in messages {
        let label = match message.role {
            Role::System => "Instructions",
            Role::User => "Candidate",
            Role::Assistant => "Interviewer",
        };
        prompt.push_str(&format!("{label}:\n{}\n\n", message.content));
    }
    prompt.push_str("Interviewer:\n");
    prompt
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// The single LLM client shared by every session.
/// Holds the ordered transport chain plus what the availability check needs.
pub struct LlmClient {
    transports: Vec<Box<dyn ChatBackend>>,
    http: Client,
    host: String,
    model: String,
    availability_retries: u32,
    availability_delay: std::time::Duration,
}

impl LlmClient {
    pub fn new(config: &Config) -> Self {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
            .build()
            .expect("Failed to build HTTP client");

        let transports: Vec<Box<dyn ChatBackend>> = vec![
            Box::new(OllamaChatTransport {
                http: http.clone(),
                host: config.ollama_host.clone(),
                model: config.model.clone(),
            }),
            Box::new(OllamaGenerateTransport {
                http: http.clone(),
                host: config.ollama_host.clone(),
                model: config.model.clone(),
            }),
        ];

        Self {
            transports,
            http,
            host: config.ollama_host.clone(),
            model: config.model.clone(),
            availability_retries: config.availability_retries,
            availability_delay: std::time::Duration::from_secs(config.availability_delay_secs),
        }
    }

    /// Test constructor: replaces the transport chain wholesale.
    #[cfg(test)]
    fn with_transports(transports: Vec<Box<dyn ChatBackend>>) -> Self {
        Self {
            transports,
            http: Client::new(),
            host: String::new(),
            model: String::new(),
            availability_retries: 0,
            availability_delay: std::time::Duration::ZERO,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Verifies the configured model is loaded (pulling it if missing) before
    /// any generation call is attempted. Fixed retry budget, fixed delay.
    pub async fn ensure_model_available(&self) -> Result<(), LlmError> {
        let mut last_error = String::new();

        for attempt in 1..=self.availability_retries {
            match self.model_is_available().await {
                Ok(true) => {
                    info!("Model {} ready at {}", self.model, self.host);
                    return Ok(());
                }
                Ok(false) => {
                    info!("Model {} not found, pulling it now...", self.model);
                    if let Err(e) = self.pull_model().await {
                        warn!("Failed to pull model {}: {e}", self.model);
                        last_error = e.to_string();
                    } else {
                        return Ok(());
                    }
                }
                Err(e) => {
                    warn!(
                        "Ollama not ready yet (attempt {attempt}/{}): {e}",
                        self.availability_retries
                    );
                    last_error = e.to_string();
                }
            }
            tokio::time::sleep(self.availability_delay).await;
        }

        Err(LlmError::Unavailable(format!(
            "model {} not available after {} attempts: {last_error}",
            self.model, self.availability_retries
        )))
    }

    async fn model_is_available(&self) -> Result<bool, LlmError> {
        let response = self
            .http
            .get(format!("{}/api/tags", self.host))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let tags: OllamaTagsResponse = response.json().await?;
        // Tags come back as "name:tag"; accept an exact or untagged match.
        Ok(tags
            .models
            .iter()
            .any(|m| m.name == self.model || m.name.split(':').next() == Some(self.model.as_str())))
    }

    async fn pull_model(&self) -> Result<(), LlmError> {
        let response = self
            .http
            .post(format!("{}/api/pull", self.host))
            .json(&serde_json::json!({ "name": self.model, "stream": false }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ChatBackend for LlmClient {
    /// Tries each transport in order. The chain is fixed: chat endpoint, then
    /// generate endpoint. Both failing means the backend is unreachable.
    async fn chat(
        &self,
        messages: &[ChatMessage],
        sampling: &SamplingConfig,
        format: Option<&Value>,
    ) -> Result<String, LlmError> {
        let mut last_error: Option<LlmError> = None;

        for (i, transport) in self.transports.iter().enumerate() {
            match transport.chat(messages, sampling, format).await {
                Ok(text) => {
                    debug!("LLM call succeeded via transport {i} ({} chars)", text.len());
                    return Ok(text);
                }
                Err(e) => {
                    warn!("Transport {i} failed: {e}");
                    last_error = Some(e);
                }
            }
        }

        Err(LlmError::Unavailable(
            last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "no transports configured".to_string()),
        ))
    }
}
