/// LLM client: the single point of entry for all chat-completion calls.
///
/// ARCHITECTURAL RULE: No other module may call the completion provider directly.
/// All LLM interactions MUST go through this module.
///
/// Contract: one attempt per call, fixed 30s timeout, no retries, no backoff.
/// A missing API key is a recognised state, reported as `LlmError::NotConfigured`.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, info};

pub mod prompts;

const GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
/// The model used for all LLM calls.
/// Hardcoded so every generated block comes from the same model.
pub const MODEL: &str = "llama-3.3-70b-versatile";
const MAX_TOKENS: u32 = 800;
const TEMPERATURE: f32 = 0.3;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("LLM API key is not configured")]
    NotConfigured,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {source}")]
    Parse {
        #[source]
        source: serde_json::Error,
        raw: String,
    },

    #[error("LLM returned empty content")]
    EmptyContent,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl ChatResponse {
    /// Extracts the text of the first completion.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
    }
}

/// Anything that can turn a prompt into a parsed JSON document.
///
/// Generators depend on this seam rather than on `LlmClient` so the cache and
/// persistence paths can be exercised without the network.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Whether an API key is present. Callers use this to pick the
    /// "not configured" branch without issuing a request.
    fn is_configured(&self) -> bool;

    async fn complete_json(&self, prompt: &str, system: &str) -> Result<Value, LlmError>;
}

/// The single LLM client used by all generators.
/// Wraps an OpenAI-compatible chat-completion endpoint.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: Option<String>,
    endpoint: String,
}

impl LlmClient {
    pub fn new(api_key: Option<String>) -> Result<Self, LlmError> {
        Self::with_endpoint(api_key, GROQ_API_URL)
    }

    /// Builds a client against a non-default endpoint (self-hosted gateways, tests).
    pub fn with_endpoint(
        api_key: Option<String>,
        endpoint: impl Into<String>,
    ) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().timeout(REQUEST_TIMEOUT).build()?,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            endpoint: endpoint.into(),
        })
    }

    /// Makes a single call to the completion endpoint, returning the full response.
    pub async fn call(&self, prompt: &str, system: &str) -> Result<ChatResponse, LlmError> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::NotConfigured)?;

        let request_body = ChatRequest {
            model: MODEL,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        info!("Calling completion API (model: {MODEL})");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        info!("Completion API responded with status {status}");

        if status.as_u16() != 200 {
            let body = response.text().await.unwrap_or_default();
            error!("Completion API error: {body}");
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let chat_response: ChatResponse = response.json().await?;

        if let Some(usage) = &chat_response.usage {
            debug!(
                "LLM call succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        Ok(chat_response)
    }

    /// Calls the LLM and parses the text response as JSON.
    /// The prompt must instruct the model to return valid JSON.
    pub async fn call_json(&self, prompt: &str, system: &str) -> Result<Value, LlmError> {
        let response = self.call(prompt, system).await?;

        let text = response.text().ok_or(LlmError::EmptyContent)?;
        let text = strip_json_fences(text.trim());

        serde_json::from_str(&text).map_err(|source| {
            error!("JSON parse error: {source}\nResponse: {text}");
            LlmError::Parse { source, raw: text }
        })
    }
}

#[async_trait]
impl CompletionProvider for LlmClient {
    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn complete_json(&self, prompt: &str, system: &str) -> Result<Value, LlmError> {
        self.call_json(prompt, system).await
    }
}

/// Removes a fenced-code wrapper from LLM output.
///
/// When the text opens with a fence, the opening and closing lines are dropped
/// (only if there are more than two lines), then any leftover fence markers go.
fn strip_json_fences(text: &str) -> String {
    if !text.starts_with("```") {
        return text.to_string();
    }
    let lines: Vec<&str> = text.split('\n').collect();
    let inner = if lines.len() > 2 {
        lines[1..lines.len() - 1].join("\n")
    } else {
        text.to_string()
    };
    inner
        .replace("```json", "")
        .replace("```", "")
        .trim()
        .to_string()
}
