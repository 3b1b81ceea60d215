//! Async LLM client for costing proposals and catalog suggestions
//!
//! Model-agnostic HTTP client. Anthropic URLs use the Anthropic messages
//! format; everything else (OpenAI, DeepSeek, local servers) uses the
//! OpenAI-compatible chat format.

use crate::core::config::LlmSettings;
use crate::core::error::{EstimateError, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Anything that turns a system + user prompt into a text reply
#[allow(async_fn_in_trait)]
pub trait Completion {
    async fn complete(&self, system: &str, user: &str) -> Result<String>;
}

/// API format type
#[derive(Debug, Clone, PartialEq)]
pub enum ApiFormat {
    Anthropic,
    OpenAI,
}

pub struct LlmClient {
    client: Client,
    api_key: String,
    api_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    api_format: ApiFormat,
}

impl LlmClient {
    pub fn new(api_key: String, settings: &LlmSettings) -> Self {
        Self {
            client: Client::new(),
            api_key,
            api_format: Self::detect_api_format(&settings.api_url),
            api_url: settings.api_url.clone(),
            model: settings.model.clone(),
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
        }
    }

    fn detect_api_format(url: &str) -> ApiFormat {
        if url.contains("anthropic.com") {
            ApiFormat::Anthropic
        } else {
            ApiFormat::OpenAI
        }
    }

    /// Create a client from `settings`, overridden by the environment
    ///
    /// Required: LLM_API_KEY
    /// Optional: LLM_API_URL, LLM_MODEL
    pub fn from_env(settings: &LlmSettings) -> Result<Self> {
        let api_key = std::env::var("LLM_API_KEY")
            .map_err(|_| EstimateError::LlmError("LLM_API_KEY not set".into()))?;

        let mut settings = settings.clone();
        if let Ok(url) = std::env::var("LLM_API_URL") {
            settings.api_url = url;
        }
        if let Ok(model) = std::env::var("LLM_MODEL") {
            settings.model = model;
        }

        Ok(Self::new(api_key, &settings))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn api_format(&self) -> &ApiFormat {
        &self.api_format
    }

    /// POST a JSON body and decode the JSON reply
    ///
    /// Transport failures, non-2xx statuses and undecodable bodies all map to
    /// `LlmError`; the status body is kept in the message for diagnosis.
    async fn post<B: Serialize, R: DeserializeOwned>(&self, body: &B) -> Result<R> {
        let request = self
            .client
            .post(&self.api_url)
            .header("content-type", "application/json");
        let request = match self.api_format {
            ApiFormat::Anthropic => request
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", ANTHROPIC_VERSION),
            ApiFormat::OpenAI => request.bearer_auth(&self.api_key),
        };

        let response = request
            .json(body)
            .send()
            .await
            .map_err(|e| EstimateError::LlmError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(EstimateError::LlmError(format!("{} from {}: {}", status, self.api_url, detail)));
        }

        response
            .json()
            .await
            .map_err(|e| EstimateError::LlmError(format!("Undecodable reply: {}", e)))
    }
}

impl Completion for LlmClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        tracing::debug!("LLM request to {} ({} chars)", self.model, user.len());
        let text = match self.api_format {
            ApiFormat::Anthropic => {
                let body = MessagesRequest {
                    model: &self.model,
                    max_tokens: self.max_tokens,
                    temperature: self.temperature,
                    system,
                    messages: vec![Message::new("user", user)],
                };
                let reply: MessagesReply = self.post(&body).await?;
                reply.content.into_iter().next().map(|block| block.text)
            }
            ApiFormat::OpenAI => {
                let body = ChatRequest {
                    model: &self.model,
                    max_tokens: self.max_tokens,
                    temperature: self.temperature,
                    messages: vec![Message::new("system", system), Message::new("user", user)],
                };
                let reply: ChatReply = self.post(&body).await?;
                reply.choices.into_iter().next().map(|choice| choice.message.content)
            }
        };
        text.ok_or_else(|| EstimateError::LlmError("Empty response".into()))
    }
}

const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

impl<'a> Message<'a> {
    fn new(role: &'static str, content: &'a str) -> Self {
        Self { role, content }
    }
}

/// Anthropic messages API
#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Deserialize)]
struct MessagesReply {
    content: Vec<TextBlock>,
}

#[derive(Deserialize)]
struct TextBlock {
    text: String,
}

/// OpenAI-compatible chat completions
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<Message<'a>>,
}

#[derive(Deserialize)]
struct ChatReply {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: String,
}
