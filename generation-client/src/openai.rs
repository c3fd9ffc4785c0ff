//! OpenAI-compatible chat completions client
//!
//! Works with any provider exposing `POST /v1/chat/completions` in OpenAI's
//! format. One request per call, no streaming, no retries.

use crate::config::ClientConfig;
use crate::{GenerationClient, GenerationError};
use async_trait::async_trait;
use common::ChatMessage;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Request body for the chat completions endpoint
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

/// OpenAI-style error body
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Client for an OpenAI-compatible chat completions API
pub struct OpenAiClient {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
}

impl OpenAiClient {
    pub fn new(config: &ClientConfig, api_key: impl Into<String>) -> Result<Self, GenerationError> {
        let base_url = config.base_url.trim_end_matches('/');
        if base_url.is_empty() {
            return Err(GenerationError::InvalidConfig("base_url is empty".to_string()));
        }
        if config.model.trim().is_empty() {
            return Err(GenerationError::InvalidConfig("model is empty".to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: format!("{}/v1/chat/completions", base_url),
            api_key: api_key.into(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl GenerationClient for OpenAiClient {
    fn name(&self) -> &str {
        "openai"
    }

    async fn generate(&self, messages: &[ChatMessage]) -> Result<String, GenerationError> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        debug!(model = %self.model, messages = messages.len(), "Sending chat completion request");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = api_error_message(&body);
            warn!(status = status.as_u16(), %message, "Chat completion request rejected");
            return Err(GenerationError::Api {
                status: status.as_u16(),
                message,
            });
        }

        parse_completion(&body)
    }
}

/// Extract the first choice's text from a chat completion body
fn parse_completion(body: &str) -> Result<String, GenerationError> {
    let completion: ChatCompletionResponse =
        serde_json::from_str(body).map_err(|e| GenerationError::Decode(e.to_string()))?;

    if let Some(usage) = &completion.usage {
        debug!(
            prompt_tokens = usage.prompt_tokens,
            completion_tokens = usage.completion_tokens,
            "Chat completion received"
        );
    }

    completion
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|text| !text.trim().is_empty())
        .ok_or(GenerationError::EmptyResponse)
}

/// Best-effort error message from a non-2xx body
fn api_error_message(body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) => parsed.error.message,
        Err(_) if body.trim().is_empty() => "empty error body".to_string(),
        Err(_) => body.trim().to_string(),
    }
}
