//! Generation Client - the text-generation boundary of the investment board
//!
//! This crate provides:
//! - `GenerationClient` trait: role-tagged messages in, one text response out
//! - `OpenAiClient` for any OpenAI-compatible chat completions endpoint
//! - `EchoClient` for offline dry runs
//! - Client configuration and construction from the process environment
//!
//! Timeouts live here. Callers never retry.

pub mod config;
pub mod echo;
pub mod error;
pub mod openai;

pub use config::{ClientConfig, Provider};
pub use echo::EchoClient;
pub use error::GenerationError;
pub use openai::OpenAiClient;

// Re-export message types for convenience
pub use common::{ChatMessage, MessageRole};

use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

/// A service that turns an ordered list of role-tagged messages into text
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Short identifier used in logs
    fn name(&self) -> &str;

    /// Generate a single response for the given conversation
    async fn generate(&self, messages: &[ChatMessage]) -> Result<String, GenerationError>;
}

/// Build the configured client, reading credentials from the environment
pub fn build_client(config: &ClientConfig) -> Result<Arc<dyn GenerationClient>, GenerationError> {
    match config.provider {
        Provider::OpenAi => {
            let api_key = api_key_from_env(&config.api_key_env)?;
            let client = OpenAiClient::new(config, api_key)?;
            info!(model = %config.model, base_url = %config.base_url, "Using OpenAI-compatible generation client");
            Ok(Arc::new(client))
        }
        Provider::Echo => {
            info!("Using offline echo generation client");
            Ok(Arc::new(EchoClient::new()))
        }
    }
}

/// Read a non-empty API key from the named environment variable
pub fn api_key_from_env(var: &str) -> Result<String, GenerationError> {
    match std::env::var(var) {
        Ok(key) if !key.trim().is_empty() => Ok(key),
        _ => Err(GenerationError::MissingApiKey(var.to_string())),
    }
}
