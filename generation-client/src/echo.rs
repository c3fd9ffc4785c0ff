use crate::{GenerationClient, GenerationError};
use async_trait::async_trait;
use common::{last_user_content, ChatMessage};
use tracing::debug;

/// Deterministic offline client that answers with the user's question
#[derive(Debug, Clone, Default)]
pub struct EchoClient;

impl EchoClient {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl GenerationClient for EchoClient {
    fn name(&self) -> &str {
        "echo"
    }

    async fn generate(&self, messages: &[ChatMessage]) -> Result<String, GenerationError> {
        let text = last_user_content(messages).ok_or(GenerationError::EmptyResponse)?;
        debug!(messages = messages.len(), chars = text.len(), "Echoing task message");
        Ok(text.to_string())
    }
}
