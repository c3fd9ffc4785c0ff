//! Synthesizer - the chairperson's closing recommendation
//!
//! Unlike the role agents it receives the raw transcript (no
//! "Discussion so far" framing) and never adds a turn of its own.

use super::agent::require_text;
use super::state::SessionState;
use generation_client::{ChatMessage, GenerationClient, GenerationError};
use tracing::debug;

pub const CHAIRPERSON_INSTRUCTION: &str = "You're the Chairperson of the Investment Board. Based on the discussion and everyone's input, summarize the consensus and give a final recommendation.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Synthesizer {
    instruction: String,
}

impl Default for Synthesizer {
    fn default() -> Self {
        Self::with_instruction(CHAIRPERSON_INSTRUCTION)
    }
}

impl Synthesizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_instruction(instruction: impl Into<String>) -> Self {
        Self {
            instruction: instruction.into(),
        }
    }

    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    pub fn build_messages(&self, state: &SessionState) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(self.instruction.as_str()),
            ChatMessage::assistant(state.discussion().render()),
            ChatMessage::user(state.user_input()),
        ]
    }

    /// Produce the recommendation text; committing it is the runner's job
    pub async fn run(
        &self,
        state: &SessionState,
        client: &dyn GenerationClient,
    ) -> Result<String, GenerationError> {
        let messages = self.build_messages(state);
        let recommendation = require_text(client.generate(&messages).await?)?;
        debug!(
            client = client.name(),
            turns = state.discussion().len(),
            chars = recommendation.len(),
            "Synthesizer produced recommendation"
        );
        Ok(recommendation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{AgentDelta, Role};
    use crate::state::Turn;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Deterministic client that also counts calls
    #[derive(Default)]
    struct CountingEcho {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl GenerationClient for CountingEcho {
        fn name(&self) -> &str {
            "counting-echo"
        }

        async fn generate(&self, messages: &[ChatMessage]) -> Result<String, GenerationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(messages
                .iter()
                .map(|m| m.content.as_str())
                .collect::<Vec<_>>()
                .join(" | "))
        }
    }

    fn discussed_state() -> SessionState {
        let mut state = SessionState::new("Should I buy bonds?").unwrap();
        for role in Role::ALL {
            let text = format!("{} view", role.key());
            let discussion = state.discussion().with_turn(Turn::new(role, text.as_str()));
            state = state
                .apply(AgentDelta {
                    role,
                    response: text,
                    discussion,
                })
                .unwrap();
        }
        state
    }

    #[test]
    fn test_messages_use_raw_transcript() {
        let state = discussed_state();
        let messages = Synthesizer::new().build_messages(&state);

        assert_eq!(messages[0].content, CHAIRPERSON_INSTRUCTION);
        assert_eq!(messages[1].content, state.discussion().render());
        assert!(!messages[1].content.starts_with("Discussion so far"));
        assert_eq!(messages[2].content, "Should I buy bonds?");
    }

    #[tokio::test]
    async fn test_synthesizer_is_idempotent() {
        let state = discussed_state();
        let before = state.clone();
        let client = CountingEcho::default();
        let synthesizer = Synthesizer::new();

        let first = synthesizer.run(&state, &client).await.unwrap();
        let second = synthesizer.run(&state, &client).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(client.calls.load(Ordering::SeqCst), 2);
        assert_eq!(state, before);
    }
}
