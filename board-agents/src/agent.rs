//! Board roles and the role agent step
//!
//! Every board member is the same step type: a role, its persona
//! instruction, and the rule for rendering the discussion into context.

use super::state::{SessionState, Transcript, Turn};
use generation_client::{ChatMessage, GenerationClient, GenerationError};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Prefix of the context message every role agent receives
pub const DISCUSSION_PREFIX: &str = "Discussion so far: ";

/// The four board members, declared in speaking order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Strategist,
    Technical,
    Risk,
    Platform,
}

impl Role {
    /// Pipeline order: macro framing, technicals, risk critique, instruments
    pub const ALL: [Role; 4] = [Role::Strategist, Role::Technical, Role::Risk, Role::Platform];

    /// Label used in the transcript
    pub fn display_name(self) -> &'static str {
        match self {
            Role::Strategist => "Strategist",
            Role::Technical => "Technical",
            Role::Risk => "Risk",
            Role::Platform => "Platform",
        }
    }

    /// Stable lowercase identifier (logs, configuration keys)
    pub fn key(self) -> &'static str {
        match self {
            Role::Strategist => "strategist",
            Role::Technical => "technical",
            Role::Risk => "risk",
            Role::Platform => "platform",
        }
    }

    /// Default persona instruction
    pub fn instruction(self) -> &'static str {
        match self {
            Role::Strategist => "You're a Market Strategist. Discuss macroeconomic trends with the team and explore sectoral opportunities collaboratively.",
            Role::Technical => "You're a Technical Analyst. Join the conversation by analyzing patterns, and comment on others' views where appropriate.",
            Role::Risk => "You're a Risk Manager. Discuss risk exposure, portfolio balance, and counterpoints with other team members.",
            Role::Platform => "You're a Platform Specialist. Join the conversation and suggest suitable instruments and strategies available via modern online investing platforms.",
        }
    }

    /// Position in [`Role::ALL`]
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// What a role agent proposes to commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentDelta {
    pub role: Role,
    pub response: String,
    /// Previous transcript plus this role's turn
    pub discussion: Transcript,
}

/// A board member
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleAgent {
    role: Role,
    instruction: String,
}

impl RoleAgent {
    /// Agent with the role's default persona
    pub fn new(role: Role) -> Self {
        Self::with_instruction(role, role.instruction())
    }

    pub fn with_instruction(role: Role, instruction: impl Into<String>) -> Self {
        Self {
            role,
            instruction: instruction.into(),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    /// Context message; the prefix is present even before anyone has spoken
    pub fn context_message(discussion: &Transcript) -> String {
        format!("{}{}", DISCUSSION_PREFIX, discussion.render())
    }

    /// Persona, discussion so far, then the user's question
    pub fn build_messages(&self, state: &SessionState) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(self.instruction.as_str()),
            ChatMessage::assistant(Self::context_message(state.discussion())),
            ChatMessage::user(state.user_input()),
        ]
    }

    /// Take this member's turn against a snapshot of the session
    pub async fn run(
        &self,
        state: &SessionState,
        client: &dyn GenerationClient,
    ) -> Result<AgentDelta, GenerationError> {
        let messages = self.build_messages(state);
        let response = require_text(client.generate(&messages).await?)?;

        debug!(
            role = self.role.key(),
            client = client.name(),
            chars = response.len(),
            "Role agent responded"
        );

        let discussion = state
            .discussion()
            .with_turn(Turn::new(self.role, response.as_str()));

        Ok(AgentDelta {
            role: self.role,
            response,
            discussion,
        })
    }
}

/// Reject blank generations
pub(crate) fn require_text(text: String) -> Result<String, GenerationError> {
    if text.trim().is_empty() {
        Err(GenerationError::EmptyResponse)
    } else {
        Ok(text)
    }
}
