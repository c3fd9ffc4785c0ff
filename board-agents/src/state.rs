//! Session state threaded through the board pipeline
//!
//! State is never mutated in place. Each step reads a snapshot and the
//! runner commits the step's delta with [`SessionState::apply`], which
//! returns a new value. Only the runner records the recommendation.

use super::agent::{AgentDelta, Role};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use uuid::Uuid;

/// Violations of the session state invariants
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("the board needs a non-empty question")]
    EmptyQuestion,

    #[error("{0} has already recorded a response")]
    ResponseAlreadyRecorded(Role),

    #[error("{0} delta does not append exactly one {0} turn to the current transcript")]
    TranscriptDiverged(Role),

    #[error("a final recommendation has already been recorded")]
    AlreadyConcluded,

    #[error("a meeting must start from a state with no turns, responses or recommendation")]
    NotInitial,
}

/// One contribution to the discussion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub text: String,
    pub recorded_at: DateTime<Utc>,
}

impl Turn {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            recorded_at: Utc::now(),
        }
    }

    /// `"<RoleName>: <text>"`
    pub fn render(&self) -> String {
        format!("{}: {}", self.role.display_name(), self.text)
    }
}

/// Append-only discussion transcript
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    /// A new transcript equal to this one plus `turn`
    pub fn with_turn(&self, turn: Turn) -> Transcript {
        let mut turns = Vec::with_capacity(self.turns.len() + 1);
        turns.extend_from_slice(&self.turns);
        turns.push(turn);
        Self { turns }
    }

    /// Whether every turn of `self` appears, in order, at the start of `other`
    pub fn is_prefix_of(&self, other: &Transcript) -> bool {
        other.turns.len() >= self.turns.len() && other.turns[..self.turns.len()] == self.turns[..]
    }

    /// One `"<RoleName>: <text>"` line per turn
    pub fn render(&self) -> String {
        self.turns
            .iter()
            .map(Turn::render)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Everything the board knows about one question
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionState {
    session_id: Uuid,
    started_at: DateTime<Utc>,
    user_input: String,
    discussion: Transcript,
    responses: BTreeMap<Role, String>,
    final_recommendation: Option<String>,
}

impl SessionState {
    /// Start a session with only the question populated
    pub fn new(user_input: impl Into<String>) -> Result<Self, StateError> {
        let user_input = user_input.into();
        if user_input.trim().is_empty() {
            return Err(StateError::EmptyQuestion);
        }

        Ok(Self {
            session_id: Uuid::new_v4(),
            started_at: Utc::now(),
            user_input,
            discussion: Transcript::new(),
            responses: BTreeMap::new(),
            final_recommendation: None,
        })
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn user_input(&self) -> &str {
        &self.user_input
    }

    pub fn discussion(&self) -> &Transcript {
        &self.discussion
    }

    pub fn response(&self, role: Role) -> Option<&str> {
        self.responses.get(&role).map(String::as_str)
    }

    pub fn responses(&self) -> &BTreeMap<Role, String> {
        &self.responses
    }

    pub fn final_recommendation(&self) -> Option<&str> {
        self.final_recommendation.as_deref()
    }

    /// Commit a role agent's delta
    ///
    /// The response and the transcript move together: on error `self` is
    /// untouched and nothing from the delta is recorded.
    pub fn apply(&self, delta: AgentDelta) -> Result<SessionState, StateError> {
        let AgentDelta {
            role,
            response,
            discussion,
        } = delta;

        if self.responses.contains_key(&role) {
            return Err(StateError::ResponseAlreadyRecorded(role));
        }

        let appends_own_turn = discussion.len() == self.discussion.len() + 1
            && self.discussion.is_prefix_of(&discussion)
            && discussion
                .last()
                .is_some_and(|turn| turn.role == role && turn.text == response);
        if !appends_own_turn {
            return Err(StateError::TranscriptDiverged(role));
        }

        let mut next = self.clone();
        next.responses.insert(role, response);
        next.discussion = discussion;
        Ok(next)
    }

    /// Only the question is populated
    pub fn is_initial(&self) -> bool {
        self.discussion.is_empty()
            && self.responses.is_empty()
            && self.final_recommendation.is_none()
    }

    /// Record the synthesizer's recommendation; the transcript is left as is
    pub(crate) fn conclude(&self, recommendation: impl Into<String>) -> Result<SessionState, StateError> {
        if self.final_recommendation.is_some() {
            return Err(StateError::AlreadyConcluded);
        }

        let mut next = self.clone();
        next.final_recommendation = Some(recommendation.into());
        Ok(next)
    }
}
