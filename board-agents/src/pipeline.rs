//! Pipeline Runner - drives the board meeting from question to recommendation
//!
//! The meeting is a fixed linear sequence:
//! Strategist → Technical → Risk → Platform → Synthesizer
//!
//! Each step reads the state committed by its predecessor. There is no
//! branching, no fan-out and no retry: the first failure ends the meeting.

use super::agent::{Role, RoleAgent};
use super::config::BoardConfig;
use super::state::{SessionState, StateError};
use super::synthesizer::Synthesizer;
use generation_client::{GenerationClient, GenerationError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

/// Where the meeting currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    Strategist,
    Technical,
    Risk,
    Platform,
    Synthesizer,
    Complete,
}

impl Stage {
    pub const fn first() -> Self {
        Stage::Strategist
    }

    /// Unconditional successor; `Complete` is terminal
    pub fn next(self) -> Self {
        match self {
            Stage::Strategist => Stage::Technical,
            Stage::Technical => Stage::Risk,
            Stage::Risk => Stage::Platform,
            Stage::Platform => Stage::Synthesizer,
            Stage::Synthesizer | Stage::Complete => Stage::Complete,
        }
    }

    /// The board member speaking at this stage, if any
    pub fn role(self) -> Option<Role> {
        match self {
            Stage::Strategist => Some(Role::Strategist),
            Stage::Technical => Some(Role::Technical),
            Stage::Risk => Some(Role::Risk),
            Stage::Platform => Some(Role::Platform),
            Stage::Synthesizer | Stage::Complete => None,
        }
    }
}

impl From<Role> for Stage {
    fn from(role: Role) -> Self {
        match role {
            Role::Strategist => Stage::Strategist,
            Role::Technical => Stage::Technical,
            Role::Risk => Stage::Risk,
            Role::Platform => Stage::Platform,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.role() {
            Some(role) => f.write_str(role.display_name()),
            None if *self == Stage::Synthesizer => f.write_str("Synthesizer"),
            None => f.write_str("Complete"),
        }
    }
}

/// Why a meeting ended without a recommendation
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid session state: {0}")]
    InvalidState(#[from] StateError),

    #[error("{stage} step failed: {source}")]
    StepFailed {
        stage: Stage,
        /// Last fully committed state; holds nothing from the failed step
        state: Box<SessionState>,
        source: GenerationError,
    },
}

impl PipelineError {
    /// The stage that failed, for generation failures
    pub fn stage(&self) -> Option<Stage> {
        match self {
            PipelineError::StepFailed { stage, .. } => Some(*stage),
            PipelineError::InvalidState(_) => None,
        }
    }

    /// State as it stood before the failed step
    pub fn committed_state(&self) -> Option<&SessionState> {
        match self {
            PipelineError::StepFailed { state, .. } => Some(&**state),
            PipelineError::InvalidState(_) => None,
        }
    }
}

/// The investment board: four role agents and a synthesizer over one client
pub struct BoardPipeline {
    client: Arc<dyn GenerationClient>,
    agents: [RoleAgent; 4],
    synthesizer: Synthesizer,
}

impl BoardPipeline {
    /// Board with the built-in personas
    pub fn new(client: Arc<dyn GenerationClient>) -> Self {
        Self {
            client,
            agents: Role::ALL.map(RoleAgent::new),
            synthesizer: Synthesizer::new(),
        }
    }

    /// Board with persona overrides from configuration
    pub fn from_config(client: Arc<dyn GenerationClient>, config: &BoardConfig) -> Self {
        let overrides = &config.instructions;
        let agents = Role::ALL.map(|role| match overrides.for_role(role) {
            Some(instruction) => RoleAgent::with_instruction(role, instruction),
            None => RoleAgent::new(role),
        });
        let synthesizer = match overrides.for_synthesizer() {
            Some(instruction) => Synthesizer::with_instruction(instruction),
            None => Synthesizer::new(),
        };

        Self {
            client,
            agents,
            synthesizer,
        }
    }

    /// Role agents in speaking order
    pub fn agents(&self) -> &[RoleAgent] {
        &self.agents
    }

    pub fn synthesizer(&self) -> &Synthesizer {
        &self.synthesizer
    }

    fn agent(&self, role: Role) -> &RoleAgent {
        &self.agents[role.index()]
    }

    /// Hold a meeting for one question
    pub async fn run(&self, user_input: &str) -> Result<SessionState, PipelineError> {
        let state = SessionState::new(user_input)?;
        self.run_from(state).await
    }

    /// Hold a meeting starting from a prepared state
    ///
    /// The state must be initial; anything else is rejected before the
    /// first generation call.
    pub async fn run_from(&self, initial: SessionState) -> Result<SessionState, PipelineError> {
        if !initial.is_initial() {
            return Err(StateError::NotInitial.into());
        }

        let session_id = initial.session_id();
        let client = self.client.as_ref();
        let mut state = initial;
        let mut stage = Stage::first();

        info!(%session_id, client = client.name(), "Board meeting started");

        while let Some(role) = stage.role() {
            info!(%session_id, %stage, turns = state.discussion().len(), "Board member speaking");

            let delta = match self.agent(role).run(&state, client).await {
                Ok(delta) => delta,
                Err(source) => return Err(Self::abort(stage, state, source)),
            };
            state = state.apply(delta)?;

            info!(
                %session_id,
                %stage,
                chars = state.response(role).map_or(0, str::len),
                "Board member finished"
            );
            stage = stage.next();
        }

        info!(%session_id, %stage, turns = state.discussion().len(), "Chairperson summarizing");
        let recommendation = match self.synthesizer.run(&state, client).await {
            Ok(text) => text,
            Err(source) => return Err(Self::abort(stage, state, source)),
        };
        state = state.conclude(recommendation)?;
        stage = stage.next();

        info!(%session_id, %stage, "Board meeting concluded");
        Ok(state)
    }

    fn abort(stage: Stage, state: SessionState, source: GenerationError) -> PipelineError {
        error!(
            session_id = %state.session_id(),
            %stage,
            error = %source,
            "Board meeting aborted"
        );
        PipelineError::StepFailed {
            stage,
            state: Box::new(state),
            source,
        }
    }
}
