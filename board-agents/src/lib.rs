//! Investment Board - a sequential multi-persona advisory discussion
//!
//! This crate provides:
//! - Session state threaded by value through the meeting
//! - Role agents (strategist, technical, risk, platform) sharing one step type
//! - The chairperson synthesizer producing the final recommendation
//! - The pipeline runner that fixes the speaking order
//! - Report rendering and layered configuration

pub mod agent;
pub mod config;
pub mod pipeline;
pub mod report;
pub mod state;
pub mod synthesizer;

// Re-export commonly used types
pub use self::agent::{AgentDelta, Role, RoleAgent, DISCUSSION_PREFIX};
pub use self::config::{BoardConfig, InstructionOverrides};
pub use self::pipeline::{BoardPipeline, PipelineError, Stage};
pub use self::report::{BoardReport, NO_CONCLUSION};
pub use self::state::{SessionState, StateError, Transcript, Turn};
pub use self::synthesizer::{Synthesizer, CHAIRPERSON_INSTRUCTION};

// Re-export the client boundary for convenience
pub use generation_client::{ChatMessage, GenerationClient, GenerationError};
