//! Printable board report

use super::state::SessionState;
use serde::Serialize;
use std::fmt;

/// Shown when the board produced no recommendation
pub const NO_CONCLUSION: &str = "No conclusion reached.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardReport {
    pub transcript: String,
    pub recommendation: Option<String>,
}

impl BoardReport {
    pub fn from_state(state: &SessionState) -> Self {
        Self {
            transcript: state.discussion().render(),
            recommendation: state.final_recommendation().map(str::to_string),
        }
    }

    pub fn recommendation_or_fallback(&self) -> &str {
        self.recommendation.as_deref().unwrap_or(NO_CONCLUSION)
    }
}

impl fmt::Display for BoardReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Investment Board Report ---")?;
        writeln!(f)?;
        writeln!(f, "Discussion Transcript")?;
        writeln!(f, "----------------------")?;
        writeln!(f, "{}", self.transcript)?;
        writeln!(f)?;
        writeln!(f, "Final Recommendation")?;
        writeln!(f, "--------------------")?;
        write!(f, "{}", self.recommendation_or_fallback())
    }
}
