//! Error types for the Orchestrator

use credence_domain::GroundingClaim;
use thiserror::Error;

/// Errors that end a query
///
/// An empty result is not an error; see `QueryOutcome::Empty`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OrchestratorError {
    /// The request was rejected before any stage ran
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The retriever failed or timed out
    #[error("Retrieval error: {0}")]
    Retrieval(String),

    /// The claim store could not be read during filtering
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Synthesis failed after every permitted attempt
    ///
    /// Carries the claims that would have grounded the answer so the caller
    /// can retry synthesis without searching again.
    #[error("Generation error: {message}")]
    Generation {
        /// Last failure reported by the synthesizer
        message: String,

        /// Filtered claims, in retriever order
        claims: Vec<GroundingClaim>,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl OrchestratorError {
    /// Claims ready for another synthesis attempt, if this is a generation failure
    pub fn pending_claims(&self) -> Option<&[GroundingClaim]> {
        match self {
            OrchestratorError::Generation { claims, .. } => Some(claims),
            _ => None,
        }
    }
}
