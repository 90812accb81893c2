//! Error types for the Synthesizer

use thiserror::Error;

/// Errors that can occur during answer synthesis
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SynthesisError {
    /// Synthesis was asked to answer from zero claims
    #[error("No grounding claims supplied")]
    NoClaims,

    /// The generation service failed
    #[error("Generation failed: {0}")]
    Generation(String),

    /// The generation service did not answer in time
    #[error("Generation timed out after {0}s")]
    Timeout(u64),

    /// The generation service answered with nothing
    #[error("Generation returned an empty response")]
    EmptyResponse,
}
