//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Claim store error
    #[error(transparent)]
    Store(#[from] credence_store::StoreError),

    /// Review error
    #[error(transparent)]
    Belief(#[from] credence_belief::BeliefError),

    /// Generation service error
    #[error("LLM error: {0}")]
    Llm(#[from] credence_llm::LlmError),

    /// Semantic index error
    #[error(transparent)]
    Retrieval(#[from] credence_retrieval::RetrievalError),

    /// Ingestion or extraction error
    #[error(transparent)]
    Extractor(#[from] credence_extractor::ExtractorError),

    /// Query pipeline error
    #[error(transparent)]
    Orchestrator(#[from] credence_orchestrator::OrchestratorError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
