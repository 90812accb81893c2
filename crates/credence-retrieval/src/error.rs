//! Error types for retrieval

use crate::embedding::EmbeddingError;
use crate::vector_index::VectorIndexError;
use thiserror::Error;

/// Errors raised while querying or maintaining the semantic index
#[derive(Error, Debug)]
pub enum RetrievalError {
    /// The index service could not be reached
    #[error("Index unreachable: {0}")]
    Unreachable(String),

    /// The index did not answer in time
    #[error("Index request timed out after {0}s")]
    Timeout(u64),

    /// The index answered with something we cannot read
    #[error("Malformed index response: {0}")]
    MalformedResponse(String),

    /// The index answered with a non-success status
    #[error("Index returned HTTP {status}: {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body or reason
        message: String,
    },

    /// In-process vector index failure
    #[error("Vector index error: {0}")]
    Index(#[from] VectorIndexError),

    /// Text could not be embedded
    #[error("Embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    /// Client could not be configured
    #[error("Configuration error: {0}")]
    Config(String),
}
