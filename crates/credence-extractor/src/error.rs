//! Error types for the Extractor

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during ingestion and extraction
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Input document does not exist
    #[error("Document not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Input document has a format we cannot read
    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// LLM provider error
    #[error("LLM error: {0}")]
    Llm(String),

    /// Claim store error
    #[error("Store error: {0}")]
    Store(String),

    /// Extraction timeout
    #[error("Extraction timeout after {0}s")]
    Timeout(u64),

    /// The generation service's output could not be read as claims
    #[error("Extraction parse error: {0}")]
    Parse(String),

    /// A chunks file or artefact is not in the expected shape
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
