//! Error types for review operations

use thiserror::Error;

/// Errors that can occur while applying a review
#[derive(Error, Debug)]
pub enum BeliefError {
    /// Storage layer error (includes unknown claim ids)
    #[error("Storage error: {0}")]
    Store(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The review action string was not recognised
    #[error("Invalid review action: {0}")]
    InvalidAction(String),
}

impl BeliefError {
    pub(crate) fn store<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        BeliefError::Store(Box::new(err))
    }
}
