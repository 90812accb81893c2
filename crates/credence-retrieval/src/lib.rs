//! Credence Retrieval
//!
//! The query side of the pipeline up to, and including, status filtering.
//!
//! # Components
//!
//! - [`LocalIndex`]: in-process HNSW index over hashed embeddings
//! - [`HttpRetriever`]: client for an external index service
//! - [`filter_candidates`]: narrows ranked candidates to eligible claims
//!
//! Both index implementations serve the `Retriever` (search) and
//! `ClaimIndex` (full rebuild) traits from `credence-domain`.

#![warn(missing_docs)]

pub mod embedding;
mod error;
pub mod filter;
pub mod http;
pub mod local;
pub mod vector_index;

pub use error::RetrievalError;
pub use filter::{filter_candidates, FilterOutcome};
pub use http::HttpRetriever;
pub use local::LocalIndex;
