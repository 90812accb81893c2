//! Types for ingestion and extraction results

use credence_domain::ClaimId;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A claim as proposed by the generation service, before insertion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedClaim {
    /// The assertion text
    pub claim_text: String,
}

/// A chunk whose extraction output could not be parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkFailure {
    /// Zero-based position of the chunk in the document
    pub chunk_index: usize,

    /// Why the output was rejected
    pub reason: String,
}

/// Summary of one extraction run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionReport {
    /// Provenance recorded on every created claim
    pub source_ref: String,

    /// Line assigned to every created claim
    pub line_id: String,

    /// Chunks sent to the generation service
    pub chunks_processed: usize,

    /// Ids of the inserted claims, in insertion order
    pub claims_created: Vec<ClaimId>,

    /// Chunks skipped because their output was malformed
    pub failures: Vec<ChunkFailure>,

    /// Wall-clock time spent
    pub processing_time_ms: u64,
}

/// Title and description of an ingested document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Short title used to name artefacts
    pub title: String,

    /// One-paragraph description
    #[serde(default)]
    pub description: String,
}

/// Files written by ingestion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestArtifacts {
    /// JSON array of chunk strings
    pub chunks_path: PathBuf,

    /// JSON object with title and description
    pub metadata_path: PathBuf,
}

/// Result of ingesting one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestOutcome {
    /// File name of the ingested document
    pub source_ref: String,

    /// Generated (or fallback) title and description
    pub metadata: DocumentMetadata,

    /// The document's chunks, in order
    pub chunks: Vec<String>,

    /// Where the artefacts were written
    pub artifacts: IngestArtifacts,
}
