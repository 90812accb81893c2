//! Credence Extractor
//!
//! Turns documents into unreviewed claims.
//!
//! # Overview
//!
//! Ingestion reads a text document, splits it into overlapping chunks and asks
//! the generation service for a title and description. Extraction sends each
//! chunk to the generation service and inserts every returned claim into the
//! claim store with `status = unreviewed` and a zero score.
//!
//! # Architecture
//!
//! ```text
//! Document → Reader → Chunker → Extractor → LLM → Claims → ClaimStore
//!                          ↘ Describer → <title>_chunks.json, <title>_metadata.json
//! ```
//!
//! # Failure handling
//!
//! - A chunk whose output is not a JSON array of claims is skipped, logged and
//!   recorded in [`ExtractionReport::failures`]; the rest of the document
//!   still goes through.
//! - A generation failure or timeout aborts the document before any claim is
//!   inserted.
//! - The describer never fails; it falls back to the file stem.
//!
//! # Example Usage
//!
//! ```no_run
//! use credence_extractor::{Extractor, ExtractorConfig};
//! use credence_llm::MockProvider;
//! use credence_store::SqliteStore;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let llm = Arc::new(MockProvider::new(r#"[{"claim_text": "Water boils at 100°C"}]"#));
//! let store = Arc::new(SqliteStore::in_memory()?);
//! let extractor = Extractor::new(llm, store, ExtractorConfig::default());
//!
//! let report = extractor
//!     .extract_text("Water boils at 100°C at sea level.", "physics.txt", Some("boiling"))
//!     .await?;
//!
//! println!("Created: {} claims", report.claims_created.len());
//! println!("Skipped: {} chunks", report.failures.len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod artifacts;
mod chunking;
mod config;
mod describe;
mod error;
mod extractor;
mod ingest;
mod parser;
mod prompt;
mod reader;
mod types;


pub use artifacts::{sanitize_filename, write_artifacts};
pub use chunking::{RecursiveChunker, DEFAULT_SEPARATORS};
pub use config::ExtractorConfig;
pub use describe::DocumentDescriber;
pub use error::ExtractorError;
pub use extractor::Extractor;
pub use ingest::Ingestor;
pub use parser::parse_llm_response;
pub use reader::{is_chunks_file, load_chunks, read_document};
pub use types::{
    ChunkFailure, DocumentMetadata, ExtractedClaim, ExtractionReport, IngestArtifacts,
    IngestOutcome,
};
