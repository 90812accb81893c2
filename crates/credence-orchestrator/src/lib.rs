//! Credence Orchestrator
//!
//! Answers questions from reviewed claims.
//!
//! # Stages
//!
//! ```text
//! Search ──▶ Filter ──▶ Synthesize ──▶ Done
//!              │
//!              └──▶ Empty
//! ```
//!
//! | Stage | Collaborator | On failure |
//! |-------|--------------|------------|
//! | Search | `Retriever` (bounded by `retrieval_timeout_secs`) | `Retrieval`, never retried |
//! | Filter | `ClaimStore::get_by_status` | `Persistence` |
//! | Synthesize | `Synthesizer` | retried `synthesis_retries` times, then `Generation` with the claims |
//!
//! `Empty` is a valid result, not an error: it means no candidate carried the
//! requested status.
//!
//! # Example
//!
//! ```no_run
//! use credence_orchestrator::{Orchestrator, OrchestratorConfig, QueryOutcome, QueryRequest};
//! use credence_llm::MockProvider;
//! use credence_retrieval::LocalIndex;
//! use credence_store::SqliteStore;
//! use credence_synthesizer::{Synthesizer, SynthesizerConfig};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(SqliteStore::new("credence.db")?);
//! let index = Arc::new(LocalIndex::with_default_embedding());
//! let synthesizer = Synthesizer::new(Arc::new(MockProvider::default()), SynthesizerConfig::default());
//! let orchestrator = Orchestrator::new(index, store, synthesizer, OrchestratorConfig::default());
//!
//! match orchestrator.query(&QueryRequest::new("At what temperature does water boil?")).await? {
//!     QueryOutcome::Answered(answer) => println!("{}", answer.answer),
//!     QueryOutcome::Empty => println!("No eligible claims"),
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod orchestrator;
mod types;

pub use config::OrchestratorConfig;
pub use error::OrchestratorError;
pub use orchestrator::Orchestrator;
pub use types::{Answer, QueryOutcome, QueryRequest, QueryStage};
