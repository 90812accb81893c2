//! Document ingestion: read, chunk, describe, write artefacts

use crate::artifacts::write_artifacts;
use crate::chunking::RecursiveChunker;
use crate::config::ExtractorConfig;
use crate::describe::DocumentDescriber;
use crate::error::ExtractorError;
use crate::reader::{read_document, source_ref_for};
use crate::types::IngestOutcome;
use credence_domain::traits::LlmProvider;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Prepares documents for extraction
pub struct Ingestor<L: LlmProvider> {
    describer: DocumentDescriber<L>,
    chunker: RecursiveChunker,
}

impl<L: LlmProvider> Ingestor<L> {
    /// Create an Ingestor sharing the extractor's configuration
    pub fn new(llm: Arc<L>, config: &ExtractorConfig) -> Self {
        Self {
            describer: DocumentDescriber::new(llm, config),
            chunker: RecursiveChunker::new(config.chunk_size, config.chunk_overlap),
        }
    }

    /// Ingest `path`, writing its chunk and metadata files into `data_dir`
    pub async fn ingest(&self, path: &Path, data_dir: &Path) -> Result<IngestOutcome, ExtractorError> {
        let text = read_document(path)?;
        let source_ref = source_ref_for(path);
        let stem = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| source_ref.clone());

        let chunks = self.chunker.split(&text);
        info!("Split '{}' into {} chunk(s)", source_ref, chunks.len());

        let metadata = self.describer.describe(&text, &stem).await;
        let artifacts = write_artifacts(data_dir, &metadata, &chunks)?;

        info!(
            "Ingested '{}' as '{}' ({})",
            source_ref,
            metadata.title,
            artifacts.chunks_path.display()
        );

        Ok(IngestOutcome {
            source_ref,
            metadata,
            chunks,
            artifacts,
        })
    }
}
