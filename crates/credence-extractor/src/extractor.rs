//! Core Extractor implementation

use crate::chunking::RecursiveChunker;
use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::parser::parse_llm_response;
use crate::prompt::ExtractionPrompt;
use crate::reader::{is_chunks_file, load_chunks, read_document, source_ref_for};
use crate::types::{ChunkFailure, ExtractedClaim, ExtractionReport};
use credence_domain::traits::{ClaimStore, LlmProvider};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Turns text chunks into unreviewed claims in the store
pub struct Extractor<L, S>
where
    L: LlmProvider,
    S: ClaimStore,
{
    llm: Arc<L>,
    store: Arc<S>,
    config: ExtractorConfig,
}

impl<L, S> Extractor<L, S>
where
    L: LlmProvider,
    S: ClaimStore,
{
    /// Create a new Extractor
    pub fn new(llm: Arc<L>, store: Arc<S>, config: ExtractorConfig) -> Self {
        Self { llm, store, config }
    }

    /// Active configuration
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extract claims from one chunk without touching the store
    ///
    /// Malformed output surfaces as [`ExtractorError::Parse`]; callers that
    /// process a whole document skip such chunks.
    pub async fn extract_chunk(&self, chunk: &str) -> Result<Vec<ExtractedClaim>, ExtractorError> {
        let prompt = ExtractionPrompt::new(chunk).build();
        debug!("Extraction prompt: {} chars", prompt.len());

        let response = timeout(self.config.extraction_timeout(), self.llm.generate(&prompt))
            .await
            .map_err(|_| ExtractorError::Timeout(self.config.extraction_timeout_secs))?
            .map_err(|e| ExtractorError::Llm(e.to_string()))?;

        debug!("Extraction response: {} chars", response.len());
        parse_llm_response(&response)
    }

    /// Extract claims from ordered chunks and insert them
    ///
    /// Every created claim carries `source_ref` and the given line (or the
    /// configured default). Chunks with unreadable output are recorded in the
    /// report and skipped. A service failure or timeout aborts the run before
    /// anything is inserted.
    pub async fn extract_chunks(
        &self,
        chunks: &[String],
        source_ref: &str,
        line_id: Option<&str>,
    ) -> Result<ExtractionReport, ExtractorError> {
        let start = Instant::now();
        let line_id = self.resolve_line_id(line_id)?;

        info!(
            "Extracting claims from {} chunk(s) of '{}' into line '{}'",
            chunks.len(),
            source_ref,
            line_id
        );

        let mut extracted = Vec::new();
        let mut failures = Vec::new();

        for (idx, chunk) in chunks.iter().enumerate() {
            debug!("Processing chunk {}/{}", idx + 1, chunks.len());

            match self.extract_chunk(chunk).await {
                Ok(claims) => extracted.extend(claims),
                Err(ExtractorError::Parse(reason)) => {
                    warn!("Skipping chunk {} of '{}': {}", idx, source_ref, reason);
                    failures.push(ChunkFailure {
                        chunk_index: idx,
                        reason,
                    });
                }
                Err(e) => return Err(e),
            }
        }

        let texts: Vec<String> = extracted.into_iter().map(|claim| claim.claim_text).collect();
        let claims_created = self
            .store
            .create_many(&line_id, &texts, source_ref)
            .map_err(|e| ExtractorError::Store(e.to_string()))?;

        let processing_time_ms = start.elapsed().as_millis() as u64;

        info!(
            "Extraction complete: {} claim(s) created, {} chunk(s) skipped in {}ms",
            claims_created.len(),
            failures.len(),
            processing_time_ms
        );

        Ok(ExtractionReport {
            source_ref: source_ref.to_string(),
            line_id,
            chunks_processed: chunks.len(),
            claims_created,
            failures,
            processing_time_ms,
        })
    }

    /// Chunk `text` with the configured sizes and extract from the chunks
    pub async fn extract_text(
        &self,
        text: &str,
        source_ref: &str,
        line_id: Option<&str>,
    ) -> Result<ExtractionReport, ExtractorError> {
        let chunks = RecursiveChunker::new(self.config.chunk_size, self.config.chunk_overlap)
            .split(text);
        self.extract_chunks(&chunks, source_ref, line_id).await
    }

    /// Extract from a document or from a `*_chunks.json` file
    ///
    /// The file name becomes the `source_ref` of every created claim.
    pub async fn extract_file(
        &self,
        path: &Path,
        line_id: Option<&str>,
    ) -> Result<ExtractionReport, ExtractorError> {
        let source_ref = source_ref_for(path);

        if is_chunks_file(path) {
            let chunks = load_chunks(path)?;
            self.extract_chunks(&chunks, &source_ref, line_id).await
        } else {
            let text = read_document(path)?;
            self.extract_text(&text, &source_ref, line_id).await
        }
    }

    fn resolve_line_id(&self, line_id: Option<&str>) -> Result<String, ExtractorError> {
        match line_id {
            Some(line) if line.trim().is_empty() => {
                Err(ExtractorError::Config("line_id cannot be empty".to_string()))
            }
            Some(line) => Ok(line.trim().to_string()),
            None => Ok(self.config.default_line_id.clone()),
        }
    }
}
