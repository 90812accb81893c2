//! Ingestion artefacts on disk

use crate::error::ExtractorError;
use crate::reader::CHUNKS_SUFFIX;
use crate::types::{DocumentMetadata, IngestArtifacts};
use std::path::Path;

/// Make a title safe to use as a file name
///
/// Replaces `\ / : * ? " < > |` with `_`. A title that ends up blank becomes
/// `untitled`.
pub fn sanitize_filename(title: &str) -> String {
    let cleaned: String = title
        .trim()
        .chars()
        .map(|c| match c {
            '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if cleaned.trim().is_empty() {
        "untitled".to_string()
    } else {
        cleaned
    }
}

/// Write `<title>_chunks.json` and `<title>_metadata.json` into `data_dir`
pub fn write_artifacts(
    data_dir: &Path,
    metadata: &DocumentMetadata,
    chunks: &[String],
) -> Result<IngestArtifacts, ExtractorError> {
    std::fs::create_dir_all(data_dir)?;

    let stem = sanitize_filename(&metadata.title);
    let chunks_path = data_dir.join(format!("{}{}", stem, CHUNKS_SUFFIX));
    let metadata_path = data_dir.join(format!("{}_metadata.json", stem));

    let chunks_json = serde_json::to_string_pretty(chunks)
        .map_err(|e| ExtractorError::InvalidFormat(e.to_string()))?;
    let metadata_json = serde_json::to_string_pretty(metadata)
        .map_err(|e| ExtractorError::InvalidFormat(e.to_string()))?;

    std::fs::write(&chunks_path, chunks_json)?;
    std::fs::write(&metadata_path, metadata_json)?;

    Ok(IngestArtifacts {
        chunks_path,
        metadata_path,
    })
}
