//! Document and chunk-file reading

use crate::error::ExtractorError;
use std::path::Path;

const TEXT_EXTENSIONS: [&str; 4] = ["txt", "text", "md", "markdown"];

/// Suffix of chunk files written by ingestion
pub const CHUNKS_SUFFIX: &str = "_chunks.json";

/// Read a plain-text document
///
/// Text and markdown files are supported. Anything else is reported as
/// [`ExtractorError::UnsupportedFormat`].
pub fn read_document(path: &Path) -> Result<String, ExtractorError> {
    if !path.exists() {
        return Err(ExtractorError::NotFound(path.to_path_buf()));
    }

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .unwrap_or_default();

    if !TEXT_EXTENSIONS.contains(&extension.as_str()) {
        let shown = if extension.is_empty() {
            "(no extension)".to_string()
        } else {
            format!(".{}", extension)
        };
        return Err(ExtractorError::UnsupportedFormat(shown));
    }

    Ok(std::fs::read_to_string(path)?)
}

/// Whether `path` names a chunk file rather than a document
pub fn is_chunks_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// Load a JSON array of chunk strings
pub fn load_chunks(path: &Path) -> Result<Vec<String>, ExtractorError> {
    if !path.exists() {
        return Err(ExtractorError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    serde_json::from_str::<Vec<String>>(&content).map_err(|e| {
        ExtractorError::InvalidFormat(format!(
            "{} is not a JSON array of strings: {}",
            path.display(),
            e
        ))
    })
}

/// File name of `path`, used as a claim's provenance
pub fn source_ref_for(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
