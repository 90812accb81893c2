//! Parse LLM output into extracted claims

use crate::error::ExtractorError;
use crate::types::{DocumentMetadata, ExtractedClaim};
use serde_json::Value;
use tracing::warn;

/// Parse an extraction response into claims
///
/// The response must contain a JSON array of objects carrying a non-empty
/// `claim_text`. Any `claim_id` the model invents is ignored. Elements that
/// do not fit are skipped; a response that is not an array at all is an
/// error.
pub fn parse_llm_response(response: &str) -> Result<Vec<ExtractedClaim>, ExtractorError> {
    let json_str = extract_json(response, '[', ']')?;

    let json: Value = serde_json::from_str(&json_str)
        .map_err(|e| ExtractorError::Parse(format!("JSON parse error: {}", e)))?;

    let claims_array = json
        .as_array()
        .ok_or_else(|| ExtractorError::Parse("Expected JSON array".to_string()))?;

    let mut claims = Vec::new();
    for (idx, claim_json) in claims_array.iter().enumerate() {
        match parse_claim_json(claim_json) {
            Ok(claim) => claims.push(claim),
            Err(e) => warn!("Skipping extracted element {}: {}", idx, e),
        }
    }

    Ok(claims)
}

/// Parse a describer response into title and description
pub fn parse_metadata(response: &str) -> Result<DocumentMetadata, ExtractorError> {
    let json_str = extract_json(response, '{', '}')?;
    let metadata: DocumentMetadata = serde_json::from_str(&json_str)
        .map_err(|e| ExtractorError::Parse(format!("JSON parse error: {}", e)))?;

    if metadata.title.trim().is_empty() {
        return Err(ExtractorError::Parse("Empty title".to_string()));
    }
    Ok(metadata)
}

/// Pull the JSON payload out of a response
///
/// Handles markdown code fences and chatter around the payload by slicing
/// from the first `open` to the last `close`.
fn extract_json(response: &str, open: char, close: char) -> Result<String, ExtractorError> {
    let mut trimmed = response.trim();

    if trimmed.starts_with("```") {
        let lines: Vec<&str> = trimmed.lines().collect();
        if lines.len() < 2 {
            return Err(ExtractorError::Parse("Empty code block".to_string()));
        }
        let end = if lines[lines.len() - 1].trim_start().starts_with("```") {
            lines.len() - 1
        } else {
            lines.len()
        };
        return Ok(lines[1..end].join("\n"));
    }

    if !trimmed.starts_with(open) {
        match (trimmed.find(open), trimmed.rfind(close)) {
            (Some(start), Some(end)) if start < end => trimmed = &trimmed[start..=end],
            _ => {
                return Err(ExtractorError::Parse(format!(
                    "No JSON payload found in response of {} chars",
                    response.len()
                )))
            }
        }
    }

    Ok(trimmed.to_string())
}

fn parse_claim_json(json: &Value) -> Result<ExtractedClaim, String> {
    let obj = json
        .as_object()
        .ok_or_else(|| "Claim is not a JSON object".to_string())?;

    let claim_text = obj
        .get("claim_text")
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .ok_or_else(|| "Missing or empty 'claim_text'".to_string())?;

    Ok(ExtractedClaim {
        claim_text: claim_text.to_string(),
    })
}
