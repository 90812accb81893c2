//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use credence_belief::ReviewOutcome;
use credence_domain::{Claim, VerdictEntry};
use credence_extractor::{ExtractionReport, IngestOutcome};
use credence_orchestrator::Answer;
use colored::*;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

const TEXT_PREVIEW_CHARS: usize = 60;

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format claims output.
    pub fn format_claims(&self, claims: &[Claim]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let rows: Vec<serde_json::Value> = claims.iter().map(claim_json).collect();
                Ok(serde_json::to_string_pretty(&rows)?)
            }
            OutputFormat::Table => Ok(self.format_claims_table(claims)),
            OutputFormat::Quiet => Ok(claims
                .iter()
                .map(|c| c.id.to_string())
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    fn format_claims_table(&self, claims: &[Claim]) -> String {
        if claims.is_empty() {
            return self.colorize("No claims found.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["ID", "Line", "Status", "Score", "Winner", "Source", "Claim"]);

        for claim in claims {
            builder.push_record([
                claim.id.to_string(),
                claim.line_id.clone(),
                claim.status.to_string(),
                claim.belief_score.to_string(),
                if claim.is_current_winner() { "yes" } else { "" }.to_string(),
                claim.source_ref.clone(),
                preview(&claim.claim_text),
            ]);
        }

        render(builder)
    }

    /// Format a line's verdict history.
    pub fn format_history(&self, line_id: &str, entries: &[VerdictEntry]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let rows: Vec<serde_json::Value> = entries
                    .iter()
                    .map(|e| {
                        serde_json::json!({
                            "verdict_id": e.verdict_id.value(),
                            "claim_id": e.claim_id.value(),
                            "claim_text": e.claim_text,
                            "verdict": e.verdict.as_str(),
                            "timestamp": e.timestamp,
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&rows)?)
            }
            OutputFormat::Quiet => Ok(entries
                .iter()
                .map(|e| format!("{} {}", e.claim_id, e.verdict))
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if entries.is_empty() {
                    return Ok(self.colorize(
                        &format!("No verdicts recorded for line '{}'.", line_id),
                        "yellow",
                    ));
                }

                let mut builder = Builder::default();
                builder.push_record(["Verdict ID", "Claim", "Verdict", "Timestamp (ms)", "Text"]);
                for entry in entries {
                    builder.push_record([
                        entry.verdict_id.to_string(),
                        entry.claim_id.to_string(),
                        entry.verdict.to_string(),
                        entry.timestamp.to_string(),
                        preview(&entry.claim_text),
                    ]);
                }
                Ok(render(builder))
            }
        }
    }

    /// Format a synthesized answer with the claims behind it.
    pub fn format_answer(&self, answer: &Answer) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let claims: Vec<serde_json::Value> = answer
                    .claims_used
                    .iter()
                    .map(|c| {
                        serde_json::json!({
                            "claim_id": c.claim_id.value(),
                            "claim_text": c.claim_text,
                            "source_ref": c.source_ref,
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&serde_json::json!({
                    "answer": answer.answer,
                    "claims_used": claims,
                }))?)
            }
            OutputFormat::Quiet => Ok(answer.answer.clone()),
            OutputFormat::Table => {
                let mut out = String::new();
                out.push_str(&self.colorize("--- Synthesized Answer ---", "cyan"));
                out.push_str("\n\n");
                out.push_str(answer.answer.trim());
                out.push_str("\n\n");
                out.push_str(&self.colorize("--- Claims Used ---", "cyan"));
                for claim in &answer.claims_used {
                    out.push_str(&format!(
                        "\n- {} (Source: {})",
                        claim.claim_text, claim.source_ref
                    ));
                }
                Ok(out)
            }
        }
    }

    /// Message for a query that found no eligible claims.
    pub fn no_eligible_claims(&self, status: &str) -> String {
        self.warning(&format!(
            "No {} claims matched the query; nothing to synthesize from.",
            status
        ))
    }

    /// Summarize a review.
    pub fn format_review(&self, outcome: &ReviewOutcome) -> String {
        let claim = &outcome.claim;
        let mut message = format!(
            "Claim {} is now {} (score {}) on line '{}'",
            claim.id, claim.status, claim.belief_score, claim.line_id
        );
        if !outcome.demoted_siblings.is_empty() {
            let ids: Vec<String> = outcome
                .demoted_siblings
                .iter()
                .map(|id| id.to_string())
                .collect();
            message.push_str(&format!("; demoted {}", ids.join(", ")));
        }
        if let Some(verdict) = outcome.verdict {
            message.push_str(&format!("; verdict {} logged", verdict));
        }
        self.success(&message)
    }

    /// Summarize an extraction run.
    pub fn format_extraction(&self, report: &ExtractionReport) -> String {
        let mut out = self.success(&format!(
            "Extracted {} claim(s) from {} chunk(s) of '{}' into line '{}'",
            report.claims_created.len(),
            report.chunks_processed,
            report.source_ref,
            report.line_id
        ));
        for failure in &report.failures {
            out.push('\n');
            out.push_str(&self.warning(&format!(
                "Chunk {} skipped: {}",
                failure.chunk_index, failure.reason
            )));
        }
        out
    }

    /// Summarize an ingestion.
    pub fn format_ingest(&self, outcome: &IngestOutcome) -> String {
        let mut out = self.success(&format!(
            "Ingested '{}' as '{}' ({} chunk(s))",
            outcome.source_ref,
            outcome.metadata.title,
            outcome.chunks.len()
        ));
        out.push('\n');
        out.push_str(&self.info(&format!(
            "Chunks: {}",
            outcome.artifacts.chunks_path.display()
        )));
        out.push('\n');
        out.push_str(&self.info(&format!(
            "Metadata: {}",
            outcome.artifacts.metadata_path.display()
        )));
        out
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}

fn claim_json(claim: &Claim) -> serde_json::Value {
    serde_json::json!({
        "claim_id": claim.id.value(),
        "line_id": claim.line_id,
        "claim_text": claim.claim_text,
        "source_ref": claim.source_ref,
        "belief_score": claim.belief_score,
        "status": claim.status.as_str(),
        "current_winner": claim.is_current_winner(),
        "created_at": claim.created_at,
    })
}

fn preview(text: &str) -> String {
    match text.char_indices().nth(TEXT_PREVIEW_CHARS) {
        Some((idx, _)) => format!("{}…", &text[..idx]),
        None => text.to_string(),
    }
}

fn render(builder: Builder) -> String {
    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));
    table.to_string()
}
