//! CLI command definitions and argument parsing.

use clap::{Args, Parser, Subcommand};
use credence_belief::{ReviewAction, ReviewMode};
use credence_domain::{StatusFilter, VerdictValue};
use std::path::PathBuf;

/// Credence CLI - review extracted claims and answer questions from the ones you trust.
#[derive(Debug, Parser)]
#[command(name = "credence")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Claim store location, overriding the configured one
    #[arg(long, global = true, env = "CREDENCE_DB")]
    pub db: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (IDs only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Chunk a document and write its chunk and metadata files
    Ingest(IngestArgs),

    /// Extract claims from a document or a chunks file into the store
    Extract(ExtractArgs),

    /// Promote or demote a claim, optionally logging a verdict
    Verdict(VerdictArgs),

    /// Answer a question from claims with the chosen status
    Query(QueryArgs),

    /// List claims by status
    Claims(ClaimsArgs),

    /// Show the verdict audit trail of a line
    History(HistoryArgs),

    /// Rebuild the semantic index from the store
    Reindex,
}

/// Arguments for the ingest command.
#[derive(Debug, Args)]
pub struct IngestArgs {
    /// Document to ingest (.txt or .md)
    pub path: PathBuf,

    /// Directory for the chunk and metadata files
    #[arg(short, long)]
    pub data_dir: Option<PathBuf>,

    /// Continue with extraction and reindexing
    #[arg(short, long)]
    pub extract: bool,

    /// Line for extracted claims
    #[arg(short, long, requires = "extract")]
    pub line_id: Option<String>,
}

/// Arguments for the extract command.
#[derive(Debug, Args)]
pub struct ExtractArgs {
    /// Document or `*_chunks.json` file
    pub path: PathBuf,

    /// Line for extracted claims
    #[arg(short, long)]
    pub line_id: Option<String>,

    /// Leave the semantic index untouched
    #[arg(long)]
    pub no_reindex: bool,
}

/// Arguments for the verdict command.
#[derive(Debug, Args)]
pub struct VerdictArgs {
    /// Claim to review
    pub claim_id: i64,

    /// Status change to apply
    #[arg(value_enum)]
    pub action: Option<ActionArg>,

    /// Judgment to record in the audit trail
    #[arg(long, value_enum)]
    pub verdict: Option<VerdictArg>,

    /// Demote the rest of the line when promoting
    #[arg(long, conflicts_with = "independent")]
    pub exclusive: bool,

    /// Touch only the target claim
    #[arg(long)]
    pub independent: bool,
}

impl VerdictArgs {
    /// Review mode forced on the command line, if any
    pub fn mode_override(&self) -> Option<ReviewMode> {
        if self.exclusive {
            Some(ReviewMode::ExclusiveLine)
        } else if self.independent {
            Some(ReviewMode::Independent)
        } else {
            None
        }
    }
}

/// Arguments for the query command.
#[derive(Debug, Args)]
pub struct QueryArgs {
    /// Question to answer
    pub query: String,

    /// Claims eligible as grounding
    #[arg(short, long, value_enum, default_value = "promoted")]
    pub status: StatusArg,

    /// Candidates to request from the index
    #[arg(short = 'k', long = "top-k", alias = "top_k")]
    pub top_k: Option<usize>,
}

/// Arguments for the claims command.
#[derive(Debug, Args)]
pub struct ClaimsArgs {
    /// Status to list
    #[arg(short, long, value_enum, default_value = "all")]
    pub status: StatusArg,
}

/// Arguments for the history command.
#[derive(Debug, Args)]
pub struct HistoryArgs {
    /// Line whose verdicts to show
    pub line_id: String,
}

/// Status filter argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum StatusArg {
    /// Promoted claims
    Promoted,
    /// Demoted claims
    Demoted,
    /// Claims nobody has reviewed
    Unreviewed,
    /// Every claim
    All,
}

/// Review action argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ActionArg {
    /// Accept the claim
    Promote,
    /// Reject the claim
    Demote,
}

/// Verdict argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum VerdictArg {
    /// The claim holds
    True,
    /// The claim does not hold
    False,
    /// Undecided
    Unsure,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

impl From<StatusArg> for StatusFilter {
    fn from(status: StatusArg) -> Self {
        match status {
            StatusArg::Promoted => StatusFilter::Promoted,
            StatusArg::Demoted => StatusFilter::Demoted,
            StatusArg::Unreviewed => StatusFilter::Unreviewed,
            StatusArg::All => StatusFilter::All,
        }
    }
}

impl From<ActionArg> for ReviewAction {
    fn from(action: ActionArg) -> Self {
        match action {
            ActionArg::Promote => ReviewAction::Promote,
            ActionArg::Demote => ReviewAction::Demote,
        }
    }
}

impl From<VerdictArg> for VerdictValue {
    fn from(verdict: VerdictArg) -> Self {
        match verdict {
            VerdictArg::True => VerdictValue::True,
            VerdictArg::False => VerdictValue::False,
            VerdictArg::Unsure => VerdictValue::Unsure,
        }
    }
}
