//! History command implementation.

use crate::backend::Context;
use crate::cli::HistoryArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use credence_domain::traits::{ClaimStore, LlmProvider};

/// Execute the history command.
pub fn execute_history<L: LlmProvider>(
    args: HistoryArgs,
    ctx: &Context<L>,
    formatter: &Formatter,
) -> Result<()> {
    let line_id = args.line_id.trim();
    if line_id.is_empty() {
        return Err(CliError::InvalidInput("line_id cannot be empty".to_string()));
    }

    let entries = ctx.store.get_verdict_history(line_id)?;
    println!("{}", formatter.format_history(line_id, &entries)?);
    Ok(())
}
