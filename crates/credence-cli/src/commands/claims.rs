//! Claims command implementation.

use crate::backend::Context;
use crate::cli::ClaimsArgs;
use crate::error::Result;
use crate::output::Formatter;
use credence_domain::traits::{ClaimStore, LlmProvider};

/// Execute the claims command.
pub fn execute_claims<L: LlmProvider>(
    args: ClaimsArgs,
    ctx: &Context<L>,
    formatter: &Formatter,
) -> Result<()> {
    let claims = ctx.store.get_by_status(args.status.into())?;
    println!("{}", formatter.format_claims(&claims)?);
    Ok(())
}
