//! Reindex command implementation.

use crate::backend::{rebuild_from_store, Context};
use crate::error::Result;
use crate::output::Formatter;
use credence_domain::traits::LlmProvider;

/// Execute the reindex command.
pub async fn execute_reindex<L: LlmProvider>(ctx: &Context<L>, formatter: &Formatter) -> Result<()> {
    let count = rebuild_from_store(&ctx.index, &ctx.store).await?;
    println!(
        "{}",
        formatter.success(&format!("Indexed {} claim(s) into the {}", count, ctx.index.label()))
    );
    if !ctx.index.is_persistent() {
        println!(
            "{}",
            formatter.info("No index_endpoint is configured; queries rebuild the in-process index themselves")
        );
    }
    Ok(())
}
