//! Extract command implementation.

use crate::backend::{rebuild_from_store, Context};
use crate::cli::ExtractArgs;
use crate::error::Result;
use crate::output::Formatter;
use credence_domain::traits::LlmProvider;
use credence_extractor::ExtractionReport;

/// Execute the extract command.
pub async fn execute_extract<L: LlmProvider>(
    args: ExtractArgs,
    ctx: &Context<L>,
    formatter: &Formatter,
) -> Result<ExtractionReport> {
    let report = ctx
        .extractor()
        .extract_file(&args.path, args.line_id.as_deref())
        .await?;
    println!("{}", formatter.format_extraction(&report));

    if !args.no_reindex && !report.claims_created.is_empty() {
        let count = rebuild_from_store(&ctx.index, &ctx.store).await?;
        println!(
            "{}",
            formatter.info(&format!("Reindexed {} claim(s) into the {}", count, ctx.index.label()))
        );
    }

    Ok(report)
}
