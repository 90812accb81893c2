//! Ingest command implementation.

use crate::backend::{rebuild_from_store, Context};
use crate::cli::IngestArgs;
use crate::error::Result;
use crate::output::Formatter;
use credence_domain::traits::LlmProvider;
use credence_extractor::IngestOutcome;

/// Execute the ingest command.
///
/// With `--extract` the chunks go straight to the extractor and the index is
/// rebuilt afterwards, all in this process.
pub async fn execute_ingest<L: LlmProvider>(
    args: IngestArgs,
    ctx: &Context<L>,
    formatter: &Formatter,
) -> Result<IngestOutcome> {
    let data_dir = args
        .data_dir
        .clone()
        .unwrap_or_else(|| ctx.config.data_dir.clone());

    let outcome = ctx.ingestor().ingest(&args.path, &data_dir).await?;
    println!("{}", formatter.format_ingest(&outcome));

    if args.extract {
        let report = ctx
            .extractor()
            .extract_chunks(&outcome.chunks, &outcome.source_ref, args.line_id.as_deref())
            .await?;
        println!("{}", formatter.format_extraction(&report));

        let count = rebuild_from_store(&ctx.index, &ctx.store).await?;
        println!(
            "{}",
            formatter.info(&format!("Reindexed {} claim(s) into the {}", count, ctx.index.label()))
        );
    }

    Ok(outcome)
}
