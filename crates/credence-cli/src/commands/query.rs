//! Query command implementation.

use crate::backend::Context;
use crate::cli::QueryArgs;
use crate::error::Result;
use crate::output::Formatter;
use credence_domain::traits::LlmProvider;
use credence_domain::StatusFilter;
use credence_orchestrator::{QueryOutcome, QueryRequest};

/// Execute the query command.
pub async fn execute_query<L: LlmProvider>(
    args: QueryArgs,
    ctx: &Context<L>,
    formatter: &Formatter,
) -> Result<()> {
    let status: StatusFilter = args.status.into();
    let mut request = QueryRequest::new(args.query).with_status(status);
    if let Some(top_k) = args.top_k {
        request = request.with_top_k(top_k);
    }

    ctx.index.prepare(&ctx.store).await?;

    match ctx.orchestrator().query(&request).await? {
        QueryOutcome::Answered(answer) => println!("{}", formatter.format_answer(&answer)?),
        QueryOutcome::Empty => println!("{}", formatter.no_eligible_claims(status.as_str())),
    }

    Ok(())
}
