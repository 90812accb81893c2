//! Verdict command implementation.

use crate::backend::Context;
use crate::cli::VerdictArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use credence_belief::BeliefConfig;
use credence_domain::traits::LlmProvider;
use credence_domain::{ClaimId, VerdictValue};

/// Execute the verdict command.
///
/// Applies the status change (if any) before logging the verdict (if any).
pub fn execute_verdict<L: LlmProvider>(
    args: VerdictArgs,
    ctx: &Context<L>,
    formatter: &Formatter,
) -> Result<()> {
    let belief = args
        .mode_override()
        .map(BeliefConfig::with_mode)
        .unwrap_or_else(|| ctx.config.belief());
    let id = ClaimId::from_value(args.claim_id);
    let verdict: Option<VerdictValue> = args.verdict.map(Into::into);

    let mut controller = ctx.controller(belief);

    match (args.action, verdict) {
        (Some(action), verdict) => {
            let outcome = controller.review(id, action.into(), verdict)?;
            println!("{}", formatter.format_review(&outcome));
        }
        (None, Some(verdict)) => {
            let verdict_id = controller.record_verdict(id, verdict)?;
            println!(
                "{}",
                formatter.success(&format!(
                    "Verdict {} '{}' logged for claim {}; status unchanged",
                    verdict_id, verdict, id
                ))
            );
        }
        (None, None) => {
            return Err(CliError::InvalidInput(
                "give an action (promote/demote), a --verdict, or both".to_string(),
            ))
        }
    }

    Ok(())
}
