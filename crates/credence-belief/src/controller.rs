//! Review state machine

use crate::{BeliefConfig, BeliefError, ReviewMetrics, ReviewMode};
use credence_domain::traits::ClaimStore;
use credence_domain::{Claim, ClaimId, VerdictId, VerdictValue};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

/// What a reviewer decided about a claim
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewAction {
    /// Accept the claim
    Promote,
    /// Reject the claim
    Demote,
}

impl fmt::Display for ReviewAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReviewAction::Promote => f.write_str("promote"),
            ReviewAction::Demote => f.write_str("demote"),
        }
    }
}

impl FromStr for ReviewAction {
    type Err = BeliefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "promote" => Ok(ReviewAction::Promote),
            "demote" => Ok(ReviewAction::Demote),
            other => Err(BeliefError::InvalidAction(other.to_string())),
        }
    }
}

/// Result of applying one review
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewOutcome {
    /// The target claim after its transition
    pub claim: Claim,

    /// Siblings demoted alongside the target (exclusive-line promotions only)
    pub demoted_siblings: Vec<ClaimId>,

    /// Verdict logged with the review, if any
    pub verdict: Option<VerdictId>,
}

/// Applies reviewer decisions to the claim store
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use credence_belief::{BeliefConfig, BeliefController};
/// use credence_domain::ClaimId;
/// use credence_store::SqliteStore;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let store = Arc::new(SqliteStore::in_memory()?);
/// let mut controller = BeliefController::new(store, BeliefConfig::default());
///
/// controller.demote(ClaimId::from_value(3))?;
/// # Ok(())
/// # }
/// ```
pub struct BeliefController<S: ClaimStore> {
    store: Arc<S>,
    config: BeliefConfig,
    metrics: ReviewMetrics,
}

impl<S: ClaimStore> BeliefController<S> {
    /// Create a controller over `store`
    pub fn new(store: Arc<S>, config: BeliefConfig) -> Self {
        Self {
            store,
            config,
            metrics: ReviewMetrics::new(),
        }
    }

    /// The active exclusivity policy
    pub fn mode(&self) -> ReviewMode {
        self.config.mode()
    }

    /// Get a reference to the current metrics
    pub fn metrics(&self) -> &ReviewMetrics {
        &self.metrics
    }

    /// Reset metrics counters
    pub fn reset_metrics(&mut self) {
        self.metrics.reset();
    }

    /// Promote a claim under the configured policy
    pub fn promote(&mut self, id: ClaimId) -> Result<ReviewOutcome, BeliefError> {
        let (claim, demoted_siblings) = match self.mode() {
            ReviewMode::ExclusiveLine => {
                let result = self.store.promote_exclusive(id).map_err(BeliefError::store)?;
                (result.promoted, result.demoted)
            }
            ReviewMode::Independent => {
                let claim = self.store.promote(id).map_err(BeliefError::store)?;
                (claim, Vec::new())
            }
        };

        self.metrics.record_promotion(demoted_siblings.len());
        info!(
            "Promoted claim {} on line '{}' ({} mode, score {}, {} sibling(s) demoted)",
            id,
            claim.line_id,
            self.mode(),
            claim.belief_score,
            demoted_siblings.len()
        );

        Ok(ReviewOutcome {
            claim,
            demoted_siblings,
            verdict: None,
        })
    }

    /// Demote a claim; siblings are never touched
    pub fn demote(&mut self, id: ClaimId) -> Result<ReviewOutcome, BeliefError> {
        let claim = self.store.demote(id).map_err(BeliefError::store)?;

        self.metrics.record_demotion();
        info!("Demoted claim {} (score {})", id, claim.belief_score);

        Ok(ReviewOutcome {
            claim,
            demoted_siblings: Vec::new(),
            verdict: None,
        })
    }

    /// Log a verdict without changing status or score
    pub fn record_verdict(
        &mut self,
        id: ClaimId,
        verdict: VerdictValue,
    ) -> Result<VerdictId, BeliefError> {
        let verdict_id = self
            .store
            .record_verdict(id, verdict)
            .map_err(BeliefError::store)?;

        self.metrics.record_verdict(verdict);
        info!("Logged verdict '{}' for claim {}", verdict, id);
        Ok(verdict_id)
    }

    /// Apply a reviewer decision, optionally logging a verdict with it
    ///
    /// The status change is committed first. If the verdict then fails to log,
    /// the error is returned and the status change stands.
    pub fn review(
        &mut self,
        id: ClaimId,
        action: ReviewAction,
        verdict: Option<VerdictValue>,
    ) -> Result<ReviewOutcome, BeliefError> {
        let mut outcome = match action {
            ReviewAction::Promote => self.promote(id)?,
            ReviewAction::Demote => self.demote(id)?,
        };

        if let Some(value) = verdict {
            outcome.verdict = Some(self.record_verdict(id, value)?);
        }

        Ok(outcome)
    }
}
