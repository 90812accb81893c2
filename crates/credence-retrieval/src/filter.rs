//! Status filtering of retrieval candidates
//!
//! Narrows ranked candidates to the claims whose reviewed status matches a
//! filter. The retriever's ranking is kept as is; nothing is re-sorted.

use credence_domain::traits::ClaimStore;
use credence_domain::{GroundingClaim, RetrievalHit, StatusFilter};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Result of filtering candidates
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterOutcome {
    /// At least one candidate survived, in retriever order
    Eligible(Vec<GroundingClaim>),

    /// No candidate matched the filter
    NoEligibleContext,
}

impl FilterOutcome {
    /// The surviving claims, empty for [`FilterOutcome::NoEligibleContext`]
    pub fn into_claims(self) -> Vec<GroundingClaim> {
        match self {
            FilterOutcome::Eligible(claims) => claims,
            FilterOutcome::NoEligibleContext => Vec::new(),
        }
    }
}

/// Keep the candidates whose claim currently matches `filter`
///
/// Candidates unknown to the store are dropped, as are repeated ids after
/// their first occurrence.
///
/// # Examples
///
/// ```
/// use credence_domain::traits::ClaimStore;
/// use credence_domain::{RetrievalHit, StatusFilter};
/// use credence_retrieval::{filter_candidates, FilterOutcome};
/// use credence_store::SqliteStore;
///
/// let store = SqliteStore::in_memory().unwrap();
/// let a = store.create("l", "A", "s").unwrap();
/// let b = store.create("l", "B", "s").unwrap();
/// store.promote(b).unwrap();
///
/// let hits = vec![
///     RetrievalHit { claim_id: a, score: 0.9 },
///     RetrievalHit { claim_id: b, score: 0.8 },
/// ];
/// let outcome = filter_candidates(&store, &hits, StatusFilter::Promoted).unwrap();
/// match outcome {
///     FilterOutcome::Eligible(claims) => assert_eq!(claims[0].claim_id, b),
///     FilterOutcome::NoEligibleContext => unreachable!(),
/// }
/// ```
pub fn filter_candidates<S: ClaimStore>(
    store: &S,
    hits: &[RetrievalHit],
    filter: StatusFilter,
) -> Result<FilterOutcome, S::Error> {
    if hits.is_empty() {
        return Ok(FilterOutcome::NoEligibleContext);
    }

    let eligible: HashMap<_, _> = store
        .get_by_status(filter)?
        .into_iter()
        .map(|claim| (claim.id, claim))
        .collect();

    let mut seen = HashSet::new();
    let claims: Vec<GroundingClaim> = hits
        .iter()
        .filter(|hit| seen.insert(hit.claim_id))
        .filter_map(|hit| eligible.get(&hit.claim_id))
        .map(|claim| claim.to_grounding())
        .collect();

    debug!(
        "{} of {} candidate(s) match status '{}'",
        claims.len(),
        hits.len(),
        filter
    );

    if claims.is_empty() {
        Ok(FilterOutcome::NoEligibleContext)
    } else {
        Ok(FilterOutcome::Eligible(claims))
    }
}
