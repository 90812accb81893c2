//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the domain and infrastructure.
//! Infrastructure implementations live in other crates.

use crate::{
    Claim, ClaimId, ExclusivePromotion, IndexedClaim, StatusFilter, VerdictEntry, VerdictId,
    VerdictValue,
};
use std::future::Future;

/// Trait for the durable claim record
///
/// Implemented by the infrastructure layer (credence-store).
///
/// Every mutating method is a single transaction: either all of its row
/// changes are visible afterwards or none are. Implementations must be safe
/// to share across threads and must serialize mutations.
pub trait ClaimStore: Send + Sync {
    /// Error type for store operations
    type Error: std::error::Error + Send + Sync + 'static;

    /// Insert a new unreviewed claim with a zero score and return its id
    fn create(&self, line_id: &str, claim_text: &str, source_ref: &str)
        -> Result<ClaimId, Self::Error>;

    /// Insert unreviewed claims sharing a line and source, all or none.
    /// Ids are returned in the order of `claim_texts`.
    fn create_many(
        &self,
        line_id: &str,
        claim_texts: &[String],
        source_ref: &str,
    ) -> Result<Vec<ClaimId>, Self::Error>;

    /// Fetch a single claim
    fn get_claim(&self, id: ClaimId) -> Result<Option<Claim>, Self::Error>;

    /// Mark a claim promoted and add one to its score
    fn promote(&self, id: ClaimId) -> Result<Claim, Self::Error>;

    /// Mark a claim demoted and subtract one from its score
    fn demote(&self, id: ClaimId) -> Result<Claim, Self::Error>;

    /// Demote every other claim on the target's line, then promote the target,
    /// all within one transaction
    fn promote_exclusive(&self, id: ClaimId) -> Result<ExclusivePromotion, Self::Error>;

    /// Append a verdict; never touches status or score
    fn record_verdict(&self, id: ClaimId, verdict: VerdictValue)
        -> Result<VerdictId, Self::Error>;

    /// All claims matching `filter`, ascending by id. Empty when nothing matches.
    fn get_by_status(&self, filter: StatusFilter) -> Result<Vec<Claim>, Self::Error>;

    /// All verdicts for claims on `line_id`, oldest first
    fn get_verdict_history(&self, line_id: &str) -> Result<Vec<VerdictEntry>, Self::Error>;

    /// The line a claim belongs to
    fn get_line_id(&self, id: ClaimId) -> Result<String, Self::Error>;
}

/// One ranked candidate from the semantic index
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievalHit {
    /// Join key into the store
    pub claim_id: ClaimId,

    /// Similarity to the query; higher is closer
    pub score: f32,
}

/// Trait for the semantic index query side
///
/// Results are ordered by descending score and hold at most `top_k` hits.
/// Order among equal scores is unspecified.
pub trait Retriever: Send + Sync {
    /// Error type for retrieval
    type Error: std::error::Error + Send + Sync + 'static;

    /// Return up to `top_k` candidates for `query`
    fn retrieve(
        &self,
        query: &str,
        top_k: usize,
    ) -> impl Future<Output = Result<Vec<RetrievalHit>, Self::Error>> + Send;
}

/// Trait for the semantic index write side
pub trait ClaimIndex: Send + Sync {
    /// Error type for index maintenance
    type Error: std::error::Error + Send + Sync + 'static;

    /// Replace the whole index content with `claims`
    fn rebuild(
        &self,
        claims: Vec<IndexedClaim>,
    ) -> impl Future<Output = Result<usize, Self::Error>> + Send;
}

/// Trait for the text-generation service
///
/// Implemented by the infrastructure layer (credence-llm)
pub trait LlmProvider: Send + Sync {
    /// Error type for LLM operations
    type Error: std::error::Error + Send + Sync + 'static;

    /// Generate a completion for `prompt`
    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String, Self::Error>> + Send;
}
