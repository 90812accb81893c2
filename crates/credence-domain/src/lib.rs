//! Credence Domain Layer
//!
//! Core data model for the claim corpus and the trait boundaries every other
//! crate depends on. Like the rest of the domain layer it carries no
//! third-party runtime dependencies.
//!
//! ## Key Concepts
//!
//! - **Claim**: an atomic, reviewable assertion with provenance
//! - **Line**: a grouping of claims that are mutually exclusive alternatives
//! - **Status**: the reviewed belief state (`unreviewed | promoted | demoted`)
//! - **Verdict**: an append-only audit entry recording a human judgment
//! - **Grounding set**: the claims handed to the generation service
//!
//! ## Architecture
//!
//! - Pure data types and parsing only
//! - Storage, retrieval and generation live behind the traits in [`traits`]

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod claim;
pub mod status;
pub mod traits;
pub mod verdict;

// Re-exports for convenience
pub use claim::{Claim, ClaimId, GroundingClaim, IndexedClaim};
pub use status::{ClaimStatus, ParseStatusError, StatusFilter};
pub use traits::RetrievalHit;
pub use verdict::{ExclusivePromotion, VerdictEntry, VerdictId, VerdictValue};
