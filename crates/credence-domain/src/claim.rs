//! Claim module - the unit of review and of grounding

use crate::status::ClaimStatus;
use std::fmt;
use std::str::FromStr;

/// Store-assigned identifier of a claim.
///
/// Ids are allocated by the store on insertion, never reused, and double as
/// the join key into the semantic index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClaimId(i64);

impl ClaimId {
    /// Wrap a raw row id
    ///
    /// # Examples
    ///
    /// ```
    /// use credence_domain::ClaimId;
    ///
    /// let id = ClaimId::from_value(7);
    /// assert_eq!(id.value(), 7);
    /// assert_eq!(id.to_string(), "7");
    /// ```
    pub fn from_value(value: i64) -> Self {
        Self(value)
    }

    /// Get the raw row id
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for ClaimId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ClaimId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|e| format!("Invalid claim id '{}': {}", s, e))
    }
}

/// A claim as held by the store
///
/// `claim_text`, `source_ref`, `line_id` and `created_at` never change after
/// insertion. Only review transitions touch `status` and `belief_score`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claim {
    /// Unique identifier
    pub id: ClaimId,

    /// Grouping key for mutually exclusive alternatives
    pub line_id: String,

    /// The assertion itself
    pub claim_text: String,

    /// Provenance pointer (originating document or file)
    pub source_ref: String,

    /// Running rank: +1 per promotion, -1 per demotion
    pub belief_score: i64,

    /// Reviewed belief state
    pub status: ClaimStatus,

    /// Insertion time, milliseconds since the Unix epoch
    pub created_at: u64,
}

impl Claim {
    /// Whether this claim is the current winner of its line.
    ///
    /// Derived from `status` on every read, so it can never disagree with it.
    pub fn is_current_winner(&self) -> bool {
        self.status == ClaimStatus::Promoted
    }

    /// The two fields a grounding consumer needs, plus the id
    pub fn to_grounding(&self) -> GroundingClaim {
        GroundingClaim {
            claim_id: self.id,
            claim_text: self.claim_text.clone(),
            source_ref: self.source_ref.clone(),
        }
    }

    /// Payload carried by the semantic index
    pub fn to_indexed(&self) -> IndexedClaim {
        IndexedClaim {
            claim_id: self.id,
            claim_text: self.claim_text.clone(),
            line_id: self.line_id.clone(),
            source_ref: self.source_ref.clone(),
        }
    }
}

/// A claim as handed to answer synthesis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroundingClaim {
    /// Identifier of the underlying claim
    pub claim_id: ClaimId,

    /// The assertion text
    pub claim_text: String,

    /// Where the assertion came from
    pub source_ref: String,
}

/// Index payload for one claim
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedClaim {
    /// Join key back into the store
    pub claim_id: ClaimId,

    /// Text that gets embedded
    pub claim_text: String,

    /// Line grouping key
    pub line_id: String,

    /// Provenance pointer
    pub source_ref: String,
}
