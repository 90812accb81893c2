//! Verdicts: the append-only audit trail of human judgments

use crate::claim::{Claim, ClaimId};
use std::fmt;
use std::str::FromStr;

/// Store-assigned identifier of a verdict entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VerdictId(i64);

impl VerdictId {
    /// Wrap a raw row id
    pub fn from_value(value: i64) -> Self {
        Self(value)
    }

    /// Get the raw row id
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for VerdictId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A reviewer's judgment about a claim's truth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VerdictValue {
    /// The claim holds
    True,
    /// The claim does not hold
    False,
    /// The reviewer could not decide
    Unsure,
}

impl VerdictValue {
    /// Storage form
    pub fn as_str(&self) -> &'static str {
        match self {
            VerdictValue::True => "true",
            VerdictValue::False => "false",
            VerdictValue::Unsure => "unsure",
        }
    }
}

impl fmt::Display for VerdictValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VerdictValue {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "true" => Ok(VerdictValue::True),
            "false" => Ok(VerdictValue::False),
            "unsure" => Ok(VerdictValue::Unsure),
            other => Err(format!("Unknown verdict: {}", other)),
        }
    }
}

/// One row of a line's verdict history, joined with the claim text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerdictEntry {
    /// Identifier of the verdict row
    pub verdict_id: VerdictId,

    /// Claim the verdict was recorded against
    pub claim_id: ClaimId,

    /// Text of that claim at the time of reading
    pub claim_text: String,

    /// The judgment
    pub verdict: VerdictValue,

    /// When it was recorded, milliseconds since the Unix epoch
    pub timestamp: u64,
}

/// Result of promoting a claim while demoting the rest of its line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusivePromotion {
    /// The promoted claim after the transition
    pub promoted: Claim,

    /// Siblings demoted in the same transaction, ascending by id
    pub demoted: Vec<ClaimId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_parsing() {
        assert_eq!("true".parse::<VerdictValue>().unwrap(), VerdictValue::True);
        assert_eq!("FALSE".parse::<VerdictValue>().unwrap(), VerdictValue::False);
        assert_eq!("unsure".parse::<VerdictValue>().unwrap(), VerdictValue::Unsure);
        assert!("maybe".parse::<VerdictValue>().is_err());
    }

    #[test]
    fn test_verdict_display() {
        assert_eq!(VerdictValue::Unsure.to_string(), "unsure");
    }
}
