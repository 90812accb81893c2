//! Belief states and the filters applied over them

use std::fmt;
use std::str::FromStr;

/// Error returned when a status or filter string is not recognised
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStatusError(pub String);

impl fmt::Display for ParseStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown status: {}", self.0)
    }
}

impl std::error::Error for ParseStatusError {}

/// Reviewed belief state of a claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClaimStatus {
    /// Never reviewed; the state every claim starts in
    Unreviewed,
    /// Accepted by a reviewer
    Promoted,
    /// Rejected by a reviewer
    Demoted,
}

impl ClaimStatus {
    /// Storage form
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimStatus::Unreviewed => "unreviewed",
            ClaimStatus::Promoted => "promoted",
            ClaimStatus::Demoted => "demoted",
        }
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClaimStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "unreviewed" => Ok(ClaimStatus::Unreviewed),
            "promoted" => Ok(ClaimStatus::Promoted),
            "demoted" => Ok(ClaimStatus::Demoted),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

/// Which claims a read should return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StatusFilter {
    /// Only promoted claims; the grounding default
    #[default]
    Promoted,
    /// Only demoted claims
    Demoted,
    /// Only unreviewed claims
    Unreviewed,
    /// Every claim regardless of status
    All,
}

impl StatusFilter {
    /// The single status this filter selects, or `None` for [`StatusFilter::All`]
    pub fn status(&self) -> Option<ClaimStatus> {
        match self {
            StatusFilter::Promoted => Some(ClaimStatus::Promoted),
            StatusFilter::Demoted => Some(ClaimStatus::Demoted),
            StatusFilter::Unreviewed => Some(ClaimStatus::Unreviewed),
            StatusFilter::All => None,
        }
    }

    /// Whether a claim with `status` passes this filter
    pub fn matches(&self, status: ClaimStatus) -> bool {
        self.status().is_none_or(|wanted| wanted == status)
    }

    /// Textual form
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            other => other.status().map(|s| s.as_str()).unwrap_or("all"),
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusFilter {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(StatusFilter::All);
        }
        Ok(match s.parse::<ClaimStatus>()? {
            ClaimStatus::Promoted => StatusFilter::Promoted,
            ClaimStatus::Demoted => StatusFilter::Demoted,
            ClaimStatus::Unreviewed => StatusFilter::Unreviewed,
        })
    }
}

impl From<ClaimStatus> for StatusFilter {
    fn from(status: ClaimStatus) -> Self {
        match status {
            ClaimStatus::Promoted => StatusFilter::Promoted,
            ClaimStatus::Demoted => StatusFilter::Demoted,
            ClaimStatus::Unreviewed => StatusFilter::Unreviewed,
        }
    }
}
