//! Configuration for review transitions

use crate::BeliefError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Exclusivity policy applied when a claim is promoted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewMode {
    /// Promoting a claim demotes every other claim on its line
    ExclusiveLine,
    /// Promote and demote touch only the target claim
    Independent,
}

impl ReviewMode {
    /// Human readable name
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewMode::ExclusiveLine => "exclusive-line",
            ReviewMode::Independent => "independent",
        }
    }
}

impl fmt::Display for ReviewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReviewMode {
    type Err = BeliefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "exclusive" | "exclusive-line" => Ok(ReviewMode::ExclusiveLine),
            "independent" => Ok(ReviewMode::Independent),
            other => Err(BeliefError::Config(format!("Unknown review mode: {}", other))),
        }
    }
}

/// Configuration for the belief controller
///
/// # Examples
///
/// ```
/// use credence_belief::{BeliefConfig, ReviewMode};
///
/// // Default: independent promotions
/// let config = BeliefConfig::default();
/// assert_eq!(config.mode(), ReviewMode::Independent);
///
/// // One winner per line
/// let config = BeliefConfig::exclusive();
/// assert_eq!(config.mode(), ReviewMode::ExclusiveLine);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeliefConfig {
    /// Demote the rest of a line whenever one of its claims is promoted
    /// Default: false
    #[serde(default)]
    pub exclusive_line_mode: bool,
}

impl BeliefConfig {
    /// Exclusive-line configuration
    pub fn exclusive() -> Self {
        Self {
            exclusive_line_mode: true,
        }
    }

    /// Independent configuration
    pub fn independent() -> Self {
        Self {
            exclusive_line_mode: false,
        }
    }

    /// Build a configuration from a mode
    pub fn with_mode(mode: ReviewMode) -> Self {
        Self {
            exclusive_line_mode: mode == ReviewMode::ExclusiveLine,
        }
    }

    /// The policy this configuration selects
    pub fn mode(&self) -> ReviewMode {
        if self.exclusive_line_mode {
            ReviewMode::ExclusiveLine
        } else {
            ReviewMode::Independent
        }
    }

    /// Parse from a TOML document
    pub fn from_toml(s: &str) -> Result<Self, BeliefError> {
        toml::from_str(s).map_err(|e| BeliefError::Config(e.to_string()))
    }

    /// Serialize to a TOML document
    pub fn to_toml(&self) -> Result<String, BeliefError> {
        toml::to_string(self).map_err(|e| BeliefError::Config(e.to_string()))
    }
}
