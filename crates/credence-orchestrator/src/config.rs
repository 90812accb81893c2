//! Configuration for query orchestration

use crate::error::OrchestratorError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the query pipeline
///
/// # Examples
///
/// ```
/// use credence_orchestrator::OrchestratorConfig;
///
/// let config = OrchestratorConfig::default();
/// assert_eq!(config.default_top_k, 5);
/// assert_eq!(config.synthesis_retries, 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Candidates requested from the retriever when a query names no count
    pub default_top_k: usize,

    /// Upper bound on one retrieval call (seconds)
    pub retrieval_timeout_secs: u64,

    /// Extra synthesis attempts after a failure; retrieval is never retried
    #[serde(default)]
    pub synthesis_retries: u32,

    /// Delay before the first synthesis retry, doubled for each further one
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

fn default_retry_backoff_ms() -> u64 {
    500
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            default_top_k: 5,
            retrieval_timeout_secs: 30,
            synthesis_retries: 0,
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

impl OrchestratorConfig {
    /// Get the retrieval timeout as a Duration
    pub fn retrieval_timeout(&self) -> Duration {
        Duration::from_secs(self.retrieval_timeout_secs)
    }

    /// Delay before synthesis retry number `retry` (zero-based)
    pub fn backoff_for(&self, retry: u32) -> Duration {
        let factor = 1u64.checked_shl(retry).unwrap_or(u64::MAX);
        Duration::from_millis(self.retry_backoff_ms.saturating_mul(factor))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), OrchestratorError> {
        if self.default_top_k == 0 {
            return Err(OrchestratorError::Config(
                "default_top_k must be greater than 0".to_string(),
            ));
        }
        if self.retrieval_timeout_secs == 0 {
            return Err(OrchestratorError::Config(
                "retrieval_timeout_secs must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, OrchestratorError> {
        toml::from_str(toml_str)
            .map_err(|e| OrchestratorError::Config(format!("Failed to parse TOML: {}", e)))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, OrchestratorError> {
        toml::to_string_pretty(self)
            .map_err(|e| OrchestratorError::Config(format!("Failed to serialize to TOML: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(OrchestratorConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_top_k_invalid() {
        let config = OrchestratorConfig {
            default_top_k: 0,
            ..OrchestratorConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_backoff_doubles() {
        let config = OrchestratorConfig {
            retry_backoff_ms: 100,
            ..OrchestratorConfig::default()
        };
        assert_eq!(config.backoff_for(0), Duration::from_millis(100));
        assert_eq!(config.backoff_for(1), Duration::from_millis(200));
        assert_eq!(config.backoff_for(3), Duration::from_millis(800));
        assert_eq!(config.backoff_for(200), Duration::from_millis(u64::MAX));
    }

    #[test]
    fn test_toml_defaults_for_retry_policy() {
        let config =
            OrchestratorConfig::from_toml("default_top_k = 3\nretrieval_timeout_secs = 10\n")
                .unwrap();
        assert_eq!(config.default_top_k, 3);
        assert_eq!(config.synthesis_retries, 0);
        assert_eq!(config.retry_backoff_ms, 500);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = OrchestratorConfig {
            synthesis_retries: 2,
            ..OrchestratorConfig::default()
        };
        let parsed = OrchestratorConfig::from_toml(&config.to_toml().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }
}
