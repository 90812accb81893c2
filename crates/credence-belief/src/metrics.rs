//! Counters for review activity

use credence_domain::VerdictValue;
use std::collections::HashMap;

/// Metrics collected while applying reviews
#[derive(Debug, Clone, Default)]
pub struct ReviewMetrics {
    /// Promotions applied to review targets
    pub promotions: usize,

    /// Demotions applied to review targets
    pub demotions: usize,

    /// Siblings demoted as a side effect of exclusive promotions
    pub siblings_demoted: usize,

    /// Verdicts logged, by value
    pub verdicts: HashMap<VerdictValue, usize>,
}

impl ReviewMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a promotion and how many siblings it displaced
    pub fn record_promotion(&mut self, siblings_demoted: usize) {
        self.promotions += 1;
        self.siblings_demoted += siblings_demoted;
    }

    /// Record a demotion
    pub fn record_demotion(&mut self) {
        self.demotions += 1;
    }

    /// Record a logged verdict
    pub fn record_verdict(&mut self, verdict: VerdictValue) {
        *self.verdicts.entry(verdict).or_insert(0) += 1;
    }

    /// Total verdicts across all values
    pub fn total_verdicts(&self) -> usize {
        self.verdicts.values().sum()
    }

    /// Reset all metrics
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Review Metrics Summary".to_string(),
            "======================".to_string(),
            format!("Promotions: {}", self.promotions),
            format!("Demotions: {}", self.demotions),
            format!("Siblings demoted: {}", self.siblings_demoted),
        ];

        if !self.verdicts.is_empty() {
            lines.push(String::new());
            lines.push("Verdicts:".to_string());
            for value in [VerdictValue::True, VerdictValue::False, VerdictValue::Unsure] {
                if let Some(count) = self.verdicts.get(&value) {
                    lines.push(format!("  {}: {}", value, count));
                }
            }
            lines.push(format!("  Total: {}", self.total_verdicts()));
        }

        lines.join("\n")
    }
}
