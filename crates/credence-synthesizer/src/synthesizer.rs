//! Core Synthesizer implementation

use crate::{SynthesisError, SynthesisPrompt, SynthesizerConfig};
use credence_domain::traits::LlmProvider;
use credence_domain::GroundingClaim;
use std::sync::Arc;
use tokio::time::timeout;
use tracing::{debug, info};

/// Answers a question from a fixed set of grounding claims
pub struct Synthesizer<L: LlmProvider> {
    llm: Arc<L>,
    config: SynthesizerConfig,
}

impl<L: LlmProvider> Synthesizer<L> {
    /// Create a new Synthesizer
    pub fn new(llm: Arc<L>, config: SynthesizerConfig) -> Self {
        Self { llm, config }
    }

    /// Active configuration
    pub fn config(&self) -> &SynthesizerConfig {
        &self.config
    }

    /// Generate an answer to `query` using only `claims`
    ///
    /// Exactly one generation call is made. The text is returned untouched.
    pub async fn synthesize(
        &self,
        query: &str,
        claims: &[GroundingClaim],
    ) -> Result<String, SynthesisError> {
        if claims.is_empty() {
            return Err(SynthesisError::NoClaims);
        }

        let prompt = SynthesisPrompt::new(query, claims).build();
        debug!(
            "Synthesis prompt: {} chars, {} claim(s)",
            prompt.len(),
            claims.len()
        );

        let answer = timeout(self.config.generation_timeout(), self.llm.generate(&prompt))
            .await
            .map_err(|_| SynthesisError::Timeout(self.config.generation_timeout_secs))?
            .map_err(|e| SynthesisError::Generation(e.to_string()))?;

        if answer.trim().is_empty() {
            return Err(SynthesisError::EmptyResponse);
        }

        info!("Synthesized answer of {} chars", answer.len());
        Ok(answer)
    }
}
