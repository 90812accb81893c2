//! Core Orchestrator implementation

use crate::config::OrchestratorConfig;
use crate::error::OrchestratorError;
use crate::types::{Answer, QueryOutcome, QueryRequest, QueryStage};
use credence_domain::traits::{ClaimStore, LlmProvider, Retriever};
use credence_domain::{GroundingClaim, RetrievalHit};
use credence_retrieval::{filter_candidates, FilterOutcome};
use credence_synthesizer::Synthesizer;
use std::sync::Arc;
use tokio::time::{sleep, timeout};
use tracing::{debug, info, warn};

/// Runs `Search → Filter → Synthesize → Done | Empty` for each query
///
/// Holds no per-query state, so one instance can serve concurrent queries.
pub struct Orchestrator<R, S, L>
where
    R: Retriever,
    S: ClaimStore,
    L: LlmProvider,
{
    retriever: Arc<R>,
    store: Arc<S>,
    synthesizer: Synthesizer<L>,
    config: OrchestratorConfig,
}

impl<R, S, L> Orchestrator<R, S, L>
where
    R: Retriever,
    S: ClaimStore,
    L: LlmProvider,
{
    /// Create a new Orchestrator
    pub fn new(
        retriever: Arc<R>,
        store: Arc<S>,
        synthesizer: Synthesizer<L>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            retriever,
            store,
            synthesizer,
            config,
        }
    }

    /// Active configuration
    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Answer one query
    ///
    /// Returns [`QueryOutcome::Empty`] when no candidate has the requested
    /// status. A retrieval failure ends the query immediately. A synthesis
    /// failure returns [`OrchestratorError::Generation`] with the filtered
    /// claims, which [`Orchestrator::resynthesize`] accepts.
    pub async fn query(&self, request: &QueryRequest) -> Result<QueryOutcome, OrchestratorError> {
        let top_k = self.validate(request)?;

        debug!("stage={} top_k={}", QueryStage::Search, top_k);
        let hits = self.search(&request.query, top_k).await?;

        debug!("stage={} candidates={}", QueryStage::Filter, hits.len());
        let claims = match filter_candidates(self.store.as_ref(), &hits, request.status)
            .map_err(|e| OrchestratorError::Persistence(e.to_string()))?
        {
            FilterOutcome::Eligible(claims) => claims,
            FilterOutcome::NoEligibleContext => {
                debug!("stage={}", QueryStage::Empty);
                info!(
                    "No {} claims among {} candidate(s)",
                    request.status,
                    hits.len()
                );
                return Ok(QueryOutcome::Empty);
            }
        };

        let answer = self.resynthesize(&request.query, claims).await?;
        Ok(QueryOutcome::Answered(answer))
    }

    /// Run only the synthesis stage on claims from an earlier query
    pub async fn resynthesize(
        &self,
        query: &str,
        claims: Vec<GroundingClaim>,
    ) -> Result<Answer, OrchestratorError> {
        debug!("stage={} claims={}", QueryStage::Synthesize, claims.len());

        let mut retry = 0;
        let answer = loop {
            match self.synthesizer.synthesize(query, &claims).await {
                Ok(answer) => break answer,
                Err(e) if retry < self.config.synthesis_retries => {
                    let delay = self.config.backoff_for(retry);
                    warn!(
                        "Synthesis attempt {} failed, retrying in {:?}: {}",
                        retry + 1,
                        delay,
                        e
                    );
                    sleep(delay).await;
                    retry += 1;
                }
                Err(e) => {
                    return Err(OrchestratorError::Generation {
                        message: e.to_string(),
                        claims,
                    })
                }
            }
        };

        debug!("stage={}", QueryStage::Done);
        info!(
            "Answered from {} claim(s) after {} attempt(s)",
            claims.len(),
            retry + 1
        );

        Ok(Answer {
            answer,
            claims_used: claims,
        })
    }

    fn validate(&self, request: &QueryRequest) -> Result<usize, OrchestratorError> {
        if request.query.trim().is_empty() {
            return Err(OrchestratorError::InvalidRequest(
                "query cannot be empty".to_string(),
            ));
        }
        match request.top_k.unwrap_or(self.config.default_top_k) {
            0 => Err(OrchestratorError::InvalidRequest(
                "top_k must be a positive integer".to_string(),
            )),
            top_k => Ok(top_k),
        }
    }

    async fn search(&self, query: &str, top_k: usize) -> Result<Vec<RetrievalHit>, OrchestratorError> {
        let hits = timeout(
            self.config.retrieval_timeout(),
            self.retriever.retrieve(query, top_k),
        )
        .await
        .map_err(|_| {
            OrchestratorError::Retrieval(format!(
                "timed out after {}s",
                self.config.retrieval_timeout_secs
            ))
        })?
        .map_err(|e| OrchestratorError::Retrieval(e.to_string()))?;

        Ok(hits)
    }
}
