//! Client for an external semantic index service
//!
//! Wire format (JSON):
//!
//! - `POST {endpoint}/search` with `{"query": "...", "top_k": 5}` answers
//!   `{"results": [{"claim_id": 7, "score": 0.83, ...}, ...]}`
//! - `PUT {endpoint}/claims` with an array of
//!   `{"claim_id", "claim_text", "line_id", "source_ref"}` replaces the whole
//!   collection and answers `{"indexed": n}`
//!
//! Extra payload fields in search results are ignored; only `claim_id` and
//! `score` are used.

use crate::RetrievalError;
use credence_domain::traits::{ClaimIndex, Retriever};
use credence_domain::{ClaimId, IndexedClaim, RetrievalHit};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Default timeout for index requests
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// HTTP-backed retriever and index maintainer
pub struct HttpRetriever {
    endpoint: String,
    timeout_secs: u64,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    top_k: usize,
}

#[derive(Deserialize)]
struct SearchResponse {
    results: Vec<SearchResult>,
}

#[derive(Deserialize)]
struct SearchResult {
    claim_id: i64,
    score: f32,
}

#[derive(Serialize)]
struct IndexPayload<'a> {
    claim_id: i64,
    claim_text: &'a str,
    line_id: &'a str,
    source_ref: &'a str,
}

#[derive(Deserialize)]
struct RebuildResponse {
    indexed: Option<usize>,
}

impl HttpRetriever {
    /// Create a client with the default timeout
    pub fn new(endpoint: impl Into<String>) -> Result<Self, RetrievalError> {
        Self::with_timeout(endpoint, DEFAULT_TIMEOUT_SECS)
    }

    /// Create a client with an explicit per-request timeout
    pub fn with_timeout(endpoint: impl Into<String>, timeout_secs: u64) -> Result<Self, RetrievalError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| RetrievalError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            timeout_secs,
            client,
        })
    }

    /// Base URL of the index service
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn transport_error(&self, e: reqwest::Error) -> RetrievalError {
        if e.is_timeout() {
            RetrievalError::Timeout(self.timeout_secs)
        } else if e.is_decode() {
            RetrievalError::MalformedResponse(e.to_string())
        } else {
            RetrievalError::Unreachable(e.to_string())
        }
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, RetrievalError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| status.to_string());
        Err(RetrievalError::Status {
            status: status.as_u16(),
            message,
        })
    }

    async fn search(&self, query: &str, top_k: usize) -> Result<Vec<RetrievalHit>, RetrievalError> {
        if top_k == 0 {
            return Ok(Vec::new());
        }

        let response = self
            .client
            .post(format!("{}/search", self.endpoint))
            .json(&SearchRequest { query, top_k })
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let body: SearchResponse = Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| self.transport_error(e))?;

        let hits = rank_results(body.results, top_k);
        debug!("Index returned {} hit(s) for top_k={}", hits.len(), top_k);
        Ok(hits)
    }

    async fn replace(&self, claims: &[IndexedClaim]) -> Result<usize, RetrievalError> {
        let payload: Vec<IndexPayload<'_>> = claims
            .iter()
            .map(|claim| IndexPayload {
                claim_id: claim.claim_id.value(),
                claim_text: &claim.claim_text,
                line_id: &claim.line_id,
                source_ref: &claim.source_ref,
            })
            .collect();

        let response = self
            .client
            .put(format!("{}/claims", self.endpoint))
            .json(&payload)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let response = Self::check_status(response).await?;
        // The count is optional in the reply; fall back to what we sent
        let indexed = response
            .json::<RebuildResponse>()
            .await
            .ok()
            .and_then(|body| body.indexed)
            .unwrap_or(claims.len());

        debug!("Index service replaced content with {} claims", indexed);
        Ok(indexed)
    }
}

/// Order hits by descending score and cap them at `top_k`
fn rank_results(results: Vec<SearchResult>, top_k: usize) -> Vec<RetrievalHit> {
    let mut hits: Vec<RetrievalHit> = results
        .into_iter()
        .map(|r| RetrievalHit {
            claim_id: ClaimId::from_value(r.claim_id),
            score: r.score,
        })
        .collect();
    hits.sort_by(|a, b| b.score.total_cmp(&a.score));
    hits.truncate(top_k);
    hits
}

impl Retriever for HttpRetriever {
    type Error = RetrievalError;

    async fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<RetrievalHit>, Self::Error> {
        self.search(query, top_k).await
    }
}

impl ClaimIndex for HttpRetriever {
    type Error = RetrievalError;

    async fn rebuild(&self, claims: Vec<IndexedClaim>) -> Result<usize, Self::Error> {
        self.replace(&claims).await
    }
}
