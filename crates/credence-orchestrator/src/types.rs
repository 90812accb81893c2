//! Request and result types for a query

use credence_domain::{GroundingClaim, StatusFilter};
use std::fmt;

/// One user question
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    /// The question text
    pub query: String,

    /// Which claims may ground the answer
    pub status: StatusFilter,

    /// Candidates to request; `None` uses the configured default
    pub top_k: Option<usize>,
}

impl QueryRequest {
    /// Query grounded on promoted claims with the default candidate count
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            status: StatusFilter::Promoted,
            top_k: None,
        }
    }

    /// Use a different status filter
    pub fn with_status(mut self, status: StatusFilter) -> Self {
        self.status = status;
        self
    }

    /// Request `top_k` candidates
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = Some(top_k);
        self
    }
}

/// Stages of the per-query state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryStage {
    /// Asking the retriever for ranked candidates
    Search,
    /// Narrowing candidates by reviewed status
    Filter,
    /// Asking the generation service for an answer
    Synthesize,
    /// An answer was produced
    Done,
    /// No candidate survived filtering
    Empty,
}

impl QueryStage {
    /// Whether the query ends in this stage
    pub fn is_terminal(&self) -> bool {
        matches!(self, QueryStage::Done | QueryStage::Empty)
    }

    /// Textual form
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryStage::Search => "search",
            QueryStage::Filter => "filter",
            QueryStage::Synthesize => "synthesize",
            QueryStage::Done => "done",
            QueryStage::Empty => "empty",
        }
    }
}

impl fmt::Display for QueryStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A synthesized answer and the claims it was grounded on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    /// Raw text from the generation service
    pub answer: String,

    /// Grounding claims in retriever order
    pub claims_used: Vec<GroundingClaim>,
}

/// How a successful query ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome {
    /// Reached `Done`
    Answered(Answer),

    /// Reached `Empty`: no claim with the requested status matched
    Empty,
}

impl QueryOutcome {
    /// The terminal stage this outcome corresponds to
    pub fn stage(&self) -> QueryStage {
        match self {
            QueryOutcome::Answered(_) => QueryStage::Done,
            QueryOutcome::Empty => QueryStage::Empty,
        }
    }

    /// The answer, if one was produced
    pub fn answer(&self) -> Option<&Answer> {
        match self {
            QueryOutcome::Answered(answer) => Some(answer),
            QueryOutcome::Empty => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults() {
        let request = QueryRequest::new("Why is the sky blue?");
        assert_eq!(request.status, StatusFilter::Promoted);
        assert_eq!(request.top_k, None);

        let request = request.with_status(StatusFilter::All).with_top_k(3);
        assert_eq!(request.status, StatusFilter::All);
        assert_eq!(request.top_k, Some(3));
    }

    #[test]
    fn test_terminal_stages() {
        assert!(QueryStage::Done.is_terminal());
        assert!(QueryStage::Empty.is_terminal());
        assert!(!QueryStage::Search.is_terminal());
        assert_eq!(QueryOutcome::Empty.stage(), QueryStage::Empty);
        assert!(QueryOutcome::Empty.answer().is_none());
    }
}
