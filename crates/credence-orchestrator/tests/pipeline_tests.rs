//! Query pipeline tests with a scripted retriever and mock generation service

use credence_domain::traits::{ClaimIndex, ClaimStore, Retriever};
use credence_domain::{ClaimId, GroundingClaim, RetrievalHit, StatusFilter};
use credence_llm::MockProvider;
use credence_orchestrator::{
    Orchestrator, OrchestratorConfig, OrchestratorError, QueryOutcome, QueryRequest, QueryStage,
};
use credence_retrieval::{LocalIndex, RetrievalError};
use credence_store::SqliteStore;
use credence_synthesizer::{Synthesizer, SynthesizerConfig};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Retriever returning a fixed ranking, or a fixed failure
#[derive(Default)]
struct ScriptedRetriever {
    hits: Vec<RetrievalHit>,
    failure: Option<String>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    last_top_k: AtomicUsize,
}

impl ScriptedRetriever {
    fn ranking(ids: &[ClaimId]) -> Self {
        let hits = ids
            .iter()
            .enumerate()
            .map(|(rank, id)| RetrievalHit {
                claim_id: *id,
                score: 1.0 - rank as f32 * 0.1,
            })
            .collect();
        Self {
            hits,
            ..Self::default()
        }
    }

    fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::default()
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Retriever for ScriptedRetriever {
    type Error = RetrievalError;

    async fn retrieve(&self, _query: &str, top_k: usize) -> Result<Vec<RetrievalHit>, Self::Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.last_top_k.store(top_k, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(message) = &self.failure {
            return Err(RetrievalError::Unreachable(message.clone()));
        }
        Ok(self.hits.iter().take(top_k).cloned().collect())
    }
}

/// Seven claims on one line; ids are 1..=7
fn seeded_store() -> (Arc<SqliteStore>, Vec<ClaimId>) {
    let store = SqliteStore::in_memory().unwrap();
    let ids = (1..=7)
        .map(|n| {
            store
                .create("boiling", &format!("Claim number {}", n), &format!("doc{}.txt", n))
                .unwrap()
        })
        .collect();
    (Arc::new(store), ids)
}

fn orchestrator(
    retriever: Arc<ScriptedRetriever>,
    store: Arc<SqliteStore>,
    llm: Arc<MockProvider>,
    config: OrchestratorConfig,
) -> Orchestrator<ScriptedRetriever, SqliteStore, MockProvider> {
    let synthesizer = Synthesizer::new(llm, SynthesizerConfig::default());
    Orchestrator::new(retriever, store, synthesizer, config)
}

#[tokio::test]
async fn test_only_promoted_candidate_reaches_synthesis() {
    let (store, ids) = seeded_store();
    let (five, seven) = (ids[4], ids[6]);
    assert_eq!(five.value(), 5);
    assert_eq!(seven.value(), 7);
    store.promote(seven).unwrap();

    let retriever = Arc::new(ScriptedRetriever::ranking(&[five, seven]));
    let llm = Arc::new(MockProvider::new("Claim seven holds [doc7.txt]"));
    let orchestrator = orchestrator(
        retriever,
        Arc::clone(&store),
        Arc::clone(&llm),
        OrchestratorConfig::default(),
    );

    let outcome = orchestrator
        .query(&QueryRequest::new("What does claim seven say?"))
        .await
        .unwrap();

    assert_eq!(outcome.stage(), QueryStage::Done);
    let answer = outcome.answer().unwrap();
    assert_eq!(answer.answer, "Claim seven holds [doc7.txt]");
    assert_eq!(
        answer.claims_used,
        vec![GroundingClaim {
            claim_id: seven,
            claim_text: "Claim number 7".to_string(),
            source_ref: "doc7.txt".to_string(),
        }]
    );

    assert_eq!(llm.call_count(), 1);
    let prompt = llm.last_prompt().unwrap();
    assert!(prompt.contains("Claim number 7"));
    assert!(prompt.contains("doc7.txt"));
    assert!(!prompt.contains("Claim number 5"));
}

#[tokio::test]
async fn test_claims_used_follow_retriever_order() {
    let (store, ids) = seeded_store();
    for id in &ids {
        store.promote(*id).unwrap();
    }

    let ranking = [ids[2], ids[0], ids[1]];
    let retriever = Arc::new(ScriptedRetriever::ranking(&ranking));
    let orchestrator = orchestrator(
        retriever,
        store,
        Arc::new(MockProvider::new("answer")),
        OrchestratorConfig::default(),
    );

    let outcome = orchestrator.query(&QueryRequest::new("q")).await.unwrap();
    let used: Vec<_> = outcome
        .answer()
        .unwrap()
        .claims_used
        .iter()
        .map(|claim| claim.claim_id)
        .collect();
    assert_eq!(used, ranking.to_vec());
}

#[tokio::test]
async fn test_no_matching_status_ends_empty() {
    let (store, ids) = seeded_store();
    store.promote(ids[6]).unwrap();

    let retriever = Arc::new(ScriptedRetriever::ranking(&[ids[4], ids[5]]));
    let llm = Arc::new(MockProvider::new("should not be asked"));
    let orchestrator = orchestrator(
        retriever,
        store,
        Arc::clone(&llm),
        OrchestratorConfig::default(),
    );

    let outcome = orchestrator.query(&QueryRequest::new("q")).await.unwrap();

    assert_eq!(outcome, QueryOutcome::Empty);
    assert_eq!(llm.call_count(), 0);
}

#[tokio::test]
async fn test_empty_index_ends_empty() {
    let (store, _) = seeded_store();
    let llm = Arc::new(MockProvider::default());
    let orchestrator = orchestrator(
        Arc::new(ScriptedRetriever::default()),
        store,
        Arc::clone(&llm),
        OrchestratorConfig::default(),
    );

    let outcome = orchestrator
        .query(&QueryRequest::new("q").with_status(StatusFilter::All))
        .await
        .unwrap();

    assert_eq!(outcome.stage(), QueryStage::Empty);
    assert_eq!(llm.call_count(), 0);
}

#[tokio::test]
async fn test_status_filter_all_admits_unreviewed() {
    let (store, ids) = seeded_store();
    let retriever = Arc::new(ScriptedRetriever::ranking(&[ids[0]]));
    let orchestrator = orchestrator(
        retriever,
        store,
        Arc::new(MockProvider::new("answer")),
        OrchestratorConfig::default(),
    );

    let promoted_only = orchestrator.query(&QueryRequest::new("q")).await.unwrap();
    assert_eq!(promoted_only, QueryOutcome::Empty);

    let all = orchestrator
        .query(&QueryRequest::new("q").with_status(StatusFilter::All))
        .await
        .unwrap();
    assert_eq!(all.answer().unwrap().claims_used.len(), 1);
}

#[tokio::test]
async fn test_retrieval_failure_is_not_retried() {
    let (store, _) = seeded_store();
    let retriever = Arc::new(ScriptedRetriever::failing("connection refused"));
    let llm = Arc::new(MockProvider::default());
    let config = OrchestratorConfig {
        synthesis_retries: 3,
        ..OrchestratorConfig::default()
    };
    let orchestrator = orchestrator(Arc::clone(&retriever), store, Arc::clone(&llm), config);

    let result = orchestrator.query(&QueryRequest::new("q")).await;

    match result {
        Err(OrchestratorError::Retrieval(message)) => assert!(message.contains("connection refused")),
        other => panic!("unexpected: {:?}", other),
    }
    assert_eq!(retriever.calls(), 1);
    assert_eq!(llm.call_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_retrieval_timeout() {
    let (store, ids) = seeded_store();
    let retriever = Arc::new(ScriptedRetriever {
        delay: Some(Duration::from_secs(300)),
        ..ScriptedRetriever::ranking(&[ids[0]])
    });
    let config = OrchestratorConfig {
        retrieval_timeout_secs: 5,
        ..OrchestratorConfig::default()
    };
    let orchestrator = orchestrator(retriever, store, Arc::new(MockProvider::default()), config);

    match orchestrator.query(&QueryRequest::new("q")).await {
        Err(OrchestratorError::Retrieval(message)) => assert!(message.contains("timed out after 5s")),
        other => panic!("unexpected: {:?}", other),
    }
}

#[tokio::test]
async fn test_generation_failure_returns_pending_claims() {
    let (store, ids) = seeded_store();
    store.promote(ids[6]).unwrap();

    let retriever = Arc::new(ScriptedRetriever::ranking(&[ids[4], ids[6]]));
    let llm = Arc::new(MockProvider::new("Recovered answer"));
    llm.push_error("generation service unavailable");
    let orchestrator = orchestrator(
        Arc::clone(&retriever),
        store,
        Arc::clone(&llm),
        OrchestratorConfig::default(),
    );

    let error = orchestrator
        .query(&QueryRequest::new("q"))
        .await
        .unwrap_err();

    let claims = match &error {
        OrchestratorError::Generation { message, claims } => {
            assert!(message.contains("generation service unavailable"));
            claims.clone()
        }
        other => panic!("unexpected: {:?}", other),
    };
    assert_eq!(error.pending_claims().map(|pending| pending.len()), Some(1));
    assert_eq!(claims[0].claim_id, ids[6]);

    // Retry synthesis alone; the retriever is not consulted again
    let answer = orchestrator.resynthesize("q", claims).await.unwrap();
    assert_eq!(answer.answer, "Recovered answer");
    assert_eq!(answer.claims_used[0].claim_id, ids[6]);
    assert_eq!(retriever.calls(), 1);
}

#[tokio::test]
async fn test_blank_answer_is_a_generation_error() {
    let (store, ids) = seeded_store();
    store.promote(ids[0]).unwrap();

    let orchestrator = orchestrator(
        Arc::new(ScriptedRetriever::ranking(&[ids[0]])),
        store,
        Arc::new(MockProvider::new("  \n ")),
        OrchestratorConfig::default(),
    );

    let result = orchestrator.query(&QueryRequest::new("q")).await;
    assert!(matches!(result, Err(OrchestratorError::Generation { .. })));
}

#[tokio::test(start_paused = true)]
async fn test_synthesis_retries_with_backoff() {
    let (store, ids) = seeded_store();
    store.promote(ids[0]).unwrap();

    let llm = Arc::new(MockProvider::new("Third time lucky"));
    llm.push_error("busy");
    llm.push_error("busy");
    let config = OrchestratorConfig {
        synthesis_retries: 2,
        retry_backoff_ms: 1_000,
        ..OrchestratorConfig::default()
    };
    let orchestrator = orchestrator(
        Arc::new(ScriptedRetriever::ranking(&[ids[0]])),
        store,
        Arc::clone(&llm),
        config,
    );

    let started = tokio::time::Instant::now();
    let outcome = orchestrator.query(&QueryRequest::new("q")).await.unwrap();

    assert_eq!(outcome.answer().unwrap().answer, "Third time lucky");
    assert_eq!(llm.call_count(), 3);
    assert!(started.elapsed() >= Duration::from_millis(3_000));
}

#[tokio::test(start_paused = true)]
async fn test_synthesis_retries_exhausted() {
    let (store, ids) = seeded_store();
    store.promote(ids[0]).unwrap();

    let llm = Arc::new(MockProvider::new("never reached"));
    llm.push_error("busy");
    llm.push_error("still busy");
    let config = OrchestratorConfig {
        synthesis_retries: 1,
        ..OrchestratorConfig::default()
    };
    let orchestrator = orchestrator(
        Arc::new(ScriptedRetriever::ranking(&[ids[0]])),
        store,
        Arc::clone(&llm),
        config,
    );

    match orchestrator.query(&QueryRequest::new("q")).await {
        Err(OrchestratorError::Generation { message, claims }) => {
            assert!(message.contains("still busy"));
            assert_eq!(claims.len(), 1);
        }
        other => panic!("unexpected: {:?}", other),
    }
    assert_eq!(llm.call_count(), 2);
}

#[tokio::test]
async fn test_invalid_requests_rejected_before_search() {
    let (store, _) = seeded_store();
    let retriever = Arc::new(ScriptedRetriever::default());
    let orchestrator = orchestrator(
        Arc::clone(&retriever),
        store,
        Arc::new(MockProvider::default()),
        OrchestratorConfig::default(),
    );

    let blank = orchestrator.query(&QueryRequest::new("   ")).await;
    assert!(matches!(blank, Err(OrchestratorError::InvalidRequest(_))));

    let zero = orchestrator.query(&QueryRequest::new("q").with_top_k(0)).await;
    assert!(matches!(zero, Err(OrchestratorError::InvalidRequest(_))));

    assert_eq!(retriever.calls(), 0);
}

#[tokio::test]
async fn test_top_k_defaults_from_config() {
    let (store, _) = seeded_store();
    let retriever = Arc::new(ScriptedRetriever::default());
    let config = OrchestratorConfig {
        default_top_k: 9,
        ..OrchestratorConfig::default()
    };
    let orchestrator = orchestrator(
        Arc::clone(&retriever),
        store,
        Arc::new(MockProvider::default()),
        config,
    );

    orchestrator.query(&QueryRequest::new("q")).await.unwrap();
    assert_eq!(retriever.last_top_k.load(Ordering::SeqCst), 9);

    orchestrator
        .query(&QueryRequest::new("q").with_top_k(2))
        .await
        .unwrap();
    assert_eq!(retriever.last_top_k.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_end_to_end_with_local_index() {
    let store = Arc::new(SqliteStore::in_memory().unwrap());
    let water = store
        .create("boiling", "Water boils at 100°C at sea level", "physics.txt")
        .unwrap();
    let rival = store
        .create("boiling", "Water boils at 90°C at sea level", "rumour.txt")
        .unwrap();
    store
        .create("metals", "Copper is a good conductor of electricity", "metals.txt")
        .unwrap();

    let index = Arc::new(LocalIndex::with_default_embedding());
    let all = store.get_by_status(StatusFilter::All).unwrap();
    let indexed = index
        .rebuild(all.iter().map(|claim| claim.to_indexed()).collect())
        .await
        .unwrap();
    assert_eq!(indexed, 3);

    store.promote_exclusive(rival).unwrap();
    store.promote_exclusive(water).unwrap();

    let llm = Arc::new(MockProvider::new("Water boils at 100°C [physics.txt]"));
    let synthesizer = Synthesizer::new(Arc::clone(&llm), SynthesizerConfig::default());
    let orchestrator = Orchestrator::new(
        index,
        Arc::clone(&store),
        synthesizer,
        OrchestratorConfig::default(),
    );

    let outcome = orchestrator
        .query(&QueryRequest::new("At what temperature does water boil?").with_top_k(3))
        .await
        .unwrap();

    let answer = outcome.answer().unwrap();
    let used: Vec<_> = answer.claims_used.iter().map(|c| c.claim_id).collect();
    assert_eq!(used, vec![water]);
    assert!(!llm.last_prompt().unwrap().contains("rumour.txt"));
}

#[tokio::test]
async fn test_query_without_words_ends_empty() {
    let store = Arc::new(SqliteStore::in_memory().unwrap());
    let water = store
        .create("boiling", "Water boils at 100°C at sea level", "physics.txt")
        .unwrap();
    store.promote(water).unwrap();

    let index = Arc::new(LocalIndex::with_default_embedding());
    let all = store.get_by_status(StatusFilter::All).unwrap();
    index
        .rebuild(all.iter().map(|claim| claim.to_indexed()).collect())
        .await
        .unwrap();

    let llm = Arc::new(MockProvider::default());
    let synthesizer = Synthesizer::new(Arc::clone(&llm), SynthesizerConfig::default());
    let orchestrator = Orchestrator::new(
        index,
        Arc::clone(&store),
        synthesizer,
        OrchestratorConfig::default(),
    );

    let outcome = orchestrator.query(&QueryRequest::new("???")).await.unwrap();

    assert!(matches!(outcome, QueryOutcome::Empty));
    assert_eq!(outcome.stage(), QueryStage::Empty);
    assert_eq!(llm.call_count(), 0);
}
