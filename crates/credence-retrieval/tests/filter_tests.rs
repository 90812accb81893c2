//! Status filtering against a real store, fed by the local index

use credence_domain::traits::{ClaimIndex, ClaimStore, Retriever};
use credence_domain::{ClaimId, RetrievalHit, StatusFilter};
use credence_retrieval::{filter_candidates, FilterOutcome, LocalIndex};
use credence_store::SqliteStore;

fn hit(id: ClaimId, score: f32) -> RetrievalHit {
    RetrievalHit { claim_id: id, score }
}

#[test]
fn test_filter_preserves_retriever_order() {
    let store = SqliteStore::in_memory().unwrap();
    let a = store.create("l1", "A", "a.txt").unwrap();
    let b = store.create("l2", "B", "b.txt").unwrap();
    let c = store.create("l3", "C", "c.txt").unwrap();
    for id in [a, b, c] {
        store.promote(id).unwrap();
    }

    // Retriever ranks c, a, b; store order is a, b, c
    let hits = vec![hit(c, 0.9), hit(a, 0.8), hit(b, 0.7)];
    let claims = filter_candidates(&store, &hits, StatusFilter::Promoted)
        .unwrap()
        .into_claims();

    let ids: Vec<_> = claims.iter().map(|claim| claim.claim_id).collect();
    assert_eq!(ids, vec![c, a, b]);
    assert_eq!(claims[0].source_ref, "c.txt");
}

#[test]
fn test_filter_drops_ineligible_candidates() {
    let store = SqliteStore::in_memory().unwrap();
    let five = store.create("l", "Candidate five", "s").unwrap();
    let seven = store.create("l", "Candidate seven", "s").unwrap();
    store.promote(seven).unwrap();

    let hits = vec![hit(five, 0.9), hit(seven, 0.8)];
    let outcome = filter_candidates(&store, &hits, StatusFilter::Promoted).unwrap();

    match outcome {
        FilterOutcome::Eligible(claims) => {
            assert_eq!(claims.len(), 1);
            assert_eq!(claims[0].claim_id, seven);
            assert_eq!(claims[0].claim_text, "Candidate seven");
        }
        FilterOutcome::NoEligibleContext => panic!("expected an eligible claim"),
    }
}

#[test]
fn test_no_eligible_context() {
    let store = SqliteStore::in_memory().unwrap();
    let a = store.create("l", "A", "s").unwrap();
    store.demote(a).unwrap();

    let outcome = filter_candidates(&store, &[hit(a, 0.5)], StatusFilter::Promoted).unwrap();
    assert_eq!(outcome, FilterOutcome::NoEligibleContext);

    let outcome = filter_candidates(&store, &[], StatusFilter::All).unwrap();
    assert_eq!(outcome, FilterOutcome::NoEligibleContext);
}

#[test]
fn test_unknown_and_duplicate_candidates() {
    let store = SqliteStore::in_memory().unwrap();
    let a = store.create("l", "A", "s").unwrap();

    let hits = vec![
        hit(ClaimId::from_value(404), 0.99),
        hit(a, 0.9),
        hit(a, 0.9),
    ];
    let claims = filter_candidates(&store, &hits, StatusFilter::All)
        .unwrap()
        .into_claims();
    assert_eq!(claims.len(), 1);
    assert_eq!(claims[0].claim_id, a);
}

#[test]
fn test_filter_all_accepts_every_status() {
    let store = SqliteStore::in_memory().unwrap();
    let a = store.create("l", "A", "s").unwrap();
    let b = store.create("l", "B", "s").unwrap();
    store.demote(b).unwrap();

    let claims = filter_candidates(&store, &[hit(b, 0.9), hit(a, 0.1)], StatusFilter::All)
        .unwrap()
        .into_claims();
    assert_eq!(claims.len(), 2);
}

#[tokio::test]
async fn test_index_rebuilt_from_store_feeds_filter() {
    let store = SqliteStore::in_memory().unwrap();
    let boil = store
        .create("boiling", "Water boils at 100 degrees at sea level", "physics.txt")
        .unwrap();
    let wrong = store
        .create("boiling", "Water boils at 50 degrees at sea level", "forum.txt")
        .unwrap();
    store.create("capitals", "Paris is the capital of France", "geo.txt").unwrap();
    store.promote_exclusive(boil).unwrap();

    let index = LocalIndex::with_default_embedding();
    let payload = store
        .get_by_status(StatusFilter::All)
        .unwrap()
        .iter()
        .map(|claim| claim.to_indexed())
        .collect();
    assert_eq!(index.rebuild(payload).await.unwrap(), 3);

    let hits = index.retrieve("At what temperature does water boil", 3).await.unwrap();
    assert!(hits.iter().any(|h| h.claim_id == wrong));

    let claims = filter_candidates(&store, &hits, StatusFilter::Promoted)
        .unwrap()
        .into_claims();
    assert_eq!(claims.len(), 1);
    assert_eq!(claims[0].claim_id, boil);
}
