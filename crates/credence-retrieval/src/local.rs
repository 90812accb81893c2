//! In-process semantic index
//!
//! Embeds claim text with an [`EmbeddingModel`] and keeps the vectors in a
//! [`VectorIndex`]. Content lives only in memory; callers rebuild it from the
//! claim store when they start up or after claims are added.

use crate::embedding::{EmbeddingError, EmbeddingModel, HashedEmbedding};
use crate::vector_index::VectorIndex;
use crate::RetrievalError;
use credence_domain::traits::{ClaimIndex, Retriever};
use credence_domain::{ClaimId, IndexedClaim, RetrievalHit};
use tracing::debug;

/// Minimum HNSW search breadth
const MIN_EF_SEARCH: usize = 64;

/// Embedding model plus HNSW index behind the retrieval traits
///
/// # Examples
///
/// ```
/// use credence_retrieval::LocalIndex;
/// use credence_domain::{ClaimId, IndexedClaim};
/// use credence_domain::traits::{ClaimIndex, Retriever};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let index = LocalIndex::with_default_embedding();
/// index.rebuild(vec![IndexedClaim {
///     claim_id: ClaimId::from_value(1),
///     claim_text: "Water boils at 100°C at sea level".into(),
///     line_id: "boiling".into(),
///     source_ref: "physics.txt".into(),
/// }]).await.unwrap();
///
/// let hits = index.retrieve("boiling water", 5).await.unwrap();
/// assert_eq!(hits[0].claim_id, ClaimId::from_value(1));
/// # }
/// ```
pub struct LocalIndex<E: EmbeddingModel> {
    embedder: E,
    index: VectorIndex,
}

impl LocalIndex<HashedEmbedding> {
    /// Index using the built-in hashed embedding
    pub fn with_default_embedding() -> Self {
        Self::new(HashedEmbedding::default())
    }
}

impl<E: EmbeddingModel> LocalIndex<E> {
    /// Index using `embedder`
    pub fn new(embedder: E) -> Self {
        let index = VectorIndex::new(embedder.dimension());
        Self { embedder, index }
    }

    /// Number of indexed claims
    pub fn len(&self) -> Result<usize, RetrievalError> {
        Ok(self.index.len()?)
    }

    /// Whether nothing is indexed
    pub fn is_empty(&self) -> Result<bool, RetrievalError> {
        Ok(self.index.is_empty()?)
    }

    /// Embed and add a single claim
    pub fn add(&self, claim: &IndexedClaim) -> Result<(), RetrievalError> {
        let embedding = self.embedder.embed(&claim.claim_text)?;
        self.index.add(claim.claim_id, &embedding)?;
        Ok(())
    }

    /// Replace the content with `claims`
    ///
    /// Every claim is embedded before the swap, so a failure leaves the
    /// previous content in place.
    pub fn replace_all(&self, claims: &[IndexedClaim]) -> Result<usize, RetrievalError> {
        let entries = claims
            .iter()
            .map(|claim| {
                self.embedder
                    .embed(&claim.claim_text)
                    .map(|embedding| (claim.claim_id, embedding))
            })
            .collect::<Result<Vec<(ClaimId, Vec<f32>)>, _>>()?;

        let count = self.index.replace_all(&entries)?;
        debug!("Local index rebuilt with {} claims", count);
        Ok(count)
    }

    /// Nearest claims to `query`, best first, at most `top_k`
    pub fn search(&self, query: &str, top_k: usize) -> Result<Vec<RetrievalHit>, RetrievalError> {
        if top_k == 0 || self.index.is_empty()? {
            return Ok(Vec::new());
        }

        // A query with nothing to embed matches nothing
        let embedding = match self.embedder.embed(query) {
            Ok(embedding) => embedding,
            Err(EmbeddingError::InvalidInput(reason)) => {
                debug!("Query '{}' not searchable: {}", query, reason);
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };
        let ef_search = MIN_EF_SEARCH.max(top_k);
        let hits = self
            .index
            .search(&embedding, top_k, ef_search)?
            .into_iter()
            .map(|(claim_id, score)| RetrievalHit { claim_id, score })
            .collect();

        Ok(hits)
    }
}

impl<E: EmbeddingModel> Retriever for LocalIndex<E> {
    type Error = RetrievalError;

    async fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<RetrievalHit>, Self::Error> {
        self.search(query, top_k)
    }
}

impl<E: EmbeddingModel> ClaimIndex for LocalIndex<E> {
    type Error = RetrievalError;

    async fn rebuild(&self, claims: Vec<IndexedClaim>) -> Result<usize, Self::Error> {
        self.replace_all(&claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claim(id: i64, text: &str) -> IndexedClaim {
        IndexedClaim {
            claim_id: ClaimId::from_value(id),
            claim_text: text.to_string(),
            line_id: format!("line-{}", id),
            source_ref: "doc.txt".to_string(),
        }
    }

    #[tokio::test]
    async fn test_empty_index_returns_nothing() {
        let index = LocalIndex::with_default_embedding();
        assert!(index.retrieve("anything", 5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_results_bounded_and_sorted() {
        let index = LocalIndex::with_default_embedding();
        index
            .rebuild(vec![
                claim(1, "Water boils at 100 degrees at sea level"),
                claim(2, "Water freezes at 0 degrees"),
                claim(3, "Paris is the capital of France"),
                claim(4, "Mount Everest is the highest mountain"),
            ])
            .await
            .unwrap();

        let hits = index.retrieve("water boils", 2).await.unwrap();
        assert!(hits.len() <= 2);
        assert_eq!(hits[0].claim_id, ClaimId::from_value(1));
        assert!(hits.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[tokio::test]
    async fn test_rebuild_is_full_replace() {
        let index = LocalIndex::with_default_embedding();
        index.rebuild(vec![claim(1, "old claim text")]).await.unwrap();
        index.rebuild(vec![claim(2, "new claim text")]).await.unwrap();

        assert_eq!(index.len().unwrap(), 1);
        let hits = index.retrieve("claim text", 5).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].claim_id, ClaimId::from_value(2));
    }

    #[tokio::test]
    async fn test_failed_rebuild_keeps_previous_content() {
        let index = LocalIndex::with_default_embedding();
        index.rebuild(vec![claim(1, "kept")]).await.unwrap();

        let result = index.rebuild(vec![claim(2, "fine"), claim(3, "   ")]).await;
        assert!(matches!(result, Err(RetrievalError::Embedding(_))));
        assert_eq!(index.len().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_query_without_words_matches_nothing() {
        let index = LocalIndex::with_default_embedding();
        index.rebuild(vec![claim(1, "Water boils at 100 degrees")]).await.unwrap();

        assert!(index.retrieve("???", 5).await.unwrap().is_empty());
        assert!(index.retrieve("  -- !", 5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_poisoned_index_fails_search() {
        let index = LocalIndex::with_default_embedding();
        index.rebuild(vec![claim(1, "Water boils at 100 degrees")]).await.unwrap();
        index.index.poison();

        let result = index.retrieve("water", 5).await;
        assert!(matches!(result, Err(RetrievalError::Index(_))));
        assert!(index.len().is_err());
    }

    #[test]
    fn test_add() {
        let index = LocalIndex::with_default_embedding();
        index.add(&claim(9, "single claim")).unwrap();
        assert_eq!(index.len().unwrap(), 1);
    }
}
