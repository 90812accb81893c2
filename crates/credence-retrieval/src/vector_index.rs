//! HNSW Vector Index for Semantic Search
//!
//! Wraps the HNSW algorithm for nearest-neighbour search over claim
//! embeddings.
//!
//! # Architecture
//!
//! - In-memory only; rebuilt from the claim store on demand
//! - A rebuild constructs a fresh graph and swaps it in under the lock, so
//!   readers see either the old content or the new content, never a mix
//!
//! # HNSW Parameters
//!
//! - **M**: bi-directional links per node (16)
//! - **efConstruction**: candidate list size while building (200)
//! - **efSearch**: candidate list size while querying (caller supplied)

use credence_domain::ClaimId;
use hnsw_rs::prelude::*;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;

const DEFAULT_M: usize = 16;
const DEFAULT_EF_CONSTRUCTION: usize = 200;
const DEFAULT_MAX_ELEMENTS: usize = 100_000;

/// Errors that can occur during vector index operations
#[derive(Error, Debug)]
pub enum VectorIndexError {
    /// Invalid embedding dimension
    #[error("Invalid embedding dimension: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension
        expected: usize,
        /// Actual dimension provided
        actual: usize,
    },

    /// The index lock was poisoned by a panicking writer
    #[error("Index unavailable: {0}")]
    Unavailable(String),
}

struct Inner {
    hnsw: Hnsw<'static, f32, DistCosine>,
    id_map: HashMap<usize, ClaimId>,
    next_id: usize,
}

impl Inner {
    fn empty() -> Self {
        let nb_layer = 16.min((DEFAULT_MAX_ELEMENTS as f32).ln().trunc() as usize);
        let hnsw = Hnsw::<'static, f32, DistCosine>::new(
            DEFAULT_M,
            DEFAULT_MAX_ELEMENTS,
            nb_layer,
            DEFAULT_EF_CONSTRUCTION,
            DistCosine {},
        );

        Self {
            hnsw,
            id_map: HashMap::new(),
            next_id: 0,
        }
    }

    fn insert(&mut self, claim_id: ClaimId, embedding: &[f32]) {
        let internal_id = self.next_id;
        self.next_id += 1;
        self.id_map.insert(internal_id, claim_id);

        let embedding_vec = embedding.to_vec();
        self.hnsw.insert((&embedding_vec, internal_id));
    }
}

/// Thread-safe HNSW index of `(ClaimId, embedding)` pairs
///
/// # Examples
///
/// ```no_run
/// use credence_retrieval::vector_index::VectorIndex;
/// use credence_domain::ClaimId;
///
/// let index = VectorIndex::new(384);
/// let embedding = vec![0.1; 384];
/// index.add(ClaimId::from_value(1), &embedding).unwrap();
///
/// let results = index.search(&embedding, 5, 64).unwrap();
/// ```
pub struct VectorIndex {
    dimension: usize,
    inner: Mutex<Inner>,
}

impl VectorIndex {
    /// Create an empty index for `dimension`-wide vectors
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            inner: Mutex::new(Inner::empty()),
        }
    }

    /// Vector width this index accepts
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, VectorIndexError> {
        self.inner
            .lock()
            .map_err(|_| VectorIndexError::Unavailable("index lock poisoned".to_string()))
    }

    fn check_dimension(&self, embedding: &[f32]) -> Result<(), VectorIndexError> {
        if embedding.len() != self.dimension {
            return Err(VectorIndexError::DimensionMismatch {
                expected: self.dimension,
                actual: embedding.len(),
            });
        }
        Ok(())
    }

    /// Add one claim embedding
    pub fn add(&self, claim_id: ClaimId, embedding: &[f32]) -> Result<(), VectorIndexError> {
        self.check_dimension(embedding)?;
        self.lock()?.insert(claim_id, embedding);
        Ok(())
    }

    /// Replace the whole content with `entries`
    ///
    /// Dimensions are validated before anything is touched; on error the
    /// previous content is kept.
    pub fn replace_all(&self, entries: &[(ClaimId, Vec<f32>)]) -> Result<usize, VectorIndexError> {
        for (_, embedding) in entries {
            self.check_dimension(embedding)?;
        }

        let mut fresh = Inner::empty();
        for (claim_id, embedding) in entries {
            fresh.insert(*claim_id, embedding);
        }

        *self.lock()? = fresh;
        Ok(entries.len())
    }

    /// The `k` nearest neighbours of `query` as `(ClaimId, similarity)`,
    /// most similar first
    pub fn search(
        &self,
        query: &[f32],
        k: usize,
        ef_search: usize,
    ) -> Result<Vec<(ClaimId, f32)>, VectorIndexError> {
        self.check_dimension(query)?;

        let inner = self.lock()?;
        if k == 0 || inner.id_map.is_empty() {
            return Ok(Vec::new());
        }

        let mut results: Vec<(ClaimId, f32)> = inner
            .hnsw
            .search(query, k, ef_search)
            .into_iter()
            .filter_map(|neighbour| {
                // Cosine distance to similarity
                inner
                    .id_map
                    .get(&neighbour.d_id)
                    .map(|&claim_id| (claim_id, 1.0 - neighbour.distance))
            })
            .collect();

        results.sort_by(|a, b| b.1.total_cmp(&a.1));
        results.truncate(k);
        Ok(results)
    }

    /// Get the number of vectors in the index
    pub fn len(&self) -> Result<usize, VectorIndexError> {
        Ok(self.lock()?.id_map.len())
    }

    /// Check if the index is empty
    pub fn is_empty(&self) -> Result<bool, VectorIndexError> {
        Ok(self.len()? == 0)
    }

    /// Clear all vectors from the index
    pub fn clear(&self) -> Result<(), VectorIndexError> {
        *self.lock()? = Inner::empty();
        Ok(())
    }

    /// Leave the lock poisoned, as a writer panicking mid-update would
    #[cfg(test)]
    pub(crate) fn poison(&self) {
        std::thread::scope(|s| {
            let _ = s
                .spawn(|| {
                    let _guard = self.inner.lock();
                    panic!("writer panicked while holding the index lock");
                })
                .join();
        });
    }
}
