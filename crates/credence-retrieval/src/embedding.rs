//! Embedding Model for Text Vectorization
//!
//! Text-to-vector conversion for the in-process semantic index.
//!
//! # Architecture
//!
//! - **EmbeddingModel**: the seam a real model plugs into
//! - **HashedEmbedding**: token feature hashing. Deterministic, dependency
//!   free, and texts sharing words land close together, which is enough for
//!   keyword-flavoured semantic search over short claims.
//!
//! # Examples
//!
//! ```rust
//! use credence_retrieval::embedding::{HashedEmbedding, EmbeddingModel, cosine_similarity};
//!
//! let model = HashedEmbedding::new(256);
//! let a = model.embed("Water boils at 100 degrees").unwrap();
//! let b = model.embed("At what temperature does water boil?").unwrap();
//! let c = model.embed("The mitochondria is an organelle").unwrap();
//! assert!(cosine_similarity(&a, &b) > cosine_similarity(&a, &c));
//! ```

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use thiserror::Error;

/// Default embedding width
pub const DEFAULT_DIMENSION: usize = 384;

/// Errors that can occur during embedding generation
#[derive(Error, Debug)]
pub enum EmbeddingError {
    /// Invalid input text
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Model inference error
    #[error("Model inference failed: {0}")]
    InferenceFailed(String),
}

/// Trait for embedding models
pub trait EmbeddingModel: Send + Sync {
    /// Generate an embedding vector for the given text
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Get the dimension of embeddings produced by this model
    fn dimension(&self) -> usize;
}

/// Feature-hashing embedding over lowercased word tokens
///
/// Each token is hashed to a bucket and a sign; the vector is the signed
/// bucket counts, normalized to unit length.
pub struct HashedEmbedding {
    dimension: usize,
}

impl HashedEmbedding {
    /// Create a model producing `dimension`-wide vectors
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .map(|t| t.to_lowercase())
    }

    /// Light stemming so "boils" and "boil" share a bucket
    fn normalize_token(token: &str) -> &str {
        if token.len() > 3 {
            if let Some(stem) = token.strip_suffix("es") {
                return stem;
            }
            if let Some(stem) = token.strip_suffix('s') {
                return stem;
            }
        }
        token
    }

    fn bucket(&self, token: &str) -> (usize, f32) {
        let mut hasher = DefaultHasher::new();
        token.hash(&mut hasher);
        let hash_value = hasher.finish();

        let index = (hash_value % self.dimension as u64) as usize;
        let sign = if (hash_value >> 63) == 0 { 1.0 } else { -1.0 };
        (index, sign)
    }
}

impl Default for HashedEmbedding {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSION)
    }
}

impl EmbeddingModel for HashedEmbedding {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut embedding = vec![0.0f32; self.dimension];
        let mut seen = 0usize;

        for token in Self::tokens(text) {
            let (index, sign) = self.bucket(Self::normalize_token(&token));
            embedding[index] += sign;
            seen += 1;
        }

        if seen == 0 {
            return Err(EmbeddingError::InvalidInput(
                "Text contains no words to embed".to_string(),
            ));
        }

        let magnitude: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if magnitude == 0.0 {
            // Every token cancelled out; fall back to a fixed direction
            embedding[0] = 1.0;
        } else {
            for value in &mut embedding {
                *value /= magnitude;
            }
        }

        Ok(embedding)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

/// Cosine similarity in `[-1, 1]`; zero when either vector is zero or the
/// lengths differ
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let magnitude_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let magnitude_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        return 0.0;
    }

    dot_product / (magnitude_a * magnitude_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedding_deterministic() {
        let model = HashedEmbedding::default();
        let text = "The quick brown fox jumps over the lazy dog";
        assert_eq!(model.embed(text).unwrap(), model.embed(text).unwrap());
    }

    #[test]
    fn test_embedding_dimension() {
        let model = HashedEmbedding::new(128);
        assert_eq!(model.embed("test").unwrap().len(), 128);
        assert_eq!(model.dimension(), 128);
    }

    #[test]
    fn test_embedding_normalized() {
        let model = HashedEmbedding::default();
        let embedding = model.embed("test text with several words").unwrap();
        let magnitude: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((magnitude - 1.0).abs() < 0.0001);
    }

    #[test]
    fn test_case_and_punctuation_insensitive() {
        let model = HashedEmbedding::default();
        let a = model.embed("Water boils.").unwrap();
        let b = model.embed("water BOIL").unwrap();
        assert!(cosine_similarity(&a, &b) > 0.99);
    }

    #[test]
    fn test_shared_words_rank_higher() {
        let model = HashedEmbedding::default();
        let query = model.embed("capital of France").unwrap();
        let near = model.embed("Paris is the capital of France").unwrap();
        let far = model.embed("Photosynthesis converts light into sugar").unwrap();
        assert!(cosine_similarity(&query, &near) > cosine_similarity(&query, &far));
    }

    #[test]
    fn test_empty_text_rejected() {
        let model = HashedEmbedding::default();
        assert!(matches!(model.embed(""), Err(EmbeddingError::InvalidInput(_))));
        assert!(matches!(model.embed(" ?! "), Err(EmbeddingError::InvalidInput(_))));
    }

    #[test]
    fn test_cosine_similarity_identical() {
        let vec = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&vec, &vec) - 1.0).abs() < 0.0001);
    }

    #[test]
    fn test_cosine_similarity_orthogonal() {
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 0.0001);
    }

    #[test]
    fn test_cosine_similarity_length_mismatch() {
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 0.0]), 0.0);
    }
}
