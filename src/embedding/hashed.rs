//! Deterministic feature-hashing embedder.
//!
//! Maps each lowercased token to a dimension via FNV-1a and accumulates term
//! counts, then L2-normalizes. Not a semantic model — two texts sharing
//! vocabulary score high, unrelated texts score near zero — but it is
//! dependency-free, deterministic, and produces valid unit vectors, which is
//! exactly what seeding and tests need.

use anyhow::Result;

use super::{EmbeddingProvider, EMBEDDING_DIM};

pub struct HashedEmbeddingProvider;

impl HashedEmbeddingProvider {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HashedEmbeddingProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl EmbeddingProvider for HashedEmbeddingProvider {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut v = vec![0.0f32; EMBEDDING_DIM];

        for token in text.split(|c: char| !c.is_alphanumeric()) {
            if token.is_empty() {
                continue;
            }
            let dim = fnv1a(token.to_lowercase().as_bytes()) as usize % EMBEDDING_DIM;
            v[dim] += 1.0;
        }

        // L2 normalize; a text with no tokens yields the zero vector, which
        // the write path rejects — store such records with no embedding
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut v {
                *x /= norm;
            }
        }

        Ok(v)
    }
}

/// FNV-1a 64-bit hash.
fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf29ce484222325;
    for &b in bytes {
        hash ^= b as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embed_is_deterministic() {
        let provider = HashedEmbeddingProvider::new();
        let a = provider.embed("Gothic cathedral with flying buttresses").unwrap();
        let b = provider.embed("Gothic cathedral with flying buttresses").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn embed_has_correct_dimension_and_unit_norm() {
        let provider = HashedEmbeddingProvider::new();
        let v = provider.embed("baroque dome").unwrap();
        assert_eq!(v.len(), EMBEDDING_DIM);
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn shared_vocabulary_scores_higher_than_disjoint() {
        let provider = HashedEmbeddingProvider::new();
        let a = provider.embed("gothic rib vault pointed arch").unwrap();
        let b = provider.embed("gothic rib vault flying buttress").unwrap();
        let c = provider.embed("reinforced concrete brutalism").unwrap();

        let dot = |x: &[f32], y: &[f32]| -> f32 { x.iter().zip(y).map(|(a, b)| a * b).sum() };
        assert!(dot(&a, &b) > dot(&a, &c));
    }

    #[test]
    fn empty_text_yields_zero_vector() {
        let provider = HashedEmbeddingProvider::new();
        let v = provider.embed("   ").unwrap();
        assert!(v.iter().all(|&x| x == 0.0));
    }
}
