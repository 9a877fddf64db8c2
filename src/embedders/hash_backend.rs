//! Hash embeddings
//!
//! FNV-1a feature hashing over normalized words. No model download and
//! fully deterministic, so it serves offline runs and tests.

use anyhow::{bail, Result};

use super::traits::{EmbedderBackend, EmbedderConfig, EmbeddingResult};
use crate::metrics::normalize_text;

/// Default embedding dimension
pub const DEFAULT_HASH_DIM: usize = 384;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET, |hash, byte| {
        (hash ^ *byte as u64).wrapping_mul(FNV_PRIME)
    })
}

/// Hash embedder using FNV-1a
pub struct HashEmbedder {
    config: EmbedderConfig,
}

impl HashEmbedder {
    /// Create embedder with specified dimension
    pub fn new(dim: usize) -> Result<Self> {
        if dim == 0 {
            bail!("hash embedding dimension must be positive");
        }
        let name = if dim == DEFAULT_HASH_DIM {
            "hash".to_string()
        } else {
            format!("hash-{}", dim)
        };
        Ok(Self {
            config: EmbedderConfig {
                name,
                backend: "hash".to_string(),
                model: "fnv1a-bag-of-words".to_string(),
                dimensions: dim,
                notes: Some("deterministic feature hashing, no semantics".to_string()),
            },
        })
    }

    /// Parse `hash` or `hash-<dim>`
    pub fn from_name(name: &str) -> Option<Result<Self>> {
        if name == "hash" {
            return Some(Self::new(DEFAULT_HASH_DIM));
        }
        let dim = name.strip_prefix("hash-")?.parse::<usize>().ok()?;
        Some(Self::new(dim))
    }

    /// Embed text into vector
    pub fn embed_sync(&self, text: &str) -> Vec<f32> {
        let dim = self.config.dimensions;
        let mut vector = vec![0.0f32; dim];

        for word in normalize_text(text).split_whitespace() {
            let hash = fnv1a(word.as_bytes());
            let bucket = (hash % dim as u64) as usize;
            // Top bit picks the sign so collisions partly cancel
            let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
            vector[bucket] += sign;
        }

        vector
    }
}

#[async_trait::async_trait]
impl EmbedderBackend for HashEmbedder {
    fn config(&self) -> &EmbedderConfig {
        &self.config
    }

    async fn embed(&self, text: &str) -> Result<EmbeddingResult> {
        let start = std::time::Instant::now();
        let embedding = self.embed_sync(text);
        Ok(EmbeddingResult {
            embedding,
            duration: start.elapsed(),
        })
    }
}
