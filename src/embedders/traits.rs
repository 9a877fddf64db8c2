//! Embedder trait abstraction
//!
//! Defines a common interface for embedding backends so the distance
//! calculators never depend on a concrete model runtime.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Result of a single embedding operation with timing metadata
#[derive(Debug, Clone)]
pub struct EmbeddingResult {
    /// The embedding vector
    pub embedding: Vec<f32>,
    /// Time taken to generate the embedding
    pub duration: Duration,
}

/// Configuration for an embedder backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedderConfig {
    /// Model name as requested by the caller (cache key)
    pub name: String,
    /// Backend type (fastembed, hash)
    pub backend: String,
    /// Model identifier
    pub model: String,
    /// Vector dimensions
    pub dimensions: usize,
    /// Additional notes
    pub notes: Option<String>,
}

/// Unified trait for embedding backends
#[async_trait::async_trait]
pub trait EmbedderBackend: Send + Sync {
    /// Get the configuration for this embedder
    fn config(&self) -> &EmbedderConfig;

    /// Get the name of this embedder configuration
    fn name(&self) -> &str {
        &self.config().name
    }

    /// Get the vector dimensions produced by this embedder
    fn dimensions(&self) -> usize {
        self.config().dimensions
    }

    /// Generate embedding for a single text
    async fn embed(&self, text: &str) -> Result<EmbeddingResult>;

    /// Get model load duration
    fn load_duration(&self) -> Duration {
        Duration::ZERO
    }
}

/// Creates backends by model name
///
/// Used by the model cache; swapping the loader swaps the embedding
/// backend without touching the calculators.
#[async_trait::async_trait]
pub trait BackendLoader: Send + Sync {
    async fn load(&self, model_name: &str) -> Result<Arc<dyn EmbedderBackend>>;
}

/// Helper to measure duration of a sync operation
pub fn measure_sync<F, T>(f: F) -> (T, Duration)
where
    F: FnOnce() -> T,
{
    let start = std::time::Instant::now();
    let result = f();
    let duration = start.elapsed();
    (result, duration)
}
