//! Embedding backends abstraction
//!
//! Provides a unified trait for embedding implementations:
//! - fastembed (ONNX runtime, sentence-transformers models)
//! - hash (deterministic FNV-1a feature hashing)
//!
//! and the model cache that hands them to the distance calculators.

pub mod cache;
pub mod fastembed_backend;
pub mod hash_backend;
pub mod traits;

pub use cache::{DefaultLoader, ModelCache, DEFAULT_MODEL};
pub use fastembed_backend::{FastEmbedBackend, FastEmbedModel};
pub use hash_backend::HashEmbedder;
pub use traits::{BackendLoader, EmbedderBackend, EmbedderConfig, EmbeddingResult};
