//! Translation quality metrics
//!
//! ## Modules
//!
//! - `text` - Text normalizer and spelling error ratio (lexical)
//! - `vector` - Cosine, Euclidean and Manhattan distances between embeddings
//! - `quality` - Embedding distance and composite translation quality metrics

pub mod quality;
pub mod text;
pub mod vector;

pub use quality::{
    cosine_embedding_distance, embedding_distance, embedding_metrics,
    translation_quality_metrics, translation_quality_with_method,
    DistanceMode, DistanceReport, EmbeddingMetrics, TranslationQuality,
};
pub use text::{normalize_text, spelling_error_ratio, SpellingMethod, WordSetDiff};
pub use vector::{cosine_distance, cosine_similarity, euclidean_distance, manhattan_distance};
