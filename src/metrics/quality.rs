//! Embedding distance and composite translation quality metrics

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::text::{spelling_error_ratio, SpellingMethod};
use super::vector::{cosine_distance, euclidean_distance, manhattan_distance};
use crate::embedders::ModelCache;

/// All embedding distance metrics for a text pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingMetrics {
    /// 1 - cosine similarity (0 to 2)
    pub cosine_distance: f64,
    /// 1 - cosine distance
    pub cosine_similarity: f64,
    /// L2 distance between embeddings
    pub euclidean_distance: f64,
    /// L1 distance between embeddings
    pub manhattan_distance: f64,
}

impl EmbeddingMetrics {
    /// Result reported when either text is empty
    pub const EMPTY_INPUT: Self = Self {
        cosine_distance: 1.0,
        cosine_similarity: 0.0,
        euclidean_distance: 0.0,
        manhattan_distance: 0.0,
    };

    /// Compute every metric between two embeddings
    pub fn between(a: &[f32], b: &[f32]) -> Self {
        let cos_dist = cosine_distance(a, b);
        Self {
            cosine_distance: cos_dist,
            cosine_similarity: 1.0 - cos_dist,
            euclidean_distance: euclidean_distance(a, b),
            manhattan_distance: manhattan_distance(a, b),
        }
    }

    pub fn format_summary(&self) -> String {
        format!(
            "Cosine distance: {:.4} | Cosine similarity: {:.4} | Euclidean: {:.4} | Manhattan: {:.4}",
            self.cosine_distance,
            self.cosine_similarity,
            self.euclidean_distance,
            self.manhattan_distance
        )
    }
}

/// Which metrics [`embedding_distance`] computes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DistanceMode {
    /// Cosine distance only
    #[default]
    Cosine,
    /// Cosine, Euclidean and Manhattan
    All,
}

/// Output of [`embedding_distance`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DistanceReport {
    Cosine(f64),
    All(EmbeddingMetrics),
}

impl DistanceReport {
    /// Cosine distance regardless of mode
    pub fn cosine_distance(&self) -> f64 {
        match self {
            Self::Cosine(distance) => *distance,
            Self::All(metrics) => metrics.cosine_distance,
        }
    }
}

/// Semantic distance between two texts using sentence embeddings
///
/// Empty input short-circuits to the sentinel result without touching the
/// model cache. Backend failures propagate.
pub async fn embedding_distance(
    cache: &ModelCache,
    text1: &str,
    text2: &str,
    model_name: &str,
    mode: DistanceMode,
) -> Result<DistanceReport> {
    if text1.is_empty() || text2.is_empty() {
        return Ok(match mode {
            DistanceMode::Cosine => DistanceReport::Cosine(1.0),
            DistanceMode::All => DistanceReport::All(EmbeddingMetrics::EMPTY_INPUT),
        });
    }

    let (first, second) = embed_pair(cache, text1, text2, model_name).await?;

    Ok(match mode {
        DistanceMode::Cosine => DistanceReport::Cosine(cosine_distance(&first, &second)),
        DistanceMode::All => DistanceReport::All(EmbeddingMetrics::between(&first, &second)),
    })
}

async fn embed_pair(
    cache: &ModelCache,
    text1: &str,
    text2: &str,
    model_name: &str,
) -> Result<(Vec<f32>, Vec<f32>)> {
    let backend = cache.get(model_name).await?;
    let first = backend
        .embed(text1)
        .await
        .context("Failed to embed first text")?;
    let second = backend
        .embed(text2)
        .await
        .context("Failed to embed second text")?;

    tracing::debug!(
        model = %model_name,
        first = ?first.duration,
        second = ?second.duration,
        "Embedded text pair"
    );

    if first.embedding.len() != second.embedding.len() {
        anyhow::bail!(
            "Model {} returned embeddings of different dimensions ({} and {})",
            model_name,
            first.embedding.len(),
            second.embedding.len()
        );
    }

    Ok((first.embedding, second.embedding))
}

/// Cosine distance between two texts
pub async fn cosine_embedding_distance(
    cache: &ModelCache,
    text1: &str,
    text2: &str,
    model_name: &str,
) -> Result<f64> {
    embedding_distance(cache, text1, text2, model_name, DistanceMode::Cosine)
        .await
        .map(|report| report.cosine_distance())
}

/// Every embedding metric for two texts
pub async fn embedding_metrics(
    cache: &ModelCache,
    text1: &str,
    text2: &str,
    model_name: &str,
) -> Result<EmbeddingMetrics> {
    match embedding_distance(cache, text1, text2, model_name, DistanceMode::All).await? {
        DistanceReport::All(metrics) => Ok(metrics),
        DistanceReport::Cosine(_) => anyhow::bail!("Expected every embedding metric, got cosine only"),
    }
}

/// Quality metrics for an (original, translated) pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TranslationQuality {
    /// Word-level difference ratio
    pub spelling_error_ratio: f64,
    /// Semantic distance (cosine)
    pub embedding_distance: f64,
    /// 1 - embedding distance
    pub embedding_similarity: f64,
}

impl TranslationQuality {
    pub fn format_summary(&self) -> String {
        format!(
            "Spelling error ratio: {:.4} | Embedding distance: {:.6} | Similarity: {:.4}",
            self.spelling_error_ratio, self.embedding_distance, self.embedding_similarity
        )
    }
}

/// Spelling error ratio and embedding distance in a single call
pub async fn translation_quality_metrics(
    cache: &ModelCache,
    original: &str,
    translated: &str,
    model_name: &str,
) -> Result<TranslationQuality> {
    translation_quality_with_method(
        cache,
        original,
        translated,
        model_name,
        SpellingMethod::default(),
    )
    .await
}

/// [`translation_quality_metrics`] with an explicit lexical method
pub async fn translation_quality_with_method(
    cache: &ModelCache,
    original: &str,
    translated: &str,
    model_name: &str,
    method: SpellingMethod,
) -> Result<TranslationQuality> {
    let error_ratio = spelling_error_ratio(original, translated, method);
    let distance = cosine_embedding_distance(cache, original, translated, model_name).await?;

    Ok(TranslationQuality {
        spelling_error_ratio: error_ratio,
        embedding_distance: distance,
        embedding_similarity: 1.0 - distance,
    })
}
