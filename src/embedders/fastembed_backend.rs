//! FastEmbed backend implementation
//!
//! Wraps the fastembed-rs library for ONNX-based sentence embedding models.

use anyhow::{Context, Result};
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::traits::{measure_sync, EmbedderBackend, EmbedderConfig, EmbeddingResult};

/// Sentence embedding models available through fastembed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FastEmbedModel {
    /// sentence-transformers/all-MiniLM-L6-v2 (384 dims)
    AllMiniLmL6V2,
    /// sentence-transformers/all-MiniLM-L12-v2 (384 dims)
    AllMiniLmL12V2,
    /// sentence-transformers/all-mpnet-base-v2 (768 dims)
    AllMpnetBaseV2,
    /// sentence-transformers/paraphrase-multilingual-MiniLM-L12-v2 (384 dims)
    ParaphraseMultilingualMiniLmL12V2,
    /// sentence-transformers/paraphrase-multilingual-mpnet-base-v2 (768 dims)
    ParaphraseMultilingualMpnetBaseV2,
    /// BAAI/bge-small-en-v1.5 (384 dims)
    BgeSmallEnV15,
    /// BAAI/bge-base-en-v1.5 (768 dims)
    BgeBaseEnV15,
    /// intfloat/multilingual-e5-small (384 dims) - 100+ languages
    MultilingualE5Small,
    /// intfloat/multilingual-e5-base (768 dims) - 100+ languages
    MultilingualE5Base,
}

impl FastEmbedModel {
    /// Convert to fastembed's EmbeddingModel enum
    pub fn to_fastembed_model(&self) -> EmbeddingModel {
        match self {
            Self::AllMiniLmL6V2 => EmbeddingModel::AllMiniLML6V2,
            Self::AllMiniLmL12V2 => EmbeddingModel::AllMiniLML12V2,
            Self::AllMpnetBaseV2 => EmbeddingModel::AllMpnetBaseV2,
            Self::ParaphraseMultilingualMiniLmL12V2 => EmbeddingModel::ParaphraseMLMiniLML12V2,
            Self::ParaphraseMultilingualMpnetBaseV2 => EmbeddingModel::ParaphraseMLMpnetBaseV2,
            Self::BgeSmallEnV15 => EmbeddingModel::BGESmallENV15,
            Self::BgeBaseEnV15 => EmbeddingModel::BGEBaseENV15,
            Self::MultilingualE5Small => EmbeddingModel::MultilingualE5Small,
            Self::MultilingualE5Base => EmbeddingModel::MultilingualE5Base,
        }
    }

    /// Resolve a model name as accepted on the command line
    ///
    /// Accepts the short sentence-transformers name (`all-MiniLM-L6-v2`) or
    /// the full hub identifier, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        let lowered = name.to_lowercase();
        Self::all().into_iter().find(|model| {
            lowered == model.name().to_lowercase() || lowered == model.model_id().to_lowercase()
        })
    }

    /// Format text for symmetric sentence comparison
    pub fn format_text(&self, text: &str) -> String {
        match self {
            // E5 models expect the same prefix on both sides of a symmetric task
            Self::MultilingualE5Small | Self::MultilingualE5Base => format!("query: {}", text),
            _ => text.to_string(),
        }
    }

    /// Get the vector dimensions for this model
    pub fn dimensions(&self) -> usize {
        match self {
            Self::AllMiniLmL6V2 | Self::AllMiniLmL12V2 => 384,
            Self::AllMpnetBaseV2 => 768,
            Self::ParaphraseMultilingualMiniLmL12V2 => 384,
            Self::ParaphraseMultilingualMpnetBaseV2 => 768,
            Self::BgeSmallEnV15 => 384,
            Self::BgeBaseEnV15 => 768,
            Self::MultilingualE5Small => 384,
            Self::MultilingualE5Base => 768,
        }
    }

    /// Short model name
    pub fn name(&self) -> &'static str {
        match self {
            Self::AllMiniLmL6V2 => "all-MiniLM-L6-v2",
            Self::AllMiniLmL12V2 => "all-MiniLM-L12-v2",
            Self::AllMpnetBaseV2 => "all-mpnet-base-v2",
            Self::ParaphraseMultilingualMiniLmL12V2 => "paraphrase-multilingual-MiniLM-L12-v2",
            Self::ParaphraseMultilingualMpnetBaseV2 => "paraphrase-multilingual-mpnet-base-v2",
            Self::BgeSmallEnV15 => "bge-small-en-v1.5",
            Self::BgeBaseEnV15 => "bge-base-en-v1.5",
            Self::MultilingualE5Small => "multilingual-e5-small",
            Self::MultilingualE5Base => "multilingual-e5-base",
        }
    }

    /// Get model identifier
    pub fn model_id(&self) -> &'static str {
        match self {
            Self::AllMiniLmL6V2 => "sentence-transformers/all-MiniLM-L6-v2",
            Self::AllMiniLmL12V2 => "sentence-transformers/all-MiniLM-L12-v2",
            Self::AllMpnetBaseV2 => "sentence-transformers/all-mpnet-base-v2",
            Self::ParaphraseMultilingualMiniLmL12V2 => {
                "sentence-transformers/paraphrase-multilingual-MiniLM-L12-v2"
            }
            Self::ParaphraseMultilingualMpnetBaseV2 => {
                "sentence-transformers/paraphrase-multilingual-mpnet-base-v2"
            }
            Self::BgeSmallEnV15 => "BAAI/bge-small-en-v1.5",
            Self::BgeBaseEnV15 => "BAAI/bge-base-en-v1.5",
            Self::MultilingualE5Small => "intfloat/multilingual-e5-small",
            Self::MultilingualE5Base => "intfloat/multilingual-e5-base",
        }
    }

    /// Whether the model was trained on more than English
    pub fn is_multilingual(&self) -> bool {
        matches!(
            self,
            Self::ParaphraseMultilingualMiniLmL12V2
                | Self::ParaphraseMultilingualMpnetBaseV2
                | Self::MultilingualE5Small
                | Self::MultilingualE5Base
        )
    }

    /// List all available models
    pub fn all() -> Vec<Self> {
        vec![
            Self::AllMiniLmL6V2,
            Self::AllMiniLmL12V2,
            Self::AllMpnetBaseV2,
            Self::ParaphraseMultilingualMiniLmL12V2,
            Self::ParaphraseMultilingualMpnetBaseV2,
            Self::BgeSmallEnV15,
            Self::BgeBaseEnV15,
            Self::MultilingualE5Small,
            Self::MultilingualE5Base,
        ]
    }
}

/// FastEmbed backend for ONNX-based embeddings
pub struct FastEmbedBackend {
    model: Arc<Mutex<TextEmbedding>>,
    config: EmbedderConfig,
    model_type: FastEmbedModel,
    load_duration: Duration,
}

impl FastEmbedBackend {
    /// Create a new FastEmbed backend with the specified model
    ///
    /// Blocks while the model is downloaded and loaded.
    pub fn new(model_type: FastEmbedModel) -> Result<Self> {
        tracing::info!("Initializing FastEmbed model: {}", model_type.name());

        let (model, load_duration) = measure_sync(|| {
            let init_options = InitOptions::new(model_type.to_fastembed_model())
                .with_show_download_progress(true);

            TextEmbedding::try_new(init_options)
        });

        let model = model.context(format!(
            "Failed to initialize FastEmbed model: {}",
            model_type.name()
        ))?;

        tracing::info!(
            "FastEmbed model {} loaded in {:?}",
            model_type.name(),
            load_duration
        );

        let config = EmbedderConfig {
            name: model_type.name().to_string(),
            backend: "fastembed".to_string(),
            model: model_type.model_id().to_string(),
            dimensions: model_type.dimensions(),
            notes: Some(format!("ONNX runtime, load time: {:?}", load_duration)),
        };

        Ok(Self {
            model: Arc::new(Mutex::new(model)),
            config,
            model_type,
            load_duration,
        })
    }
}

#[async_trait::async_trait]
impl EmbedderBackend for FastEmbedBackend {
    fn config(&self) -> &EmbedderConfig {
        &self.config
    }

    async fn embed(&self, text: &str) -> Result<EmbeddingResult> {
        let formatted_text = self.model_type.format_text(text);
        let model = Arc::clone(&self.model);

        // Run in blocking task since fastembed is synchronous
        let (result, duration) = tokio::task::spawn_blocking(move || {
            let start = std::time::Instant::now();
            let embeddings = match model.lock() {
                Ok(mut guard) => guard
                    .embed(vec![&formatted_text], None)
                    .map_err(anyhow::Error::from),
                Err(_) => Err(anyhow::anyhow!("FastEmbed model lock poisoned")),
            };
            (embeddings, start.elapsed())
        })
        .await?;

        let embeddings = result.context("Failed to generate embedding")?;
        let embedding = embeddings
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("No embedding returned"))?;

        Ok(EmbeddingResult {
            embedding,
            duration,
        })
    }

    fn load_duration(&self) -> Duration {
        self.load_duration
    }
}
