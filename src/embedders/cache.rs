//! Model cache
//!
//! Holds the most recently loaded embedding backend, keyed by the model
//! name it was requested with. Asking for a different name replaces the
//! cached backend; asking for the same name reuses it.

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::sync::Mutex;

use super::fastembed_backend::{FastEmbedBackend, FastEmbedModel};
use super::hash_backend::HashEmbedder;
use super::traits::{BackendLoader, EmbedderBackend};

/// Default model for embedding distances
pub const DEFAULT_MODEL: &str = "all-MiniLM-L6-v2";

struct CachedModel {
    name: String,
    backend: Arc<dyn EmbedderBackend>,
}

/// Cache of the last-loaded embedding backend
pub struct ModelCache {
    loader: Box<dyn BackendLoader>,
    slot: Mutex<Option<CachedModel>>,
}

impl ModelCache {
    pub fn new(loader: impl BackendLoader + 'static) -> Self {
        Self {
            loader: Box::new(loader),
            slot: Mutex::new(None),
        }
    }

    /// Cache backed by [`DefaultLoader`]
    pub fn with_default_loader() -> Self {
        Self::new(DefaultLoader)
    }

    /// Get the backend for `model_name`, loading it if it is not cached
    ///
    /// A failed load leaves the previously cached backend in place.
    pub async fn get(&self, model_name: &str) -> Result<Arc<dyn EmbedderBackend>> {
        let mut slot = self.slot.lock().await;

        if let Some(cached) = slot.as_ref() {
            if cached.name == model_name {
                return Ok(Arc::clone(&cached.backend));
            }
            tracing::info!(
                previous = %cached.name,
                requested = %model_name,
                "Replacing cached embedding model"
            );
        }

        let backend = self
            .loader
            .load(model_name)
            .await
            .with_context(|| format!("Failed to load embedding model: {}", model_name))?;

        tracing::debug!(
            model = %model_name,
            dimensions = backend.dimensions(),
            load_time = ?backend.load_duration(),
            "Cached embedding model"
        );

        *slot = Some(CachedModel {
            name: model_name.to_string(),
            backend: Arc::clone(&backend),
        });

        Ok(backend)
    }

    /// Name of the currently cached model, if any
    pub async fn cached_model_name(&self) -> Option<String> {
        self.slot.lock().await.as_ref().map(|c| c.name.clone())
    }
}

/// Resolves `hash`/`hash-<dim>` to [`HashEmbedder`] and every other name
/// through the fastembed model catalogue
pub struct DefaultLoader;

#[async_trait::async_trait]
impl BackendLoader for DefaultLoader {
    async fn load(&self, model_name: &str) -> Result<Arc<dyn EmbedderBackend>> {
        if let Some(hash) = HashEmbedder::from_name(model_name) {
            return Ok(Arc::new(hash?));
        }

        let Some(model_type) = FastEmbedModel::from_name(model_name) else {
            anyhow::bail!(
                "Unknown embedding model: {}. Run `translation-drift list` for available models",
                model_name
            );
        };

        // Model download and ONNX session setup block
        let backend = tokio::task::spawn_blocking(move || FastEmbedBackend::new(model_type))
            .await??;
        Ok(Arc::new(backend))
    }
}
