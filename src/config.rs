//! Configuration for translation experiments
//!
//! Defines the `translation_drift.toml` schema. Every field has a default, so
//! the file is optional; command-line flags override what it sets.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::embedders::DEFAULT_MODEL;
use crate::ledger::{ScoringSettings, DEFAULT_LEDGER_PATH};
use crate::metrics::SpellingMethod;

/// Default config file location
pub const DEFAULT_CONFIG_PATH: &str = "translation_drift.toml";

/// What a `--file` batch does when one sentence fails
///
/// - `Skip`: log the failure, continue with the next sentence, exit with an
///   error at the end if anything failed
/// - `Abort`: stop at the first failure
///
/// Closed input always stops the batch, since no later sentence can be
/// answered either.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    #[default]
    Skip,
    Abort,
}

impl FailurePolicy {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Skip => "skip",
            Self::Abort => "abort",
        }
    }
}

/// Experiment configuration loaded from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentConfig {
    /// Embedding model name
    #[serde(default = "default_model")]
    pub model: String,

    /// Lexical comparison method
    #[serde(default)]
    pub method: SpellingMethod,

    /// CSV ledger path
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Batch failure policy
    #[serde(default)]
    pub on_error: FailurePolicy,
}

fn default_model() -> String { DEFAULT_MODEL.to_string() }
fn default_output() -> PathBuf { PathBuf::from(DEFAULT_LEDGER_PATH) }

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            method: SpellingMethod::default(),
            output: default_output(),
            on_error: FailurePolicy::default(),
        }
    }
}

impl ExperimentConfig {
    /// Load config from TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read experiment config: {:?}", path))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse experiment config: {:?}", path))?;
        Ok(config)
    }

    /// Load config from `path`
    ///
    /// A missing file falls back to defaults only when `path` is
    /// [`DEFAULT_CONFIG_PATH`]; any other missing path is an error.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() && path == Path::new(DEFAULT_CONFIG_PATH) {
            tracing::debug!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        tracing::info!("Loading experiment config from {:?}", path);
        Self::load(path)
    }

    /// Settings used to score ledger rows
    pub fn scoring(&self) -> ScoringSettings {
        ScoringSettings {
            model: self.model.clone(),
            method: self.method,
        }
    }
}
