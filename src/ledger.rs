//! Experiment ledger
//!
//! Append-only CSV file holding one row per translation experiment. The
//! header is written when the file is created and never again.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use crate::chain::ChainResult;
use crate::embedders::ModelCache;
use crate::metrics::{translation_quality_with_method, SpellingMethod, TranslationQuality};

/// Default ledger location
pub const DEFAULT_LEDGER_PATH: &str = "translation_experiments.csv";

/// Column names, in file order
pub const LEDGER_HEADER: [&str; 6] = [
    "original_sentence",
    "spelling_error_ratio",
    "french_translation",
    "hebrew_translation",
    "final_english_translation",
    "embedding_distance",
];

/// One ledger row; metric columns are pre-formatted text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperimentRow {
    pub original_sentence: String,
    /// Four decimal places
    pub spelling_error_ratio: String,
    pub french_translation: String,
    pub hebrew_translation: String,
    pub final_english_translation: String,
    /// Six decimal places
    pub embedding_distance: String,
}

impl ExperimentRow {
    pub fn new(result: &ChainResult, quality: &TranslationQuality) -> Self {
        Self {
            original_sentence: result.original.clone(),
            spelling_error_ratio: format!("{:.4}", quality.spelling_error_ratio),
            french_translation: result.french.clone(),
            hebrew_translation: result.hebrew.clone(),
            final_english_translation: result.final_english.clone(),
            embedding_distance: format!("{:.6}", quality.embedding_distance),
        }
    }
}

/// How rows are scored before they are appended
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoringSettings {
    /// Embedding model name
    pub model: String,
    /// Lexical comparison method
    pub method: SpellingMethod,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            model: crate::embedders::DEFAULT_MODEL.to_string(),
            method: SpellingMethod::default(),
        }
    }
}

/// Append-only CSV file of experiment rows
#[derive(Debug, Clone)]
pub struct ExperimentLedger {
    path: PathBuf,
}

impl ExperimentLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one row, writing the header first if the file does not exist
    ///
    /// Existing content is never rewritten. Not transactional: a crash
    /// mid-write can leave a partial line.
    pub fn append(&self, row: &ExperimentRow) -> Result<()> {
        let file_exists = self.path.exists();

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open ledger: {:?}", self.path))?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        if !file_exists {
            writer
                .write_record(LEDGER_HEADER)
                .with_context(|| format!("Failed to write ledger header: {:?}", self.path))?;
        }

        writer
            .serialize(row)
            .with_context(|| format!("Failed to append to ledger: {:?}", self.path))?;
        writer
            .flush()
            .with_context(|| format!("Failed to flush ledger: {:?}", self.path))?;

        tracing::debug!(path = ?self.path, new_file = !file_exists, "Appended ledger row");
        Ok(())
    }

    /// Read every row back
    pub fn rows(&self) -> Result<Vec<ExperimentRow>> {
        let mut reader = csv::Reader::from_path(&self.path)
            .with_context(|| format!("Failed to open ledger: {:?}", self.path))?;
        let rows = reader
            .deserialize()
            .collect::<std::result::Result<Vec<ExperimentRow>, _>>()
            .with_context(|| format!("Failed to parse ledger: {:?}", self.path))?;
        Ok(rows)
    }
}

/// Score a chain result and append it to the ledger
///
/// Compares the original sentence with the final English translation.
pub async fn append_experiment(
    ledger: &ExperimentLedger,
    cache: &ModelCache,
    settings: &ScoringSettings,
    result: &ChainResult,
) -> Result<(ExperimentRow, TranslationQuality)> {
    let quality = translation_quality_with_method(
        cache,
        &result.original,
        &result.final_english,
        &settings.model,
        settings.method,
    )
    .await?;

    let row = ExperimentRow::new(result, &quality);
    ledger.append(&row)?;

    tracing::info!(
        ledger = ?ledger.path(),
        spelling_error_ratio = %row.spelling_error_ratio,
        embedding_distance = %row.embedding_distance,
        "Recorded experiment"
    );

    Ok((row, quality))
}
