//! Experiment runner
//!
//! Drives sentences through the translation chain and records each result
//! in the ledger, applying the batch failure policy.

use anyhow::{Context, Result};
use std::path::Path;

use crate::chain::{TranslationChain, Translator};
use crate::config::FailurePolicy;
use crate::embedders::ModelCache;
use crate::error::ChainError;
use crate::ledger::{append_experiment, ExperimentLedger, ExperimentRow, ScoringSettings};

/// Read one sentence per non-blank line, trimmed
pub fn read_sentences(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        return Err(ChainError::MissingInputFile {
            path: path.to_path_buf(),
        }
        .into());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read sentences: {:?}", path))?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Join command-line words into a single sentence
pub fn sentence_from_words(words: &[String]) -> Option<String> {
    let sentence = words.join(" ");
    if sentence.trim().is_empty() {
        None
    } else {
        Some(sentence)
    }
}

/// Counts for a finished batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub recorded: usize,
    pub failed: usize,
}

/// Runs experiments end to end
pub struct ExperimentRunner<'a> {
    chain: TranslationChain,
    ledger: &'a ExperimentLedger,
    cache: &'a ModelCache,
    settings: ScoringSettings,
    policy: FailurePolicy,
}

impl<'a> ExperimentRunner<'a> {
    pub fn new(
        ledger: &'a ExperimentLedger,
        cache: &'a ModelCache,
        settings: ScoringSettings,
        policy: FailurePolicy,
    ) -> Self {
        Self {
            chain: TranslationChain::new(),
            ledger,
            cache,
            settings,
            policy,
        }
    }

    /// Translate, score and record one sentence
    pub async fn run_sentence(
        &self,
        translator: &dyn Translator,
        sentence: &str,
    ) -> Result<ExperimentRow> {
        println!("\n{}", "=".repeat(70));
        println!("Starting translation chain for: {}", sentence);
        println!("{}", "=".repeat(70));

        let result = self.chain.run(translator, sentence).await?;
        let (row, quality) =
            append_experiment(self.ledger, self.cache, &self.settings, &result).await?;

        println!("\n✓ Results appended to {}", self.ledger.path().display());
        println!("  {}", quality.format_summary());

        Ok(row)
    }

    /// Run every sentence in order
    pub async fn run_batch(
        &self,
        translator: &dyn Translator,
        sentences: &[String],
    ) -> Result<BatchSummary> {
        let mut summary = BatchSummary::default();

        for (index, sentence) in sentences.iter().enumerate() {
            match self.run_sentence(translator, sentence).await {
                Ok(_) => summary.recorded += 1,
                Err(err) => {
                    summary.failed += 1;
                    let input_closed = matches!(
                        err.downcast_ref::<ChainError>(),
                        Some(ChainError::InputClosed { .. })
                    );
                    if input_closed || self.policy == FailurePolicy::Abort {
                        return Err(err.context(format!(
                            "Stopped after {} of {} sentences",
                            index + 1,
                            sentences.len()
                        )));
                    }
                    tracing::warn!(sentence = %sentence, "Skipping sentence: {:#}", err);
                    eprintln!("  ✗ Skipped: {:#}", err);
                }
            }
        }

        tracing::info!(
            recorded = summary.recorded,
            failed = summary.failed,
            "Batch complete"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::{InteractiveTranslator, Language};
    use crate::metrics::SpellingMethod;

    fn hash_settings() -> ScoringSettings {
        ScoringSettings {
            model: "hash".to_string(),
            method: SpellingMethod::SymmetricDifference,
        }
    }

    /// Fails whenever the text mentions "boom"
    struct FlakyTranslator;

    #[async_trait::async_trait]
    impl Translator for FlakyTranslator {
        async fn translate(&self, text: &str, _source: Language, _target: Language) -> Result<String> {
            if text.contains("boom") {
                anyhow::bail!("translation service rejected the text");
            }
            Ok(text.to_string())
        }
    }

    #[test]
    fn test_read_sentences() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sentences.txt");
        std::fs::write(&path, "  The cat sits.  \n\n   \nI love pizza.\n").unwrap();

        let sentences = read_sentences(&path).unwrap();
        assert_eq!(sentences, vec!["The cat sits.", "I love pizza."]);
    }

    #[test]
    fn test_read_sentences_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_sentences(&dir.path().join("absent.txt")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ChainError>(),
            Some(ChainError::MissingInputFile { .. })
        ));
    }

    #[test]
    fn test_sentence_from_words() {
        let words = vec!["The".to_string(), "cat".to_string(), "sits".to_string()];
        assert_eq!(sentence_from_words(&words).as_deref(), Some("The cat sits"));
        assert_eq!(sentence_from_words(&[]), None);
        assert_eq!(sentence_from_words(&["  ".to_string()]), None);
    }

    #[tokio::test]
    async fn test_batch_skips_failures() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = ExperimentLedger::new(dir.path().join("ledger.csv"));
        let cache = ModelCache::with_default_loader();
        let runner = ExperimentRunner::new(&ledger, &cache, hash_settings(), FailurePolicy::Skip);

        let sentences = vec![
            "The cat sits.".to_string(),
            "This one goes boom.".to_string(),
            "I love pizza.".to_string(),
        ];
        let summary = runner.run_batch(&FlakyTranslator, &sentences).await.unwrap();

        assert_eq!(
            summary,
            BatchSummary {
                recorded: 2,
                failed: 1
            }
        );
        let rows = ledger.rows().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].original_sentence, "I love pizza.");
        assert_eq!(rows[1].spelling_error_ratio, "0.0000");
    }

    #[tokio::test]
    async fn test_batch_abort_policy() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = ExperimentLedger::new(dir.path().join("ledger.csv"));
        let cache = ModelCache::with_default_loader();
        let runner = ExperimentRunner::new(&ledger, &cache, hash_settings(), FailurePolicy::Abort);

        let sentences = vec![
            "First.".to_string(),
            "boom".to_string(),
            "Never reached.".to_string(),
        ];
        let err = runner.run_batch(&FlakyTranslator, &sentences).await.unwrap_err();

        assert!(format!("{:#}", err).contains("Stopped after 2 of 3 sentences"));
        assert_eq!(ledger.rows().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_batch_stops_when_input_closes() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = ExperimentLedger::new(dir.path().join("ledger.csv"));
        let cache = ModelCache::with_default_loader();
        let runner = ExperimentRunner::new(&ledger, &cache, hash_settings(), FailurePolicy::Skip);

        // Enough answers for the first sentence only
        let input: &[u8] = b"Le chat.\nHatul.\nThe cat.\nBonjour\n";
        let translator = InteractiveTranslator::new(input, Vec::new());

        let sentences = vec!["The cat.".to_string(), "Hello.".to_string(), "Bye.".to_string()];
        let err = runner.run_batch(&translator, &sentences).await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ChainError>(),
            Some(ChainError::InputClosed { .. })
        ));
        let rows = ledger.rows().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].final_english_translation, "The cat.");
    }
}
