//! Translation Drift CLI
//!
//! Measures spelling and semantic drift of sentences round-tripped through
//! English → French → Hebrew → English.
//!
//! ## Quick Start
//!
//! ```bash
//! # One sentence; prompts for the three translations
//! ./translation-drift run "The cat sits on the mat."
//!
//! # One sentence per line
//! ./translation-drift run --file sentences.txt
//!
//! # Compare two texts directly
//! ./translation-drift compare "The cat sits on the mat." "A feline rests on the rug."
//! ```
//!
//! ## Configuration
//!
//! Defaults can be set in `translation_drift.toml`:
//!
//! ```toml
//! model = "all-MiniLM-L6-v2"
//! method = "symmetric_difference"
//! output = "translation_experiments.csv"
//! on_error = "skip"
//! ```

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

use translation_drift::chain::InteractiveTranslator;
use translation_drift::config::{ExperimentConfig, FailurePolicy, DEFAULT_CONFIG_PATH};
use translation_drift::embedders::{FastEmbedModel, ModelCache};
use translation_drift::ledger::ExperimentLedger;
use translation_drift::metrics::{embedding_metrics, spelling_error_ratio, SpellingMethod};
use translation_drift::runner::{read_sentences, sentence_from_words, ExperimentRunner};

#[derive(Parser)]
#[command(name = "translation-drift")]
#[command(about = "Measure spelling and semantic drift across a translation chain")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Options shared by commands that score text
#[derive(Args)]
struct ScoringArgs {
    /// Path to experiment config file (TOML)
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Embedding model (see `list`)
    #[arg(short, long)]
    model: Option<String>,

    /// Lexical method: symmetric_difference, levenshtein, sequence_matcher
    #[arg(long)]
    method: Option<SpellingMethod>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run sentences through the translation chain and log results to CSV
    ///
    /// Prompts for the French, Hebrew and final English translations of
    /// each sentence, then appends one row per sentence to the ledger.
    Run {
        /// Sentence to translate (words are joined with spaces)
        #[arg(conflicts_with = "file")]
        sentence: Vec<String>,

        /// File with one sentence per line
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Output CSV ledger
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Stop a --file batch at the first failing sentence
        #[arg(long)]
        abort_on_error: bool,

        #[command(flatten)]
        scoring: ScoringArgs,
    },

    /// Print every distance metric for two texts
    Compare {
        text1: String,
        text2: String,

        /// Print metrics as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        scoring: ScoringArgs,
    },

    /// List available embedding models and lexical methods
    List,
}

impl ScoringArgs {
    /// Config file values with command-line overrides applied
    fn resolve(&self) -> Result<ExperimentConfig> {
        let mut config = ExperimentConfig::load_or_default(&self.config)?;
        if let Some(model) = &self.model {
            config.model = model.clone();
        }
        if let Some(method) = self.method {
            config.method = method;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout carries the prompts
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            sentence,
            file,
            output,
            abort_on_error,
            scoring,
        } => {
            let mut config = scoring.resolve()?;
            if let Some(output) = output {
                config.output = output;
            }
            if abort_on_error {
                config.on_error = FailurePolicy::Abort;
            }
            run_experiments(&config, &sentence, file.as_deref()).await?;
        }

        Commands::Compare {
            text1,
            text2,
            json,
            scoring,
        } => {
            let config = scoring.resolve()?;
            compare_texts(&config, &text1, &text2, json).await?;
        }

        Commands::List => {
            list_models();
        }
    }

    Ok(())
}

/// Run the interactive chain for a sentence or a file of sentences
async fn run_experiments(
    config: &ExperimentConfig,
    words: &[String],
    file: Option<&Path>,
) -> Result<()> {
    let sentences = match file {
        Some(path) => read_sentences(path)?,
        None => match sentence_from_words(words) {
            Some(sentence) => vec![sentence],
            None => anyhow::bail!(
                "No input. Usage: translation-drift run \"Your sentence here\" or translation-drift run --file sentences.txt"
            ),
        },
    };

    if sentences.is_empty() {
        anyhow::bail!("No sentences to process");
    }

    tracing::info!(
        sentences = sentences.len(),
        model = %config.model,
        method = %config.method,
        policy = config.on_error.name(),
        "Running translation experiments"
    );

    let ledger = ExperimentLedger::new(&config.output);
    let cache = ModelCache::with_default_loader();
    let runner = ExperimentRunner::new(&ledger, &cache, config.scoring(), config.on_error);
    let translator = InteractiveTranslator::stdio();

    let summary = runner.run_batch(&translator, &sentences).await?;
    println!();

    if summary.failed > 0 {
        anyhow::bail!(
            "{} of {} sentences failed; {} recorded in {}",
            summary.failed,
            sentences.len(),
            summary.recorded,
            ledger.path().display()
        );
    }

    Ok(())
}

/// Print lexical and embedding metrics for two texts
async fn compare_texts(config: &ExperimentConfig, text1: &str, text2: &str, json: bool) -> Result<()> {
    let cache = ModelCache::with_default_loader();
    let ratio = spelling_error_ratio(text1, text2, config.method);
    let metrics = embedding_metrics(&cache, text1, text2, &config.model).await?;

    if json {
        #[derive(serde::Serialize)]
        struct CompareOutput<'a> {
            text1: &'a str,
            text2: &'a str,
            model: &'a str,
            method: SpellingMethod,
            spelling_error_ratio: f64,
            #[serde(flatten)]
            embedding: translation_drift::metrics::EmbeddingMetrics,
        }

        let output = CompareOutput {
            text1,
            text2,
            model: &config.model,
            method: config.method,
            spelling_error_ratio: ratio,
            embedding: metrics,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("Text 1: {}", text1);
    println!("Text 2: {}", text2);
    println!("\nModel: {} | Method: {}\n", config.model, config.method);
    println!("Spelling error ratio: {:.4}", ratio);
    println!("{}", metrics.format_summary());

    Ok(())
}

fn list_models() {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║              AVAILABLE EMBEDDING MODELS                      ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    println!("FASTEMBED (ONNX Runtime / CPU):");
    println!("─────────────────────────────────────────────────────────────────");
    for model in FastEmbedModel::all() {
        println!(
            "  {:<40} {:>4} dims{}",
            model.name(),
            model.dimensions(),
            if model.is_multilingual() { "  multilingual" } else { "" }
        );
    }

    println!("\nHASH (deterministic, offline):");
    println!("─────────────────────────────────────────────────────────────────");
    println!("  {:<40} {:>4} dims", "hash", 384);
    println!("  {:<40} {:>4}", "hash-<dim>", "any");

    println!("\nLEXICAL METHODS:");
    println!("─────────────────────────────────────────────────────────────────");
    for method in SpellingMethod::all() {
        println!("  {:<22} {}", method.name(), method.description());
    }
}
