//! Typed errors for the library surface
//!
//! Backend and I/O failures travel as `anyhow::Error` with context; the
//! variants here are the ones callers are expected to match on.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the lexical metrics
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MetricsError {
    /// The comparison method name is not one of the supported methods
    #[error(
        "unknown method: {method}. Use 'symmetric_difference', 'levenshtein', or 'sequence_matcher'"
    )]
    UnsupportedMethod { method: String },
}

/// Errors raised while collecting a translation chain
#[derive(Debug, Error)]
pub enum ChainError {
    /// The translation source closed before a translation was entered
    #[error("input closed while waiting for the {language} translation")]
    InputClosed { language: String },

    /// A sentence file was requested but does not exist
    #[error("input file not found: {}", path.display())]
    MissingInputFile { path: PathBuf },
}
