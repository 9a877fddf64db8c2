//! Translation drift experiments
//!
//! Round-trips English sentences through English → French → Hebrew → English
//! and records how far the result drifted, lexically (spelling error ratio)
//! and semantically (embedding distance), in an append-only CSV ledger.

pub mod chain;
pub mod config;
pub mod embedders;
pub mod error;
pub mod ledger;
pub mod metrics;
pub mod runner;
