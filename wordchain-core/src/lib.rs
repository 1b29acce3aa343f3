//! Word-level Markov chain text generation library.
//!
//! This crate provides a first-order word chain pipeline including:
//! - ASCII word tokenization of a raw corpus
//! - Chain construction with frequency counting and percentage weights
//! - Weighted random walks with a uniform fallback over the chain's keys
//! - Explicit, replayable random sources
//!
//! The chain is immutable once built and can be shared read-only across
//! any number of concurrent generators.

/// Tokenizer, chain construction and generation logic.
///
/// This module exposes the high-level generator interface and the
/// read-only chain it walks.
pub mod model;

/// Corpus I/O helpers (file loading).
pub mod io;

/// Error type shared by every stage of the pipeline.
pub mod error;

pub use error::{Error, Result};
