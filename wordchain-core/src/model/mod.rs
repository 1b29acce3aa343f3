//! Top-level module for the word chain system.
//!
//! This module provides:
//! - Word tokenization (`tokenizer`)
//! - Chain construction and the read-only chain (`chain`)
//! - Per-word successor tallies and weights (`entry`)
//! - Random draw sources (`draw`)
//! - Generation parameters (`generation_input`)
//! - A high-level generation interface (`Generator`)

/// Splits raw bytes into lowercase ASCII word tokens.
pub mod tokenizer;

/// Chain of distinct words to weighted successors, and its builder.
///
/// Supports sequential and chunked multi-threaded construction.
pub mod chain;

/// A single chain entry: one word and its ordered successors.
///
/// Tracks raw transition counts and their percentage weights.
pub mod entry;

/// Sources of uniform random draws used while walking the chain.
pub mod draw;

/// Generation parameters such as step count, start word and seed.
pub mod generation_input;

/// Weighted random walk over a chain.
pub mod generator;
