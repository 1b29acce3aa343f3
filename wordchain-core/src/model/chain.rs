use std::collections::HashMap;
use std::thread;

use serde::Serialize;

use super::entry::ChainEntry;
use super::tokenizer::Token;
use crate::error::{Error, Result};

/// A first-order word chain.
///
/// Maps each distinct predecessor word of a corpus to its `ChainEntry`.
///
/// # Invariants
/// - Exactly one entry per word that is followed by at least one token
/// - Entries are kept in order of first appearance of their word
/// - Every entry is normalized (weights match counts)
///
/// A chain is never modified after `ChainBuilder::build` returns it, so it
/// can be shared by reference (or behind an `Arc`) across threads.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Chain {
	entries: Vec<ChainEntry>,
	#[serde(skip)]
	positions: HashMap<Token, usize>,
}

impl Chain {
	fn empty() -> Self {
		Self {
			entries: Vec::new(),
			positions: HashMap::new(),
		}
	}

	fn entry_mut(&mut self, word: &Token) -> &mut ChainEntry {
		let index = match self.positions.get(word) {
			Some(&i) => i,
			None => {
				let i = self.entries.len();
				self.positions.insert(word.clone(), i);
				self.entries.push(ChainEntry::new(word.clone()));
				i
			}
		};
		&mut self.entries[index]
	}

	/// Tallies every adjacent pair of `tokens`, without normalizing.
	fn tally(tokens: &[Token]) -> Self {
		let mut chain = Self::empty();
		for pair in tokens.windows(2) {
			chain.entry_mut(&pair[0]).add_transition(&pair[1], 1);
		}
		chain
	}

	/// Adds the raw counts of `other` to this chain.
	///
	/// Words and successors new to `self` are appended in the order `other`
	/// first saw them.
	fn merge(&mut self, other: &Self) {
		for entry in &other.entries {
			match self.positions.get(entry.word()) {
				Some(&i) => self.entries[i].merge(entry),
				None => {
					self.positions.insert(entry.word().clone(), self.entries.len());
					self.entries.push(entry.clone());
				}
			}
		}
	}

	fn normalize(&mut self) {
		for entry in &mut self.entries {
			entry.normalize();
		}
	}

	/// Returns the entry of `word`, if it is a key of the chain.
	pub fn get(&self, word: &Token) -> Option<&ChainEntry> {
		self.positions.get(word).map(|&i| &self.entries[i])
	}

	/// Same as `get`, for a word that has not been folded yet.
	///
	/// A string that is not a valid word is never a key.
	pub fn lookup(&self, word: &str) -> Option<&ChainEntry> {
		self.get(&Token::from_word(word).ok()?)
	}

	pub fn contains(&self, word: &Token) -> bool {
		self.positions.contains_key(word)
	}

	/// Number of distinct keys.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Keys in order of first appearance.
	pub fn keys(&self) -> impl Iterator<Item = &Token> {
		self.entries.iter().map(ChainEntry::word)
	}

	pub fn entries(&self) -> &[ChainEntry] {
		&self.entries
	}

	/// Returns the `index`-th key (order of first appearance).
	pub fn key_at(&self, index: usize) -> Option<&Token> {
		self.entries.get(index).map(ChainEntry::word)
	}

	/// Total number of observed transitions (corpus size - 1).
	pub fn transitions(&self) -> usize {
		self.entries.iter().map(ChainEntry::total).sum()
	}
}

/// Builds a `Chain` from a token sequence.
///
/// With more than one worker, the transitions are split in contiguous
/// chunks tallied on scoped threads, then merged in chunk order. The result
/// is identical to a sequential build.
#[derive(Clone, Debug)]
pub struct ChainBuilder {
	workers: usize,
}

impl Default for ChainBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl ChainBuilder {
	/// Sequential builder.
	pub fn new() -> Self {
		Self { workers: 1 }
	}

	/// Builder using one worker per logical CPU.
	pub fn parallel() -> Self {
		Self::with_workers(num_cpus::get())
	}

	/// Builder using `workers` threads (at least one).
	pub fn with_workers(workers: usize) -> Self {
		Self { workers: workers.max(1) }
	}

	pub fn workers(&self) -> usize {
		self.workers
	}

	/// Builds the chain of `tokens`.
	///
	/// Each pair `(tokens[i], tokens[i + 1])` is one transition. Counts are
	/// merged per distinct word and successor, then every entry is turned
	/// into floored percentage weights.
	///
	/// # Errors
	/// Returns `Error::NoTransitions` if fewer than two tokens are given.
	pub fn build(&self, tokens: &[Token]) -> Result<Chain> {
		if tokens.len() < 2 {
			return Err(Error::NoTransitions);
		}

		let transitions = tokens.len() - 1;
		let chunks = self.workers.min(transitions);

		let mut chain = if chunks <= 1 {
			Chain::tally(tokens)
		} else {
			Self::tally_in_chunks(tokens, chunks)
		};
		chain.normalize();

		log::debug!(
			"built chain: {} keys, {} transitions, {} chunk(s)",
			chain.len(),
			transitions,
			chunks.max(1)
		);
		Ok(chain)
	}

	/// Tallies `chunks` contiguous slices of transitions in parallel.
	///
	/// Neighbouring slices share their boundary token so that no transition
	/// is lost or counted twice.
	fn tally_in_chunks(tokens: &[Token], chunks: usize) -> Chain {
		let transitions = tokens.len() - 1;
		let chunk_size = transitions.div_ceil(chunks);

		thread::scope(|scope| {
			let handles: Vec<_> = (0..transitions)
				.step_by(chunk_size)
				.map(|start| {
					let end = (start + chunk_size).min(transitions);
					let slice = &tokens[start..=end];
					scope.spawn(move || Chain::tally(slice))
				})
				.collect();

			let mut chain = Chain::empty();
			for handle in handles {
				match handle.join() {
					Ok(partial) => chain.merge(&partial),
					Err(panic) => std::panic::resume_unwind(panic),
				}
			}
			chain
		})
	}
}
