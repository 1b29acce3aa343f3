use std::collections::HashMap;

use serde::Serialize;

use super::tokenizer::Token;

/// One observed follower of a chain word.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Successor {
	word: Token,
	/// How many times this transition was observed.
	count: usize,
	/// `floor(count * 100 / total)`, valid once the entry is normalized.
	weight: u8,
}

impl Successor {
	pub fn word(&self) -> &Token {
		&self.word
	}

	pub fn count(&self) -> usize {
		self.count
	}

	pub fn weight(&self) -> u8 {
		self.weight
	}
}

/// Represents a word of the chain and every word observed right after it.
///
/// Conceptually, this is a node of a first-order Markov chain where
/// outgoing edges are weighted by their share of observations, expressed as
/// integer percentages.
///
/// ## Responsibilities:
/// - Accumulate transition occurrences during construction
/// - Turn occurrences into percentage weights
/// - Select a successor from a draw in `[0, 100)`
/// - Merge with another entry for the same word (parallel construction)
///
/// ## Invariants
/// - Successors are unique and kept in order of first observation
/// - Each count is strictly positive
/// - Weights sum to at most 100
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct ChainEntry {
	word: Token,
	successors: Vec<Successor>,
	#[serde(skip)]
	positions: HashMap<Token, usize>,
}

impl ChainEntry {
	/// Creates an entry with no successors.
	pub(crate) fn new(word: Token) -> Self {
		Self {
			word,
			successors: Vec::new(),
			positions: HashMap::new(),
		}
	}

	pub fn word(&self) -> &Token {
		&self.word
	}

	pub fn successors(&self) -> &[Successor] {
		&self.successors
	}

	/// Looks up a successor by word.
	pub fn successor(&self, word: &str) -> Option<&Successor> {
		let token = Token::from_word(word).ok()?;
		self.positions.get(&token).map(|&i| &self.successors[i])
	}

	/// Total number of observed transitions out of this word.
	pub fn total(&self) -> usize {
		self.successors.iter().map(|s| s.count).sum()
	}

	/// Sum of the successor weights; below 100 when flooring left a residual.
	pub fn weight_sum(&self) -> u32 {
		self.successors.iter().map(|s| u32::from(s.weight)).sum()
	}

	/// Records `count` occurrences of a transition toward `next`.
	///
	/// - If the successor already exists, its count is increased.
	/// - Otherwise, it is appended after the existing ones.
	pub(crate) fn add_transition(&mut self, next: &Token, count: usize) {
		match self.positions.get(next) {
			Some(&i) => self.successors[i].count += count,
			None => {
				self.positions.insert(next.clone(), self.successors.len());
				self.successors.push(Successor { word: next.clone(), count, weight: 0 });
			}
		}
	}

	/// Recomputes every weight from the raw counts.
	pub(crate) fn normalize(&mut self) {
		let total = self.total();
		if total == 0 {
			return;
		}
		for successor in &mut self.successors {
			// count <= total, so the result fits in 0..=100
			successor.weight = (successor.count * 100 / total) as u8;
		}
	}

	/// Selects the successor whose weight range contains `draw`.
	///
	/// Successor `k` owns `[L, L + weight)` where `L` is the sum of the
	/// weights stored before it. Returns `None` when `draw` falls past the
	/// last range (rounding residual) or there is no successor.
	pub fn select(&self, draw: usize) -> Option<&Token> {
		let mut lower = 0usize;
		for successor in &self.successors {
			let upper = lower + successor.weight as usize;
			if draw >= lower && draw < upper {
				return Some(&successor.word);
			}
			lower = upper;
		}
		None
	}

	/// Merges another entry for the same word into this one.
	///
	/// Counts are summed; successors unknown to `self` are appended in the
	/// order `other` first saw them. Weights must be recomputed afterwards.
	pub(crate) fn merge(&mut self, other: &Self) {
		debug_assert_eq!(self.word, other.word);
		for successor in &other.successors {
			self.add_transition(&successor.word, successor.count);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn token(word: &str) -> Token {
		Token::from_word(word).unwrap()
	}

	fn entry(word: &str, transitions: &[&str]) -> ChainEntry {
		let mut entry = ChainEntry::new(token(word));
		for next in transitions {
			entry.add_transition(&token(next), 1);
		}
		entry.normalize();
		entry
	}

	#[test]
	fn repeated_transitions_share_one_successor() {
		let entry = entry("the", &["cat", "dog", "cat"]);
		let words: Vec<&str> = entry.successors().iter().map(|s| s.word().as_str()).collect();
		assert_eq!(words, ["cat", "dog"]);
		assert_eq!(entry.successor("cat").unwrap().count(), 2);
		assert_eq!(entry.total(), 3);
	}

	#[test]
	fn weights_are_floored_percentages() {
		let entry = entry("the", &["cat", "dog", "cat"]);
		assert_eq!(entry.successor("cat").unwrap().weight(), 66);
		assert_eq!(entry.successor("dog").unwrap().weight(), 33);
		assert_eq!(entry.weight_sum(), 99);
	}

	#[test]
	fn select_walks_ranges_in_stored_order() {
		let entry = entry("the", &["cat", "dog", "cat"]);
		assert_eq!(entry.select(0).unwrap().as_str(), "cat");
		assert_eq!(entry.select(65).unwrap().as_str(), "cat");
		assert_eq!(entry.select(66).unwrap().as_str(), "dog");
		assert_eq!(entry.select(98).unwrap().as_str(), "dog");
		// [99, 100) is the rounding residual
		assert_eq!(entry.select(99), None);
	}

	#[test]
	fn select_without_successors_misses() {
		let entry = ChainEntry::new(token("end"));
		assert_eq!(entry.select(0), None);
		assert_eq!(entry.weight_sum(), 0);
	}

	#[test]
	fn many_distinct_successors_grow_without_cap() {
		let followers: Vec<String> = (0..250).map(|i| format!("w{i}")).collect();
		let refs: Vec<&str> = followers.iter().map(String::as_str).collect();
		let entry = entry("hub", &refs);
		assert_eq!(entry.successors().len(), 250);
		// 100 / 250 floors to zero for everyone
		assert!(entry.successors().iter().all(|s| s.weight() == 0));
		assert_eq!(entry.select(0), None);
	}

	#[test]
	fn merge_sums_counts_and_keeps_order() {
		let mut left = ChainEntry::new(token("a"));
		left.add_transition(&token("b"), 2);
		let mut right = ChainEntry::new(token("a"));
		right.add_transition(&token("c"), 1);
		right.add_transition(&token("b"), 1);

		left.merge(&right);
		left.normalize();

		let counts: Vec<(&str, usize)> =
			left.successors().iter().map(|s| (s.word().as_str(), s.count())).collect();
		assert_eq!(counts, [("b", 3), ("c", 1)]);
		assert_eq!(left.successor("b").unwrap().weight(), 75);
	}
}
