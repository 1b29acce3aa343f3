use std::str::FromStr;

use super::draw::RandomSource;
use super::tokenizer::Token;

/// Number of transitions walked when the caller does not say otherwise.
pub const DEFAULT_STEPS: usize = 20;

/// Strategy used to select the first word of a generated sequence.
///
/// # Variants
/// - `First`: the chain's first key, i.e. the first word of the corpus.
/// - `Random`: a key drawn uniformly from the chain.
/// - `Custom(String)`: the given word, folded to lowercase. It does not
///   need to be a key of the chain unless the input is strict.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum StartWord {
	#[default]
	First,
	Random,
	Custom(String),
}

impl FromStr for StartWord {
	type Err = String;

	/// Parses `first`, `random` or `custom:<word>` (prefixes are
	/// case-insensitive). A custom word must be ASCII alphanumeric.
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let lower = s.to_ascii_lowercase();
		match lower.as_str() {
			"first" => Ok(StartWord::First),
			"random" => Ok(StartWord::Random),
			_ if lower.starts_with("custom:") => {
				let value = &s["custom:".len()..];
				if value.is_empty() {
					return Err("Custom start word cannot be empty".to_owned());
				}
				Token::from_word(value).map_err(|e| e.to_string())?;
				Ok(StartWord::Custom(value.to_owned()))
			}
			_ => Err("Start word must be 'first', 'random' or 'custom:<word>'".to_owned()),
		}
	}
}

/// Parameters of one generation run.
///
/// # Invariants
/// - `steps` counts transitions: a run yields at most `steps + 1` words
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationInput {
	/// Number of transitions to walk.
	pub steps: usize,

	/// How the first word is chosen.
	pub start: StartWord,

	/// Reject a custom start word that is not a key of the chain.
	pub strict: bool,

	/// Fixed seed for reproducible runs; the clock is used when absent.
	pub seed: Option<u64>,
}

impl Default for GenerationInput {
	fn default() -> Self {
		Self {
			steps: DEFAULT_STEPS,
			start: StartWord::First,
			strict: false,
			seed: None,
		}
	}
}

impl GenerationInput {
	/// Builds the draw source for this run.
	pub fn draw_source(&self) -> RandomSource {
		match self.seed {
			Some(seed) => RandomSource::seeded(seed),
			None => RandomSource::from_clock(),
		}
	}
}
