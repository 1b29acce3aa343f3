use std::fmt;

use serde::Serialize;

use crate::error::{Error, Result};

/// A lowercase ASCII alphanumeric word.
///
/// Tokens compare by content. The only ways to obtain one are the
/// tokenizer and `Token::from_word`, both of which fold case.
#[derive(Serialize, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
	/// Builds a token from a caller-supplied word (e.g. a start word).
	///
	/// ASCII letters are folded to lowercase.
	///
	/// # Errors
	/// Returns `Error::InvalidWord` if `word` is empty or holds anything
	/// but ASCII letters and digits.
	pub fn from_word(word: &str) -> Result<Self> {
		if word.is_empty() || !word.bytes().all(|b| b.is_ascii_alphanumeric()) {
			return Err(Error::InvalidWord(word.to_owned()));
		}
		Ok(Self(word.to_ascii_lowercase()))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for Token {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl AsRef<str> for Token {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

/// Splits raw bytes into lowercase word tokens.
///
/// - A token is a maximal run of ASCII alphanumeric bytes
/// - Every other byte (including any non-ASCII byte) is a separator
/// - Order of appearance is preserved
///
/// # Errors
/// Returns `Error::EmptyCorpus` if no token is found.
pub fn tokenize(raw: &[u8]) -> Result<Vec<Token>> {
	let tokens: Vec<Token> = raw
		.split(|b| !b.is_ascii_alphanumeric())
		.filter(|run| !run.is_empty())
		.map(|run| {
			// Runs only hold ASCII alphanumerics
			let word: String = run.iter().map(|b| b.to_ascii_lowercase() as char).collect();
			Token(word)
		})
		.collect();

	if tokens.is_empty() {
		return Err(Error::EmptyCorpus);
	}
	Ok(tokens)
}

/// The ordered token sequence of a corpus.
///
/// Built once from raw text and only read afterwards; usually dropped
/// as soon as the chain has been built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Corpus {
	tokens: Vec<Token>,
}

impl Corpus {
	/// Tokenizes `raw` into a corpus.
	///
	/// # Errors
	/// Returns `Error::EmptyCorpus` if the text holds no word.
	pub fn from_bytes(raw: &[u8]) -> Result<Self> {
		let tokens = tokenize(raw)?;
		log::info!("Source size {}", tokens.len());
		Ok(Self { tokens })
	}

	pub fn tokens(&self) -> &[Token] {
		&self.tokens
	}

	/// Number of tokens (the "source size").
	pub fn len(&self) -> usize {
		self.tokens.len()
	}

	pub fn is_empty(&self) -> bool {
		self.tokens.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn words(tokens: &[Token]) -> Vec<&str> {
		tokens.iter().map(Token::as_str).collect()
	}

	#[test]
	fn folds_case() {
		let tokens = tokenize(b"Love Love LOVE").unwrap();
		assert_eq!(words(&tokens), ["love", "love", "love"]);
	}

	#[test]
	fn strips_boundaries() {
		let tokens = tokenize(b"  hi, there!! 42nd  ").unwrap();
		assert_eq!(words(&tokens), ["hi", "there", "42nd"]);
	}

	#[test]
	fn non_ascii_bytes_are_separators() {
		let tokens = tokenize("caf\u{e9} na\u{ef}ve".as_bytes()).unwrap();
		assert_eq!(words(&tokens), ["caf", "na", "ve"]);
	}

	#[test]
	fn retokenizing_joined_tokens_is_stable() {
		let tokens = tokenize(b"The cat -- sat; ON the MAT...\n\tagain!").unwrap();
		let joined = words(&tokens).join(" ");
		assert_eq!(tokenize(joined.as_bytes()).unwrap(), tokens);
	}

	#[test]
	fn empty_or_separator_only_input_fails() {
		assert!(matches!(tokenize(b""), Err(Error::EmptyCorpus)));
		assert!(matches!(tokenize(b" .,!? \n"), Err(Error::EmptyCorpus)));
	}

	#[test]
	fn corpus_reports_size() {
		let corpus = Corpus::from_bytes(b"one two, three.").unwrap();
		assert_eq!(corpus.len(), 3);
		assert!(!corpus.is_empty());
		assert_eq!(words(corpus.tokens()), ["one", "two", "three"]);
	}

	#[test]
	fn from_word_folds_ascii() {
		assert_eq!(Token::from_word("ThE").unwrap(), tokenize(b"the").unwrap()[0]);
		assert_eq!(Token::from_word("42nd").unwrap().as_str(), "42nd");
	}

	#[test]
	fn from_word_rejects_separators_and_non_ascii() {
		for word in ["", "hello world", "cat,", "\u{c9}t\u{e9}", "Hello World, \u{c9}T\u{c9}!"] {
			assert!(
				matches!(Token::from_word(word), Err(Error::InvalidWord(w)) if w == word),
				"{word:?} was accepted"
			);
		}
	}
}
