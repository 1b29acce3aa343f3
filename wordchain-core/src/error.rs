use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),

	#[error("corpus contains no words")]
	EmptyCorpus,

	#[error("corpus needs at least two words to form a transition")]
	NoTransitions,

	#[error("'{0}' is not a word: only ASCII letters and digits are allowed")]
	InvalidWord(String),

	#[error("start word '{0}' does not appear in the chain")]
	UnknownStartWord(String),
}

impl Error {
	/// Returns `true` for errors caused by the corpus content rather than
	/// by the environment.
	pub fn is_corpus_error(&self) -> bool {
		matches!(self, Error::EmptyCorpus | Error::NoTransitions)
	}
}

pub type Result<T> = std::result::Result<T, Error>;
