use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use crate::error::Result;
use crate::model::chain::{Chain, ChainBuilder};
use crate::model::tokenizer::Corpus;

/// Reads a corpus file and returns its raw bytes.
///
/// - Reads the entire file into memory
/// - No decoding is attempted, the tokenizer works on ASCII bytes
pub fn read_corpus<P: AsRef<Path>>(filename: P) -> io::Result<Vec<u8>> {
	let mut contents = Vec::new();
	File::open(filename)?.read_to_end(&mut contents)?;
	Ok(contents)
}

/// Reads, tokenizes and builds a chain from a corpus file.
///
/// Returns the corpus size (number of tokens) along with the chain, since
/// the corpus itself is dropped once the chain exists.
///
/// # Errors
/// - `Error::Io` if the file cannot be opened or read
/// - `Error::EmptyCorpus` / `Error::NoTransitions` if the text is too short
pub fn load_chain<P: AsRef<Path>>(filename: P, builder: &ChainBuilder) -> Result<(usize, Chain)> {
	let path = filename.as_ref();
	let bytes = read_corpus(path)?;
	log::debug!("read {} bytes from {}", bytes.len(), path.display());

	let corpus = Corpus::from_bytes(&bytes)?;
	let chain = builder.build(corpus.tokens())?;
	Ok((corpus.len(), chain))
}
