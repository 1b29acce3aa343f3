use wordchain_core::Error;
use wordchain_core::model::chain::{Chain, ChainBuilder};
use wordchain_core::model::draw::{DrawSource, RandomSource, ReplaySource};
use wordchain_core::model::generator::Generator;
use wordchain_core::model::tokenizer::{Corpus, Token, tokenize};

const CORPUS: &[u8] = b"the cat sat. the dog sat. the cat ran.";

const LONG_CORPUS: &str = "Whan that Aprille with his shoures soote, the droghte of March hath \
	perced to the roote, and bathed every veyne in swich licour of which vertu engendred is the \
	flour; whan Zephirus eek with his sweete breeth inspired hath in every holt and heeth the \
	tendre croppes, and the yonge sonne hath in the Ram his half cours yronne, and smale foweles \
	maken melodye, that slepen al the nyght with open ye.";

fn build(text: &[u8]) -> (Vec<Token>, Chain) {
	let tokens = tokenize(text).unwrap();
	let chain = ChainBuilder::new().build(&tokens).unwrap();
	(tokens, chain)
}

#[test]
fn reference_corpus_walkthrough() {
	let (tokens, chain) = build(CORPUS);
	let words: Vec<&str> = tokens.iter().map(Token::as_str).collect();
	assert_eq!(words, ["the", "cat", "sat", "the", "dog", "sat", "the", "cat", "ran"]);

	let the = chain.lookup("the").unwrap();
	let weights: Vec<(&str, u8)> = the.successors().iter().map(|s| (s.word().as_str(), s.weight())).collect();
	assert_eq!(weights, [("cat", 66), ("dog", 33)]);

	let out = Generator::new(&chain).generate(&Token::from_word("the").unwrap(), 1, ReplaySource::new(vec![20]));
	assert_eq!(out[1].as_str(), "cat");
}

#[test]
fn every_entry_respects_the_weight_bound() {
	let (_, chain) = build(LONG_CORPUS.as_bytes());
	for entry in chain.entries() {
		assert!(entry.weight_sum() <= 100, "{} sums to {}", entry.word(), entry.weight_sum());
		assert!(entry.successors().iter().all(|s| s.weight() <= 100));
	}
}

#[test]
fn every_observed_transition_is_in_the_chain() {
	let (tokens, chain) = build(LONG_CORPUS.as_bytes());
	for pair in tokens.windows(2) {
		let entry = chain.get(&pair[0]).unwrap();
		assert!(entry.successor(pair[1].as_str()).is_some(), "{} -> {}", pair[0], pair[1]);
	}
	assert_eq!(chain.transitions(), tokens.len() - 1);
}

#[test]
fn parallel_builder_agrees_on_a_real_text() {
	let tokens = tokenize(LONG_CORPUS.as_bytes()).unwrap();
	let sequential = ChainBuilder::new().build(&tokens).unwrap();
	let parallel = ChainBuilder::parallel().build(&tokens).unwrap();
	assert_eq!(parallel, sequential);
}

#[test]
fn generation_always_has_the_requested_length() {
	let (_, chain) = build(LONG_CORPUS.as_bytes());
	let generator = Generator::new(&chain);
	for (i, start) in chain.keys().enumerate() {
		let out = generator.generate(start, 20, RandomSource::seeded(i as u64));
		assert_eq!(out.len(), 21);
	}
}

#[test]
fn fallback_keeps_generation_alive_at_the_final_word() {
	// "ye" only occurs last, so it is never a key
	let (_, chain) = build(LONG_CORPUS.as_bytes());
	assert!(chain.lookup("ye").is_none());

	let generator = Generator::new(&chain);
	let out = generator.generate(&Token::from_word("ye").unwrap(), 1, RandomSource::seeded(11));
	assert!(chain.contains(&out[1]));
}

#[test]
fn seeded_runs_with_identical_draws_match() {
	let (_, chain) = build(LONG_CORPUS.as_bytes());
	let generator = Generator::new(&chain);
	let start = Token::from_word("the").unwrap();

	let mut recorded = RandomSource::seeded(77);
	let draws: Vec<usize> = (0..200).map(|_| recorded.draw_below(100)).collect();

	let left = generator.generate(&start, 40, ReplaySource::new(draws.clone()));
	let right = generator.generate(&start, 40, ReplaySource::new(draws));
	assert_eq!(left, right);
}

#[test]
fn corpus_errors_surface_before_generation() {
	assert!(matches!(Corpus::from_bytes(b"...!!!"), Err(Error::EmptyCorpus)));

	let corpus = Corpus::from_bytes(b"lonely").unwrap();
	let err = ChainBuilder::new().build(corpus.tokens()).unwrap_err();
	assert!(matches!(err, Error::NoTransitions));
	assert!(err.is_corpus_error());
}

#[test]
fn chain_serializes_entries_in_order() {
	let (_, chain) = build(CORPUS);
	let json = serde_json::to_value(&chain).unwrap();
	let first = &json["entries"][0];
	assert_eq!(first["word"], "the");
	assert_eq!(first["successors"][0]["word"], "cat");
	assert_eq!(first["successors"][0]["count"], 2);
	assert_eq!(first["successors"][0]["weight"], 66);
}
