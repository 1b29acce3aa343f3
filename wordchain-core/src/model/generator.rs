use crate::error::{Error, Result};
use crate::model::chain::Chain;
use crate::model::draw::DrawSource;
use crate::model::generation_input::{GenerationInput, StartWord};
use crate::model::tokenizer::Token;

/// Draws used for a weighted pick fall in `[0, WEIGHT_SCALE)`.
const WEIGHT_SCALE: usize = 100;

/// Position of a walk over a chain.
///
/// Borrows the chain; many states can walk the same chain at once.
#[derive(Clone, Debug)]
pub struct GenerationState<'c> {
	chain: &'c Chain,
	current: Token,
}

impl<'c> GenerationState<'c> {
	/// Starts a walk at `start`, which does not have to be a key.
	pub fn new(chain: &'c Chain, start: Token) -> Self {
		Self { chain, current: start }
	}

	pub fn current(&self) -> &Token {
		&self.current
	}

	/// Moves to the next word and returns it.
	///
	/// - Draws `r` in `[0, 100)` and picks the successor whose weight range
	///   contains it.
	/// - When nothing matches (rounding residual, no successor, or the
	///   current word is not a key), a key is drawn uniformly instead.
	///
	/// Returns `None` only if the chain is empty.
	pub fn advance<D: DrawSource + ?Sized>(&mut self, draws: &mut D) -> Option<&Token> {
		if self.chain.is_empty() {
			return None;
		}

		let r = draws.draw_below(WEIGHT_SCALE);
		let picked = self.chain.get(&self.current).and_then(|entry| entry.select(r));

		let next = match picked {
			Some(word) => word.clone(),
			None => {
				let index = draws.draw_below(self.chain.len());
				log::trace!("no successor of '{}' for draw {}, jumping to key #{}", self.current, r, index);
				self.chain.key_at(index)?.clone()
			}
		};

		self.current = next;
		Some(&self.current)
	}
}

/// Endless walk over a chain, yielding each new word.
///
/// Ends only if the chain is empty.
pub struct Walk<'c, D> {
	state: GenerationState<'c>,
	draws: D,
}

impl<D: DrawSource> Iterator for Walk<'_, D> {
	type Item = Token;

	fn next(&mut self) -> Option<Token> {
		self.state.advance(&mut self.draws).cloned()
	}
}

/// High-level generator over a read-only chain.
///
/// # Responsibilities
/// - Resolve the start word of a run
/// - Walk the chain for a fixed number of steps
/// - Optionally validate the start word (strict mode)
#[derive(Clone, Copy, Debug)]
pub struct Generator<'c> {
	chain: &'c Chain,
}

impl<'c> Generator<'c> {
	pub fn new(chain: &'c Chain) -> Self {
		Self { chain }
	}

	/// Returns a walk starting at `start`. The start word itself is not
	/// yielded.
	pub fn walk<D: DrawSource>(&self, start: Token, draws: D) -> Walk<'c, D> {
		Walk {
			state: GenerationState::new(self.chain, start),
			draws,
		}
	}

	/// Generates `steps` transitions from `start`.
	///
	/// The result starts with `start` and holds `steps + 1` words (fewer
	/// only for an empty chain). An unknown start word is tolerated: the
	/// first step falls back to a random key.
	pub fn generate<D: DrawSource>(&self, start: &Token, steps: usize, draws: D) -> Vec<Token> {
		let mut words = Vec::with_capacity(steps + 1);
		words.push(start.clone());
		words.extend(self.walk(start.clone(), draws).take(steps));
		words
	}

	/// Same as `generate`, but rejects a start word that is not a key.
	///
	/// # Errors
	/// Returns `Error::UnknownStartWord` if `start` is not in the chain.
	pub fn generate_strict<D: DrawSource>(&self, start: &Token, steps: usize, draws: D) -> Result<Vec<Token>> {
		if !self.chain.contains(start) {
			return Err(Error::UnknownStartWord(start.to_string()));
		}
		Ok(self.generate(start, steps, draws))
	}

	/// Resolves a `StartWord` against the chain.
	///
	/// `Random` consumes one draw.
	///
	/// # Errors
	/// - `Error::NoTransitions` if a key is needed and the chain is empty
	/// - `Error::InvalidWord` for a custom word that is not a valid token
	/// - `Error::UnknownStartWord` for an absent custom word when `strict`
	pub fn resolve_start<D: DrawSource + ?Sized>(&self, start: &StartWord, strict: bool, draws: &mut D) -> Result<Token> {
		match start {
			StartWord::First => self.chain.key_at(0).cloned().ok_or(Error::NoTransitions),
			StartWord::Random => {
				if self.chain.is_empty() {
					return Err(Error::NoTransitions);
				}
				let index = draws.draw_below(self.chain.len());
				self.chain.key_at(index).cloned().ok_or(Error::NoTransitions)
			}
			StartWord::Custom(word) => {
				let token = Token::from_word(word)?;
				if strict && !self.chain.contains(&token) {
					return Err(Error::UnknownStartWord(token.to_string()));
				}
				Ok(token)
			}
		}
	}

	/// Runs a generation described by `input`, with its own draw source.
	pub fn run(&self, input: &GenerationInput) -> Result<Vec<Token>> {
		let draws = input.draw_source();
		if let Some(seed) = draws.seed() {
			log::info!("generation seed: {}", seed);
		}
		self.run_with(input, draws)
	}

	/// Runs a generation described by `input` with the given draws.
	///
	/// `input.seed` is ignored.
	pub fn run_with<D: DrawSource>(&self, input: &GenerationInput, mut draws: D) -> Result<Vec<Token>> {
		let start = self.resolve_start(&input.start, input.strict, &mut draws)?;
		log::debug!("walking {} steps from '{}'", input.steps, start);
		Ok(self.generate(&start, input.steps, draws))
	}
}
