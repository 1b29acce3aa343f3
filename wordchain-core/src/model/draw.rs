use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A source of uniform random integers.
///
/// The generator only ever asks for a value in `[0, bound)`: `bound` is 100
/// for a weighted pick and the number of chain keys for a fallback pick.
pub trait DrawSource {
	/// Returns a value in `[0, bound)`. `bound` is never zero.
	fn draw_below(&mut self, bound: usize) -> usize;
}

impl<D: DrawSource + ?Sized> DrawSource for &mut D {
	fn draw_below(&mut self, bound: usize) -> usize {
		(**self).draw_below(bound)
	}
}

/// Draw source backed by a `rand` generator.
#[derive(Clone, Debug)]
pub struct RandomSource<R = StdRng> {
	rng: R,
	seed: Option<u64>,
}

impl RandomSource<StdRng> {
	/// Deterministic source: the same seed always yields the same draws.
	pub fn seeded(seed: u64) -> Self {
		Self {
			rng: StdRng::seed_from_u64(seed),
			seed: Some(seed),
		}
	}

	/// Source seeded from the wall clock, for interactive use.
	///
	/// The seed is kept (see `seed`) so a run can be replayed.
	pub fn from_clock() -> Self {
		let seed = SystemTime::now()
			.duration_since(UNIX_EPOCH)
			.map(|d| d.as_nanos() as u64)
			.unwrap_or_default();
		log::debug!("seeding draws from clock: {}", seed);
		Self::seeded(seed)
	}
}

impl<R: Rng> RandomSource<R> {
	/// Wraps an existing generator. No seed is recorded.
	pub fn from_rng(rng: R) -> Self {
		Self { rng, seed: None }
	}

	pub fn seed(&self) -> Option<u64> {
		self.seed
	}
}

impl<R: Rng> DrawSource for RandomSource<R> {
	fn draw_below(&mut self, bound: usize) -> usize {
		self.rng.random_range(0..bound)
	}
}

/// Replays a fixed list of draws, cycling when exhausted.
///
/// Each value is reduced modulo the requested bound, so a recorded draw
/// can be reused against a chain of any size.
#[derive(Clone, Debug)]
pub struct ReplaySource {
	draws: Vec<usize>,
	next: usize,
}

impl ReplaySource {
	/// # Panics
	/// Panics if `draws` is empty.
	pub fn new(draws: Vec<usize>) -> Self {
		assert!(!draws.is_empty(), "ReplaySource needs at least one draw");
		Self { draws, next: 0 }
	}

	/// Number of draws consumed so far.
	pub fn consumed(&self) -> usize {
		self.next
	}
}

impl DrawSource for ReplaySource {
	fn draw_below(&mut self, bound: usize) -> usize {
		let value = self.draws[self.next % self.draws.len()];
		self.next += 1;
		value % bound
	}
}
