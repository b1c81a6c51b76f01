use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

/// Extra repetitions allowed past `min` for `*`, `+` and `{m,}`.
pub const REPEAT_CAP: u32 = 10;

/// Default bound on emitted symbols plus repetition iterations.
pub const EXPANSION_LIMIT: usize = 1 << 16;

/// Strategy used to seed the random source of a generation call.
///
/// # Variants
/// - `Random`: draw a fresh seed from the thread-local generator.
/// - `Fixed(u64)`: reproducible output for a given pattern and seed.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SeedStrategy {
	#[default]
	Random,
	Fixed(u64),
}

impl SeedStrategy {
	/// Builds the call-local random source.
	pub fn rng(&self) -> StdRng {
		match self {
			SeedStrategy::Random => StdRng::from_rng(&mut rand::rng()),
			SeedStrategy::Fixed(seed) => StdRng::seed_from_u64(*seed),
		}
	}
}

impl From<Option<u64>> for SeedStrategy {
	fn from(seed: Option<u64>) -> Self {
		match seed {
			Some(seed) => SeedStrategy::Fixed(seed),
			None => SeedStrategy::Random,
		}
	}
}

/// Parameters of a generation call.
///
/// # Responsibilities
/// - Select the seeding strategy (`seed`)
/// - Bound unbounded repetitions (`repeat_cap`)
/// - Bound the total work of a call (`expansion_limit`)
///
/// # Invariants
/// - `expansion_limit` is strictly positive
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct GenerationConfig {
	/// Seeding strategy for the random source.
	pub seed: SeedStrategy,

	/// Unbounded repeats pick their count in `[min, min + repeat_cap]`.
	repeat_cap: u32,

	/// Maximum cumulative expansion before `GenerationLimitExceeded`.
	expansion_limit: usize,
}

impl Default for GenerationConfig {
	fn default() -> Self {
		Self { seed: SeedStrategy::Random, repeat_cap: REPEAT_CAP, expansion_limit: EXPANSION_LIMIT }
	}
}

impl GenerationConfig {
	/// Default configuration with a fixed seed.
	pub fn seeded(seed: u64) -> Self {
		Self { seed: SeedStrategy::Fixed(seed), ..Self::default() }
	}

	pub fn repeat_cap(&self) -> u32 {
		self.repeat_cap
	}

	pub fn expansion_limit(&self) -> usize {
		self.expansion_limit
	}

	/// Sets the headroom of unbounded repeats.
	///
	/// Any value is accepted. `0` makes `a*` always generate nothing and
	/// `a{3,}` always generate exactly three copies.
	pub fn set_repeat_cap(&mut self, repeat_cap: u32) {
		self.repeat_cap = repeat_cap;
	}

	/// Sets the expansion limit.
	///
	/// # Errors
	/// Returns an error if `limit` is zero.
	pub fn set_expansion_limit(&mut self, limit: usize) -> Result<(), String> {
		if limit == 0 {
			return Err("Expansion limit must be greater than 0".to_owned());
		}
		self.expansion_limit = limit;
		Ok(())
	}
}
