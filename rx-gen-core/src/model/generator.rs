use log::{trace, warn};
use rand::Rng;

use super::ast::Node;
use super::domain::{LINE_TERMINATOR, SymbolDomain};
use super::generation_config::GenerationConfig;
use super::range_set::RangeSet;
use crate::error::GenError;

/// Top-level terms of a pattern, with the lookarounds that get materialized.
///
/// A positive lookbehind that opens the pattern, or a positive lookahead
/// that closes it, can have its body emitted without conflicting with any
/// other term. Every other lookaround emits nothing and is not guaranteed to
/// hold in the output.
///
/// The plan is computed once, structurally, before generation starts.
#[derive(Debug)]
pub struct BoundaryPlan<'n> {
	terms: &'n [Node],
	lead: bool,
	trail: bool,
}

impl<'n> BoundaryPlan<'n> {
	pub fn new(ast: &'n Node) -> Self {
		// A single enclosing `(?:...)` does not hide the boundary terms.
		let top = match ast {
			Node::Group { body, capturing: false, .. } => body.as_ref(),
			_ => ast,
		};
		let terms = match top {
			Node::Concat(children) => children.as_slice(),
			_ => std::slice::from_ref(top),
		};

		let lead = matches!(terms.first(), Some(Node::Lookbehind { negative: false, .. }));
		let trail = matches!(terms.last(), Some(Node::Lookahead { negative: false, .. }));

		Self { terms, lead, trail }
	}

	/// `true` if the first term is a lookbehind whose body is emitted.
	pub fn materializes_lead(&self) -> bool {
		self.lead
	}

	/// `true` if the last term is a lookahead whose body is emitted.
	pub fn materializes_trail(&self) -> bool {
		self.trail
	}
}

/// Generates one match of `ast` as a sequence of domain symbols.
///
/// # Errors
/// - `EmptyDomain` if a class leaves nothing to pick from
/// - `GenerationLimitExceeded` if the expansion goes past
///   `config.expansion_limit()`
pub fn generate<D, R>(ast: &Node, domain: &D, rng: &mut R, config: &GenerationConfig) -> Result<Vec<u32>, GenError>
where
	D: SymbolDomain,
	R: Rng + ?Sized,
{
	let plan = BoundaryPlan::new(ast);
	let mut generator = Generator::new(domain, rng, config);
	let last = plan.terms.len().saturating_sub(1);

	for (index, term) in plan.terms.iter().enumerate() {
		match term {
			Node::Lookbehind { body, .. } if index == 0 && plan.lead => {
				trace!("materializing leading lookbehind");
				generator.emit(body)?;
			}
			Node::Lookahead { body, .. } if index == last && plan.trail => {
				trace!("materializing trailing lookahead");
				generator.emit(body)?;
			}
			_ => generator.emit(term)?,
		}
	}

	Ok(generator.out)
}

/// Per-call generation state. Dropped when the call returns.
struct Generator<'a, D: SymbolDomain, R: Rng + ?Sized> {
	domain: &'a D,
	rng: &'a mut R,
	repeat_cap: u32,
	limit: usize,
	expansion: usize,
	wildcard: RangeSet,
	out: Vec<u32>,
}

impl<'a, D: SymbolDomain, R: Rng + ?Sized> Generator<'a, D, R> {
	fn new(domain: &'a D, rng: &'a mut R, config: &GenerationConfig) -> Self {
		Self {
			domain,
			rng,
			repeat_cap: config.repeat_cap(),
			limit: config.expansion_limit(),
			expansion: 0,
			wildcard: domain.complement(&RangeSet::single(LINE_TERMINATOR)),
			out: Vec::new(),
		}
	}

	/// Counts one unit of work against the expansion limit.
	fn tick(&mut self) -> Result<(), GenError> {
		self.expansion += 1;
		if self.expansion > self.limit {
			warn!("generation aborted after {} expansion steps", self.limit);
			return Err(GenError::GenerationLimitExceeded { limit: self.limit });
		}
		Ok(())
	}

	fn push(&mut self, symbol: u32) -> Result<(), GenError> {
		self.tick()?;
		self.out.push(symbol);
		Ok(())
	}

	fn emit(&mut self, node: &Node) -> Result<(), GenError> {
		match node {
			Node::Literal(symbol) => self.push(*symbol),
			Node::Wildcard => {
				let symbol = self.domain.pick_uniform(&self.wildcard, "the wildcard", &mut *self.rng)?;
				self.push(symbol)
			}
			Node::CharClass { ranges, negated } => {
				let (set, what) = if *negated {
					(self.domain.complement(ranges), "a negated character class")
				} else {
					(self.domain.restrict(ranges), "a character class")
				};
				let symbol = self.domain.pick_uniform(&set, what, &mut *self.rng)?;
				self.push(symbol)
			}
			Node::MetaClass(kind) => {
				let set = self.domain.resolve_meta(*kind);
				let symbol = self.domain.pick_uniform(&set, "a meta class", &mut *self.rng)?;
				self.push(symbol)
			}
			Node::Concat(children) => {
				for child in children {
					self.emit(child)?;
				}
				Ok(())
			}
			Node::Alternation(branches) => {
				let index = self.rng.random_range(0..branches.len().max(1));
				match branches.get(index) {
					Some(branch) => self.emit(branch),
					None => Ok(()),
				}
			}
			Node::Group { body, .. } => self.emit(body),
			Node::Repeat { body, min, max, .. } => {
				// Greediness does not restrict the legal counts.
				let upper = max.unwrap_or_else(|| min.saturating_add(self.repeat_cap));
				if upper < *min {
					return Err(GenError::syntax(0, format!("repeat minimum {} exceeds maximum {}", min, upper)));
				}
				let count = self.rng.random_range(*min..=upper);
				trace!("repeating {} times in [{}, {}]", count, min, upper);
				for _ in 0..count {
					self.tick()?;
					self.emit(body)?;
				}
				Ok(())
			}
			Node::Lookahead { .. } | Node::Lookbehind { .. } | Node::Anchor(_) => Ok(()),
		}
	}
}
