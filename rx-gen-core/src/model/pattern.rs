use std::fmt;
use std::marker::PhantomData;
use std::panic;
use std::sync::mpsc;
use std::thread;

use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::ast::Node;
use super::domain::{ByteDomain, DomainKind, SymbolDomain, TextDomain};
use super::generation_config::{GenerationConfig, SeedStrategy};
use super::generator::generate;
use super::parser::parse;
use super::range_set::RangeSet;
use crate::error::GenError;

/// A compiled text pattern.
pub type TextPattern = Pattern<TextDomain>;

/// A compiled byte pattern.
pub type BytePattern = Pattern<ByteDomain>;

/// On-disk form of a compiled pattern.
#[derive(Serialize, Deserialize)]
struct StoredPattern {
	kind: DomainKind,
	ast: Node,
}

/// A parsed pattern bound to its symbol domain.
///
/// Compiling once and generating many times skips the parse on every call.
/// A `Pattern` holds no generation state: it can be shared between threads,
/// and each `generate*` call builds its own domain model and random source.
pub struct Pattern<D: SymbolDomain> {
	ast: Node,
	domain: PhantomData<fn() -> D>,
}

impl<D: SymbolDomain> Clone for Pattern<D> {
	fn clone(&self) -> Self {
		Self { ast: self.ast.clone(), domain: PhantomData }
	}
}

impl<D: SymbolDomain> fmt::Debug for Pattern<D> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Pattern").field("kind", &D::KIND).field("ast", &self.ast).finish()
	}
}

impl<D: SymbolDomain> Pattern<D> {
	/// Parses `pattern`.
	///
	/// # Errors
	/// `PatternSyntax` or `UnsupportedConstruct`, see [`parse`].
	pub fn compile(pattern: &D::Pattern) -> Result<Self, GenError> {
		let domain = D::default();
		let ast = parse(pattern, &domain)?;
		debug!("compiled {:?} pattern", D::KIND);
		Ok(Self { ast, domain: PhantomData })
	}

	/// Returns the parsed tree.
	pub fn ast(&self) -> &Node {
		&self.ast
	}

	/// Generates one match, seeding a fresh random source from `config.seed`.
	pub fn generate(&self, config: &GenerationConfig) -> Result<D::Value, GenError> {
		let mut rng = config.seed.rng();
		self.generate_with(&mut rng, config)
	}

	/// Generates one match from a caller-supplied random source.
	///
	/// `config.seed` is ignored.
	pub fn generate_with<R: Rng + ?Sized>(&self, rng: &mut R, config: &GenerationConfig) -> Result<D::Value, GenError> {
		let domain = D::default();
		let symbols = generate(&self.ast, &domain, rng, config)?;
		Ok(domain.encode(&symbols))
	}

	/// Generates `count` matches on a pool of worker threads.
	///
	/// Work is split into chunks (one per CPU) and collected over a channel.
	/// With `SeedStrategy::Fixed(seed)`, item `i` is generated from seed
	/// `seed + i`, so the batch is identical to `count` sequential calls and
	/// does not depend on the number of workers.
	///
	/// # Errors
	/// The first error in item order. No partial batch is returned.
	///
	/// # Panics
	/// A panic in a worker is resumed on the calling thread.
	pub fn generate_batch(&self, count: usize, config: &GenerationConfig) -> Result<Vec<D::Value>, GenError>
	where
		D: 'static,
		D::Value: Send + 'static,
	{
		if count == 0 {
			return Ok(Vec::new());
		}

		let workers = num_cpus::get().max(1);
		let chunk_size = count.div_ceil(workers);
		debug!("generating {} matches in chunks of {}", count, chunk_size);

		let (tx, rx) = mpsc::channel();
		let mut handles = Vec::with_capacity(workers);
		let mut start = 0;
		while start < count {
			let end = (start + chunk_size).min(count);
			let tx = tx.clone();
			let pattern = self.clone();
			let config = config.clone();

			handles.push(thread::spawn(move || {
				let mut chunk_rng = config.seed.rng();
				let values: Result<Vec<D::Value>, GenError> = (start..end)
					.map(|index| match config.seed {
						SeedStrategy::Fixed(seed) => {
							let mut rng = SeedStrategy::Fixed(seed.wrapping_add(index as u64)).rng();
							pattern.generate_with(&mut rng, &config)
						}
						SeedStrategy::Random => pattern.generate_with(&mut chunk_rng, &config),
					})
					.collect();
				// The receiver lives until every sender is dropped.
				let _ = tx.send((start, values));
			}));

			start = end;
		}
		drop(tx);

		let mut chunks: Vec<(usize, Result<Vec<D::Value>, GenError>)> = rx.iter().collect();
		for handle in handles {
			// A worker that died sent nothing; never hand back a short batch.
			if let Err(payload) = handle.join() {
				panic::resume_unwind(payload);
			}
		}
		chunks.sort_by_key(|(start, _)| *start);

		let mut values = Vec::with_capacity(count);
		for (_, chunk) in chunks {
			values.extend(chunk?);
		}
		Ok(values)
	}

	/// Serializes the compiled pattern with `postcard`.
	pub fn to_bytes(&self) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
		let stored = StoredPattern { kind: D::KIND, ast: self.ast.clone() };
		Ok(postcard::to_stdvec(&stored)?)
	}

	/// Loads a pattern written by [`Pattern::to_bytes`].
	///
	/// # Errors
	/// Returns an error if the bytes do not decode, if they hold a pattern
	/// compiled for the other domain, or if the tree is not one the parser
	/// could have built.
	pub fn from_bytes(bytes: &[u8]) -> Result<Self, Box<dyn std::error::Error>> {
		let stored: StoredPattern = postcard::from_bytes(bytes)?;
		if stored.kind != D::KIND {
			return Err(format!("Domain mismatch: stored={:?}, expected={:?}", stored.kind, D::KIND).into());
		}
		check_tree(&stored.ast, &D::default()).map_err(|reason| format!("Corrupt pattern: {}", reason))?;
		Ok(Self { ast: stored.ast, domain: PhantomData })
	}
}

/// Checks the shape every parsed tree has.
fn check_tree<D: SymbolDomain>(node: &Node, domain: &D) -> Result<(), String> {
	match node {
		Node::Literal(symbol) if !domain.full_range().contains(*symbol) => {
			Err(format!("literal {:#x} is outside the {:?} domain", symbol, D::KIND))
		}
		Node::CharClass { ranges, .. } if ranges.is_empty() => Err("empty character class".to_owned()),
		Node::CharClass { ranges, .. } if RangeSet::new(ranges.ranges().iter().copied()) != *ranges => {
			Err("character class ranges are not canonical".to_owned())
		}
		Node::Literal(_) | Node::Wildcard | Node::CharClass { .. } | Node::MetaClass(_) | Node::Anchor(_) => Ok(()),
		Node::Concat(children) => children.iter().try_for_each(|child| check_tree(child, domain)),
		Node::Alternation(branches) if branches.len() < 2 => Err("alternation with fewer than two branches".to_owned()),
		Node::Alternation(branches) => branches.iter().try_for_each(|branch| check_tree(branch, domain)),
		Node::Repeat { min, max: Some(max), .. } if min > max => Err(format!("repeat bounds {{{},{}}}", min, max)),
		Node::Repeat { body, .. }
		| Node::Group { body, .. }
		| Node::Lookahead { body, .. }
		| Node::Lookbehind { body, .. } => check_tree(body, domain),
	}
}
