use std::sync::LazyLock;

use log::warn;
use rand::Rng;
use regex_syntax::hir::{Class, HirKind};
use serde::{Deserialize, Serialize};

use super::ast::MetaKind;
use super::range_set::RangeSet;
use crate::error::GenError;

/// Symbol excluded from the wildcard `.`.
pub const LINE_TERMINATOR: u32 = '\n' as u32;

const DIGIT: &[(u32, u32)] = &[(0x30, 0x39)];
const WORD: &[(u32, u32)] = &[(0x30, 0x39), (0x41, 0x5A), (0x5F, 0x5F), (0x61, 0x7A)];
const SPACE: &[(u32, u32)] = &[(0x09, 0x0D), (0x20, 0x20)];

/// Unicode-aware `\d`, `\w` and `\s`, as a conventional text matcher reads them.
struct UnicodeClasses {
	digit: RangeSet,
	word: RangeSet,
	space: RangeSet,
}

static UNICODE_CLASSES: LazyLock<UnicodeClasses> = LazyLock::new(|| UnicodeClasses {
	digit: unicode_class(r"\d", DIGIT),
	word: unicode_class(r"\w", WORD),
	space: unicode_class(r"\s", SPACE),
});

fn unicode_class(shorthand: &str, ascii: &[(u32, u32)]) -> RangeSet {
	let class = regex_syntax::parse(shorthand).ok().and_then(|hir| match hir.kind() {
		HirKind::Class(Class::Unicode(class)) => {
			Some(RangeSet::new(class.iter().map(|r| (u32::from(r.start()), u32::from(r.end())))))
		}
		_ => None,
	});
	class.unwrap_or_else(|| {
		warn!("no Unicode table for {}, falling back to ASCII", shorthand);
		RangeSet::new(ascii.iter().copied())
	})
}

fn ascii_class(base: MetaKind) -> RangeSet {
	let ranges = match base {
		MetaKind::Digit => DIGIT,
		MetaKind::Word => WORD,
		_ => SPACE,
	};
	RangeSet::new(ranges.iter().copied())
}

/// Tag identifying a domain in serialized patterns.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum DomainKind {
	Text,
	Bytes,
}

/// The universe of symbols a pattern is written over.
///
/// Parser and generator are written once against this trait; the domain is
/// chosen a single time at the entry point and never inspected again.
///
/// Implementors only describe their range and their encoding. Set
/// operations and sampling are shared.
pub trait SymbolDomain: Default {
	/// Borrowed pattern form accepted by this domain.
	type Pattern: ?Sized;

	/// Owned value produced by generation.
	type Value;

	const KIND: DomainKind;

	/// Every symbol of the domain.
	fn full_range(&self) -> &RangeSet;

	/// Splits a pattern into symbols without any normalization.
	fn symbols(&self, pattern: &Self::Pattern) -> Vec<u32>;

	/// Turns generated symbols back into the domain's value type.
	///
	/// Symbols are expected to come from `full_range()`.
	fn encode(&self, symbols: &[u32]) -> Self::Value;

	/// Widest reading of a positive shorthand (`Digit`, `Word` or `Space`)
	/// that a matcher for this domain may apply.
	///
	/// Defaults to the ASCII class.
	fn meta_extent(&self, base: MetaKind) -> RangeSet {
		ascii_class(base)
	}

	/// Resolves a predefined class to the symbols generation may draw from.
	///
	/// Positive classes use the ASCII set. Negated classes leave out the whole
	/// `meta_extent()` of their base, so the output is outside the class under
	/// either reading.
	fn resolve_meta(&self, kind: MetaKind) -> RangeSet {
		match kind.base() {
			(base, false) => self.restrict(&ascii_class(base)),
			(base, true) => self.complement(&self.meta_extent(base)),
		}
	}

	/// Resolves a predefined class inside a negated character class, where
	/// it names symbols to rule out.
	///
	/// The mirror image of [`SymbolDomain::resolve_meta`]: positive classes
	/// rule out their whole `meta_extent()`, negated ones only the complement
	/// of the ASCII set.
	fn resolve_meta_excluded(&self, kind: MetaKind) -> RangeSet {
		match kind.base() {
			(base, false) => self.restrict(&self.meta_extent(base)),
			(base, true) => self.complement(&ascii_class(base)),
		}
	}

	/// `full_range()` minus `ranges`.
	fn complement(&self, ranges: &RangeSet) -> RangeSet {
		self.full_range().difference(ranges)
	}

	/// Restricts `ranges` to symbols that exist in this domain.
	fn restrict(&self, ranges: &RangeSet) -> RangeSet {
		self.full_range().intersection(ranges)
	}

	/// Draws one symbol uniformly from `ranges`.
	///
	/// `context` names the construct being generated, for error reporting.
	///
	/// # Errors
	/// Returns `EmptyDomain` if `ranges` holds no symbol.
	fn pick_uniform<R: Rng + ?Sized>(&self, ranges: &RangeSet, context: &str, rng: &mut R) -> Result<u32, GenError> {
		let total = ranges.len();
		if total == 0 {
			return Err(GenError::EmptyDomain { context: context.to_owned() });
		}
		let index = rng.random_range(0..total);
		ranges.nth(index).ok_or_else(|| GenError::EmptyDomain {
			context: format!("{} (symbol index {} of {})", context, index, total),
		})
	}
}

/// Text patterns: every Unicode scalar value is a symbol.
///
/// Surrogate codepoints are left out of the range; they cannot appear in a
/// Rust `String`.
#[derive(Clone, Debug)]
pub struct TextDomain {
	full: RangeSet,
}

impl Default for TextDomain {
	fn default() -> Self {
		Self { full: RangeSet::new([(0, 0xD7FF), (0xE000, char::MAX as u32)]) }
	}
}

impl SymbolDomain for TextDomain {
	type Pattern = str;
	type Value = String;

	const KIND: DomainKind = DomainKind::Text;

	fn full_range(&self) -> &RangeSet {
		&self.full
	}

	fn meta_extent(&self, base: MetaKind) -> RangeSet {
		let classes = &*UNICODE_CLASSES;
		match base {
			MetaKind::Digit => classes.digit.clone(),
			MetaKind::Word => classes.word.clone(),
			_ => classes.space.clone(),
		}
	}

	fn symbols(&self, pattern: &str) -> Vec<u32> {
		pattern.chars().map(u32::from).collect()
	}

	fn encode(&self, symbols: &[u32]) -> String {
		// Symbols outside `full_range()` cannot be produced by the generator.
		symbols.iter().filter_map(|&s| char::from_u32(s)).collect()
	}
}

/// Byte patterns: raw values `0..=255`, never decoded.
#[derive(Clone, Debug)]
pub struct ByteDomain {
	full: RangeSet,
}

impl Default for ByteDomain {
	fn default() -> Self {
		Self { full: RangeSet::new([(0, 0xFF)]) }
	}
}

impl SymbolDomain for ByteDomain {
	type Pattern = [u8];
	type Value = Vec<u8>;

	const KIND: DomainKind = DomainKind::Bytes;

	fn full_range(&self) -> &RangeSet {
		&self.full
	}

	fn symbols(&self, pattern: &[u8]) -> Vec<u32> {
		pattern.iter().map(|&b| u32::from(b)).collect()
	}

	fn encode(&self, symbols: &[u32]) -> Vec<u8> {
		symbols.iter().filter_map(|&s| u8::try_from(s).ok()).collect()
	}
}
