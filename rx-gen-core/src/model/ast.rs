use serde::{Deserialize, Serialize};

use super::range_set::RangeSet;

/// A node of a parsed pattern.
///
/// Symbols are stored as `u32` so the same tree shape serves both domains:
/// Unicode scalar values for text patterns, `0..=255` for byte patterns.
/// A tree never mixes the two; `Pattern<D>` pins the domain at the type level.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub enum Node {
	/// Exactly one symbol.
	Literal(u32),
	/// `.`: any symbol except the line terminator.
	Wildcard,
	/// `[...]` or `[^...]`. `ranges` is non-empty.
	CharClass { ranges: RangeSet, negated: bool },
	/// `\d`, `\D`, `\w`, `\W`, `\s`, `\S`.
	MetaClass(MetaKind),
	/// Terms matched in order. May be empty (`()`, `a|`).
	Concat(Vec<Node>),
	/// `a|b|c`, at least two branches.
	Alternation(Vec<Node>),
	/// `(...)`, `(?:...)` or `(?P<name>...)`.
	Group { body: Box<Node>, capturing: bool, name: Option<String> },
	/// A quantified term. `max` is `None` when unbounded.
	Repeat { body: Box<Node>, min: u32, max: Option<u32>, greedy: bool },
	/// `(?=...)` or `(?!...)`.
	Lookahead { body: Box<Node>, negative: bool },
	/// `(?<=...)` or `(?<!...)`.
	Lookbehind { body: Box<Node>, negative: bool },
	/// `^` or `$`.
	Anchor(AnchorKind),
}

/// Predefined character classes.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MetaKind {
	Digit,
	NotDigit,
	Word,
	NotWord,
	Space,
	NotSpace,
}

impl MetaKind {
	/// Maps the letter following a backslash to its class, if any.
	pub fn from_escape(letter: u32) -> Option<Self> {
		match char::from_u32(letter)? {
			'd' => Some(MetaKind::Digit),
			'D' => Some(MetaKind::NotDigit),
			'w' => Some(MetaKind::Word),
			'W' => Some(MetaKind::NotWord),
			's' => Some(MetaKind::Space),
			'S' => Some(MetaKind::NotSpace),
			_ => None,
		}
	}

	/// The positive class this kind is built from, and whether it is negated.
	pub fn base(self) -> (MetaKind, bool) {
		match self {
			MetaKind::Digit | MetaKind::Word | MetaKind::Space => (self, false),
			MetaKind::NotDigit => (MetaKind::Digit, true),
			MetaKind::NotWord => (MetaKind::Word, true),
			MetaKind::NotSpace => (MetaKind::Space, true),
		}
	}
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnchorKind {
	Start,
	End,
}

impl Node {
	/// Wraps `body` in a greedy repetition.
	pub fn repeat(body: Node, min: u32, max: Option<u32>) -> Self {
		Node::Repeat { body: Box::new(body), min, max, greedy: true }
	}

	/// A concatenation of literal symbols.
	pub fn literals<I: IntoIterator<Item = u32>>(symbols: I) -> Self {
		Node::Concat(symbols.into_iter().map(Node::Literal).collect())
	}
}
