use log::trace;

use super::ast::{AnchorKind, MetaKind, Node};
use super::domain::SymbolDomain;
use super::range_set::RangeSet;
use crate::error::GenError;

/// Symbols that may follow a backslash and stand for themselves.
const PASSTHROUGH: &[char] = &[
	'.', '(', ')', '[', ']', '|', '\\', '*', '+', '?', '{', '}', '^', '$', '-',
];

/// Parses `pattern` into a tree over `domain`'s symbols.
///
/// # Errors
/// - `PatternSyntax` for malformed input, with the index of the offending symbol
/// - `UnsupportedConstruct` for backreferences, recursion, inline flags
///   and conditionals
pub fn parse<D: SymbolDomain>(pattern: &D::Pattern, domain: &D) -> Result<Node, GenError> {
	Parser::new(domain, pattern).parse()
}

/// Item read inside `[...]`.
enum ClassAtom {
	Symbol(u32),
	Set(RangeSet),
}

/// Recursive-descent parser over a symbol sequence.
///
/// The parser only ever compares symbols against ASCII metacharacters, so
/// the same code reads text and byte patterns. Byte values above `0x7F`
/// never collide with a metacharacter and always end up as literals.
pub struct Parser<'d, D: SymbolDomain> {
	domain: &'d D,
	symbols: Vec<u32>,
	pos: usize,
}

impl<'d, D: SymbolDomain> Parser<'d, D> {
	pub fn new(domain: &'d D, pattern: &D::Pattern) -> Self {
		Self { domain, symbols: domain.symbols(pattern), pos: 0 }
	}

	/// Parses the whole pattern.
	pub fn parse(&mut self) -> Result<Node, GenError> {
		let node = self.parse_alternation()?;
		if self.pos < self.symbols.len() {
			// Only an unmatched ')' stops the top-level alternation early.
			return Err(GenError::syntax(self.pos, "unbalanced parenthesis"));
		}
		trace!("parsed {} symbols", self.symbols.len());
		Ok(node)
	}

	fn peek(&self) -> Option<char> {
		self.peek_at(self.pos)
	}

	fn peek_at(&self, index: usize) -> Option<char> {
		self.symbols.get(index).and_then(|&s| char::from_u32(s))
	}

	fn advance(&mut self) -> Option<u32> {
		let symbol = self.symbols.get(self.pos).copied();
		if symbol.is_some() {
			self.pos += 1;
		}
		symbol
	}

	/// Consumes `expected` if it is the next symbol.
	fn eat(&mut self, expected: char) -> bool {
		if self.peek() == Some(expected) {
			self.pos += 1;
			true
		} else {
			false
		}
	}

	/// `a|b|c`
	fn parse_alternation(&mut self) -> Result<Node, GenError> {
		let mut branches = vec![self.parse_concat()?];
		while self.eat('|') {
			branches.push(self.parse_concat()?);
		}
		match branches.len() {
			1 => Ok(branches.swap_remove(0)),
			_ => Ok(Node::Alternation(branches)),
		}
	}

	/// `abc`
	fn parse_concat(&mut self) -> Result<Node, GenError> {
		let mut nodes = Vec::new();
		while let Some(ch) = self.peek() {
			if ch == ')' || ch == '|' {
				break;
			}
			nodes.push(self.parse_quantified()?);
		}
		match nodes.len() {
			1 => Ok(nodes.swap_remove(0)),
			_ => Ok(Node::Concat(nodes)),
		}
	}

	/// An atom followed by at most one quantifier.
	fn parse_quantified(&mut self) -> Result<Node, GenError> {
		let start = self.pos;
		let node = self.parse_atom()?;

		let quantifier_pos = self.pos;
		let Some((min, max)) = self.parse_quantifier()? else {
			return Ok(node);
		};
		if matches!(node, Node::Anchor(_)) {
			return Err(GenError::syntax(quantifier_pos, "nothing to repeat"));
		}
		let greedy = !self.eat('?');

		if self.at_quantifier() {
			return Err(GenError::syntax(self.pos, "multiple repeat"));
		}

		trace!("repeat at {}: {}..{:?} (greedy: {})", start, min, max, greedy);
		Ok(Node::Repeat { body: Box::new(node), min, max, greedy })
	}

	/// Returns `true` if a quantifier starts at the current position.
	fn at_quantifier(&mut self) -> bool {
		let save = self.pos;
		let found = matches!(self.parse_quantifier(), Ok(Some(_)));
		self.pos = save;
		found
	}

	/// Reads `*`, `+`, `?`, `{m}`, `{m,}`, `{,n}` or `{m,n}`.
	///
	/// A `{` that does not open a well-formed quantifier is left in place and
	/// later read as a literal.
	fn parse_quantifier(&mut self) -> Result<Option<(u32, Option<u32>)>, GenError> {
		match self.peek() {
			Some('*') => {
				self.pos += 1;
				Ok(Some((0, None)))
			}
			Some('+') => {
				self.pos += 1;
				Ok(Some((1, None)))
			}
			Some('?') => {
				self.pos += 1;
				Ok(Some((0, Some(1))))
			}
			Some('{') => self.parse_brace_quantifier(),
			_ => Ok(None),
		}
	}

	fn parse_brace_quantifier(&mut self) -> Result<Option<(u32, Option<u32>)>, GenError> {
		let open = self.pos;
		self.pos += 1; // consume '{'

		let min = self.parse_number()?;
		let bounds = if self.eat(',') {
			let max = self.parse_number()?;
			(min.unwrap_or(0), max)
		} else {
			match min {
				Some(n) => (n, Some(n)),
				None => {
					self.pos = open;
					return Ok(None);
				}
			}
		};

		if !self.eat('}') {
			self.pos = open;
			return Ok(None);
		}

		if let (min, Some(max)) = bounds {
			if min > max {
				return Err(GenError::syntax(open, "min repeat greater than max repeat"));
			}
		}
		Ok(Some(bounds))
	}

	/// Reads a decimal number, if one starts here.
	fn parse_number(&mut self) -> Result<Option<u32>, GenError> {
		let start = self.pos;
		let mut value: u32 = 0;
		while let Some(digit) = self.peek().and_then(|c| c.to_digit(10)) {
			value = value
				.checked_mul(10)
				.and_then(|v| v.checked_add(digit))
				.ok_or_else(|| GenError::syntax(start, "the repetition number is too large"))?;
			self.pos += 1;
		}
		Ok(if self.pos == start { None } else { Some(value) })
	}

	/// A single term: literal, `.`, class, group, escape or anchor.
	fn parse_atom(&mut self) -> Result<Node, GenError> {
		let pos = self.pos;
		match self.peek() {
			Some('(') => self.parse_group(),
			Some('[') => self.parse_class(),
			Some('\\') => self.parse_escape(),
			Some('.') => {
				self.pos += 1;
				Ok(Node::Wildcard)
			}
			Some('^') => {
				self.pos += 1;
				Ok(Node::Anchor(AnchorKind::Start))
			}
			Some('$') => {
				self.pos += 1;
				Ok(Node::Anchor(AnchorKind::End))
			}
			Some('*' | '+' | '?') => Err(GenError::syntax(pos, "nothing to repeat")),
			_ => match self.advance() {
				Some(symbol) => Ok(Node::Literal(symbol)),
				None => Err(GenError::syntax(pos, "unexpected end of pattern")),
			},
		}
	}

	/// A backslash sequence outside a class.
	fn parse_escape(&mut self) -> Result<Node, GenError> {
		let pos = self.pos;
		self.pos += 1; // consume '\'

		let Some(symbol) = self.advance() else {
			return Err(GenError::syntax(pos, "bad escape (end of pattern)"));
		};
		if let Some(kind) = MetaKind::from_escape(symbol) {
			return Ok(Node::MetaClass(kind));
		}
		match char::from_u32(symbol) {
			Some(c) if PASSTHROUGH.contains(&c) => Ok(Node::Literal(symbol)),
			Some('1'..='9') => Err(GenError::unsupported(pos, "backreference")),
			Some('k') if self.peek() == Some('<') => Err(GenError::unsupported(pos, "named backreference")),
			Some(c) => Err(GenError::syntax(pos, format!("bad escape \\{}", c.escape_debug()))),
			None => Err(GenError::syntax(pos, "bad escape")),
		}
	}

	/// `(...)` and every `(?...)` extension.
	fn parse_group(&mut self) -> Result<Node, GenError> {
		let open = self.pos;
		self.pos += 1; // consume '('

		if !self.eat('?') {
			let body = self.parse_group_body(open)?;
			return Ok(Node::Group { body, capturing: true, name: None });
		}

		let ext = self.pos;
		match self.peek() {
			Some(':') => {
				self.pos += 1;
				let body = self.parse_group_body(open)?;
				Ok(Node::Group { body, capturing: false, name: None })
			}
			Some(c @ ('=' | '!')) => {
				self.pos += 1;
				let body = self.parse_group_body(open)?;
				Ok(Node::Lookahead { body, negative: c == '!' })
			}
			Some('<') => {
				self.pos += 1;
				match self.peek() {
					Some(c @ ('=' | '!')) => {
						self.pos += 1;
						let body = self.parse_group_body(open)?;
						Ok(Node::Lookbehind { body, negative: c == '!' })
					}
					Some(c) if c.is_ascii_digit() => Err(GenError::unsupported(open, "recursive pattern")),
					_ => self.parse_named_group(open),
				}
			}
			Some('P') => {
				self.pos += 1;
				match self.peek() {
					Some('<') => {
						self.pos += 1;
						self.parse_named_group(open)
					}
					Some('=') => Err(GenError::unsupported(open, "named backreference")),
					Some('>') => Err(GenError::unsupported(open, "recursive pattern")),
					_ => Err(GenError::syntax(ext, "unknown extension ?P")),
				}
			}
			Some('R' | '&' | '+') => Err(GenError::unsupported(open, "recursive pattern")),
			Some(c) if c.is_ascii_digit() => Err(GenError::unsupported(open, "recursive pattern")),
			Some('(') => Err(GenError::unsupported(open, "conditional group")),
			Some('#') => Err(GenError::unsupported(open, "comment group")),
			Some('a' | 'i' | 'L' | 'm' | 's' | 'u' | 'x' | 'U' | '-') => {
				Err(GenError::unsupported(open, "inline flags"))
			}
			Some(c) => Err(GenError::syntax(ext, format!("unknown extension ?{}", c.escape_debug()))),
			None => Err(GenError::syntax(ext, "unexpected end of pattern")),
		}
	}

	/// Reads `name>` followed by the group body. The `<` is already consumed.
	fn parse_named_group(&mut self, open: usize) -> Result<Node, GenError> {
		let start = self.pos;
		let mut name = String::new();
		loop {
			match self.peek() {
				Some('>') => {
					self.pos += 1;
					break;
				}
				Some(c) if c == '_' || c.is_ascii_alphabetic() || (c.is_ascii_digit() && !name.is_empty()) => {
					name.push(c);
					self.pos += 1;
				}
				Some(_) => return Err(GenError::syntax(self.pos, "bad character in group name")),
				None => return Err(GenError::syntax(start, "missing >, unterminated name")),
			}
		}
		if name.is_empty() {
			return Err(GenError::syntax(start, "missing group name"));
		}
		let body = self.parse_group_body(open)?;
		Ok(Node::Group { body, capturing: true, name: Some(name) })
	}

	/// Reads an alternation and the closing `)` of the group opened at `open`.
	fn parse_group_body(&mut self, open: usize) -> Result<Box<Node>, GenError> {
		let body = self.parse_alternation()?;
		if !self.eat(')') {
			return Err(GenError::syntax(open, "missing ), unterminated subpattern"));
		}
		Ok(Box::new(body))
	}

	/// `[abc]`, `[a-z]`, `[^a-z\\]`, `[\d_]`.
	fn parse_class(&mut self) -> Result<Node, GenError> {
		let open = self.pos;
		self.pos += 1; // consume '['
		let negated = self.eat('^');

		let mut singles: Vec<(u32, u32)> = Vec::new();
		let mut ranges = RangeSet::empty();
		let mut first = true;

		loop {
			match self.peek() {
				None if self.pos >= self.symbols.len() => {
					return Err(GenError::syntax(open, "unterminated character set"));
				}
				Some(']') if !first => {
					self.pos += 1;
					break;
				}
				_ => {}
			}
			first = false;

			let atom_pos = self.pos;
			match self.parse_class_atom(negated)? {
				ClassAtom::Set(set) => {
					if self.is_class_range_dash() {
						return Err(GenError::syntax(atom_pos, "bad character range"));
					}
					ranges.union(&set);
				}
				ClassAtom::Symbol(low) => {
					if !self.is_class_range_dash() {
						singles.push((low, low));
						continue;
					}
					self.pos += 1; // consume '-'
					let high = match self.parse_class_atom(negated)? {
						ClassAtom::Symbol(high) if high >= low => high,
						_ => return Err(GenError::syntax(atom_pos, "bad character range")),
					};
					singles.push((low, high));
				}
			}
		}

		ranges.union(&RangeSet::new(singles));
		Ok(Node::CharClass { ranges, negated })
	}

	/// `true` when the next `-` separates the bounds of a range rather than
	/// standing for itself (as it does right before the closing `]`).
	fn is_class_range_dash(&self) -> bool {
		self.peek() == Some('-') && self.pos + 1 < self.symbols.len() && self.peek_at(self.pos + 1) != Some(']')
	}

	fn parse_class_atom(&mut self, negated: bool) -> Result<ClassAtom, GenError> {
		let pos = self.pos;
		let Some(symbol) = self.advance() else {
			return Err(GenError::syntax(pos, "unterminated character set"));
		};
		if char::from_u32(symbol) != Some('\\') {
			return Ok(ClassAtom::Symbol(symbol));
		}

		let Some(escaped) = self.advance() else {
			return Err(GenError::syntax(pos, "bad escape (end of pattern)"));
		};
		if let Some(kind) = MetaKind::from_escape(escaped) {
			let set = if negated {
				self.domain.resolve_meta_excluded(kind)
			} else {
				self.domain.resolve_meta(kind)
			};
			return Ok(ClassAtom::Set(set));
		}
		match char::from_u32(escaped) {
			Some(c) if PASSTHROUGH.contains(&c) => Ok(ClassAtom::Symbol(escaped)),
			Some(c) => Err(GenError::syntax(pos, format!("bad escape \\{}", c.escape_debug()))),
			None => Err(GenError::syntax(pos, "bad escape")),
		}
	}
}
