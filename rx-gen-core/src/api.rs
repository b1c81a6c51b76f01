use crate::error::GenError;
use crate::model::generation_config::GenerationConfig;
use crate::model::pattern::{BytePattern, TextPattern};

/// A pattern in either domain.
///
/// The variant decides the domain of the generated value; the two never mix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternInput<'a> {
	Text(&'a str),
	Bytes(&'a [u8]),
}

impl<'a> From<&'a str> for PatternInput<'a> {
	fn from(pattern: &'a str) -> Self {
		PatternInput::Text(pattern)
	}
}

impl<'a> From<&'a String> for PatternInput<'a> {
	fn from(pattern: &'a String) -> Self {
		PatternInput::Text(pattern)
	}
}

impl<'a> From<&'a [u8]> for PatternInput<'a> {
	fn from(pattern: &'a [u8]) -> Self {
		PatternInput::Bytes(pattern)
	}
}

impl<'a, const N: usize> From<&'a [u8; N]> for PatternInput<'a> {
	fn from(pattern: &'a [u8; N]) -> Self {
		PatternInput::Bytes(pattern)
	}
}

impl<'a> From<&'a Vec<u8>> for PatternInput<'a> {
	fn from(pattern: &'a Vec<u8>) -> Self {
		PatternInput::Bytes(pattern)
	}
}

/// A generated value, in the domain of the pattern it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Match {
	Text(String),
	Bytes(Vec<u8>),
}

impl Match {
	pub fn as_text(&self) -> Option<&str> {
		match self {
			Match::Text(text) => Some(text),
			Match::Bytes(_) => None,
		}
	}

	pub fn as_bytes(&self) -> Option<&[u8]> {
		match self {
			Match::Bytes(bytes) => Some(bytes),
			Match::Text(_) => None,
		}
	}
}

/// Generates one value matched by `pattern`.
///
/// Text patterns yield `Match::Text`, byte patterns yield `Match::Bytes`.
/// With `seed` set, the output is reproducible; otherwise a fresh seed is
/// drawn for this call.
///
/// # Errors
/// - `PatternSyntax` / `UnsupportedConstruct` if the pattern is rejected
/// - `EmptyDomain` if a class can match nothing
/// - `GenerationLimitExceeded` if the expansion limit is reached
pub fn generate_match<'a>(pattern: impl Into<PatternInput<'a>>, seed: Option<u64>) -> Result<Match, GenError> {
	match pattern.into() {
		PatternInput::Text(text) => generate_text_match(text, seed).map(Match::Text),
		PatternInput::Bytes(bytes) => generate_bytes_match(bytes, seed).map(Match::Bytes),
	}
}

/// Typed form of [`generate_match`] for text patterns.
pub fn generate_text_match(pattern: &str, seed: Option<u64>) -> Result<String, GenError> {
	let mut config = GenerationConfig::default();
	config.seed = seed.into();
	TextPattern::compile(pattern)?.generate(&config)
}

/// Typed form of [`generate_match`] for byte patterns.
///
/// The pattern is read byte by byte and never decoded.
pub fn generate_bytes_match(pattern: &[u8], seed: Option<u64>) -> Result<Vec<u8>, GenError> {
	let mut config = GenerationConfig::default();
	config.seed = seed.into();
	BytePattern::compile(pattern)?.generate(&config)
}
