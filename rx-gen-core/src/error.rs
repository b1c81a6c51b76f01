use std::fmt;

/// Classified failure of a parse or generation call.
///
/// A call that fails never yields a partial value alongside the error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenError {
	/// Malformed pattern. `position` is the index of the offending symbol
	/// (a `char` index for text patterns, a byte index for byte patterns).
	PatternSyntax { position: usize, reason: String },

	/// Recognizable but unsupported construct, such as a backreference.
	UnsupportedConstruct { position: usize, construct: String },

	/// A class or complement left no symbol to choose from.
	EmptyDomain { context: String },

	/// Repetition expansion went past the configured limit.
	GenerationLimitExceeded { limit: usize },
}

impl GenError {
	pub(crate) fn syntax(position: usize, reason: impl Into<String>) -> Self {
		GenError::PatternSyntax { position, reason: reason.into() }
	}

	pub(crate) fn unsupported(position: usize, construct: impl Into<String>) -> Self {
		GenError::UnsupportedConstruct { position, construct: construct.into() }
	}

	/// Returns `true` when retrying with a different configuration may succeed.
	///
	/// Only `GenerationLimitExceeded` qualifies: every other kind is a
	/// deterministic property of the pattern itself.
	pub fn is_recoverable(&self) -> bool {
		matches!(self, GenError::GenerationLimitExceeded { .. })
	}
}

impl fmt::Display for GenError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			GenError::PatternSyntax { position, reason } => {
				write!(f, "pattern syntax error at position {}: {}", position, reason)
			}
			GenError::UnsupportedConstruct { position, construct } => {
				write!(f, "unsupported construct at position {}: {}", position, construct)
			}
			GenError::EmptyDomain { context } => {
				write!(f, "no symbol can satisfy {}", context)
			}
			GenError::GenerationLimitExceeded { limit } => {
				write!(f, "generation exceeded the expansion limit of {}", limit)
			}
		}
	}
}

impl std::error::Error for GenError {}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn only_limit_errors_are_recoverable() {
		assert!(GenError::GenerationLimitExceeded { limit: 4 }.is_recoverable());
		assert!(!GenError::syntax(0, "nothing to repeat").is_recoverable());
		assert!(!GenError::unsupported(1, "backreference").is_recoverable());
		assert!(!GenError::EmptyDomain { context: "[^\\x00-\\xff]".to_owned() }.is_recoverable());
	}

	#[test]
	fn display_carries_position() {
		let err = GenError::syntax(3, "unterminated character class");
		assert_eq!(err.to_string(), "pattern syntax error at position 3: unterminated character class");
	}
}
