//! Regular-expression match generation library.
//!
//! Given a pattern, this crate produces a value the pattern matches. It provides:
//! - A parser for a common regex dialect, over text or raw bytes
//! - A generator with a fixed policy for every construct
//! - Seedable, reproducible generation and a multi-threaded batch mode
//!
//! The one-call entry point is [`generate_match`]. Callers that generate
//! repeatedly from the same pattern should compile it once with
//! [`model::pattern::Pattern::compile`].

/// Pattern model, parser, symbol domains and generator.
pub mod model;

/// Classified errors.
pub mod error;

/// Domain-preserving entry points.
///
/// Re-exported at the crate root.
mod api;

pub use api::{Match, PatternInput, generate_bytes_match, generate_match, generate_text_match};
pub use error::GenError;
