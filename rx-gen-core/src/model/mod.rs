//! Pattern model and match generation.
//!
//! This module provides, leaves first:
//! - Symbol sets (`RangeSet`) and the two symbol domains (`TextDomain`, `ByteDomain`)
//! - The pattern tree (`Node`) and its parser
//! - The match generator and its configuration (`GenerationConfig`)
//! - Compiled patterns (`Pattern`) tying everything together

/// Pattern tree shared by both domains.
pub mod ast;

/// Symbol domains: full range, meta-class resolution, complement and
/// uniform sampling.
pub mod domain;

/// Match generation over a parsed tree, including the boundary lookaround plan.
pub mod generator;

/// Generation parameters: seed strategy, repeat cap, expansion limit.
pub mod generation_config;

/// Recursive-descent parser for the supported regex dialect.
pub mod parser;

/// Compiled patterns: parse once, generate many times, persist with `postcard`.
pub mod pattern;

/// Sorted, merged sets of inclusive symbol intervals.
pub mod range_set;
