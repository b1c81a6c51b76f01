use serde::{Deserialize, Serialize};

/// A set of symbols stored as inclusive `(low, high)` intervals.
///
/// # Invariants
/// - Intervals are sorted by `low`
/// - Intervals never overlap and are never adjacent (they are merged)
/// - `low <= high` for every interval
///
/// Every constructor canonicalizes its input, so callers may pass
/// intervals in any order.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct RangeSet {
	ranges: Vec<(u32, u32)>,
}

impl RangeSet {
	/// Builds a set from arbitrary intervals.
	///
	/// Intervals given as `(high, low)` are swapped rather than rejected;
	/// the parser validates class ranges before they reach this point.
	pub fn new<I: IntoIterator<Item = (u32, u32)>>(ranges: I) -> Self {
		let mut set = Self {
			ranges: ranges
				.into_iter()
				.map(|(a, b)| if a <= b { (a, b) } else { (b, a) })
				.collect(),
		};
		set.canonicalize();
		set
	}

	/// The empty set.
	pub fn empty() -> Self {
		Self { ranges: Vec::new() }
	}

	/// A set holding exactly one symbol.
	pub fn single(symbol: u32) -> Self {
		Self { ranges: vec![(symbol, symbol)] }
	}

	/// Returns the canonical intervals.
	pub fn ranges(&self) -> &[(u32, u32)] {
		&self.ranges
	}

	pub fn is_empty(&self) -> bool {
		self.ranges.is_empty()
	}

	/// Number of symbols in the set.
	pub fn len(&self) -> u64 {
		self.ranges
			.iter()
			.map(|(low, high)| u64::from(*high) - u64::from(*low) + 1)
			.sum()
	}

	pub fn contains(&self, symbol: u32) -> bool {
		self.ranges
			.binary_search_by(|&(low, high)| {
				if high < symbol {
					std::cmp::Ordering::Less
				} else if low > symbol {
					std::cmp::Ordering::Greater
				} else {
					std::cmp::Ordering::Equal
				}
			})
			.is_ok()
	}

	/// Returns the `index`-th symbol in ascending order, if any.
	///
	/// Used for uniform sampling: draw an index in `0..len()`, then map it
	/// back to a symbol with a single scan over the intervals.
	pub fn nth(&self, mut index: u64) -> Option<u32> {
		for (low, high) in &self.ranges {
			let size = u64::from(*high) - u64::from(*low) + 1;
			if index < size {
				// index < size <= u32::MAX + 1, so the sum stays within `high`
				return Some(low + index as u32);
			}
			index -= size;
		}
		None
	}

	/// Adds all symbols of `other` to this set.
	pub fn union(&mut self, other: &RangeSet) {
		self.ranges.extend_from_slice(&other.ranges);
		self.canonicalize();
	}

	/// Returns the symbols of `self` that are not in `other`.
	pub fn difference(&self, other: &RangeSet) -> RangeSet {
		let mut out = Vec::new();

		for &(low, high) in &self.ranges {
			let mut start = low;
			let mut open = true;

			for &(other_low, other_high) in &other.ranges {
				if other_high < start {
					continue;
				}
				if other_low > high {
					break;
				}
				if other_low > start {
					out.push((start, other_low - 1));
				}
				if other_high >= high {
					open = false;
					break;
				}
				start = other_high + 1;
			}

			if open {
				out.push((start, high));
			}
		}

		RangeSet { ranges: out }
	}

	/// Returns the symbols present in both sets.
	pub fn intersection(&self, other: &RangeSet) -> RangeSet {
		self.difference(&self.difference(other))
	}

	/// Sorts and merges overlapping or adjacent intervals.
	fn canonicalize(&mut self) {
		self.ranges.sort_unstable();

		let mut merged: Vec<(u32, u32)> = Vec::with_capacity(self.ranges.len());
		for &(low, high) in &self.ranges {
			match merged.last_mut() {
				Some(last) if low <= last.1.saturating_add(1) => {
					last.1 = last.1.max(high);
				}
				_ => merged.push((low, high)),
			}
		}
		self.ranges = merged;
	}
}
