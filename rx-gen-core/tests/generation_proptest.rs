use proptest::prelude::*;
use rx_gen_core::model::generation_config::GenerationConfig;
use rx_gen_core::model::pattern::{BytePattern, TextPattern};
use rx_gen_core::{generate_bytes_match, generate_text_match};

fn letter() -> impl Strategy<Value = char> {
	proptest::char::range('a', 'z')
}

proptest! {
	#[test]
	fn class_range_output_is_inside(lo in letter(), hi in letter(), seed in any::<u64>()) {
		let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
		let value = generate_text_match(&format!("[{lo}-{hi}]"), Some(seed)).unwrap();
		let chars: Vec<char> = value.chars().collect();
		prop_assert_eq!(chars.len(), 1);
		prop_assert!((lo..=hi).contains(&chars[0]));
	}

	#[test]
	fn negated_class_output_is_outside(lo in letter(), hi in letter(), seed in any::<u64>()) {
		let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
		let value = generate_text_match(&format!("[^{lo}-{hi}]"), Some(seed)).unwrap();
		let chars: Vec<char> = value.chars().collect();
		prop_assert_eq!(chars.len(), 1);
		prop_assert!(!(lo..=hi).contains(&chars[0]));
	}

	#[test]
	fn negated_byte_class_never_hits_excluded_bytes(excluded in proptest::collection::vec(0x61u8..=0x7a, 1..8), seed in any::<u64>()) {
		let mut pattern = b"[^".to_vec();
		pattern.extend_from_slice(&excluded);
		pattern.push(b']');
		let value = generate_bytes_match(&pattern, Some(seed)).unwrap();
		prop_assert_eq!(value.len(), 1);
		prop_assert!(!excluded.contains(&value[0]));
	}

	#[test]
	fn bounded_repeat_respects_bounds(min in 0u32..5, extra in 0u32..5, seed in any::<u64>()) {
		let max = min + extra;
		let value = generate_text_match(&format!("(?:ab){{{min},{max}}}"), Some(seed)).unwrap();
		let count = (value.len() / 2) as u32;
		prop_assert!(count >= min && count <= max);
		prop_assert_eq!(value, "ab".repeat(count as usize));
	}

	#[test]
	fn literal_bytes_round_trip(raw in proptest::collection::vec(any::<u8>(), 0..32)) {
		// Drop metacharacters so every byte is a literal.
		let literal: Vec<u8> = raw.into_iter().filter(|b| !br"\.^$|?*+()[]{}".contains(b)).collect();
		prop_assert_eq!(generate_bytes_match(&literal, None).unwrap(), literal);
	}

	#[test]
	fn compiled_pattern_is_deterministic_per_seed(seed in any::<u64>()) {
		let pattern = TextPattern::compile(r"(?:[a-z]+|\d{1,3}|\s)*\.").unwrap();
		let config = GenerationConfig::seeded(seed);
		prop_assert_eq!(pattern.generate(&config), pattern.generate(&config));
	}

	#[test]
	fn wildcard_bytes_avoid_line_terminator(seed in any::<u64>()) {
		let pattern = BytePattern::compile(b".{16}").unwrap();
		let value = pattern.generate(&GenerationConfig::seeded(seed)).unwrap();
		prop_assert_eq!(value.len(), 16);
		prop_assert!(!value.contains(&b'\n'));
	}
}
