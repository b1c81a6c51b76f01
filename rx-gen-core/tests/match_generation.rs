use regex::Regex;
use rstest::rstest;
use rx_gen_core::{GenError, Match, generate_bytes_match, generate_match, generate_text_match};

fn assert_full_match(pattern: &str, value: &str) {
	let re = Regex::new(&format!("^(?:{pattern})$")).unwrap();
	assert!(re.is_match(value), "{value:?} does not match {pattern:?}");
}

fn assert_full_match_bytes(pattern: &str, value: &[u8]) {
	let re = regex::bytes::Regex::new(&format!("(?-u)^(?:{pattern})$")).unwrap();
	assert!(re.is_match(value), "{value:?} does not match {pattern:?}");
}

#[rstest]
#[case("abc")]
#[case("abc|def")]
#[case(r"(abc|\d+)")]
#[case("[abc]abc")]
#[case("abc*d")]
#[case("abc*?d")]
#[case("abc+d")]
#[case("abc+?d")]
#[case("[^abc]def")]
#[case(r"(?:abc){3,}")]
#[case(r"\d")]
#[case(r"\w")]
#[case(r"\s")]
#[case(r"\D")]
#[case(r"\W")]
#[case(r"\S")]
#[case("a.bc")]
#[case("[a-z1]bc")]
#[case("[a-z]bc")]
#[case("[^a-z]bc")]
#[case(r"[^a-z\\]bc")]
#[case(r"(?P<word>\w+)-\d{2,4}")]
#[case(r"^x[\d_]?y$")]
#[case(r"\{\}\[\]\(\)\.\*\+\?\|\\")]
fn generated_text_matches_pattern(#[case] pattern: &str, #[values(0, 1, 7, 42, 1234)] seed: u64) {
	let value = generate_text_match(pattern, Some(seed)).unwrap();
	assert_full_match(pattern, &value);
}

#[rstest]
fn generated_bytes_match_pattern(#[values(0, 1, 7, 42, 1234)] seed: u64) {
	let value = generate_bytes_match(b"ab*c\x80\x80de*f", Some(seed)).unwrap();
	assert_full_match_bytes(r"ab*c\x80\x80de*f", &value);
}

#[test]
fn plain() {
	assert_eq!(generate_match("abc", None).unwrap(), Match::Text("abc".to_owned()));
}

#[test]
fn plain_bytes() {
	assert_eq!(generate_match(b"abc", None).unwrap(), Match::Bytes(b"abc".to_vec()));
}

#[test]
fn unicode() {
	assert_eq!(generate_text_match("•", None).unwrap(), "•");
}

#[test]
fn utf8_bytes_are_not_decoded() {
	assert_eq!(generate_bytes_match("•".as_bytes(), None).unwrap(), b"\xe2\x80\xa2".to_vec());
}

#[test]
fn invalid_utf8_bytes_are_reproduced() {
	let value = generate_bytes_match(b"\x80\x80", None).unwrap();
	assert_eq!(value, vec![0x80, 0x80]);
}

#[rstest]
fn alternation_picks_one_branch(#[values(0, 1, 2, 3, 4, 5, 6, 7)] seed: u64) {
	let value = generate_text_match("abc|def", Some(seed)).unwrap();
	assert!(value == "abc" || value == "def", "{value:?}");
}

#[rstest]
fn one_of(#[values(0, 1, 2, 3, 4, 5, 6, 7)] seed: u64) {
	let value = generate_text_match("[abc]abc", Some(seed)).unwrap();
	assert!(["aabc", "babc", "cabc"].contains(&value.as_str()), "{value:?}");
}

#[rstest]
fn not_one_of(#[values(0, 1, 2, 3, 4, 5, 6, 7)] seed: u64) {
	let value = generate_text_match("[^abc]def", Some(seed)).unwrap();
	let chars: Vec<char> = value.chars().collect();
	assert_eq!(chars.len(), 4, "{value:?}");
	assert!(value.ends_with("def"));
	assert!(!"abc".contains(chars[0]));
}

#[rstest]
fn at_least_three_repetitions(#[values(0, 1, 2, 3, 4, 5, 6, 7)] seed: u64) {
	let value = generate_text_match("(?:abc){3,}", Some(seed)).unwrap();
	assert_eq!(value.len() % 3, 0);
	assert!(value.len() >= 9);
	assert_eq!(value, "abc".repeat(value.len() / 3));
}

#[rstest]
fn at_most_three_repetitions(#[values(0, 1, 2, 3, 4, 5, 6, 7)] seed: u64) {
	let value = generate_text_match("(?:abc){,3}", Some(seed)).unwrap();
	assert!(value.len() <= 9);
	assert_eq!(value, "abc".repeat(value.len() / 3));
}

#[test]
fn lookahead_at_end() {
	assert_eq!(generate_text_match("a(?=bc)", None).unwrap(), "abc");
}

#[test]
fn lookbehind_at_beginning() {
	assert_eq!(generate_text_match("(?<=a)bc", None).unwrap(), "abc");
}

#[rstest]
#[case("xy(?=a)z")]
#[case("xy(?<=a)z")]
#[case("xy(?!z)z")]
#[case("xy(?<!z)z")]
fn ignores_lookaround_in_middle(#[case] pattern: &str) {
	assert_eq!(generate_text_match(pattern, None).unwrap(), "xyz");
}

#[test]
fn negative_boundary_lookarounds_emit_nothing() {
	assert_eq!(generate_text_match("(?<!q)ab(?!c)", None).unwrap(), "ab");
}

#[rstest]
#[case(r"\D")]
#[case(r"\W")]
#[case(r"\S")]
#[case(r"[\W_]")]
#[case(r"[^\w]")]
#[case(r"[^\d\s]")]
#[case(r"[^\W]")]
fn negated_meta_classes_agree_with_unicode_matcher(#[case] pattern: &str) {
	let re = Regex::new(&format!("^(?:{pattern})$")).unwrap();
	for seed in 0..2000 {
		let value = generate_text_match(pattern, Some(seed)).unwrap();
		assert!(re.is_match(&value), "seed {seed}: {value:?} does not match {pattern:?}");
	}
}

#[rstest]
fn negated_byte_meta_classes(#[values(0, 1, 2, 3, 4, 5, 6, 7)] seed: u64) {
	let not_space = generate_bytes_match(br"\S", Some(seed)).unwrap();
	assert_full_match_bytes(r"\S", &not_space);
	assert!(!b"\t\n\x0b\x0c\r ".contains(&not_space[0]));

	let not_word = generate_bytes_match(br"\W", Some(seed)).unwrap();
	assert_full_match_bytes(r"\W", &not_word);
}

#[test]
fn domain_is_preserved() {
	assert!(matches!(generate_match(r"\w+", Some(3)).unwrap(), Match::Text(_)));
	assert!(matches!(generate_match(br"\w+", Some(3)).unwrap(), Match::Bytes(_)));
	let owned: Vec<u8> = b"[\x80-\xff]".to_vec();
	let value = generate_match(&owned, Some(3)).unwrap();
	assert!(value.as_bytes().is_some_and(|b| b.len() == 1 && b[0] >= 0x80));
	assert!(value.as_text().is_none());
}

#[test]
fn same_seed_same_value() {
	let pattern = r"(?:[a-z]{2,6}\d*|\w+\s?)+";
	assert_eq!(generate_text_match(pattern, Some(99)), generate_text_match(pattern, Some(99)));
}

#[rstest]
#[case("(abc")]
#[case("abc)")]
#[case("*abc")]
#[case("a{4,2}")]
#[case("[abc")]
#[case(r"\x41")]
#[case(r"a\")]
fn syntax_errors(#[case] pattern: &str) {
	assert!(matches!(generate_text_match(pattern, None), Err(GenError::PatternSyntax { .. })));
}

#[rstest]
#[case(r"(a)\1")]
#[case("(?P<n>a)(?P=n)")]
#[case("(?R)")]
#[case("(?i)abc")]
fn unsupported_constructs(#[case] pattern: &str) {
	let err = generate_text_match(pattern, None).unwrap_err();
	assert!(matches!(err, GenError::UnsupportedConstruct { .. }), "{err}");
	assert!(!err.is_recoverable());
}

#[test]
fn empty_domain() {
	let err = generate_bytes_match(b"a[^\x00-\xff]", None).unwrap_err();
	assert!(matches!(err, GenError::EmptyDomain { .. }));
}

#[test]
fn generation_limit_is_recoverable() {
	let err = generate_text_match("a{100000}", None).unwrap_err();
	assert_eq!(err, GenError::GenerationLimitExceeded { limit: 1 << 16 });
	assert!(err.is_recoverable());
}
