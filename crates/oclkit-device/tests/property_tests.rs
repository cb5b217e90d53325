//! Property tests for version parsing and extension matching.
//!
//! Both are pure functions, so these run without the fake registry.

use oclkit_device::extensions::contains_extension;
use oclkit_device::version::ApiVersion;
use proptest::prelude::*;

// ── Version parsing ──────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn parse_never_panics(text in ".*") {
        let _ = ApiVersion::parse(&text);
    }

    #[test]
    fn well_formed_strings_round_trip(major in 0u32..1000, minor in 0u32..1000) {
        let version = ApiVersion::parse(&format!("OpenCL {major}.{minor} extra"));
        prop_assert_eq!(version, ApiVersion::new(major, minor));
    }

    #[test]
    fn prefix_word_is_irrelevant(prefix in "[A-Za-z]{1,10}", major in 0u32..100, minor in 0u32..100) {
        let version = ApiVersion::parse(&format!("{prefix} {major}.{minor}"));
        prop_assert_eq!(version, ApiVersion::new(major, minor));
    }

    #[test]
    fn at_least_matches_lexicographic_order(
        a in 0u32..50, b in 0u32..50, c in 0u32..50, d in 0u32..50,
    ) {
        let version = ApiVersion::new(a, b);
        prop_assert_eq!(version.at_least(c, d), (a, b) >= (c, d));
    }
}

// ── Extension matching ───────────────────────────────────────────────────────

proptest! {
    #[test]
    fn membership_matches_the_token_set(
        tokens in prop::collection::vec("[a-z0-9_]{1,16}", 0..8),
        probe in "[a-z0-9_]{1,16}",
    ) {
        let list = tokens.join(" ");
        let expected = tokens.iter().any(|token| token == &probe);
        prop_assert_eq!(contains_extension(&list, &probe), expected);
    }

    #[test]
    fn extended_names_never_match(token in "[a-z0-9_]{1,16}") {
        let longer = format!("{token}x");
        prop_assert!(!contains_extension(&token, &longer));
        prop_assert!(!contains_extension(&longer, &token));
    }
}
