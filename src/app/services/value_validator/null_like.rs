//! Null-like value recognition
//!
//! A value is null-like when it conveys no real data: an exact member of the
//! fixed placeholder set, entirely whitespace, or a single filler character
//! (`?` or `0`) repeated across its whole length. Null-like values always
//! become the null sentinel in the output.

use crate::constants::{FILLER_CHARS, NULL_LIKE_TOKENS};

/// Test whether a value should be converted to the null sentinel
pub fn is_null_like(value: &str) -> bool {
    if NULL_LIKE_TOKENS.contains(&value) {
        return true;
    }
    let mut chars = value.chars();
    let Some(first) = chars.next() else {
        // Empty string is covered by the token set
        return false;
    };
    if value.chars().all(|c| c.is_whitespace()) {
        return true;
    }
    FILLER_CHARS.contains(&first) && chars.all(|c| c == first)
}

/// Scrub a raw cell before any check: drop stray escape backslashes left by
/// the export, then surrounding whitespace.
pub fn scrub(value: &str) -> &str {
    value.trim_matches('\\').trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_tokens() {
        assert!(is_null_like(""));
        assert!(is_null_like("b6"));
        assert!(is_null_like("N/A"));
        assert!(is_null_like("A.2.a"));
        assert!(!is_null_like("n/a"));
    }

    #[test]
    fn test_whitespace_only() {
        assert!(is_null_like(" "));
        assert!(is_null_like("\t \t"));
        assert!(!is_null_like(" x "));
    }

    #[test]
    fn test_repeated_filler() {
        assert!(is_null_like("?"));
        assert!(is_null_like("????"));
        assert!(is_null_like("0"));
        assert!(is_null_like("0000"));
        assert!(!is_null_like("0001"));
        assert!(!is_null_like("?0?0"));
        assert!(!is_null_like("xxxx"));
    }

    #[test]
    fn test_real_values_pass() {
        assert!(!is_null_like("042"));
        assert!(!is_null_like("2020-01-01"));
        assert!(!is_null_like("SMITH, JOHN"));
    }

    #[test]
    fn test_scrub_strips_escapes_and_whitespace() {
        assert_eq!(scrub("\\  value \\"), "value");
        assert_eq!(scrub("  plain  "), "plain");
        assert_eq!(scrub("\\\\"), "");
        assert_eq!(scrub("a|b"), "a|b");
    }
}
