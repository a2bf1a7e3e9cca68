//! Short code validation and generation
//!
//! Codes are 6 to 8 characters from a 62-character alphanumeric alphabet.
//! Generation makes no uniqueness promise, the storage constraint on `code`
//! is what rejects collisions.

use rand::Rng;
use url::Url;

/// All characters a code can be made of
const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Minimum code length
const MIN_LENGTH: usize = 6;

/// Maximum code length
const MAX_LENGTH: usize = 8;

/// Length of generated codes
pub const DEFAULT_LENGTH: usize = 6;

/// Check whether a string is a well-formed code
///
/// Pure syntax check, does not consult storage
pub fn is_valid_code(code: &str) -> bool {
    (MIN_LENGTH..=MAX_LENGTH).contains(&code.len())
        && code.bytes().all(|byte| byte.is_ascii_alphanumeric())
}

/// Check whether a string is an absolute `http` or `https` URL
///
/// Parse failures yield `false`, never an error
pub fn is_valid_url(url: &str) -> bool {
    match Url::parse(url) {
        Ok(url) => url.scheme() == "http" || url.scheme() == "https",
        Err(_) => false,
    }
}

/// Generate a random code of `length` characters
///
/// Draws uniformly from the alphabet using the OS-seeded thread RNG
pub fn generate(length: usize) -> String {
    let mut rng = rand::rng();

    (0..length)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_valid_codes() {
        assert!(is_valid_code("abc123"));
        assert!(is_valid_code("ABCDEFGH"));
        assert!(is_valid_code("1234567"));
    }

    #[test]
    fn test_code_length_bounds() {
        assert!(!is_valid_code(""));
        assert!(!is_valid_code("abc12"));
        assert!(is_valid_code("abc123"));
        assert!(is_valid_code("abc12345"));
        assert!(!is_valid_code("abc123456"));
    }

    #[test]
    fn test_code_rejects_non_alphanumeric() {
        assert!(!is_valid_code("abc-12"));
        assert!(!is_valid_code("abc 12"));
        assert!(!is_valid_code("abc_123"));
        assert!(!is_valid_code("abc12é"));
    }

    #[test]
    fn test_valid_urls() {
        assert!(is_valid_url("http://example.com"));
        assert!(is_valid_url("https://example.com/some/path?q=1"));
    }

    #[test]
    fn test_url_rejects_other_schemes() {
        assert!(!is_valid_url("ftp://example.com"));
        assert!(!is_valid_url("javascript:alert(1)"));
        assert!(!is_valid_url("file:///etc/passwd"));
    }

    #[test]
    fn test_url_rejects_garbage() {
        assert!(!is_valid_url(""));
        assert!(!is_valid_url("not a url"));
        assert!(!is_valid_url("example.com"));
        assert!(!is_valid_url("/relative/path"));
    }

    #[test]
    fn test_generate_length() {
        assert_eq!(generate(DEFAULT_LENGTH).len(), 6);
        assert_eq!(generate(8).len(), 8);
    }

    #[test]
    fn test_generated_codes_are_valid() {
        for _ in 0..100 {
            assert!(is_valid_code(&generate(DEFAULT_LENGTH)));
        }
    }

    #[test]
    fn test_generate_does_not_repeat_quickly() {
        let mut codes = HashSet::new();

        for _ in 0..1000 {
            codes.insert(generate(DEFAULT_LENGTH));
        }

        assert_eq!(codes.len(), 1000);
    }
}
