//! SHA-256 content fingerprinting
//!
//! Fingerprints are lowercase hex SHA-256 digests. They are the only
//! representation of user content that survives a run: tamper checks compare
//! them, deletion receipts record them, and attestations carry them as
//! fixed-width `bytes32` values.

use sha2::{Digest, Sha256};

/// Compute the lowercase hex SHA-256 digest of a byte buffer.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Normalize a hex digest for comparison: lowercase, `0x` prefix stripped.
pub fn normalize_hex(digest: &str) -> String {
    digest
        .trim()
        .strip_prefix("0x")
        .unwrap_or(digest.trim())
        .to_ascii_lowercase()
}

/// Convert a hex digest to a `0x`-prefixed fixed-width bytes32 string,
/// truncating long input and zero-padding short input on the right.
pub fn to_bytes32(digest: &str) -> String {
    let mut hex = normalize_hex(digest);
    hex.truncate(64);
    format!("0x{hex:0<64}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn digest_is_64_lowercase_hex_chars() {
        let digest = sha256_hex(b"proofmark");
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn empty_input_matches_known_vector() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn normalize_strips_prefix_and_case() {
        assert_eq!(normalize_hex("0xABCDef"), "abcdef");
        assert_eq!(normalize_hex("  abcdef  "), "abcdef");
    }

    #[test]
    fn bytes32_pads_and_truncates() {
        assert_eq!(to_bytes32("ab"), format!("0x{:0<64}", "ab"));
        let long = "f".repeat(80);
        assert_eq!(to_bytes32(&long), format!("0x{}", "f".repeat(64)));
    }

    proptest! {
        #[test]
        fn digest_is_deterministic(bytes in proptest::collection::vec(any::<u8>(), 0..2048)) {
            prop_assert_eq!(sha256_hex(&bytes), sha256_hex(&bytes));
        }
    }
}
