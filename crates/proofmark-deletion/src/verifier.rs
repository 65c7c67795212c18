//! Committed-fingerprint verification
//!
//! The only client-supplied, unauthenticated claim in the pipeline is
//! "this blob is the file the user hashed in their browser". Verifying it
//! against the fetched bytes before any further processing prevents a
//! swapped-file attack between upload and fulfillment.

use proofmark_core::fingerprint::{normalize_hex, sha256_hex};

/// Compare the SHA-256 of `bytes` against the fingerprint committed at
/// upload time. Comparison is normalized (lowercase hex, `0x` prefix
/// ignored). Returns `false` on mismatch; the caller decides whether that
/// is fatal.
///
/// On mismatch the two digests are logged for forensics. The mismatched
/// content itself is never logged.
pub fn verify(bytes: &[u8], expected_fingerprint: &str) -> bool {
    let actual = sha256_hex(bytes);
    let expected = normalize_hex(expected_fingerprint);
    if actual != expected {
        tracing::error!(expected = %expected, actual = %actual, "content fingerprint mismatch");
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn matching_fingerprint_verifies() {
        let bytes = b"identity document bytes";
        assert!(verify(bytes, &sha256_hex(bytes)));
    }

    #[test]
    fn normalization_accepts_prefix_and_case() {
        let bytes = b"identity document bytes";
        let digest = sha256_hex(bytes);
        assert!(verify(bytes, &format!("0x{}", digest.to_uppercase())));
    }

    #[test]
    fn mismatch_returns_false_not_panic() {
        assert!(!verify(b"content", &"0".repeat(64)));
    }

    proptest! {
        #[test]
        fn any_content_verifies_against_own_digest(
            bytes in proptest::collection::vec(any::<u8>(), 0..4096)
        ) {
            prop_assert!(verify(&bytes, &sha256_hex(&bytes)));
        }

        #[test]
        fn single_byte_mutation_is_detected(
            bytes in proptest::collection::vec(any::<u8>(), 1..4096),
            index in any::<prop::sample::Index>(),
        ) {
            let digest = sha256_hex(&bytes);
            let mut mutated = bytes.clone();
            let i = index.index(mutated.len());
            mutated[i] = mutated[i].wrapping_add(1);
            prop_assert!(!verify(&mutated, &digest));
        }
    }
}
