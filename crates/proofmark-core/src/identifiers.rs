//! Request references
//!
//! A request reference is the short human-shareable identifier generated at
//! the start of a run and used to correlate mail, attestations, email, and
//! logs. It is not a security token.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Characters allowed in the random portion: uppercase plus digits with
/// I, O, 0 and 1 removed, which are visually confusable when read back.
pub const REF_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Length of the random disambiguator.
const REF_RANDOM_LEN: usize = 4;

/// Human-shareable request reference, e.g. `PRF-2026-K7QT`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestRef(String);

impl RequestRef {
    /// Generate a fresh reference for the current year.
    pub fn generate() -> Self {
        Self::for_year(chrono::Utc::now().format("%Y").to_string())
    }

    fn for_year(year: String) -> Self {
        let mut rng = rand::thread_rng();
        let random: String = (0..REF_RANDOM_LEN)
            .map(|_| REF_ALPHABET[rng.gen_range(0..REF_ALPHABET.len())] as char)
            .collect();
        Self(format!("PRF-{year}-{random}"))
    }

    /// Borrow the reference as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_matches_documented_pattern() {
        for _ in 0..64 {
            let reference = RequestRef::generate();
            let parts: Vec<&str> = reference.as_str().split('-').collect();
            assert_eq!(parts.len(), 3);
            assert_eq!(parts[0], "PRF");
            assert_eq!(parts[1].len(), 4);
            assert!(parts[1].chars().all(|c| c.is_ascii_digit()));
            assert_eq!(parts[2].len(), 4);
            for c in parts[2].chars() {
                assert!(REF_ALPHABET.contains(&(c as u8)), "unexpected char {c}");
                assert!(!"IO01".contains(c), "ambiguous char {c}");
            }
        }
    }

    #[test]
    fn references_are_distinct_in_practice() {
        let a = RequestRef::generate();
        let b = RequestRef::generate();
        let c = RequestRef::generate();
        // 32^4 combinations; three consecutive collisions would mean a broken RNG
        assert!(a != b || b != c);
    }
}
