//! Polynomial rolling hash used for bucket placement.
//!
//! `h = (h * BASE + byte) mod MODULUS` over the key's bytes, starting at
//! zero. The table feeds raw key bytes through `Hasher::write`, so the
//! value depends on nothing but the key.

use core::hash::{BuildHasher, Hasher};

const BASE: u64 = 31;
const MODULUS: u64 = 1_000_000_007;

/// Rolling hash state. Always below `MODULUS`, so `h * BASE + byte` cannot
/// overflow a `u64`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct PolynomialHasher {
    state: u64,
}

impl Hasher for PolynomialHasher {
    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.state = (self.state * BASE + u64::from(b)) % MODULUS;
        }
    }

    #[inline]
    fn finish(&self) -> u64 {
        self.state
    }
}

/// Stateless builder for [`PolynomialHasher`]; the default for `HashTable`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct PolynomialBuildHasher;

impl BuildHasher for PolynomialBuildHasher {
    type Hasher = PolynomialHasher;

    fn build_hasher(&self) -> Self::Hasher {
        PolynomialHasher::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hash(bytes: &[u8]) -> u64 {
        let mut h = PolynomialBuildHasher.build_hasher();
        h.write(bytes);
        h.finish()
    }

    /// Invariant: the empty key hashes to zero.
    #[test]
    fn empty_input_is_zero() {
        assert_eq!(hash(b""), 0);
    }

    /// Invariant: values follow the rolling recurrence over byte values.
    #[test]
    fn matches_recurrence() {
        assert_eq!(hash(b"a"), 97);
        assert_eq!(hash(b"ab"), 97 * 31 + 98);
        assert_eq!(hash(b"abc"), (97 * 31 + 98) * 31 + 99);
    }

    /// Invariant: split writes accumulate exactly like a single write.
    #[test]
    fn split_writes_are_equivalent() {
        let mut h = PolynomialBuildHasher.build_hasher();
        h.write(b"hello ");
        h.write(b"world");
        assert_eq!(h.finish(), hash(b"hello world"));
    }

    /// Invariant: the state stays reduced below the modulus on long input.
    #[test]
    fn long_input_stays_reduced() {
        let long = vec![0xffu8; 10_000];
        assert!(hash(&long) < MODULUS);
    }

    /// Invariant: every builder starts from the same state.
    #[test]
    fn builders_are_deterministic() {
        let a = PolynomialBuildHasher.build_hasher();
        let b = PolynomialBuildHasher::default().build_hasher();
        assert_eq!(a, b);
        assert_eq!(hash(b"key"), hash(b"key"));
    }
}
