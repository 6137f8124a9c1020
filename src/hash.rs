//! Hash functions for string keys.
//!
//! Both maps are generic over a [`BuildHasher`]. A key is hashed by writing
//! its UTF-8 bytes into a fresh hasher with a single [`Hasher::write`] call,
//! see [`hash_key`]. Going through `write` directly (instead of
//! `str: Hash`) keeps the two simple hash functions below free of the
//! terminator byte `str` appends.

use core::hash::BuildHasher;
use core::hash::Hasher;

cfg_if::cfg_if! {
    if #[cfg(feature = "foldhash")] {
        /// Hash builder used by `new()` and `Default`.
        ///
        /// With the `foldhash` feature this is foldhash's fixed-seed fast
        /// hasher, which keeps bucket layouts reproducible between runs.
        pub type DefaultHashBuilder = foldhash::fast::FixedState;
    } else {
        /// Hash builder used by `new()` and `Default`.
        pub type DefaultHashBuilder = AdditiveHash;
    }
}

/// Hashes `key` with a hasher built from `hash_builder`.
///
/// This is exactly the hash the maps compute internally, so a caller holding
/// a map's [`hasher()`](crate::ChainingMap::hasher) can find the bucket a key
/// lives in as `hash_key(map.hasher(), key) % capacity`.
///
/// # Examples
///
/// ```rust
/// use prime_probe::hash::AdditiveHash;
/// use prime_probe::hash::hash_key;
///
/// assert_eq!(hash_key(&AdditiveHash, "ab"), 97 + 98);
/// ```
#[inline]
pub fn hash_key<S: BuildHasher>(hash_builder: &S, key: &str) -> u64 {
    let mut hasher = hash_builder.build_hasher();
    hasher.write(key.as_bytes());
    hasher.finish()
}

/// Sums the bytes of the key.
///
/// Cheap and badly distributed: every permutation of a key lands in the same
/// bucket. Useful for exercising collision handling.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AdditiveHash;

impl BuildHasher for AdditiveHash {
    type Hasher = AdditiveHasher;

    fn build_hasher(&self) -> Self::Hasher {
        AdditiveHasher::default()
    }
}

/// Hasher produced by [`AdditiveHash`].
#[derive(Clone, Debug, Default)]
pub struct AdditiveHasher {
    sum: u64,
}

impl Hasher for AdditiveHasher {
    fn finish(&self) -> u64 {
        self.sum
    }

    fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.sum = self.sum.wrapping_add(byte as u64);
        }
    }
}

/// Sums each byte weighted by its one-based position in the key.
///
/// Distinguishes permutations that [`AdditiveHash`] maps together.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PositionalHash;

impl BuildHasher for PositionalHash {
    type Hasher = PositionalHasher;

    fn build_hasher(&self) -> Self::Hasher {
        PositionalHasher::default()
    }
}

/// Hasher produced by [`PositionalHash`].
#[derive(Clone, Debug, Default)]
pub struct PositionalHasher {
    sum: u64,
    position: u64,
}

impl Hasher for PositionalHasher {
    fn finish(&self) -> u64 {
        self.sum
    }

    fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.position += 1;
            self.sum = self
                .sum
                .wrapping_add(self.position.wrapping_mul(byte as u64));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn additive_sums_bytes() {
        assert_eq!(hash_key(&AdditiveHash, ""), 0);
        assert_eq!(hash_key(&AdditiveHash, "a"), 97);
        assert_eq!(hash_key(&AdditiveHash, "key1"), 107 + 101 + 121 + 49);
    }

    #[test]
    fn positional_weights_bytes() {
        assert_eq!(hash_key(&PositionalHash, ""), 0);
        assert_eq!(hash_key(&PositionalHash, "a"), 97);
        assert_eq!(hash_key(&PositionalHash, "ab"), 97 + 2 * 98);
    }

    #[test]
    fn distributions_differ_on_anagrams() {
        assert_eq!(
            hash_key(&AdditiveHash, "listen"),
            hash_key(&AdditiveHash, "silent")
        );
        assert_ne!(
            hash_key(&PositionalHash, "listen"),
            hash_key(&PositionalHash, "silent")
        );
    }

    #[test]
    fn hashing_is_deterministic() {
        let builder = DefaultHashBuilder::default();
        for key in ["", "a", "apple", "key149"] {
            assert_eq!(hash_key(&builder, key), hash_key(&builder, key));
            assert_eq!(
                hash_key(&builder, key),
                hash_key(&DefaultHashBuilder::default(), key)
            );
        }
    }
}
