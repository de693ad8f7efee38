//! Content hashing using xxHash3.
//!
//! Used by the source file cache to reuse a build when a version bump carries
//! identical text.

use xxhash_rust::xxh3::xxh3_64;

/// Compute a 64-bit hash of the given string using xxHash3.
#[inline]
pub fn hash_str(data: &str) -> u64 {
    xxh3_64(data.as_bytes())
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_consistency() {
        assert_eq!(hash_str("<template></template>"), hash_str("<template></template>"));
        assert_ne!(hash_str("a"), hash_str("b"));
    }
}
