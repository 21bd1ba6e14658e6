//! Key hashing for the byte-keyed map.

use core::hash::BuildHasher;
use std::collections::hash_map::RandomState;

/// Hash function over raw key bytes. Must be deterministic for the
/// lifetime of a map; distribution quality is the caller's concern.
pub trait KeyHasher {
    fn hash_key(&self, key: &[u8]) -> u64;
}

impl<F> KeyHasher for F
where
    F: Fn(&[u8]) -> u64,
{
    #[inline]
    fn hash_key(&self, key: &[u8]) -> u64 {
        self(key)
    }
}

/// SipHash keyed per instance through `RandomState`.
#[derive(Clone, Debug, Default)]
pub struct RandomKeyHasher(RandomState);

impl RandomKeyHasher {
    pub fn new() -> Self {
        Self(RandomState::new())
    }
}

impl KeyHasher for RandomKeyHasher {
    #[inline]
    fn hash_key(&self, key: &[u8]) -> u64 {
        self.0.hash_one(key)
    }
}

/// Interprets up to the first eight key bytes as a little-endian integer.
/// Integer keys then land in bucket `key mod capacity`.
pub fn identity_hash(key: &[u8]) -> u64 {
    let mut buf = [0u8; 8];
    let n = key.len().min(8);
    buf[..n].copy_from_slice(&key[..n]);
    u64::from_le_bytes(buf)
}
