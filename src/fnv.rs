// An FNV-1a hasher for keys made of NFA state identifiers.
//
// The determinizer hashes a frontier (a sorted list of NFA state ids) for
// every byte of every DFA state it builds, which makes hashing the hottest
// part of compilation. SipHash is needlessly slow for such short integer
// keys. Integers are mixed in a whole word at a time instead of byte by byte.
//
// See: https://en.wikipedia.org/wiki/Fowler%E2%80%93Noll%E2%80%93Vo_hash_function

use std::collections::HashMap as StdHashMap;
use std::hash::{self, BuildHasherDefault};

const PRIME: u64 = 1099511628211;
const INIT: u64 = 14695981039346656037;

pub type HashMap<K, V> = StdHashMap<K, V, BuildHasherDefault<Hasher>>;

#[derive(Debug)]
pub struct Hasher(u64);

impl Hasher {
    #[inline]
    fn mix(&mut self, word: u64) {
        self.0 = (self.0 ^ word).wrapping_mul(PRIME);
    }
}

impl Default for Hasher {
    fn default() -> Hasher {
        Hasher(INIT)
    }
}

impl hash::Hasher for Hasher {
    fn finish(&self) -> u64 {
        self.0
    }

    fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes.iter() {
            self.mix(byte as u64);
        }
    }

    #[inline]
    fn write_u8(&mut self, n: u8) {
        self.mix(n as u64);
    }

    #[inline]
    fn write_u32(&mut self, n: u32) {
        self.mix(n as u64);
    }

    #[inline]
    fn write_u64(&mut self, n: u64) {
        self.mix(n);
    }

    #[inline]
    fn write_usize(&mut self, n: usize) {
        self.mix(n as u64);
    }
}

#[cfg(test)]
mod tests {
    use std::hash::{Hash, Hasher as _};

    use super::*;

    fn hash<T: Hash>(value: &T) -> u64 {
        let mut h = Hasher::default();
        value.hash(&mut h);
        h.finish()
    }

    #[test]
    fn order_matters() {
        assert_ne!(hash(&vec![1usize, 2]), hash(&vec![2usize, 1]));
    }

    #[test]
    fn length_matters() {
        assert_ne!(hash(&vec![0usize]), hash(&vec![0usize, 0]));
    }
}
