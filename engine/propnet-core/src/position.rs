//! Position: the persistent-fact bit vector of a game state.
//!
//! A `Position` holds one bit per base proposition of a compiled network.
//! Bit `i` is the truth value of base component `i`. Positions are plain
//! value objects owned by the caller; evaluators only read or write them.

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

const WORD_BITS: usize = 64;

/// Fixed-size bit vector of base propositions.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Position {
    words: Vec<u64>,
    len: usize,
}

impl Position {
    /// Create an all-false position with `len` facts.
    pub fn new(len: usize) -> Self {
        Self {
            words: vec![0; len.div_ceil(WORD_BITS)],
            len,
        }
    }

    /// Create a position with the given fact indices set.
    pub fn from_indices(len: usize, indices: impl IntoIterator<Item = usize>) -> Self {
        let mut position = Self::new(len);
        for index in indices {
            position.set(index, true);
        }
        position
    }

    /// Number of facts (bits) in this position.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Read fact `index`.
    ///
    /// Panics if `index >= len()`.
    #[inline]
    pub fn get(&self, index: usize) -> bool {
        assert!(index < self.len, "fact {index} out of range ({})", self.len);
        (self.words[index / WORD_BITS] >> (index % WORD_BITS)) & 1 == 1
    }

    /// Write fact `index`.
    ///
    /// Panics if `index >= len()`.
    #[inline]
    pub fn set(&mut self, index: usize, value: bool) {
        assert!(index < self.len, "fact {index} out of range ({})", self.len);
        let mask = 1u64 << (index % WORD_BITS);
        let word = &mut self.words[index / WORD_BITS];
        if value {
            *word |= mask;
        } else {
            *word &= !mask;
        }
    }

    /// Clear every fact.
    pub fn clear(&mut self) {
        self.words.iter_mut().for_each(|w| *w = 0);
    }

    /// Bulk copy from another position of the same size.
    ///
    /// Panics on a size mismatch.
    #[inline]
    pub fn assign(&mut self, from: &Position) {
        assert_eq!(self.len, from.len, "position size mismatch");
        self.words.copy_from_slice(&from.words);
    }

    /// Stable 64-bit hash of the fact pattern.
    pub fn hash_code(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }

    /// Number of true facts.
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Indices of true facts, ascending.
    pub fn ones(&self) -> impl Iterator<Item = usize> + '_ {
        iter_bits(self.words.iter().copied())
    }

    /// Indices where `self` and `other` differ, ascending.
    ///
    /// Panics on a size mismatch.
    pub fn diff<'a>(&'a self, other: &'a Position) -> impl Iterator<Item = usize> + 'a {
        assert_eq!(self.len, other.len, "position size mismatch");
        iter_bits(self.words.iter().zip(&other.words).map(|(a, b)| a ^ b))
    }

    /// Approximate heap footprint in bytes.
    pub fn heap_bytes(&self) -> usize {
        self.words.capacity() * std::mem::size_of::<u64>()
    }
}

fn iter_bits(words: impl Iterator<Item = u64>) -> impl Iterator<Item = usize> {
    words.enumerate().flat_map(|(w, mut bits)| {
        std::iter::from_fn(move || {
            if bits == 0 {
                return None;
            }
            let bit = bits.trailing_zeros() as usize;
            bits &= bits - 1;
            Some(w * WORD_BITS + bit)
        })
    })
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Position")
            .field("len", &self.len)
            .field("ones", &self.ones().collect::<Vec<_>>())
            .finish()
    }
}
