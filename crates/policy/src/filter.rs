//! Sandbox Membership Filter.
//!
//! A fixed-size Bloom filter answering "have I (approximately) seen this
//! 64-bit key before?". The evaluator records every address a candidate would
//! have prefetched and probes later accesses against the record, so the
//! filter's guarantees shape the scoring:
//! * **No false negatives:** every inserted key reports as present, so a
//!   genuinely accurate candidate is never under-scored.
//! * **Bounded false positives:** a probe may report a key that was never
//!   inserted; the probability grows with the load factor, which the default
//!   sizing (8192 bits, 3 hashes) keeps low for one period's ≤ 256 insertions.
//!
//! There is no removal operation; the only way to shrink the false-positive
//! rate mid-run is `clear()`, which the evaluator performs at every period
//! rollover.

use crate::common::ConfigError;

/// FNV-1a offset basis (64-bit).
const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;

/// FNV-1a prime (64-bit).
const FNV_PRIME: u64 = 0x100_0000_01b3;

/// Membership filter state.
///
/// The bit array is packed into `u64` words; `clear()` zeroes it in place
/// without reallocating.
#[derive(Clone, Debug)]
pub struct BloomFilter {
    /// Packed bit array.
    words: Vec<u64>,
    /// Number of addressable bits (`words` may carry unused tail bits).
    num_bits: usize,
    /// Number of independent hash positions per key.
    num_hashes: usize,
}

impl BloomFilter {
    /// Creates a new membership filter.
    ///
    /// # Arguments
    ///
    /// * `num_bits` - Size of the bit array.
    /// * `num_hashes` - Hash positions derived per key; `0` falls back to `1`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroFilterBits`] if `num_bits` is zero; a
    /// zero-sized filter cannot answer membership queries.
    pub fn new(num_bits: usize, num_hashes: usize) -> Result<Self, ConfigError> {
        if num_bits == 0 {
            return Err(ConfigError::ZeroFilterBits);
        }

        Ok(Self {
            words: vec![0; num_bits.div_ceil(64)],
            num_bits,
            num_hashes: if num_hashes == 0 { 1 } else { num_hashes },
        })
    }

    /// Derives the bit position for `(key, hash_index)`.
    ///
    /// FNV-1a-style mix over the little-endian bytes of the key and the hash
    /// index, interleaved byte for byte, reduced modulo the bit count. The
    /// interleave makes each `hash_index` select an effectively independent
    /// position for the same key.
    fn bit_position(&self, key: u64, hash_index: usize) -> usize {
        let key_bytes = key.to_le_bytes();
        let index_bytes = (hash_index as u64).to_le_bytes();

        let mut hash = FNV_OFFSET_BASIS;
        for j in 0..8 {
            hash ^= u64::from(key_bytes[j]);
            hash = hash.wrapping_mul(FNV_PRIME);

            hash ^= u64::from(index_bytes[j]);
            hash = hash.wrapping_mul(FNV_PRIME);
        }

        (hash % self.num_bits as u64) as usize
    }

    /// Records a key in the filter.
    pub fn insert(&mut self, key: u64) {
        for i in 0..self.num_hashes {
            let bit = self.bit_position(key, i);
            self.words[bit / 64] |= 1_u64 << (bit % 64);
        }
    }

    /// Probes the filter for a key.
    ///
    /// # Returns
    ///
    /// `false` means the key was definitely never inserted since the last
    /// clear; `true` means it probably was.
    pub fn possibly_contains(&self, key: u64) -> bool {
        (0..self.num_hashes).all(|i| {
            let bit = self.bit_position(key, i);
            self.words[bit / 64] & (1_u64 << (bit % 64)) != 0
        })
    }

    /// Resets the filter to the all-false state without reallocating.
    pub fn clear(&mut self) {
        self.words.fill(0);
    }
}
