//! Word storage backing a memory block.
//!
//! This module provides the fixed-depth word array owned by a memory controller. It
//! supports:
//! 1. **Initialization:** Construction from an ordered sequence of initial words.
//! 2. **Word access:** Reads of whole words, with addresses wrapped modulo the depth.
//! 3. **Granular writes:** Writes that update only the granules enabled by a `sel` mask.

use std::ops::Index;

use crate::common::addr::width_mask;

/// Fixed-depth array of fixed-width words.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WordBuffer {
    words: Vec<u64>,
    data_width: u32,
    granularity: u32,
}

impl WordBuffer {
    /// Creates a zero-filled buffer and copies `init` into its first words.
    ///
    /// The caller guarantees `depth` is a power of two and `init.len() <= depth`;
    /// initial words are truncated to `data_width` bits.
    ///
    /// # Arguments
    ///
    /// * `depth` - Number of words.
    /// * `data_width` - Word width in bits.
    /// * `granularity` - Width of one write granule in bits.
    /// * `init` - Initial contents, lowest address first.
    pub fn new(depth: usize, data_width: u32, granularity: u32, init: &[u64]) -> Self {
        let mask = width_mask(data_width);
        let mut words = vec![0u64; depth];
        for (slot, word) in words.iter_mut().zip(init) {
            *slot = word & mask;
        }
        Self {
            words,
            data_width,
            granularity,
        }
    }

    /// Returns the number of words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Returns `true` if the buffer holds no words.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Reads the word at `index`, wrapping the index modulo the depth.
    #[inline]
    pub fn read(&self, index: u64) -> u64 {
        self.words[self.wrap(index)]
    }

    /// Writes `data` into the word at `index` under the `sel` granule mask.
    ///
    /// Granule `i` covers bits `[i * granularity, (i + 1) * granularity)` and is written
    /// only if bit `i` of `sel` is set.
    pub fn write(&mut self, index: u64, data: u64, sel: u8) {
        let lanes = self.data_width / self.granularity;
        let lane_mask = width_mask(self.granularity);
        let mut enable = 0u64;
        for lane in 0..lanes {
            if sel & (1 << lane) != 0 {
                enable |= lane_mask << (lane * self.granularity);
            }
        }
        let slot = self.wrap(index);
        self.words[slot] = (self.words[slot] & !enable) | (data & enable);
    }

    /// Returns the stored words.
    pub fn as_slice(&self) -> &[u64] {
        &self.words
    }

    #[inline]
    fn wrap(&self, index: u64) -> usize {
        (index as usize) & (self.words.len() - 1)
    }
}

impl Index<usize> for WordBuffer {
    /// Output type for indexing operations (one word).
    type Output = u64;

    /// Indexes into the buffer to read a word.
    fn index(&self, index: usize) -> &Self::Output {
        &self.words[index]
    }
}
