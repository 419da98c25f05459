//! Memory image loading.
//!
//! This module turns a raw binary image into the ordered initial words of a memory block.
//! It provides:
//! 1. **Packing:** Little-endian packing of bytes into `data_width`-bit words, with a
//!    trailing partial word zero-padded.
//! 2. **Loading:** Reading an image from disk and packing it in one step.

use std::fs;
use std::path::Path;

use crate::common::SimError;

/// Packs bytes into little-endian words of `data_width` bits.
///
/// # Arguments
///
/// * `bytes` - Raw image; byte 0 lands in the least significant byte of word 0.
/// * `data_width` - Word width in bits (a multiple of 8, at most 64).
///
/// # Returns
///
/// `ceil(bytes.len() / (data_width / 8))` words.
pub fn pack_words(bytes: &[u8], data_width: u32) -> Vec<u64> {
    let bytes_per_word = (data_width / 8).max(1) as usize;
    bytes
        .chunks(bytes_per_word)
        .map(|chunk| {
            chunk
                .iter()
                .enumerate()
                .fold(0u64, |word, (i, &byte)| word | (u64::from(byte) << (8 * i)))
        })
        .collect()
}

/// Reads a binary image from disk and packs it into words.
///
/// # Arguments
///
/// * `path` - Path to the image file.
/// * `data_width` - Word width in bits.
///
/// # Errors
///
/// `SimError::Image` if the file cannot be read.
pub fn load_image(path: &Path, data_width: u32) -> Result<Vec<u64>, SimError> {
    let bytes = fs::read(path).map_err(|source| SimError::Image {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(pack_words(&bytes, data_width))
}
