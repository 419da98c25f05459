//! Bus geometry and address windows.
//!
//! This module holds the address arithmetic shared by the decoder, the memory and the
//! CSR side of the fabric. It provides:
//! 1. **Geometry:** Address width, data width and granularity of a bus, with the derived
//!    lane count, byte/word conversions and data masks.
//! 2. **Windows:** Aligned power-of-two byte ranges owned by a single slave.

use super::error::ConfigError;

/// Data widths a Wishbone bus (or its granule) may have, in bits.
pub const VALID_WIDTHS: [u32; 4] = [8, 16, 32, 64];

/// Shape of a Wishbone bus: word address width, data width and granularity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BusGeometry {
    addr_width: u32,
    data_width: u32,
    granularity: u32,
}

impl BusGeometry {
    /// Creates a validated bus geometry.
    ///
    /// # Arguments
    ///
    /// * `addr_width` - Width of the word address in bits (1..=56).
    /// * `data_width` - Width of the data bus in bits (8, 16, 32 or 64).
    /// * `granularity` - Width of one `sel` granule in bits, at most `data_width`.
    ///
    /// # Returns
    ///
    /// The geometry, or a `ConfigError` describing the first violated constraint.
    pub fn new(addr_width: u32, data_width: u32, granularity: u32) -> Result<Self, ConfigError> {
        if !VALID_WIDTHS.contains(&data_width) {
            return Err(ConfigError::InvalidDataWidth(data_width));
        }
        if !VALID_WIDTHS.contains(&granularity) {
            return Err(ConfigError::InvalidGranularity(granularity));
        }
        if granularity > data_width {
            return Err(ConfigError::GranularityExceedsWidth {
                granularity,
                data_width,
            });
        }
        if addr_width == 0 || addr_width > 56 {
            return Err(ConfigError::InvalidAddressWidth(addr_width));
        }
        Ok(Self {
            addr_width,
            data_width,
            granularity,
        })
    }

    /// Word address width in bits.
    pub const fn addr_width(&self) -> u32 {
        self.addr_width
    }

    /// Data width in bits.
    pub const fn data_width(&self) -> u32 {
        self.data_width
    }

    /// Granule width in bits.
    pub const fn granularity(&self) -> u32 {
        self.granularity
    }

    /// Number of `sel` lanes (granules per word).
    pub const fn lanes(&self) -> u32 {
        self.data_width / self.granularity
    }

    /// Bytes per data word.
    pub const fn bytes_per_word(&self) -> u64 {
        (self.data_width / 8) as u64
    }

    /// Size of the byte address space reachable through `adr`.
    pub const fn byte_space(&self) -> u64 {
        (1u64 << self.addr_width) * self.bytes_per_word()
    }

    /// Mask covering one data word.
    pub const fn data_mask(&self) -> u64 {
        width_mask(self.data_width)
    }

    /// `sel` value with every lane enabled.
    pub const fn full_sel(&self) -> u8 {
        width_mask(self.lanes()) as u8
    }

    /// Converts a word address into the byte address of its first byte.
    #[inline]
    pub const fn word_to_byte(&self, adr: u64) -> u64 {
        adr * self.bytes_per_word()
    }

    /// Converts a byte address into the word address containing it.
    #[inline]
    pub const fn byte_to_word(&self, addr: u64) -> u64 {
        addr / self.bytes_per_word()
    }
}

/// Returns a mask with the low `bits` bits set (`bits` may be 64).
#[inline]
pub const fn width_mask(bits: u32) -> u64 {
    if bits >= 64 { u64::MAX } else { (1u64 << bits) - 1 }
}

/// An aligned, power-of-two sized byte range owned by one slave.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Window {
    /// First byte address of the window.
    pub base: u64,
    /// Size of the window in bytes.
    pub size: u64,
}

impl Window {
    /// Creates a window after checking the size is a power of two and the base is aligned.
    ///
    /// # Arguments
    ///
    /// * `name` - Owner name, used in error messages.
    /// * `base` - First byte address.
    /// * `size` - Size in bytes.
    pub fn new(name: &str, base: u64, size: u64) -> Result<Self, ConfigError> {
        if !size.is_power_of_two() {
            return Err(ConfigError::SizeNotPowerOfTwo {
                name: name.to_owned(),
                size,
            });
        }
        if base & (size - 1) != 0 {
            return Err(ConfigError::MisalignedWindow {
                name: name.to_owned(),
                base,
                size,
            });
        }
        Ok(Self { base, size })
    }

    /// Returns `true` if `addr` falls inside the window.
    #[inline]
    pub const fn contains(&self, addr: u64) -> bool {
        addr >= self.base && addr - self.base < self.size
    }

    /// Returns `true` if the two windows share at least one byte.
    pub const fn overlaps(&self, other: &Self) -> bool {
        self.base < other.base.saturating_add(other.size)
            && other.base < self.base.saturating_add(self.size)
    }

    /// Returns the byte one past the end of the window.
    pub const fn end(&self) -> u64 {
        self.base.saturating_add(self.size)
    }
}
