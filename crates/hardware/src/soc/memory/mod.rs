//! Burst-capable memory block on the system bus.
//!
//! This module implements the memory slave. It provides:
//! 1. **Buffer:** Fixed-depth word storage with granular writes.
//! 2. **Controller:** The idle/cycle FSM and burst address generation.
//! 3. **WishboneMemory:** The slave that ties both to the bus, validates its parameters
//!    and optionally rejects writes (ROM).

/// Word storage with `sel`-granular writes.
pub mod buffer;

/// Idle/cycle FSM and burst address generation.
pub mod controller;

use self::buffer::WordBuffer;
use self::controller::BurstController;
use crate::common::addr::VALID_WIDTHS;
use crate::common::{ConfigError, MasterSignals, SlaveSignals};
use crate::soc::traits::WishboneSlave;

/// Memory block served over the Wishbone bus.
///
/// `size` is counted in granules, so a byte-granular memory of `size` 4096 holds 4 KiB;
/// its depth in words is `size * granularity / data_width`.
#[derive(Debug)]
pub struct WishboneMemory {
    name: String,
    size: u64,
    data_width: u32,
    granularity: u32,
    writable: bool,
    init: Vec<u64>,
    storage: WordBuffer,
    controller: BurstController,
}

impl WishboneMemory {
    /// Creates a memory block.
    ///
    /// # Arguments
    ///
    /// * `name` - Non-empty name, used for logging and lookup.
    /// * `size` - Size in granules; a power of two.
    /// * `data_width` - Word width in bits (8, 16, 32 or 64).
    /// * `granularity` - Granule width in bits (8, 16, 32 or 64).
    /// * `writable` - `false` makes the block a ROM; write beats are acknowledged but dropped.
    /// * `init` - Initial words, lowest address first; at most `depth` of them.
    ///
    /// # Returns
    ///
    /// The memory, or the first violated `ConfigError`.
    pub fn new(
        name: &str,
        size: u64,
        data_width: u32,
        granularity: u32,
        writable: bool,
        init: &[u64],
    ) -> Result<Self, ConfigError> {
        if name.is_empty() {
            return Err(ConfigError::EmptyName);
        }
        if !size.is_power_of_two() {
            return Err(ConfigError::SizeNotPowerOfTwo {
                name: name.to_owned(),
                size,
            });
        }
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
        let bits = size.saturating_mul(u64::from(granularity));
        if bits < u64::from(data_width) {
            return Err(ConfigError::MemoryTooSmall {
                size,
                granularity,
                data_width,
            });
        }
        let depth = (bits / u64::from(data_width)) as usize;
        if init.len() > depth {
            return Err(ConfigError::InitTooLong {
                len: init.len(),
                depth,
            });
        }

        Ok(Self {
            name: name.to_owned(),
            size,
            data_width,
            granularity,
            writable,
            init: init.to_vec(),
            storage: WordBuffer::new(depth, data_width, granularity, init),
            controller: BurstController::new(),
        })
    }

    /// Size in granules.
    pub const fn size(&self) -> u64 {
        self.size
    }

    /// Granule width in bits.
    pub const fn granularity(&self) -> u32 {
        self.granularity
    }

    /// Whether write beats modify the contents.
    pub const fn writable(&self) -> bool {
        self.writable
    }

    /// Initial contents supplied at construction.
    pub fn init(&self) -> &[u64] {
        &self.init
    }

    /// Number of words.
    pub fn depth(&self) -> usize {
        self.storage.len()
    }

    /// Reads a word directly, bypassing the bus.
    pub fn peek(&self, index: u64) -> u64 {
        self.storage.read(index)
    }

    /// Returns the FSM for inspection.
    pub const fn controller(&self) -> &BurstController {
        &self.controller
    }
}

impl WishboneSlave for WishboneMemory {
    fn name(&self) -> &str {
        &self.name
    }

    /// Returns the window size in bytes.
    fn window_size(&self) -> u64 {
        self.size * u64::from(self.granularity) / 8
    }

    fn data_width(&self) -> u32 {
        self.data_width
    }

    fn respond(&self, bus: &MasterSignals) -> SlaveSignals {
        self.controller.respond(bus)
    }

    fn clock(&mut self, bus: &MasterSignals) {
        self.controller
            .clock(bus, &mut self.storage, self.writable);
    }

    /// Reloads the initial contents and idles the controller.
    fn reset(&mut self) {
        self.storage = WordBuffer::new(
            self.storage.len(),
            self.data_width,
            self.granularity,
            &self.init,
        );
        self.controller.reset();
    }

    fn as_memory_mut(&mut self) -> Option<&mut WishboneMemory> {
        Some(self)
    }
}
