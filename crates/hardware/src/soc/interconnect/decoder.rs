//! Address decoder for the system bus.
//!
//! The decoder owns every slave of the system bus, each at a fixed, aligned, power-of-two
//! window. For each cycle it:
//! 1. **Selects:** Finds the one window containing the byte address of the beat.
//! 2. **Forwards:** Hands the selected slave the master signals with a window-relative
//!    word address; every other slave observes `cyc` low.
//! 3. **Returns:** Passes back the selected slave's response only.
//!
//! A strobed beat matching no window is answered by a built-in error responder: `err`
//! rises for one cycle, one clock edge after the strobe, and `ack` never does.

use tracing::debug;

use crate::common::addr::width_mask;
use crate::common::{BusGeometry, ConfigError, MasterSignals, SlaveSignals, Window};
use crate::soc::csr::WishboneCsrBridge;
use crate::soc::memory::WishboneMemory;
use crate::soc::traits::WishboneSlave;

/// A slave mapped into the system address space.
#[derive(Debug)]
struct SlaveMapping {
    window: Window,
    slave: Box<dyn WishboneSlave>,
}

/// Fixed address map of the system bus.
#[derive(Debug)]
pub struct AddressDecoder {
    geometry: BusGeometry,
    mappings: Vec<SlaveMapping>,
    miss_err: bool,
    misses: u64,
}

impl AddressDecoder {
    /// Creates a decoder with no slaves for a bus of the given shape.
    pub const fn new(geometry: BusGeometry) -> Self {
        Self {
            geometry,
            mappings: Vec::new(),
            miss_err: false,
            misses: 0,
        }
    }

    /// Shape of the decoded bus.
    pub const fn geometry(&self) -> &BusGeometry {
        &self.geometry
    }

    /// Maps a slave at byte address `base`; its window size comes from the slave.
    ///
    /// # Arguments
    ///
    /// * `base` - First byte address of the window.
    /// * `slave` - The slave; its data width must match the bus.
    ///
    /// # Errors
    ///
    /// Rejects data width mismatches, non-power-of-two or misaligned windows, windows past
    /// the end of the address space and windows overlapping an existing mapping.
    pub fn add(&mut self, base: u64, slave: Box<dyn WishboneSlave>) -> Result<(), ConfigError> {
        if slave.data_width() != self.geometry.data_width() {
            return Err(ConfigError::DataWidthMismatch {
                name: slave.name().to_owned(),
                expected: self.geometry.data_width(),
                found: slave.data_width(),
            });
        }
        let window = Window::new(slave.name(), base, slave.window_size())?;
        if window.end() > self.geometry.byte_space() {
            return Err(ConfigError::WindowOutOfRange {
                name: slave.name().to_owned(),
                end: window.end(),
                space: self.geometry.byte_space(),
            });
        }
        if let Some(other) = self.mappings.iter().find(|m| m.window.overlaps(&window)) {
            return Err(ConfigError::OverlappingWindow {
                name: slave.name().to_owned(),
                other: other.slave.name().to_owned(),
            });
        }
        self.mappings.push(SlaveMapping { window, slave });
        Ok(())
    }

    /// Names and windows of the mapped slaves.
    pub fn windows(&self) -> impl Iterator<Item = (&str, Window)> {
        self.mappings.iter().map(|m| (m.slave.name(), m.window))
    }

    /// Number of beats answered by the error responder since reset.
    pub const fn misses(&self) -> u64 {
        self.misses
    }

    /// Index of the mapping whose window contains the beat, if `cyc` is high.
    ///
    /// # Returns
    ///
    /// `Some(index)` for a mapped address, `None` for an idle bus or a miss.
    pub fn select(&self, bus: &MasterSignals) -> Option<usize> {
        if !bus.cyc {
            return None;
        }
        let addr = self.byte_address(bus);
        self.mappings.iter().position(|m| m.window.contains(addr))
    }

    /// Returns the response of the selected slave, or of the error responder on a miss.
    pub fn respond(&self, bus: &MasterSignals) -> SlaveSignals {
        match self.select(bus) {
            Some(index) => {
                let local = self.localize(index, bus);
                self.mappings[index].slave.respond(&local)
            }
            None => SlaveSignals {
                err: self.miss_err && bus.cyc,
                ..SlaveSignals::IDLE
            },
        }
    }

    /// Clocks every slave, the selected one with the forwarded beat, the rest idle.
    pub fn clock(&mut self, bus: &MasterSignals) {
        let selected = self.select(bus);
        for index in 0..self.mappings.len() {
            let signals = if selected == Some(index) {
                self.localize(index, bus)
            } else {
                bus.deselected()
            };
            self.mappings[index].slave.clock(&signals);
        }

        let miss = bus.is_strobed() && selected.is_none();
        let raise = miss && !self.miss_err;
        if raise {
            self.misses += 1;
            debug!(adr = bus.adr, addr = self.byte_address(bus), "decode miss");
        }
        self.miss_err = raise;
    }

    /// Resets every slave and the error responder.
    pub fn reset(&mut self) {
        self.miss_err = false;
        self.misses = 0;
        for mapping in &mut self.mappings {
            mapping.slave.reset();
        }
    }

    /// Looks up a slave by name.
    pub fn slave_mut(&mut self, name: &str) -> Option<&mut dyn WishboneSlave> {
        self.mappings
            .iter_mut()
            .find(|m| m.slave.name() == name)
            .map(|m| -> &mut dyn WishboneSlave { m.slave.as_mut() })
    }

    /// Returns the first mapped memory.
    pub fn memory_mut(&mut self) -> Option<&mut WishboneMemory> {
        self.mappings
            .iter_mut()
            .find_map(|m| m.slave.as_memory_mut())
    }

    /// Returns the first mapped CSR bridge.
    pub fn csr_bridge_mut(&mut self) -> Option<&mut WishboneCsrBridge> {
        self.mappings
            .iter_mut()
            .find_map(|m| m.slave.as_csr_bridge_mut())
    }

    fn byte_address(&self, bus: &MasterSignals) -> u64 {
        let adr = bus.adr & width_mask(self.geometry.addr_width());
        self.geometry.word_to_byte(adr)
    }

    /// Master signals as seen by mapping `index`: word address relative to its window.
    fn localize(&self, index: usize, bus: &MasterSignals) -> MasterSignals {
        let offset = self.byte_address(bus) - self.mappings[index].window.base;
        MasterSignals {
            adr: self.geometry.byte_to_word(offset),
            ..*bus
        }
    }
}
