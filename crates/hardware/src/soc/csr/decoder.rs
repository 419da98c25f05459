//! Address decoder for the narrow CSR bus.
//!
//! Routes each byte access to the peripheral whose window contains the address. The CSR
//! bus has no error signal, so unmapped reads return zero and unmapped writes vanish.
//! Every peripheral is clocked every cycle; those not addressed see an idle bus.

use tracing::trace;

use crate::common::{ConfigError, CsrSignals, Window};
use crate::soc::devices::SerialPeripheral;
use crate::soc::traits::CsrSlave;

/// A peripheral mapped into the CSR address space.
#[derive(Debug)]
struct CsrMapping {
    window: Window,
    slave: Box<dyn CsrSlave>,
}

/// Fixed map of CSR peripherals.
#[derive(Debug)]
pub struct CsrDecoder {
    addr_width: u32,
    mappings: Vec<CsrMapping>,
}

impl CsrDecoder {
    /// Creates an empty decoder for a CSR bus with `addr_width` byte-address bits.
    pub fn new(addr_width: u32) -> Result<Self, ConfigError> {
        if addr_width == 0 || addr_width > 56 {
            return Err(ConfigError::InvalidAddressWidth(addr_width));
        }
        Ok(Self {
            addr_width,
            mappings: Vec::new(),
        })
    }

    /// Byte-address width of the CSR bus.
    pub const fn addr_width(&self) -> u32 {
        self.addr_width
    }

    /// Size of the CSR address space in bytes.
    pub const fn space(&self) -> u64 {
        1 << self.addr_width
    }

    /// Maps a peripheral at byte address `base`.
    ///
    /// # Arguments
    ///
    /// * `base` - First byte address; must be aligned to the peripheral's window size.
    /// * `slave` - The peripheral.
    ///
    /// # Errors
    ///
    /// Rejects misaligned or non-power-of-two windows, windows past the end of the CSR
    /// space and windows overlapping an existing mapping.
    pub fn add(&mut self, base: u64, slave: Box<dyn CsrSlave>) -> Result<(), ConfigError> {
        let window = Window::new(slave.name(), base, slave.window_size())?;
        if window.end() > self.space() {
            return Err(ConfigError::WindowOutOfRange {
                name: slave.name().to_owned(),
                end: window.end(),
                space: self.space(),
            });
        }
        if let Some(other) = self.mappings.iter().find(|m| m.window.overlaps(&window)) {
            return Err(ConfigError::OverlappingWindow {
                name: slave.name().to_owned(),
                other: other.slave.name().to_owned(),
            });
        }
        self.mappings.push(CsrMapping { window, slave });
        Ok(())
    }

    /// Names and windows of the mapped peripherals.
    pub fn windows(&self) -> impl Iterator<Item = (&str, Window)> {
        self.mappings.iter().map(|m| (m.slave.name(), m.window))
    }

    /// OR of every peripheral's registered read data.
    pub fn r_data(&self) -> u8 {
        self.mappings
            .iter()
            .fold(0, |acc, m| acc | m.slave.r_data())
    }

    /// Forwards one CSR cycle to the peripherals and clocks all of them.
    pub fn clock(&mut self, bus: &CsrSignals) {
        let mut hit = false;
        for mapping in &mut self.mappings {
            if bus.is_access() && mapping.window.contains(bus.addr) {
                hit = true;
                let local = CsrSignals {
                    addr: bus.addr - mapping.window.base,
                    ..*bus
                };
                mapping.slave.clock(&local);
            } else {
                mapping.slave.clock(&CsrSignals::IDLE);
            }
        }
        if bus.is_access() && !hit {
            trace!(addr = bus.addr, write = bus.w_stb, "csr access unmapped");
        }
    }

    /// Resets every peripheral.
    pub fn reset(&mut self) {
        for mapping in &mut self.mappings {
            mapping.slave.reset();
        }
    }

    /// Looks up a peripheral by name.
    pub fn slave_mut(&mut self, name: &str) -> Option<&mut dyn CsrSlave> {
        self.mappings
            .iter_mut()
            .find(|m| m.slave.name() == name)
            .map(|m| -> &mut dyn CsrSlave { m.slave.as_mut() })
    }

    /// Returns the first mapped serial port.
    pub fn serial_mut(&mut self) -> Option<&mut SerialPeripheral> {
        self.mappings
            .iter_mut()
            .find_map(|m| m.slave.as_serial_mut())
    }
}
