//! Configuration system for the SoC model.
//!
//! This module defines the configuration structures used to parameterize the fabric. It
//! provides:
//! 1. **Defaults:** Baseline bus shape, address map and serial port constants.
//! 2. **Structures:** Hierarchical config for general options, bus, memory, CSR region
//!    and serial port.
//! 3. **Validation:** `Config::validate` checks cross-field constraints before a system is
//!    built.
//!
//! Configuration is deserialized from JSON (every field optional) or taken from
//! `Config::default()`.

use std::path::PathBuf;

use serde::Deserialize;

use crate::common::{BusGeometry, ConfigError, Window};
use crate::soc::devices::{Parity, RegisterMap};

/// Default configuration constants for the SoC model.
mod defaults {
    /// Word address width of the system bus (a 32-bit byte address space).
    pub const ADDR_WIDTH: u32 = 30;

    /// Data width of the system bus in bits.
    pub const DATA_WIDTH: u32 = 32;

    /// Granularity of the system bus in bits (byte selects).
    pub const GRANULARITY: u32 = 8;

    /// Name of the memory block.
    pub const MEMORY_NAME: &str = "rom";

    /// Byte base of the memory window.
    pub const MEMORY_BASE: u64 = 0x0000_0000;

    /// Memory size in granules (4 KiB at byte granularity).
    pub const MEMORY_SIZE: u64 = 4096;

    /// Name of the CSR bridge window.
    pub const CSR_NAME: &str = "csr";

    /// Byte base of the CSR window.
    pub const CSR_BASE: u64 = 0x8000_0000;

    /// Byte address width of the CSR bus; the window spans `2^31` bytes.
    pub const CSR_ADDR_WIDTH: u32 = 31;

    /// Name of the serial port.
    pub const SERIAL_NAME: &str = "serial";

    /// Identifier of the serial transceiver.
    pub const SERIAL_PHY: &str = "phy0";

    /// Byte address width of the serial register window (256 bytes).
    pub const SERIAL_ADDR_WIDTH: u32 = 8;

    /// Baud divisor: 1 MHz clock over 115200 baud.
    pub const SERIAL_DIVISOR: u32 = 1_000_000 / 115_200;

    /// Depth of each serial FIFO.
    pub const FIFO_DEPTH: usize = 16;

    /// Data bits per serial frame.
    pub const DATA_BITS: u32 = 8;
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// General options.
    #[serde(default)]
    pub general: GeneralConfig,
    /// System bus shape.
    #[serde(default)]
    pub bus: BusConfig,
    /// Memory block.
    #[serde(default)]
    pub memory: MemoryConfig,
    /// CSR region.
    #[serde(default)]
    pub csr: CsrConfig,
    /// Serial port.
    #[serde(default)]
    pub serial: SerialConfig,
}

/// General options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GeneralConfig {
    /// Emit a trace event for every bus beat.
    #[serde(default)]
    pub trace_bus: bool,
}

/// Shape of the system bus.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BusConfig {
    /// Word address width in bits.
    #[serde(default = "BusConfig::default_addr_width")]
    pub addr_width: u32,

    /// Data width in bits.
    #[serde(default = "BusConfig::default_data_width")]
    pub data_width: u32,

    /// Granularity in bits.
    #[serde(default = "BusConfig::default_granularity")]
    pub granularity: u32,
}

impl BusConfig {
    fn default_addr_width() -> u32 {
        defaults::ADDR_WIDTH
    }

    fn default_data_width() -> u32 {
        defaults::DATA_WIDTH
    }

    fn default_granularity() -> u32 {
        defaults::GRANULARITY
    }

    /// Validated bus geometry.
    pub fn geometry(&self) -> Result<BusGeometry, ConfigError> {
        BusGeometry::new(self.addr_width, self.data_width, self.granularity)
    }
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            addr_width: defaults::ADDR_WIDTH,
            data_width: defaults::DATA_WIDTH,
            granularity: defaults::GRANULARITY,
        }
    }
}

/// Memory block parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MemoryConfig {
    /// Slave name.
    #[serde(default = "MemoryConfig::default_name")]
    pub name: String,

    /// Byte base of the window.
    #[serde(default = "MemoryConfig::default_base")]
    pub base: u64,

    /// Size in granules; a power of two.
    #[serde(default = "MemoryConfig::default_size")]
    pub size: u64,

    /// Accept writes (RAM) instead of dropping them (ROM).
    #[serde(default)]
    pub writable: bool,

    /// Binary image loaded into the memory by the simulator.
    #[serde(default)]
    pub image: Option<PathBuf>,
}

impl MemoryConfig {
    fn default_name() -> String {
        defaults::MEMORY_NAME.to_owned()
    }

    fn default_base() -> u64 {
        defaults::MEMORY_BASE
    }

    fn default_size() -> u64 {
        defaults::MEMORY_SIZE
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            name: Self::default_name(),
            base: defaults::MEMORY_BASE,
            size: defaults::MEMORY_SIZE,
            writable: false,
            image: None,
        }
    }
}

/// CSR region parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CsrConfig {
    /// Bridge name.
    #[serde(default = "CsrConfig::default_name")]
    pub name: String,

    /// Byte base of the bridge window on the system bus.
    #[serde(default = "CsrConfig::default_base")]
    pub base: u64,

    /// Byte address width of the CSR bus.
    #[serde(default = "CsrConfig::default_addr_width")]
    pub addr_width: u32,
}

impl CsrConfig {
    fn default_name() -> String {
        defaults::CSR_NAME.to_owned()
    }

    fn default_base() -> u64 {
        defaults::CSR_BASE
    }

    fn default_addr_width() -> u32 {
        defaults::CSR_ADDR_WIDTH
    }

    /// Size of the bridge window in bytes.
    pub const fn size(&self) -> u64 {
        1 << self.addr_width
    }
}

impl Default for CsrConfig {
    fn default() -> Self {
        Self {
            name: Self::default_name(),
            base: defaults::CSR_BASE,
            addr_width: defaults::CSR_ADDR_WIDTH,
        }
    }
}

/// Serial port parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SerialConfig {
    /// Peripheral name.
    #[serde(default = "SerialConfig::default_name")]
    pub name: String,

    /// Identifier of the transceiver instance.
    #[serde(default = "SerialConfig::default_phy")]
    pub phy: String,

    /// Byte base of the register window on the CSR bus.
    #[serde(default)]
    pub base: u64,

    /// Byte address width of the register window.
    #[serde(default = "SerialConfig::default_addr_width")]
    pub addr_width: u32,

    /// Reset value of the divisor register.
    #[serde(default = "SerialConfig::default_divisor")]
    pub divisor: u32,

    /// Receive FIFO depth.
    #[serde(default = "SerialConfig::default_fifo_depth")]
    pub rx_fifo_depth: usize,

    /// Transmit FIFO depth.
    #[serde(default = "SerialConfig::default_fifo_depth")]
    pub tx_fifo_depth: usize,

    /// Data bits per frame.
    #[serde(default = "SerialConfig::default_data_bits")]
    pub data_bits: u32,

    /// Parity mode.
    #[serde(default)]
    pub parity: Parity,

    /// Register offsets.
    #[serde(default)]
    pub registers: RegisterMap,
}

impl SerialConfig {
    fn default_name() -> String {
        defaults::SERIAL_NAME.to_owned()
    }

    fn default_phy() -> String {
        defaults::SERIAL_PHY.to_owned()
    }

    fn default_addr_width() -> u32 {
        defaults::SERIAL_ADDR_WIDTH
    }

    fn default_divisor() -> u32 {
        defaults::SERIAL_DIVISOR
    }

    fn default_fifo_depth() -> usize {
        defaults::FIFO_DEPTH
    }

    fn default_data_bits() -> u32 {
        defaults::DATA_BITS
    }
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            name: Self::default_name(),
            phy: Self::default_phy(),
            base: 0,
            addr_width: defaults::SERIAL_ADDR_WIDTH,
            divisor: defaults::SERIAL_DIVISOR,
            rx_fifo_depth: defaults::FIFO_DEPTH,
            tx_fifo_depth: defaults::FIFO_DEPTH,
            data_bits: defaults::DATA_BITS,
            parity: Parity::None,
            registers: RegisterMap::default(),
        }
    }
}

impl Config {
    /// Parses a JSON document; absent fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Checks the constraints that span several fields.
    ///
    /// Component constructors repeat their own checks; this catches address map problems
    /// up front with the names from the configuration.
    ///
    /// # Returns
    ///
    /// `Ok(())`, or the first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let geometry = self.bus.geometry()?;
        if self.csr.addr_width == 0 || self.csr.addr_width > 56 {
            return Err(ConfigError::InvalidAddressWidth(self.csr.addr_width));
        }
        if geometry.granularity() != 8 {
            return Err(ConfigError::BridgeGranularity(geometry.granularity()));
        }

        let memory_bytes = self
            .memory
            .size
            .saturating_mul(u64::from(geometry.granularity()))
            / 8;
        let memory = Window::new(&self.memory.name, self.memory.base, memory_bytes)?;
        let csr = Window::new(&self.csr.name, self.csr.base, self.csr.size())?;
        for (name, window) in [(&self.memory.name, memory), (&self.csr.name, csr)] {
            if window.end() > geometry.byte_space() {
                return Err(ConfigError::WindowOutOfRange {
                    name: name.clone(),
                    end: window.end(),
                    space: geometry.byte_space(),
                });
            }
        }
        if memory.overlaps(&csr) {
            return Err(ConfigError::OverlappingWindow {
                name: self.csr.name.clone(),
                other: self.memory.name.clone(),
            });
        }

        let serial = &self.serial;
        if serial.addr_width == 0 || serial.addr_width > 32 {
            return Err(ConfigError::InvalidAddressWidth(serial.addr_width));
        }
        let serial_window = Window::new(&serial.name, serial.base, 1 << serial.addr_width)?;
        if serial_window.end() > self.csr.size() {
            return Err(ConfigError::WindowOutOfRange {
                name: serial.name.clone(),
                end: serial_window.end(),
                space: self.csr.size(),
            });
        }
        if serial.divisor == 0 {
            return Err(ConfigError::ZeroDivisor);
        }
        if serial.rx_fifo_depth == 0 || serial.tx_fifo_depth == 0 {
            return Err(ConfigError::ZeroFifoDepth);
        }
        if !(5..=8).contains(&serial.data_bits) {
            return Err(ConfigError::InvalidDataBits(serial.data_bits));
        }
        Ok(())
    }
}
