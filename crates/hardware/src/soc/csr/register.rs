//! Register file multiplexer for the narrow CSR bus.
//!
//! A register file is a flat table of registers at fixed byte offsets. Each register has a
//! width in bits and an access mode; it occupies `ceil(width / 8)` consecutive bytes. The
//! file does not store register values: reads sample a live value supplied by the owning
//! peripheral, and writes are reported back as strobes the peripheral acts on.
//!
//! Multi-byte registers are accessed atomically through shadow registers:
//! 1. **Reads:** A read of the first byte samples the live value into the read shadow and
//!    reports a read strobe; later bytes come from the shadow.
//! 2. **Writes:** Each byte lands in the write shadow; the write of the last byte reports a
//!    write strobe carrying the assembled value.
//!
//! Bytes of a register whose access mode forbids the operation are ignored: no strobe, no
//! shadow update, and read data stays zero.

use crate::common::addr::width_mask;
use crate::common::{ConfigError, CsrSignals};

/// Access mode of a register.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Access {
    /// Read-only.
    R,
    /// Write-only.
    W,
    /// Read-write.
    RW,
}

impl Access {
    /// Returns `true` if reads are permitted.
    pub const fn readable(self) -> bool {
        matches!(self, Self::R | Self::RW)
    }

    /// Returns `true` if writes are permitted.
    pub const fn writable(self) -> bool {
        matches!(self, Self::W | Self::RW)
    }
}

/// One named register of a register file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Register {
    name: String,
    offset: u64,
    width: u32,
    access: Access,
}

impl Register {
    /// Describes a register of `width` bits at byte `offset`.
    pub fn new(name: &str, offset: u64, width: u32, access: Access) -> Self {
        Self {
            name: name.to_owned(),
            offset,
            width,
            access,
        }
    }

    /// Register name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Byte offset of the first byte.
    pub const fn offset(&self) -> u64 {
        self.offset
    }

    /// Width in bits.
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Access mode.
    pub const fn access(&self) -> Access {
        self.access
    }

    /// Number of bytes occupied on the CSR bus.
    pub const fn bytes(&self) -> u64 {
        self.width.div_ceil(8) as u64
    }

    /// Mask of the meaningful value bits.
    pub const fn mask(&self) -> u64 {
        width_mask(self.width)
    }

    const fn covers(&self, addr: u64) -> bool {
        addr >= self.offset && addr - self.offset < self.bytes()
    }
}

/// Register-level event produced by a CSR access.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegisterStrobe {
    /// The register was read; its live value was sampled this edge.
    Read(usize),
    /// The register was written with an assembled value.
    Write {
        /// Index of the register in its file.
        index: usize,
        /// New value, masked to the register width.
        value: u64,
    },
}

/// A window of byte-addressable registers.
#[derive(Clone, Debug)]
pub struct RegisterFile {
    name: String,
    size: u64,
    registers: Vec<Register>,
    r_shadow: Vec<u64>,
    w_shadow: Vec<u64>,
    r_data: u8,
}

impl RegisterFile {
    /// Creates an empty register file spanning `2^addr_width` bytes.
    pub fn new(name: &str, addr_width: u32) -> Result<Self, ConfigError> {
        if name.is_empty() {
            return Err(ConfigError::EmptyName);
        }
        if addr_width == 0 || addr_width > 32 {
            return Err(ConfigError::InvalidAddressWidth(addr_width));
        }
        Ok(Self {
            name: name.to_owned(),
            size: 1 << addr_width,
            registers: Vec::new(),
            r_shadow: Vec::new(),
            w_shadow: Vec::new(),
            r_data: 0,
        })
    }

    /// Adds a register and returns its index.
    ///
    /// # Errors
    ///
    /// Rejects widths outside 1..=64 bits, duplicate names, registers reaching past the
    /// window and registers sharing a byte with an existing one.
    pub fn add(&mut self, register: Register) -> Result<usize, ConfigError> {
        if register.width == 0 || register.width > 64 {
            return Err(ConfigError::InvalidRegisterWidth {
                name: register.name,
                width: register.width,
            });
        }
        if self.index_of(&register.name).is_some() {
            return Err(ConfigError::DuplicateRegister(register.name));
        }
        if register.offset.saturating_add(register.bytes()) > self.size {
            return Err(ConfigError::RegisterOutOfRange {
                name: register.name,
                offset: register.offset,
                size: self.size,
            });
        }
        let end = register.offset + register.bytes();
        if let Some(other) = self
            .registers
            .iter()
            .find(|r| register.offset < r.offset + r.bytes() && r.offset < end)
        {
            return Err(ConfigError::OverlappingRegister {
                name: register.name,
                offset: register.offset,
                other: other.name.clone(),
            });
        }

        self.registers.push(register);
        self.r_shadow.push(0);
        self.w_shadow.push(0);
        Ok(self.registers.len() - 1)
    }

    /// Register file name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Window size in bytes.
    pub const fn size(&self) -> u64 {
        self.size
    }

    /// Registers in insertion order.
    pub fn registers(&self) -> &[Register] {
        &self.registers
    }

    /// Looks up a register index by name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.registers.iter().position(|r| r.name == name)
    }

    /// Read data registered at the previous edge.
    pub const fn r_data(&self) -> u8 {
        self.r_data
    }

    /// Samples one CSR access at the clock edge.
    ///
    /// # Arguments
    ///
    /// * `bus` - CSR signals with a window-relative byte address.
    /// * `live` - Returns the current value of a register by index; called only for a read
    ///   of the first byte of a readable register.
    ///
    /// # Returns
    ///
    /// The register strobe caused by this access, if any.
    pub fn clock(
        &mut self,
        bus: &CsrSignals,
        live: impl FnOnce(usize) -> u64,
    ) -> Option<RegisterStrobe> {
        self.r_data = 0;
        if !bus.is_access() {
            return None;
        }
        let (index, chunk) = self.locate(bus.addr)?;
        let register = &self.registers[index];
        let shift = chunk * 8;
        let mut strobe = None;

        if bus.r_stb && register.access.readable() {
            if chunk == 0 {
                self.r_shadow[index] = live(index) & register.mask();
                strobe = Some(RegisterStrobe::Read(index));
            }
            self.r_data = (self.r_shadow[index] >> shift) as u8;
        }

        if bus.w_stb && register.access.writable() {
            let cleared = self.w_shadow[index] & !(0xFF << shift);
            self.w_shadow[index] = cleared | (u64::from(bus.w_data) << shift);
            if chunk + 1 == register.bytes() {
                strobe = Some(RegisterStrobe::Write {
                    index,
                    value: self.w_shadow[index] & register.mask(),
                });
            }
        }

        strobe
    }

    /// Clears shadows and read data.
    pub fn reset(&mut self) {
        self.r_shadow.fill(0);
        self.w_shadow.fill(0);
        self.r_data = 0;
    }

    fn locate(&self, addr: u64) -> Option<(usize, u64)> {
        self.registers
            .iter()
            .position(|r| r.covers(addr))
            .map(|index| (index, addr - self.registers[index].offset))
    }
}
