//! Bus signal set shared by every fabric component.
//!
//! This module defines the wire-level vocabulary of the Wishbone-style system bus and the
//! narrow CSR bus. It provides:
//! 1. **Master signals:** `cyc`, `stb`, `adr`, `dat_w`, `sel`, `we`, `cti`, `bte`.
//! 2. **Slave signals:** `ack`, `err`, `dat_r`.
//! 3. **Burst policy:** Cycle type and burst extension enums plus the address advance rule.
//! 4. **CSR signals:** Byte-wide `addr`, `r_stb`, `w_stb`, `w_data` for register access.

/// Wishbone cycle type identifier (`cti`).
///
/// Discriminants follow the Wishbone B4 encoding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CycleType {
    /// Single beat; the slave acknowledges once and the master ends or restrobes.
    #[default]
    Classic = 0,
    /// Burst at a constant address (e.g. a FIFO port).
    ConstBurst = 1,
    /// Burst whose address advances every beat according to `bte`.
    IncrBurst = 2,
    /// Final beat of a burst.
    EndOfBurst = 7,
}

impl CycleType {
    /// Returns `true` when a beat of this type completes on its first acknowledge, so a
    /// slave with registered feedback must not acknowledge it again.
    #[inline]
    pub const fn ends_on_ack(self) -> bool {
        matches!(self, Self::Classic | Self::EndOfBurst)
    }

    /// Returns `true` for the burst cycle types that keep a cycle open across beats.
    #[inline]
    pub const fn is_burst(self) -> bool {
        matches!(self, Self::ConstBurst | Self::IncrBurst)
    }
}

/// Wishbone burst type extension (`bte`), selecting linear or wrapping increments.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BurstTypeExt {
    /// Full-width linear increment.
    #[default]
    Linear = 0,
    /// Increment wraps inside an aligned 4-beat window.
    Wrap4 = 1,
    /// Increment wraps inside an aligned 8-beat window.
    Wrap8 = 2,
    /// Increment wraps inside an aligned 16-beat window.
    Wrap16 = 3,
}

/// Mask of the low address bits that wrap, indexed by `BurstTypeExt` discriminant.
const WRAP_MASKS: [u64; 4] = [u64::MAX, 0b11, 0b111, 0b1111];

impl BurstTypeExt {
    /// Returns the mask of address bits that advance during an incrementing burst.
    ///
    /// Bits outside the mask stay fixed, which confines the burst to an aligned window.
    #[inline]
    pub const fn wrap_mask(self) -> u64 {
        WRAP_MASKS[self as usize]
    }

    /// Returns the number of beats in one wrap window, or `None` for linear bursts.
    pub const fn window_beats(self) -> Option<u64> {
        match self {
            Self::Linear => None,
            _ => Some(self.wrap_mask() + 1),
        }
    }
}

/// Computes the word address of the beat following `curr`.
///
/// Only `IncrBurst` advances; the increment is confined to the low bits selected by `bte`,
/// so a wrapping burst cycles through its window while the high bits stay fixed.
///
/// # Arguments
///
/// * `curr` - Word address of the current beat.
/// * `cti` - Cycle type of the current beat.
/// * `bte` - Burst type extension of the current beat.
///
/// # Returns
///
/// The word address of the next beat.
#[inline]
pub const fn next_burst_address(curr: u64, cti: CycleType, bte: BurstTypeExt) -> u64 {
    if !matches!(cti, CycleType::IncrBurst) {
        return curr;
    }
    let mask = bte.wrap_mask();
    (curr & !mask) | (curr.wrapping_add(1) & mask)
}

/// Signals driven by a bus master (or forwarded downstream by the arbiter and decoder).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MasterSignals {
    /// Cycle in progress; held for the whole transaction, bursts included.
    pub cyc: bool,
    /// Strobe: a beat is being requested this cycle. Only meaningful with `cyc`.
    pub stb: bool,
    /// Word address.
    pub adr: u64,
    /// Write data.
    pub dat_w: u64,
    /// Byte (granule) select, one bit per granule of the data word.
    pub sel: u8,
    /// Write enable.
    pub we: bool,
    /// Cycle type identifier.
    pub cti: CycleType,
    /// Burst type extension.
    pub bte: BurstTypeExt,
}

impl MasterSignals {
    /// All signals low: no cycle in progress.
    pub const IDLE: Self = Self {
        cyc: false,
        stb: false,
        adr: 0,
        dat_w: 0,
        sel: 0,
        we: false,
        cti: CycleType::Classic,
        bte: BurstTypeExt::Linear,
    };

    /// A classic single-beat read.
    pub const fn read(adr: u64, sel: u8) -> Self {
        Self {
            cyc: true,
            stb: true,
            adr,
            sel,
            ..Self::IDLE
        }
    }

    /// A classic single-beat write.
    pub const fn write(adr: u64, dat_w: u64, sel: u8) -> Self {
        Self {
            cyc: true,
            stb: true,
            adr,
            dat_w,
            sel,
            we: true,
            ..Self::IDLE
        }
    }

    /// Returns `true` when a beat is being requested (`cyc & stb`).
    #[inline]
    pub const fn is_strobed(&self) -> bool {
        self.cyc && self.stb
    }

    /// Returns a copy with `cyc` (and therefore any strobe) forced low.
    ///
    /// Used by the decoder so that unselected slaves observe an idle bus.
    #[inline]
    pub const fn deselected(self) -> Self {
        Self {
            cyc: false,
            stb: false,
            ..self
        }
    }
}

/// Signals driven by a bus slave back towards the master.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SlaveSignals {
    /// Beat completed successfully.
    pub ack: bool,
    /// Beat terminated with an error.
    pub err: bool,
    /// Read data, valid while `ack` is high.
    pub dat_r: u64,
}

impl SlaveSignals {
    /// No response this cycle.
    pub const IDLE: Self = Self {
        ack: false,
        err: false,
        dat_r: 0,
    };

    /// Returns `true` if the beat was terminated, successfully or not.
    #[inline]
    pub const fn terminated(&self) -> bool {
        self.ack || self.err
    }
}

/// Signals of the narrow (8-bit) CSR bus.
///
/// Read data travels back separately through `CsrSlave::r_data`, one cycle after `r_stb`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CsrSignals {
    /// Byte address.
    pub addr: u64,
    /// Read strobe.
    pub r_stb: bool,
    /// Write strobe.
    pub w_stb: bool,
    /// Write data.
    pub w_data: u8,
}

impl CsrSignals {
    /// No access this cycle.
    pub const IDLE: Self = Self {
        addr: 0,
        r_stb: false,
        w_stb: false,
        w_data: 0,
    };

    /// A byte read strobe at `addr`.
    pub const fn read(addr: u64) -> Self {
        Self {
            addr,
            r_stb: true,
            ..Self::IDLE
        }
    }

    /// A byte write strobe at `addr`.
    pub const fn write(addr: u64, w_data: u8) -> Self {
        Self {
            addr,
            w_stb: true,
            w_data,
            ..Self::IDLE
        }
    }

    /// Returns `true` if either strobe is asserted.
    #[inline]
    pub const fn is_access(&self) -> bool {
        self.r_stb || self.w_stb
    }
}
