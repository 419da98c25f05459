//! Construction and simulation error types.
//!
//! The fabric itself has no run-time error path: in-protocol failures are bus-level `err`
//! responses or status flags. Errors in this module cover the two remaining cases:
//! 1. **Configuration:** Topology or parameter constraints violated at construction time.
//!    The bus is fixed once built, so these are rejected before any transaction occurs.
//! 2. **Simulation harness:** Misuse of the stand-in bus masters, time-outs and image I/O.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A constraint violated while building a bus component.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A component name was empty.
    #[error("component name must be a non-empty string")]
    EmptyName,

    /// Data width outside {8, 16, 32, 64}.
    #[error("data width must be 8, 16, 32 or 64, not {0}")]
    InvalidDataWidth(u32),

    /// Granularity outside {8, 16, 32, 64}.
    #[error("granularity must be 8, 16, 32 or 64, not {0}")]
    InvalidGranularity(u32),

    /// Granularity wider than the data bus.
    #[error("granularity {granularity} must not exceed data width {data_width}")]
    GranularityExceedsWidth {
        /// Requested granularity in bits.
        granularity: u32,
        /// Data width in bits.
        data_width: u32,
    },

    /// Word address width of zero or too wide to model.
    #[error("address width must be between 1 and 56 bits, not {0}")]
    InvalidAddressWidth(u32),

    /// A size that must be a power of two is not.
    #[error("size of {name} must be a power of two, not {size:#x}")]
    SizeNotPowerOfTwo {
        /// Owner of the size.
        name: String,
        /// Offending size.
        size: u64,
    },

    /// Memory too small to hold a single data word.
    #[error(
        "size {size} * granularity {granularity} must be greater than or equal to data width {data_width}"
    )]
    MemoryTooSmall {
        /// Size in granules.
        size: u64,
        /// Granularity in bits.
        granularity: u32,
        /// Data width in bits.
        data_width: u32,
    },

    /// Initial memory image longer than the memory.
    #[error("initial contents hold {len} words but memory depth is {depth}")]
    InitTooLong {
        /// Number of words supplied.
        len: usize,
        /// Memory depth in words.
        depth: usize,
    },

    /// Window base not aligned to its size.
    #[error("window of {name} at {base:#x} is not aligned to its size {size:#x}")]
    MisalignedWindow {
        /// Owner of the window.
        name: String,
        /// Window base.
        base: u64,
        /// Window size.
        size: u64,
    },

    /// Two windows on the same bus overlap.
    #[error("window of {name} overlaps window of {other}")]
    OverlappingWindow {
        /// Window being added.
        name: String,
        /// Window already present.
        other: String,
    },

    /// Window reaches beyond the bus address space.
    #[error("window of {name} ending at {end:#x} exceeds the {space:#x}-byte address space")]
    WindowOutOfRange {
        /// Owner of the window.
        name: String,
        /// One past the last byte of the window.
        end: u64,
        /// Size of the bus address space.
        space: u64,
    },

    /// Slave data width differs from the bus it is attached to.
    #[error("{name} has data width {found}, bus expects {expected}")]
    DataWidthMismatch {
        /// Slave name.
        name: String,
        /// Bus data width.
        expected: u32,
        /// Slave data width.
        found: u32,
    },

    /// Register width outside 1..=64 bits.
    #[error("register {name} must be 1 to 64 bits wide, not {width}")]
    InvalidRegisterWidth {
        /// Register name.
        name: String,
        /// Requested width.
        width: u32,
    },

    /// Register bytes collide with another register.
    #[error("register {name} at offset {offset:#x} overlaps register {other}")]
    OverlappingRegister {
        /// Register being added.
        name: String,
        /// Requested byte offset.
        offset: u64,
        /// Register already present.
        other: String,
    },

    /// Register extends past the register file window.
    #[error("register {name} at offset {offset:#x} does not fit in a {size:#x}-byte register file")]
    RegisterOutOfRange {
        /// Register name.
        name: String,
        /// Requested byte offset.
        offset: u64,
        /// Register file window size.
        size: u64,
    },

    /// Two registers share a name.
    #[error("register {0} is defined twice")]
    DuplicateRegister(String),

    /// A FIFO with no storage.
    #[error("FIFO depth must be at least 1")]
    ZeroFifoDepth,

    /// An arbiter with nothing to arbitrate.
    #[error("arbiter needs at least one master port")]
    NoMasters,

    /// The CSR bridge only handles byte-granular wide buses.
    #[error("CSR bridge requires a bus granularity of 8 bits, not {0}")]
    BridgeGranularity(u32),

    /// Baud divisor of zero.
    #[error("serial divisor must be nonzero")]
    ZeroDivisor,

    /// Serial frames carry 5 to 8 data bits.
    #[error("serial data bits must be between 5 and 8, not {0}")]
    InvalidDataBits(u32),
}

/// A failure of the simulation harness around the fabric.
#[derive(Debug, Error)]
pub enum SimError {
    /// A write was submitted to a read-only master port.
    #[error("bus master {0} is read-only and cannot issue writes")]
    ReadOnlyPort(String),

    /// A request carries a malformed shape (e.g. a zero-length burst).
    #[error("bus master {port} rejected request: {reason}")]
    InvalidRequest {
        /// Master port name.
        port: String,
        /// What is wrong with the request.
        reason: &'static str,
    },

    /// The masters still had work after the cycle budget ran out.
    #[error("simulation did not settle within {0} cycles")]
    Timeout(u64),

    /// A memory image could not be read.
    #[error("failed to read memory image {}: {source}", .path.display())]
    Image {
        /// Path of the image.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// The system configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
