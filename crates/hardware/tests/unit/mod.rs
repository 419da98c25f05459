//! # Unit Components
//!
//! This module serves as the central hub for the tests of every part of the fabric,
//! from the shared signal vocabulary up to the assembled system.

/// Unit tests for the common signal and address types.
///
/// This module verifies the burst address rule, bus geometry and slave windows.
pub mod common;

/// Unit tests for configuration parsing and validation.
pub mod config;

/// Unit tests for the simulation harness.
///
/// This module covers the image loader and the scripted bus masters.
pub mod sim;

/// Unit tests for the System-on-Chip (SoC) components.
///
/// This module organizes tests for the memory block, the interconnect, the CSR side
/// and the serial port.
pub mod soc;

/// Unit tests for bus statistics.
pub mod stats_verification;
