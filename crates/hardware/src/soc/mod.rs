//! System-on-Chip (SoC) Components.
//!
//! This module organizes the components that make up the modelled fabric, including the
//! interconnect, the memory block, the CSR side with its peripherals, and the builder that
//! assembles them into a `System`.

/// System builder and top-level clocking.
pub mod builder;

/// CSR register files, decoder and bridge.
pub mod csr;

/// Register-mapped peripherals.
pub mod devices;

/// Arbiter and address decoder of the system bus.
pub mod interconnect;

/// Burst-capable memory block.
pub mod memory;

/// Slave traits for the system bus and the CSR bus.
pub mod traits;

pub use builder::System;
pub use traits::{CsrSlave, WishboneSlave};
