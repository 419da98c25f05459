//! Cycle-level model of a small Wishbone System-on-Chip interconnect.
//!
//! This crate models the on-chip bus fabric of a small SoC with the following:
//! 1. **Signals:** The Wishbone master/slave signal set, burst cycle types and the
//!    wrapping burst address rule.
//! 2. **Interconnect:** A round-robin arbiter for the CPU's instruction and data ports and
//!    an address decoder with an error responder for unmapped addresses.
//! 3. **Memory:** A burst-capable memory block with granular writes and ROM mode.
//! 4. **CSR:** An 8-bit register bus with register files, a decoder and a wide-to-narrow
//!    bridge, and a UART peripheral with receive/transmit FIFOs and a transceiver.
//! 5. **Simulation:** Configuration, scripted bus masters, image loading and statistics.
//!
//! Every component is a synchronous state machine: outputs are read in a respond phase,
//! then every component samples its inputs at the clock edge.

/// Common types (signals, geometry, errors).
pub mod common;
/// Fabric configuration (defaults, hierarchical config structures, validation).
pub mod config;
/// Simulation harness (bus masters, loader, simulator).
pub mod sim;
/// System-on-chip (builder, interconnect, memory, CSR, devices, traits).
pub mod soc;
/// Bus statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Simulator driving the system with scripted master ports.
pub use crate::sim::Simulator;
/// Top-level system (arbiter, decoder, slaves); construct with `System::new`.
pub use crate::soc::System;
