//! Simulation harness around the fabric.
//!
//! Provides stand-ins for the collaborators outside the model: scripted bus masters for
//! the CPU ports, the memory image loader, and the `Simulator` that clocks them together.

/// Memory image loading.
pub mod loader;

/// Scripted bus master.
pub mod master;

/// Simulator driving the system and its master ports.
pub mod simulator;

pub use master::{BusMaster, Completion, Request, Status};
pub use simulator::Simulator;
