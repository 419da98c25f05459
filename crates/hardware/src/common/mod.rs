//! Common types shared by every part of the fabric.
//!
//! This module provides the fundamental building blocks used across the SoC model:
//! 1. **Signals:** The Wishbone and CSR signal bundles and the burst address rule.
//! 2. **Addresses:** Bus geometry and aligned slave windows.
//! 3. **Errors:** Construction-time and harness error types.

/// Bus geometry and address windows.
pub mod addr;

/// Error types for configuration and simulation.
pub mod error;

/// Bus signal bundles and burst policy.
pub mod signals;

pub use addr::{BusGeometry, Window};
pub use error::{ConfigError, SimError};
pub use signals::{
    BurstTypeExt, CsrSignals, CycleType, MasterSignals, SlaveSignals, next_burst_address,
};
