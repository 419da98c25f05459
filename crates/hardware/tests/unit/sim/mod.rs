//! Simulation harness tests.

/// Image packing and loading.
pub mod loader;
