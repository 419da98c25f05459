//! Shared test infrastructure.

/// Simulator harness with blocking bus accesses.
pub mod harness;
