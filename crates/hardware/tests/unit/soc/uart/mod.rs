//! Serial port tests.


/// Synchronous FIFO semantics.
pub mod fifo_watermarks;

/// Simulated transceiver timing.
pub mod transceiver;
