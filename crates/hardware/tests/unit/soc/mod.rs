//! System-on-Chip component tests.



/// Memory block tests.
pub mod memory;

/// Serial port, FIFO and transceiver tests.
pub mod uart;
