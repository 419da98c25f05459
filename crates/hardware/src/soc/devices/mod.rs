//! Register-mapped peripherals on the CSR bus.
//!
//! This module contains the serial port and the building blocks it is made of: bounded
//! synchronous FIFOs and the byte-level transceiver interface with its simulated PHY.

/// Bounded synchronous FIFO.
pub mod fifo;

/// Transceiver trait and simulated serial PHY.
pub mod transceiver;

/// UART peripheral.
pub mod uart;

pub use fifo::SyncFifo;
pub use transceiver::{Parity, RxFrame, SimTransceiver, Transceiver};
pub use uart::{RegisterMap, SerialPeripheral};
