//! Slave traits for the wide system bus and the narrow CSR bus.
//!
//! Every component is a synchronous state machine advanced in two phases per clock:
//! 1. **Respond:** Outputs visible during the current cycle are read with `respond` (wide
//!    bus) or `r_data` (CSR bus). They depend on registered state and, for the wide bus,
//!    on the master signals of the current cycle, never on another slave's response.
//! 2. **Clock:** At the rising edge the component samples the bus with `clock` and updates
//!    its registers.
//!
//! Implementors must be `Send` so a built system can move between threads.

use std::fmt;

use crate::common::{CsrSignals, MasterSignals, SlaveSignals};
use crate::soc::csr::bridge::WishboneCsrBridge;
use crate::soc::devices::SerialPeripheral;
use crate::soc::memory::WishboneMemory;

/// A slave on the wide (Wishbone) system bus.
///
/// The decoder hands every slave a window-relative word address; a slave outside the
/// selected window observes `cyc` low.
pub trait WishboneSlave: fmt::Debug + Send {
    /// Returns a short name for this slave (e.g. `"rom"`, `"csr"`).
    fn name(&self) -> &str;
    /// Returns the size of this slave's window in bytes (a power of two).
    fn window_size(&self) -> u64;
    /// Returns the data width of this slave in bits.
    fn data_width(&self) -> u32;
    /// Returns the outputs visible during the current cycle.
    fn respond(&self, bus: &MasterSignals) -> SlaveSignals;
    /// Samples the bus at the clock edge and advances internal state.
    fn clock(&mut self, bus: &MasterSignals);
    /// Restores the reset state.
    fn reset(&mut self);

    /// Returns a mutable reference as `WishboneMemory` if this slave is a memory.
    fn as_memory_mut(&mut self) -> Option<&mut WishboneMemory> {
        None
    }
    /// Returns a mutable reference as `WishboneCsrBridge` if this slave is a CSR bridge.
    fn as_csr_bridge_mut(&mut self) -> Option<&mut WishboneCsrBridge> {
        None
    }
}

/// A slave on the narrow (8-bit) CSR bus.
///
/// Read data is registered: the byte selected by a read strobe appears on `r_data` in the
/// following cycle and is zero in every other cycle, so several slaves can share one read
/// data path by OR-ing their outputs.
pub trait CsrSlave: fmt::Debug + Send {
    /// Returns a short name for this peripheral (e.g. `"serial"`).
    fn name(&self) -> &str;
    /// Returns the size of this peripheral's register window in bytes (a power of two).
    fn window_size(&self) -> u64;
    /// Returns the read data byte registered at the previous edge.
    fn r_data(&self) -> u8;
    /// Samples the CSR bus at the clock edge and advances internal state.
    ///
    /// Peripherals are clocked every cycle, even without an access, so that their
    /// internal logic (FIFOs, transceivers) keeps running.
    fn clock(&mut self, bus: &CsrSignals);
    /// Restores the reset state.
    fn reset(&mut self);

    /// Returns a mutable reference as `SerialPeripheral` if this peripheral is a UART.
    fn as_serial_mut(&mut self) -> Option<&mut SerialPeripheral> {
        None
    }
}
