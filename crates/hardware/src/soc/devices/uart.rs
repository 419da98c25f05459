//! Register-mapped serial port.
//!
//! Implements the UART peripheral on the CSR bus: five registers in front of a receive
//! FIFO, a transmit FIFO and a byte-level transceiver. Software polls the `*_INFO`
//! registers for readiness and moves bytes through `RX_DATA` and `TX_DATA`; reading
//! `RX_DATA` and writing `TX_DATA` are the only accesses with side effects.

use serde::Deserialize;
use tracing::{debug, trace};

use super::fifo::SyncFifo;
use super::transceiver::{RxFrame, SimTransceiver, Transceiver};
use crate::common::{ConfigError, CsrSignals};
use crate::soc::csr::register::{Access, Register, RegisterFile, RegisterStrobe};
use crate::soc::traits::CsrSlave;

/// Width of the divisor register in bits.
const CTRL_WIDTH: u32 = 32;

/// Width of the receive status register: `rdy` plus three error flags.
const RX_INFO_WIDTH: u32 = 4;

/// Width of the receive data register: byte plus three error flags.
const RX_DATA_WIDTH: u32 = 11;

/// Width of the transmit status register: `rdy`.
const TX_INFO_WIDTH: u32 = 1;

/// Width of the transmit data register.
const TX_DATA_WIDTH: u32 = 8;

/// Byte offsets of the serial port registers inside its CSR window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RegisterMap {
    /// Divisor (RW, 32 bits).
    pub ctrl: u64,
    /// Receive status (R, 4 bits).
    pub rx_info: u64,
    /// Receive data (R, 11 bits); reading pops the receive FIFO.
    pub rx_data: u64,
    /// Transmit status (R, 1 bit).
    pub tx_info: u64,
    /// Transmit data (W, 8 bits); writing pushes into the transmit FIFO.
    pub tx_data: u64,
}

impl Default for RegisterMap {
    fn default() -> Self {
        Self {
            ctrl: 0x00,
            rx_info: 0x04,
            rx_data: 0x08,
            tx_info: 0x0C,
            tx_data: 0x10,
        }
    }
}

/// Register indices inside the peripheral's register file.
#[derive(Clone, Copy, Debug)]
struct Indices {
    ctrl: usize,
    rx_info: usize,
    rx_data: usize,
    tx_info: usize,
    tx_data: usize,
}

/// Packs the error flags of a frame into three adjacent bits: overflow, frame, parity.
const fn error_bits(frame: &RxFrame) -> u64 {
    (frame.overflow as u64) | ((frame.frame as u64) << 1) | ((frame.parity as u64) << 2)
}

/// UART peripheral: register file, two FIFOs and a transceiver.
#[derive(Debug)]
pub struct SerialPeripheral {
    name: String,
    regs: RegisterFile,
    idx: Indices,
    reset_divisor: u32,
    divisor: u32,
    rx_fifo: SyncFifo<RxFrame>,
    tx_fifo: SyncFifo<u8>,
    phy: Box<dyn Transceiver>,
    rx_bytes: u64,
    tx_bytes: u64,
}

impl SerialPeripheral {
    /// Creates a serial port and applies `divisor` to the transceiver.
    ///
    /// # Arguments
    ///
    /// * `name` - Non-empty peripheral name.
    /// * `addr_width` - Register window size as a power of two (bytes).
    /// * `map` - Register offsets inside the window.
    /// * `divisor` - Reset value of `CTRL`.
    /// * `rx_depth` - Receive FIFO depth.
    /// * `tx_depth` - Transmit FIFO depth.
    /// * `phy` - Transceiver owned by the port.
    ///
    /// # Returns
    ///
    /// The peripheral, or a `ConfigError` for a bad register layout or FIFO depth.
    pub fn new(
        name: &str,
        addr_width: u32,
        map: &RegisterMap,
        divisor: u32,
        rx_depth: usize,
        tx_depth: usize,
        mut phy: Box<dyn Transceiver>,
    ) -> Result<Self, ConfigError> {
        let mut regs = RegisterFile::new(name, addr_width)?;
        let idx = Indices {
            ctrl: regs.add(Register::new("ctrl", map.ctrl, CTRL_WIDTH, Access::RW))?,
            rx_info: regs.add(Register::new("rx_info", map.rx_info, RX_INFO_WIDTH, Access::R))?,
            rx_data: regs.add(Register::new("rx_data", map.rx_data, RX_DATA_WIDTH, Access::R))?,
            tx_info: regs.add(Register::new("tx_info", map.tx_info, TX_INFO_WIDTH, Access::R))?,
            tx_data: regs.add(Register::new("tx_data", map.tx_data, TX_DATA_WIDTH, Access::W))?,
        };
        phy.set_divisor(divisor);

        Ok(Self {
            name: name.to_owned(),
            regs,
            idx,
            reset_divisor: divisor,
            divisor,
            rx_fifo: SyncFifo::new(rx_depth)?,
            tx_fifo: SyncFifo::new(tx_depth)?,
            phy,
            rx_bytes: 0,
            tx_bytes: 0,
        })
    }

    /// Current divisor (`CTRL`).
    pub const fn divisor(&self) -> u32 {
        self.divisor
    }

    /// The register file, for layout inspection.
    pub const fn registers(&self) -> &RegisterFile {
        &self.regs
    }

    /// Receive FIFO.
    pub const fn rx_fifo(&self) -> &SyncFifo<RxFrame> {
        &self.rx_fifo
    }

    /// Transmit FIFO.
    pub const fn tx_fifo(&self) -> &SyncFifo<u8> {
        &self.tx_fifo
    }

    /// Frames moved from the transceiver into the receive FIFO since reset.
    pub const fn rx_bytes(&self) -> u64 {
        self.rx_bytes
    }

    /// Bytes accepted by the transceiver since reset.
    pub const fn tx_bytes(&self) -> u64 {
        self.tx_bytes
    }

    /// The transceiver.
    pub fn transceiver(&self) -> &dyn Transceiver {
        self.phy.as_ref()
    }

    /// The transceiver, mutably.
    pub fn transceiver_mut(&mut self) -> &mut dyn Transceiver {
        self.phy.as_mut()
    }

    /// The transceiver as `SimTransceiver`, if it is the simulated one.
    pub fn sim_transceiver_mut(&mut self) -> Option<&mut SimTransceiver> {
        self.phy.as_sim_mut()
    }
}

impl CsrSlave for SerialPeripheral {
    fn name(&self) -> &str {
        &self.name
    }

    fn window_size(&self) -> u64 {
        self.regs.size()
    }

    fn r_data(&self) -> u8 {
        self.regs.r_data()
    }

    /// Runs one clock edge: register access, then the receive and transmit data paths.
    fn clock(&mut self, bus: &CsrSignals) {
        let idx = self.idx;
        let strobe = self.regs.clock(bus, |index| {
            let head = self.rx_fifo.r_data();
            if index == idx.ctrl {
                u64::from(self.divisor)
            } else if index == idx.rx_info {
                head.map_or(0, |frame| 1 | (error_bits(&frame) << 1))
            } else if index == idx.rx_data {
                head.map_or(0, |frame| u64::from(frame.data) | (error_bits(&frame) << 8))
            } else if index == idx.tx_info {
                u64::from(self.tx_fifo.w_rdy())
            } else {
                0
            }
        });

        let mut rx_pop = false;
        let mut tx_push = None;
        match strobe {
            Some(RegisterStrobe::Read(index)) if index == self.idx.rx_data => rx_pop = true,
            Some(RegisterStrobe::Write { index, value }) if index == self.idx.ctrl => {
                self.divisor = value as u32;
                self.phy.set_divisor(self.divisor);
            }
            Some(RegisterStrobe::Write { index, value }) if index == self.idx.tx_data => {
                tx_push = Some(value as u8);
            }
            _ => {}
        }

        // Receive: acknowledge the transceiver only when the frame can be stored.
        let rx_in = if self.rx_fifo.w_rdy() {
            self.phy.try_receive()
        } else {
            None
        };
        let (received, popped) = self.rx_fifo.clock(rx_in, rx_pop);
        if received {
            self.rx_bytes += 1;
        }
        if let Some(frame) = popped {
            trace!(uart = %self.name, data = frame.data, "rx pop");
        }

        // Transmit: the head byte leaves the FIFO once the transceiver takes it.
        if tx_push.is_some() && !self.tx_fifo.w_rdy() {
            debug!(uart = %self.name, data = ?tx_push, "tx fifo full, write dropped");
        }
        let tx_pop = self
            .tx_fifo
            .r_data()
            .is_some_and(|byte| self.phy.try_transmit(byte));
        if tx_pop {
            self.tx_bytes += 1;
        }
        let _ = self.tx_fifo.clock(tx_push, tx_pop);

        self.phy.tick();
    }

    /// Empties both FIFOs and restores the reset divisor.
    fn reset(&mut self) {
        self.regs.reset();
        self.rx_fifo.clear();
        self.tx_fifo.clear();
        self.divisor = self.reset_divisor;
        self.phy.set_divisor(self.divisor);
        self.rx_bytes = 0;
        self.tx_bytes = 0;
    }

    fn as_serial_mut(&mut self) -> Option<&mut SerialPeripheral> {
        Some(self)
    }
}
