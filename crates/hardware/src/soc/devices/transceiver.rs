//! Serial transceiver interface and its simulated implementation.
//!
//! The bit-level serial PHY sits outside the bus fabric. The UART peripheral talks to it
//! through the byte-level `Transceiver` trait: a receive handshake delivering one frame
//! with its error flags, a transmit handshake accepting one byte, and a run-time divisor.
//!
//! `SimTransceiver` stands in for the hardware PHY. It provides:
//! 1. **Frame timing:** Each frame occupies `divisor * (start + data + parity + stop)`
//!    cycles on the wire in either direction.
//! 2. **Receive path:** Frames injected by a test or host arrive one after another into a
//!    single holding register. A frame completing while the holding register is still
//!    occupied is dropped and the held frame is flagged with `overflow`.
//! 3. **Transmit path:** An accepted byte keeps the transmitter busy for one frame time
//!    and is recorded for inspection.

use std::collections::VecDeque;
use std::fmt;

use serde::Deserialize;
use tracing::{debug, trace};

use crate::common::ConfigError;
use crate::common::addr::width_mask;

/// One received frame: the data byte and the error flags raised while receiving it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct RxFrame {
    /// Received data.
    pub data: u8,
    /// A later frame was lost because this one was not collected in time.
    pub overflow: bool,
    /// The stop bit was not seen.
    pub frame: bool,
    /// The parity bit did not match.
    pub parity: bool,
}

impl RxFrame {
    /// A frame carrying `data` without error flags.
    pub const fn new(data: u8) -> Self {
        Self {
            data,
            overflow: false,
            frame: false,
            parity: false,
        }
    }
}

/// Parity mode of a serial line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Parity {
    /// No parity bit.
    #[default]
    None,
    /// Odd parity.
    Odd,
    /// Even parity.
    Even,
    /// Parity bit always 1.
    Mark,
    /// Parity bit always 0.
    Space,
}

impl Parity {
    /// Number of parity bits in a frame.
    pub const fn bits(self) -> u32 {
        match self {
            Self::None => 0,
            _ => 1,
        }
    }
}

/// Byte-level view of a serial PHY, as seen by the UART peripheral.
///
/// All methods are called from the peripheral's clock edge, at most once each per cycle.
pub trait Transceiver: fmt::Debug + Send {
    /// Returns the stable identifier supplied when the transceiver was created.
    fn id(&self) -> &str;

    /// Receive handshake: takes the pending frame, if one is ready.
    ///
    /// The peripheral calls this only when it can store the frame.
    fn try_receive(&mut self) -> Option<RxFrame>;

    /// Transmit handshake: offers a byte to the transmitter.
    ///
    /// # Returns
    ///
    /// `true` if the byte was accepted; the caller retries on `false`.
    fn try_transmit(&mut self, byte: u8) -> bool;

    /// Sets the baud divisor (clock cycles per bit).
    fn set_divisor(&mut self, divisor: u32);

    /// Advances the line by one clock cycle.
    fn tick(&mut self) {}

    /// Returns a mutable reference as `SimTransceiver` if this is the simulated PHY.
    fn as_sim_mut(&mut self) -> Option<&mut SimTransceiver> {
        None
    }
}

/// Data bit counts a serial frame may carry.
const DATA_BITS: std::ops::RangeInclusive<u32> = 5..=8;

/// Simulated serial PHY with frame timing and a single-entry receive holding register.
#[derive(Clone, Debug)]
pub struct SimTransceiver {
    id: String,
    divisor: u32,
    data_bits: u32,
    parity: Parity,
    rx_line: VecDeque<RxFrame>,
    rx_elapsed: u64,
    rx_holding: Option<RxFrame>,
    tx_remaining: u64,
    transmitted: Vec<u8>,
}

impl SimTransceiver {
    /// Creates an idle transceiver.
    ///
    /// # Arguments
    ///
    /// * `id` - Non-empty identifier, reported in log events.
    /// * `divisor` - Clock cycles per bit; must be non-zero.
    /// * `data_bits` - Data bits per frame (5 to 8).
    /// * `parity` - Parity mode.
    pub fn new(id: &str, divisor: u32, data_bits: u32, parity: Parity) -> Result<Self, ConfigError> {
        if id.is_empty() {
            return Err(ConfigError::EmptyName);
        }
        if divisor == 0 {
            return Err(ConfigError::ZeroDivisor);
        }
        if !DATA_BITS.contains(&data_bits) {
            return Err(ConfigError::InvalidDataBits(data_bits));
        }
        Ok(Self {
            id: id.to_owned(),
            divisor,
            data_bits,
            parity,
            rx_line: VecDeque::new(),
            rx_elapsed: 0,
            rx_holding: None,
            tx_remaining: 0,
            transmitted: Vec::new(),
        })
    }

    /// Current divisor.
    pub const fn divisor(&self) -> u32 {
        self.divisor
    }

    /// Clock cycles one frame occupies on the wire.
    pub const fn frame_cycles(&self) -> u64 {
        let bits = 1 + self.data_bits + self.parity.bits() + 1;
        // A zero divisor written at run time behaves like the fastest setting.
        let divisor = if self.divisor == 0 { 1 } else { self.divisor };
        divisor as u64 * bits as u64
    }

    /// Queues a frame on the receive line; it completes after one frame time once every
    /// frame queued before it has completed.
    pub fn inject(&mut self, frame: RxFrame) {
        let data = frame.data & width_mask(self.data_bits) as u8;
        self.rx_line.push_back(RxFrame { data, ..frame });
    }

    /// Queues a clean frame for each byte.
    pub fn inject_bytes(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.inject(RxFrame::new(byte));
        }
    }

    /// Frames still travelling on the receive line.
    pub fn rx_in_flight(&self) -> usize {
        self.rx_line.len()
    }

    /// Frame waiting in the receive holding register.
    pub const fn rx_holding(&self) -> Option<RxFrame> {
        self.rx_holding
    }

    /// Returns `true` while a byte is being shifted out.
    pub const fn tx_busy(&self) -> bool {
        self.tx_remaining > 0
    }

    /// Bytes accepted for transmission, oldest first.
    pub fn transmitted(&self) -> &[u8] {
        &self.transmitted
    }

    /// Drains the record of transmitted bytes.
    pub fn take_transmitted(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.transmitted)
    }

    /// Returns the line to idle, discarding frames in flight and the transmit record.
    pub fn reset(&mut self) {
        self.rx_line.clear();
        self.rx_elapsed = 0;
        self.rx_holding = None;
        self.tx_remaining = 0;
        self.transmitted.clear();
    }

    fn complete_rx(&mut self, frame: RxFrame) {
        match self.rx_holding.as_mut() {
            Some(held) => {
                held.overflow = true;
                debug!(phy = %self.id, dropped = frame.data, "receive overflow");
            }
            None => {
                trace!(phy = %self.id, data = frame.data, "frame received");
                self.rx_holding = Some(frame);
            }
        }
    }
}

impl Transceiver for SimTransceiver {
    fn id(&self) -> &str {
        &self.id
    }

    fn try_receive(&mut self) -> Option<RxFrame> {
        self.rx_holding.take()
    }

    fn try_transmit(&mut self, byte: u8) -> bool {
        if self.tx_busy() {
            return false;
        }
        self.tx_remaining = self.frame_cycles();
        self.transmitted.push(byte);
        trace!(phy = %self.id, data = byte, "frame transmitted");
        true
    }

    fn set_divisor(&mut self, divisor: u32) {
        if divisor != self.divisor {
            debug!(phy = %self.id, divisor, "divisor changed");
        }
        self.divisor = divisor;
    }

    fn tick(&mut self) {
        self.tx_remaining = self.tx_remaining.saturating_sub(1);

        if self.rx_line.is_empty() {
            return;
        }
        self.rx_elapsed += 1;
        if self.rx_elapsed >= self.frame_cycles() {
            self.rx_elapsed = 0;
            if let Some(frame) = self.rx_line.pop_front() {
                self.complete_rx(frame);
            }
        }
    }

    fn as_sim_mut(&mut self) -> Option<&mut SimTransceiver> {
        Some(self)
    }
}
