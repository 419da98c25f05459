//! Burst address generation and beat sequencing for the memory block.
//!
//! The controller is a two-state machine:
//! 1. **Idle:** On `cyc & stb`, latch the beat address and open the cycle.
//! 2. **Cycle:** While `cyc & stb` holds, service one beat per clock: register the read
//!    data, raise `ack`, and advance the latched address by the burst policy. When the
//!    master lets go of the strobe, drop `ack` and return to idle.
//!
//! Acknowledges are registered, so a master sees `ack` one cycle after the edge that
//! serviced its beat. A classic or end-of-burst beat therefore completes while the master
//! still holds `stb`; the controller recognises that cycle (`ack` high and `cti` ending on
//! acknowledge) and closes instead of servicing the beat twice.
//!
//! Write data is committed at the edge where the master samples the beat's `ack`, the
//! only edge at which a registered master is guaranteed to drive that beat's `dat_w`.

use tracing::trace;

use super::buffer::WordBuffer;
use crate::common::{MasterSignals, SlaveSignals, next_burst_address};

/// State of the memory controller FSM.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ControllerState {
    /// No cycle open; the next strobe latches its address.
    #[default]
    Idle,
    /// Cycle open; beats are serviced back to back.
    Cycle,
}

/// Memory controller FSM state: latched address plus registered outputs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BurstController {
    state: ControllerState,
    addr_curr: u64,
    addr_acked: u64,
    ack: bool,
    dat_r: u64,
}

impl BurstController {
    /// Creates a controller in the idle state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current FSM state.
    pub const fn state(&self) -> ControllerState {
        self.state
    }

    /// Returns the latched word address of the next beat.
    pub const fn current_address(&self) -> u64 {
        self.addr_curr
    }

    /// Returns the outputs visible this cycle.
    ///
    /// `ack` is masked by `cyc` so an aborted cycle never sees a stale acknowledge.
    pub const fn respond(&self, bus: &MasterSignals) -> SlaveSignals {
        SlaveSignals {
            ack: self.ack && bus.cyc,
            err: false,
            dat_r: self.dat_r,
        }
    }

    /// Advances the FSM by one clock edge.
    ///
    /// # Arguments
    ///
    /// * `bus` - Master signals sampled at this edge (window-relative word address).
    /// * `storage` - Backing words; written only when `writable` and the beat is a write.
    /// * `writable` - Whether the memory accepts writes.
    pub fn clock(&mut self, bus: &MasterSignals, storage: &mut WordBuffer, writable: bool) {
        match self.state {
            ControllerState::Idle => {
                self.ack = false;
                if bus.is_strobed() {
                    self.addr_curr = bus.adr;
                    self.state = ControllerState::Cycle;
                }
            }
            ControllerState::Cycle => {
                if !bus.is_strobed() {
                    self.ack = false;
                    self.state = ControllerState::Idle;
                    return;
                }
                if self.ack && writable && bus.we {
                    storage.write(self.addr_acked, bus.dat_w, bus.sel);
                }
                if self.ack && bus.cti.ends_on_ack() {
                    // The beat acknowledged this cycle was the last one.
                    self.ack = false;
                    self.state = ControllerState::Idle;
                } else {
                    self.dat_r = storage.read(self.addr_curr);
                    self.addr_acked = self.addr_curr;
                    trace!(
                        addr = self.addr_curr,
                        we = bus.we,
                        cti = ?bus.cti,
                        "memory beat"
                    );
                    self.ack = true;
                    self.addr_curr = next_burst_address(self.addr_curr, bus.cti, bus.bte);
                }
            }
        }
    }

    /// Returns the FSM to idle with all outputs low.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
