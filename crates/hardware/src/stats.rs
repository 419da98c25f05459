//! Bus statistics collection and reporting.
//!
//! This module tracks activity on the system bus. It provides:
//! 1. **Cycles:** Total clock edges and cycles with a beat in flight.
//! 2. **Per master:** Grants won, beats acknowledged or errored, and wait cycles spent
//!    strobing without a response.
//! 3. **Fabric:** Decode misses and bytes moved by the serial port.
//!
//! Statistics serialize to JSON and render as a plain-text report.

use std::fmt;

use serde::Serialize;

use crate::common::{MasterSignals, SlaveSignals};

/// Counters for one master port.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MasterStats {
    /// Bus cycles the port opened while holding the grant.
    pub grants: u64,
    /// Beats acknowledged.
    pub acks: u64,
    /// Beats terminated with `err`.
    pub errors: u64,
    /// Cycles the port strobed without seeing `ack` or `err`.
    pub wait_cycles: u64,
}

/// Bus statistics structure tracking activity of every port.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BusStats {
    /// Total clock edges elapsed.
    pub cycles: u64,
    /// Cycles in which the granted master held `cyc`.
    pub busy_cycles: u64,
    /// Per-port counters, indexed like the master ports.
    pub masters: Vec<MasterStats>,
    /// Beats answered by the decoder's error responder.
    pub decode_misses: u64,
    /// Frames moved into the serial receive FIFO.
    pub uart_rx_bytes: u64,
    /// Bytes handed to the serial transceiver.
    pub uart_tx_bytes: u64,
    /// Port whose bus cycle was in progress during the previous cycle.
    #[serde(skip)]
    owner: Option<usize>,
}

impl BusStats {
    /// Creates zeroed statistics for `ports` master ports.
    pub fn new(ports: usize) -> Self {
        Self {
            masters: vec![MasterStats::default(); ports],
            ..Self::default()
        }
    }

    /// Records one cycle.
    ///
    /// # Arguments
    ///
    /// * `masters` - Signals driven by every port during the cycle.
    /// * `responses` - Responses seen by every port during the cycle.
    /// * `granted` - Port holding the grant during the cycle.
    pub fn record(
        &mut self,
        masters: &[MasterSignals],
        responses: &[SlaveSignals],
        granted: usize,
    ) {
        self.cycles += 1;
        let busy = masters.get(granted).is_some_and(|m| m.cyc);
        if busy {
            self.busy_cycles += 1;
        }
        // A grant is counted once per bus cycle, on its first granted cycle.
        let opened = busy && self.owner != Some(granted);
        if let Some(stats) = self.masters.get_mut(granted).filter(|_| opened) {
            stats.grants += 1;
        }
        self.owner = busy.then_some(granted);
        for ((stats, bus), response) in self.masters.iter_mut().zip(masters).zip(responses) {
            if response.ack {
                stats.acks += 1;
            } else if response.err {
                stats.errors += 1;
            } else if bus.is_strobed() {
                stats.wait_cycles += 1;
            }
        }
    }

    /// Fraction of cycles with a cycle in progress.
    pub fn utilization(&self) -> f64 {
        if self.cycles == 0 {
            0.0
        } else {
            self.busy_cycles as f64 / self.cycles as f64
        }
    }

    /// Serializes the statistics as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for BusStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "==========================================================")?;
        writeln!(f, "BUS STATISTICS")?;
        writeln!(f, "==========================================================")?;
        writeln!(f, "sim_cycles               {}", self.cycles)?;
        writeln!(
            f,
            "bus.busy                 {} ({:.2}%)",
            self.busy_cycles,
            self.utilization() * 100.0
        )?;
        writeln!(f, "bus.decode_misses        {}", self.decode_misses)?;
        writeln!(f, "----------------------------------------------------------")?;
        writeln!(f, "MASTERS")?;
        for (port, stats) in self.masters.iter().enumerate() {
            writeln!(
                f,
                "  port{port:<3} grants: {:<8} | acks: {:<8} | errors: {:<6} | wait: {}",
                stats.grants, stats.acks, stats.errors, stats.wait_cycles
            )?;
        }
        writeln!(f, "----------------------------------------------------------")?;
        writeln!(f, "SERIAL")?;
        writeln!(f, "  uart.rx_bytes          {}", self.uart_rx_bytes)?;
        writeln!(f, "  uart.tx_bytes          {}", self.uart_tx_bytes)?;
        write!(f, "==========================================================")
    }
}
