//! Round-robin arbiter for the shared system bus.
//!
//! Several master ports compete for one downstream bus. The arbiter holds a single grant:
//! 1. **Routing:** The granted master's signals drive the bus; every other master is
//!    ignored downstream.
//! 2. **Response fan-out:** Only the granted master observes `ack` and `err`; read data
//!    is shared by all ports.
//! 3. **Re-arbitration:** At a clock edge where the granted master has `cyc` low, the
//!    grant moves to the next requesting master after it in round-robin order. A grant
//!    is therefore never revoked while a cycle (or burst) is in progress.

use tracing::debug;

use crate::common::{ConfigError, MasterSignals, SlaveSignals};

/// Single-grant round-robin arbiter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoundRobinArbiter {
    ports: usize,
    grant: usize,
}

impl RoundRobinArbiter {
    /// Creates an arbiter for `ports` masters; port 0 holds the initial grant.
    pub fn new(ports: usize) -> Result<Self, ConfigError> {
        if ports == 0 {
            return Err(ConfigError::NoMasters);
        }
        Ok(Self { ports, grant: 0 })
    }

    /// Number of master ports.
    pub const fn ports(&self) -> usize {
        self.ports
    }

    /// Index of the master currently holding the grant.
    pub const fn grant(&self) -> usize {
        self.grant
    }

    /// Returns the signals the granted master drives onto the bus.
    ///
    /// A missing port reads as idle.
    pub fn route(&self, masters: &[MasterSignals]) -> MasterSignals {
        masters
            .get(self.grant)
            .copied()
            .unwrap_or(MasterSignals::IDLE)
    }

    /// Fans a downstream response out to every master port.
    ///
    /// # Returns
    ///
    /// One response per port: the full response for the granted master, shared read data
    /// with `ack` and `err` low for everybody else.
    pub fn distribute(&self, response: SlaveSignals) -> Vec<SlaveSignals> {
        (0..self.ports)
            .map(|port| {
                if port == self.grant {
                    response
                } else {
                    SlaveSignals {
                        dat_r: response.dat_r,
                        ..SlaveSignals::IDLE
                    }
                }
            })
            .collect()
    }

    /// Re-arbitrates at the clock edge.
    ///
    /// # Arguments
    ///
    /// * `masters` - Signals of every master port during the cycle ending at this edge.
    ///
    /// # Returns
    ///
    /// The new grant if it moved.
    pub fn clock(&mut self, masters: &[MasterSignals]) -> Option<usize> {
        let requesting = |port: usize| masters.get(port).is_some_and(|m| m.cyc);
        if requesting(self.grant) {
            return None;
        }
        let next = (1..self.ports)
            .map(|offset| (self.grant + offset) % self.ports)
            .find(|&port| requesting(port))?;
        debug!(from = self.grant, to = next, "bus grant");
        self.grant = next;
        Some(next)
    }

    /// Returns the grant to port 0.
    pub fn reset(&mut self) {
        self.grant = 0;
    }
}
