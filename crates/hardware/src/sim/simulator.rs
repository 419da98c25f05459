//! Simulator: owns the system and the two CPU-side master ports side by side.
//!
//! The CPU core is outside the model; its instruction and data ports are played by
//! scripted `BusMaster`s. Each tick presents both ports' registered signals to the
//! system and feeds the per-port responses back at the same clock edge.

use tracing::debug;

use super::loader::load_image;
use super::master::BusMaster;
use crate::common::SimError;
use crate::config::Config;
use crate::soc::System;

/// Top-level simulator: the fabric plus its instruction and data ports.
#[derive(Debug)]
pub struct Simulator {
    /// The fabric.
    pub system: System,
    /// Instruction port (read-only), arbiter port 0.
    pub ibus: BusMaster,
    /// Data port, arbiter port 1.
    pub dbus: BusMaster,
    cycles: u64,
}

impl Simulator {
    /// Builds the system from `config`, loading `config.memory.image` if one is set.
    ///
    /// # Errors
    ///
    /// `SimError::Image` if the image cannot be read and `SimError::Config` if the
    /// configuration or the image size is rejected.
    pub fn new(config: &Config) -> Result<Self, SimError> {
        config.validate()?;
        let geometry = config.bus.geometry()?;
        let init = match &config.memory.image {
            Some(path) => load_image(path, geometry.data_width())?,
            None => Vec::new(),
        };
        Ok(Self::with_system(
            System::new(config, &init)?,
            geometry.full_sel(),
        ))
    }

    /// Wraps an existing system with fresh master ports.
    ///
    /// # Arguments
    ///
    /// * `system` - The fabric.
    /// * `full_sel` - Granule select of a full-word beat on this bus.
    pub fn with_system(system: System, full_sel: u8) -> Self {
        Self {
            system,
            ibus: BusMaster::new("ibus", full_sel, true),
            dbus: BusMaster::new("dbus", full_sel, false),
            cycles: 0,
        }
    }

    /// Clock cycles simulated so far.
    pub const fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Returns `true` when neither port has work left.
    pub fn is_idle(&self) -> bool {
        self.ibus.is_idle() && self.dbus.is_idle()
    }

    /// Advances the simulator by one clock cycle.
    pub fn tick(&mut self) {
        let masters = [self.ibus.signals(), self.dbus.signals()];
        let responses = self.system.tick(&masters);
        if let Some(response) = responses.get(System::INSTRUCTION_PORT) {
            self.ibus.clock(response);
        }
        if let Some(response) = responses.get(System::DATA_PORT) {
            self.dbus.clock(response);
        }
        self.cycles += 1;
    }

    /// Ticks until both ports are idle.
    ///
    /// # Arguments
    ///
    /// * `max_cycles` - Upper bound on the cycles simulated by this call.
    ///
    /// # Returns
    ///
    /// The number of cycles simulated.
    ///
    /// # Errors
    ///
    /// `SimError::Timeout` if the ports still have work after `max_cycles`.
    pub fn run_until_idle(&mut self, max_cycles: u64) -> Result<u64, SimError> {
        let mut elapsed = 0;
        while !self.is_idle() {
            if elapsed == max_cycles {
                return Err(SimError::Timeout(max_cycles));
            }
            self.tick();
            elapsed += 1;
        }
        debug!(cycles = elapsed, "ports idle");
        Ok(elapsed)
    }

    /// Ticks a fixed number of cycles, whether or not the ports have work.
    pub fn run(&mut self, cycles: u64) {
        for _ in 0..cycles {
            self.tick();
        }
    }

    /// Resets the fabric and both ports.
    pub fn reset(&mut self) {
        self.system.reset();
        self.ibus.reset();
        self.dbus.reset();
        self.cycles = 0;
    }
}
