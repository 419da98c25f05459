//! System-on-Chip construction and top-level `System` type.
//!
//! This module builds the complete fabric from configuration. It performs:
//! 1. **Bus setup:** Validates the configuration and creates the arbiter and decoder.
//! 2. **Slave registration:** Maps the memory block and the CSR bridge, with the serial
//!    port behind the bridge's CSR decoder.
//! 3. **Clocking:** Advances every component by one cycle per `tick`, respond phase first
//!    and clock edge second, and keeps bus statistics.

use tracing::trace;

use crate::common::{ConfigError, MasterSignals, SlaveSignals};
use crate::config::Config;
use crate::soc::csr::{CsrDecoder, WishboneCsrBridge};
use crate::soc::devices::{SerialPeripheral, SimTransceiver, Transceiver};
use crate::soc::interconnect::{AddressDecoder, RoundRobinArbiter};
use crate::soc::memory::WishboneMemory;
use crate::stats::BusStats;

/// Top-level system instance: master ports, arbiter, decoder and every slave behind it.
#[derive(Debug)]
pub struct System {
    arbiter: RoundRobinArbiter,
    decoder: AddressDecoder,
    stats: BusStats,
    trace_bus: bool,
}

impl System {
    /// Master port of the CPU's instruction fetch.
    pub const INSTRUCTION_PORT: usize = 0;

    /// Master port of the CPU's loads and stores.
    pub const DATA_PORT: usize = 1;

    /// Number of master ports.
    pub const PORTS: usize = 2;

    /// Builds a system with a simulated serial transceiver.
    ///
    /// # Arguments
    ///
    /// * `config` - System configuration.
    /// * `init` - Initial memory words, lowest address first.
    ///
    /// # Returns
    ///
    /// The system, or the first configuration constraint it violates.
    pub fn new(config: &Config, init: &[u64]) -> Result<Self, ConfigError> {
        let serial = &config.serial;
        let phy = SimTransceiver::new(&serial.phy, serial.divisor, serial.data_bits, serial.parity)?;
        Self::with_transceiver(config, init, Box::new(phy))
    }

    /// Builds a system around a caller-supplied serial transceiver.
    ///
    /// # Arguments
    ///
    /// * `config` - System configuration.
    /// * `init` - Initial memory words, lowest address first.
    /// * `phy` - Transceiver attached to the serial port.
    pub fn with_transceiver(
        config: &Config,
        init: &[u64],
        phy: Box<dyn Transceiver>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let geometry = config.bus.geometry()?;

        let memory = WishboneMemory::new(
            &config.memory.name,
            config.memory.size,
            geometry.data_width(),
            geometry.granularity(),
            config.memory.writable,
            init,
        )?;

        let serial = &config.serial;
        let uart = SerialPeripheral::new(
            &serial.name,
            serial.addr_width,
            &serial.registers,
            serial.divisor,
            serial.rx_fifo_depth,
            serial.tx_fifo_depth,
            phy,
        )?;
        let mut csr = CsrDecoder::new(config.csr.addr_width)?;
        csr.add(serial.base, Box::new(uart))?;
        let bridge = WishboneCsrBridge::new(
            &config.csr.name,
            geometry.data_width(),
            geometry.granularity(),
            csr,
        )?;

        let mut decoder = AddressDecoder::new(geometry);
        decoder.add(config.memory.base, Box::new(memory))?;
        decoder.add(config.csr.base, Box::new(bridge))?;

        Ok(Self {
            arbiter: RoundRobinArbiter::new(Self::PORTS)?,
            decoder,
            stats: BusStats::new(Self::PORTS),
            trace_bus: config.general.trace_bus || cfg!(feature = "always-trace"),
        })
    }

    /// Advances the whole fabric by one clock cycle.
    ///
    /// # Arguments
    ///
    /// * `masters` - Registered outputs of every master port during this cycle, indexed by
    ///   port. Missing ports read as idle.
    ///
    /// # Returns
    ///
    /// The response each port observes during this cycle; masters sample it at the same
    /// clock edge the fabric does.
    pub fn tick(&mut self, masters: &[MasterSignals]) -> Vec<SlaveSignals> {
        let granted = self.arbiter.grant();
        let bus = self.arbiter.route(masters);
        let response = self.decoder.respond(&bus);
        let responses = self.arbiter.distribute(response);

        if self.trace_bus && bus.cyc {
            trace!(
                master = granted,
                adr = bus.adr,
                we = bus.we,
                cti = ?bus.cti,
                ack = response.ack,
                err = response.err,
                dat_r = response.dat_r,
                "bus cycle"
            );
        }

        self.decoder.clock(&bus);
        let _ = self.arbiter.clock(masters);

        self.stats.record(masters, &responses, granted);
        self.stats.decode_misses = self.decoder.misses();
        if let Some(uart) = self.serial_mut() {
            let (rx, tx) = (uart.rx_bytes(), uart.tx_bytes());
            self.stats.uart_rx_bytes = rx;
            self.stats.uart_tx_bytes = tx;
        }

        responses
    }

    /// Restores the reset state of every component and clears the statistics.
    ///
    /// A simulated transceiver is returned to an idle line as well; any other
    /// transceiver keeps its state.
    pub fn reset(&mut self) {
        self.arbiter.reset();
        self.decoder.reset();
        if let Some(phy) = self.sim_transceiver_mut() {
            phy.reset();
        }
        self.stats = BusStats::new(self.arbiter.ports());
    }

    /// The arbiter.
    pub const fn arbiter(&self) -> &RoundRobinArbiter {
        &self.arbiter
    }

    /// The address decoder.
    pub const fn decoder(&self) -> &AddressDecoder {
        &self.decoder
    }

    /// Statistics collected since construction or the last reset.
    pub const fn stats(&self) -> &BusStats {
        &self.stats
    }

    /// The memory block.
    pub fn memory_mut(&mut self) -> Option<&mut WishboneMemory> {
        self.decoder.memory_mut()
    }

    /// The serial port behind the CSR bridge.
    pub fn serial_mut(&mut self) -> Option<&mut SerialPeripheral> {
        self.decoder.csr_bridge_mut()?.csr_mut().serial_mut()
    }

    /// The serial port's transceiver.
    pub fn transceiver_mut(&mut self) -> Option<&mut dyn Transceiver> {
        self.serial_mut().map(SerialPeripheral::transceiver_mut)
    }

    /// The serial port's transceiver, if it is the simulated one.
    pub fn sim_transceiver_mut(&mut self) -> Option<&mut SimTransceiver> {
        self.serial_mut()?.sim_transceiver_mut()
    }
}
