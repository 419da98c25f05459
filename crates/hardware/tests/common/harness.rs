use tracing_subscriber::EnvFilter;
use wbsoc_core::Simulator;
use wbsoc_core::config::Config;
use wbsoc_core::sim::{Completion, Request};
use wbsoc_core::soc::System;

/// Cycle budget for a single blocking access.
const ACCESS_BUDGET: u64 = 1_000;

/// Installs a test-writer `tracing` subscriber once per process; `RUST_LOG` filters it.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Owns a simulator and performs blocking accesses on its ports.
pub struct TestContext {
    pub sim: Simulator,
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TestContext {
    /// Default system: 4 KiB ROM at 0, CSR region at `0x8000_0000`.
    pub fn new() -> Self {
        Self::with_config(&Config::default(), &[])
    }

    /// A writable memory instead of the default ROM.
    pub fn with_ram(init: &[u64]) -> Self {
        let mut config = Config::default();
        config.memory.writable = true;
        Self::with_config(&config, init)
    }

    pub fn with_config(config: &Config, init: &[u64]) -> Self {
        init_tracing();
        let system = System::new(config, init).unwrap();
        let full_sel = config.bus.geometry().unwrap().full_sel();
        Self {
            sim: Simulator::with_system(system, full_sel),
        }
    }

    /// Runs a request on the data port to completion.
    pub fn dbus(&mut self, request: Request) -> Completion {
        self.sim.dbus.submit(request).unwrap();
        self.sim.run_until_idle(ACCESS_BUDGET).unwrap();
        self.sim.dbus.take_completed().pop().unwrap()
    }

    /// Runs a request on the instruction port to completion.
    pub fn ibus(&mut self, request: Request) -> Completion {
        self.sim.ibus.submit(request).unwrap();
        self.sim.run_until_idle(ACCESS_BUDGET).unwrap();
        self.sim.ibus.take_completed().pop().unwrap()
    }

    /// Reads the 32-bit word at a byte address through the data port.
    pub fn read_word(&mut self, addr: u64) -> u64 {
        let completion = self.dbus(Request::Read {
            adr: addr / 4,
            sel: 0xF,
        });
        completion.data[0]
    }

    /// Writes the 32-bit word at a byte address through the data port.
    pub fn write_word(&mut self, addr: u64, dat: u64) {
        self.dbus(Request::Write {
            adr: addr / 4,
            dat,
            sel: 0xF,
        });
    }

    /// Reads a serial port register by offset inside the CSR region.
    pub fn csr_read(&mut self, offset: u64) -> u64 {
        self.read_word(0x8000_0000 + offset)
    }

    /// Writes a serial port register by offset inside the CSR region.
    pub fn csr_write(&mut self, offset: u64, value: u64) {
        self.write_word(0x8000_0000 + offset, value);
    }

    /// Ticks a number of idle cycles.
    pub fn run(&mut self, cycles: u64) {
        self.sim.run(cycles);
    }
}
