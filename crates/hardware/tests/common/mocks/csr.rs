use std::sync::{Arc, Mutex};
use wbsoc_core::common::CsrSignals;
use wbsoc_core::soc::CsrSlave;
use wbsoc_core::soc::csr::{Access, Register, RegisterFile, RegisterStrobe};

/// Constant value of the `id` register.
pub const SCRATCH_ID: u64 = 0x1234_5678;

/// What a `ScratchPeripheral` observed, shared with the test.
#[derive(Debug, Default)]
pub struct ScratchLog {
    pub strobes: Vec<RegisterStrobe>,
    pub clocks: u64,
}

/// A 16-byte register file with a read-only `id` at 0, a read-write `scratch` at 4
/// and a write-only 16-bit `cmd` at 8.
#[derive(Debug)]
pub struct ScratchPeripheral {
    regs: RegisterFile,
    scratch: u64,
    init: u64,
    log: Arc<Mutex<ScratchLog>>,
}

impl ScratchPeripheral {
    pub fn new(name: &str, init: u64) -> (Self, Arc<Mutex<ScratchLog>>) {
        let mut regs = RegisterFile::new(name, 4).unwrap();
        regs.add(Register::new("id", 0, 32, Access::R)).unwrap();
        regs.add(Register::new("scratch", 4, 32, Access::RW)).unwrap();
        regs.add(Register::new("cmd", 8, 16, Access::W)).unwrap();
        let log = Arc::new(Mutex::new(ScratchLog::default()));
        let peripheral = Self {
            regs,
            scratch: init,
            init,
            log: Arc::clone(&log),
        };
        (peripheral, log)
    }
}

impl CsrSlave for ScratchPeripheral {
    fn name(&self) -> &str {
        self.regs.name()
    }

    fn window_size(&self) -> u64 {
        self.regs.size()
    }

    fn r_data(&self) -> u8 {
        self.regs.r_data()
    }

    fn clock(&mut self, bus: &CsrSignals) {
        let scratch = self.scratch;
        let strobe = self.regs.clock(bus, |index| match index {
            0 => SCRATCH_ID,
            1 => scratch,
            _ => 0,
        });
        let mut log = self.log.lock().unwrap();
        log.clocks += 1;
        if let Some(strobe) = strobe {
            log.strobes.push(strobe);
            if let RegisterStrobe::Write { index: 1, value } = strobe {
                self.scratch = value;
            }
        }
    }

    fn reset(&mut self) {
        self.regs.reset();
        self.scratch = self.init;
    }
}
