//! Bridge from the wide system bus to the narrow CSR bus.
//!
//! A wide beat carries `data_width / 8` byte lanes. The bridge serializes them into one
//! CSR access per lane, lane 0 first, at byte address `(adr << log2(lanes)) | lane`.
//! CSR read data arrives one cycle after each strobe and is reassembled into `dat_r`;
//! `ack` rises for exactly one cycle after the last lane has been collected.
//!
//! Sequencing of one beat on a 32-bit bus (four lanes):
//! 1. **Edges 0..=3:** Strobe lane `n` and collect the byte of lane `n - 1`.
//! 2. **Edge 4:** Collect lane 3 and raise `ack`.
//! 3. **Edge 5:** Drop `ack`; the master sees the completion in the cycle between.
//!
//! Lanes whose `sel` bit is clear get no strobe and read back as zero.

use tracing::trace;

use super::decoder::CsrDecoder;
use crate::common::{BusGeometry, ConfigError, CsrSignals, MasterSignals, SlaveSignals};
use crate::soc::traits::WishboneSlave;

/// Wishbone slave exposing a CSR decoder as a window of the system bus.
#[derive(Debug)]
pub struct WishboneCsrBridge {
    name: String,
    data_width: u32,
    lanes: u32,
    lane_shift: u32,
    csr: CsrDecoder,
    cycle: u32,
    ack: bool,
    dat_r: u64,
}

impl WishboneCsrBridge {
    /// Creates a bridge in front of `csr`.
    ///
    /// # Arguments
    ///
    /// * `name` - Non-empty name of the bus window.
    /// * `data_width` - Data width of the wide bus in bits.
    /// * `granularity` - Granularity of the wide bus; must be 8.
    /// * `csr` - Decoder of the narrow side. Its address space sets the window size.
    pub fn new(
        name: &str,
        data_width: u32,
        granularity: u32,
        csr: CsrDecoder,
    ) -> Result<Self, ConfigError> {
        if name.is_empty() {
            return Err(ConfigError::EmptyName);
        }
        let geometry = BusGeometry::new(1, data_width, granularity)?;
        if granularity != 8 {
            return Err(ConfigError::BridgeGranularity(granularity));
        }
        let lanes = geometry.lanes();
        Ok(Self {
            name: name.to_owned(),
            data_width,
            lanes,
            lane_shift: lanes.trailing_zeros(),
            csr,
            cycle: 0,
            ack: false,
            dat_r: 0,
        })
    }

    /// Byte lanes per wide beat.
    pub const fn lanes(&self) -> u32 {
        self.lanes
    }

    /// The decoder of the narrow side.
    pub const fn csr(&self) -> &CsrDecoder {
        &self.csr
    }

    /// The decoder of the narrow side, mutably.
    pub const fn csr_mut(&mut self) -> &mut CsrDecoder {
        &mut self.csr
    }

    /// CSR access for `lane` of the beat on `bus`.
    fn lane_access(&self, bus: &MasterSignals, lane: u32) -> CsrSignals {
        let enabled = bus.sel & (1 << lane) != 0;
        CsrSignals {
            addr: (bus.adr << self.lane_shift) | u64::from(lane),
            r_stb: enabled && !bus.we,
            w_stb: enabled && bus.we,
            w_data: (bus.dat_w >> (8 * lane)) as u8,
        }
    }

    fn collect(&mut self, lane: u32) {
        let shift = 8 * lane;
        self.dat_r = (self.dat_r & !(0xFF << shift)) | (u64::from(self.csr.r_data()) << shift);
    }
}

impl WishboneSlave for WishboneCsrBridge {
    fn name(&self) -> &str {
        &self.name
    }

    /// The whole CSR address space, one byte per CSR address.
    fn window_size(&self) -> u64 {
        self.csr.space()
    }

    fn data_width(&self) -> u32 {
        self.data_width
    }

    fn respond(&self, bus: &MasterSignals) -> SlaveSignals {
        SlaveSignals {
            ack: self.ack && bus.cyc,
            err: false,
            dat_r: self.dat_r,
        }
    }

    fn clock(&mut self, bus: &MasterSignals) {
        let mut csr_bus = CsrSignals::IDLE;

        if self.ack {
            self.ack = false;
            self.cycle = 0;
        } else if bus.is_strobed() {
            if self.cycle == 0 {
                self.dat_r = 0;
            } else {
                self.collect(self.cycle - 1);
            }
            if self.cycle < self.lanes {
                csr_bus = self.lane_access(bus, self.cycle);
                self.cycle += 1;
            } else {
                trace!(adr = bus.adr, we = bus.we, dat_r = self.dat_r, "csr beat done");
                self.ack = true;
            }
        } else {
            self.cycle = 0;
        }

        self.csr.clock(&csr_bus);
    }

    fn reset(&mut self) {
        self.cycle = 0;
        self.ack = false;
        self.dat_r = 0;
        self.csr.reset();
    }

    fn as_csr_bridge_mut(&mut self) -> Option<&mut WishboneCsrBridge> {
        Some(self)
    }
}
