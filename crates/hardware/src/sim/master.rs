//! Scripted bus master standing in for a CPU port.
//!
//! A `BusMaster` executes a queue of requests against the system bus. It follows the
//! same discipline as a registered RTL master:
//! 1. **Registered outputs:** Signals change only at clock edges, so they never depend
//!    combinationally on the response of the current cycle.
//! 2. **Beat accounting:** Each `ack` completes one beat; the address advances with the
//!    burst rule and the last beat is marked `EndOfBurst`. An `err` ends the request.
//! 3. **Idle gap:** After a request completes, `cyc` stays low for at least one cycle so
//!    the arbiter can hand the bus to another port.

use std::collections::VecDeque;

use tracing::debug;

use crate::common::{
    BurstTypeExt, CycleType, MasterSignals, SimError, SlaveSignals, next_burst_address,
};

/// A transaction a bus master can issue.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Request {
    /// Classic single-beat read.
    Read {
        /// Word address.
        adr: u64,
        /// Granule select.
        sel: u8,
    },
    /// Classic single-beat write.
    Write {
        /// Word address.
        adr: u64,
        /// Write data.
        dat: u64,
        /// Granule select.
        sel: u8,
    },
    /// Incrementing burst read of `len` beats.
    BurstRead {
        /// Word address of the first beat.
        adr: u64,
        /// Number of beats.
        len: u64,
        /// Linear or wrapping increment.
        bte: BurstTypeExt,
    },
    /// Incrementing burst write, one beat per data word.
    BurstWrite {
        /// Word address of the first beat.
        adr: u64,
        /// Data of each beat, in order.
        data: Vec<u64>,
        /// Linear or wrapping increment.
        bte: BurstTypeExt,
    },
}

impl Request {
    /// Returns `true` for requests that write.
    pub const fn is_write(&self) -> bool {
        matches!(self, Self::Write { .. } | Self::BurstWrite { .. })
    }

    /// Number of beats the request takes.
    pub fn beats(&self) -> u64 {
        match self {
            Self::Read { .. } | Self::Write { .. } => 1,
            Self::BurstRead { len, .. } => *len,
            Self::BurstWrite { data, .. } => data.len() as u64,
        }
    }

    const fn start_address(&self) -> u64 {
        match self {
            Self::Read { adr, .. }
            | Self::Write { adr, .. }
            | Self::BurstRead { adr, .. }
            | Self::BurstWrite { adr, .. } => *adr,
        }
    }

    const fn bte(&self) -> BurstTypeExt {
        match self {
            Self::BurstRead { bte, .. } | Self::BurstWrite { bte, .. } => *bte,
            Self::Read { .. } | Self::Write { .. } => BurstTypeExt::Linear,
        }
    }
}

/// How a request ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    /// Every beat was acknowledged.
    Ack,
    /// A beat was answered with `err`; later beats were not issued.
    Err,
}

/// A finished request with the read data it collected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Completion {
    /// The request as submitted.
    pub request: Request,
    /// How it ended.
    pub status: Status,
    /// Read data, one word per acknowledged read beat; empty for writes.
    pub data: Vec<u64>,
}

/// A request in progress.
#[derive(Clone, Debug)]
struct Active {
    request: Request,
    beats: u64,
    acks: u64,
    adr: u64,
    data: Vec<u64>,
}

/// Scripted master port with registered outputs.
#[derive(Clone, Debug)]
pub struct BusMaster {
    name: String,
    read_only: bool,
    full_sel: u8,
    queue: VecDeque<Request>,
    active: Option<Active>,
    signals: MasterSignals,
    completed: Vec<Completion>,
}

impl BusMaster {
    /// Creates an idle master.
    ///
    /// # Arguments
    ///
    /// * `name` - Port name, used in errors and log events.
    /// * `full_sel` - Granule select of a full-word burst beat.
    /// * `read_only` - Reject writes (instruction fetch port).
    pub fn new(name: &str, full_sel: u8, read_only: bool) -> Self {
        Self {
            name: name.to_owned(),
            read_only,
            full_sel,
            queue: VecDeque::new(),
            active: None,
            signals: MasterSignals::IDLE,
            completed: Vec::new(),
        }
    }

    /// Port name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the port rejects writes.
    pub const fn read_only(&self) -> bool {
        self.read_only
    }

    /// Queues a request behind those already submitted.
    ///
    /// # Errors
    ///
    /// `SimError::ReadOnlyPort` for a write on a read-only port and
    /// `SimError::InvalidRequest` for a burst without beats.
    pub fn submit(&mut self, request: Request) -> Result<(), SimError> {
        if self.read_only && request.is_write() {
            return Err(SimError::ReadOnlyPort(self.name.clone()));
        }
        if request.beats() == 0 {
            return Err(SimError::InvalidRequest {
                port: self.name.clone(),
                reason: "burst must have at least one beat",
            });
        }
        self.queue.push_back(request);
        Ok(())
    }

    /// Signals driven during the current cycle.
    pub const fn signals(&self) -> MasterSignals {
        self.signals
    }

    /// Returns `true` when nothing is queued or in progress.
    pub fn is_idle(&self) -> bool {
        self.active.is_none() && self.queue.is_empty()
    }

    /// Requests finished so far, oldest first.
    pub fn completed(&self) -> &[Completion] {
        &self.completed
    }

    /// Drains the finished requests.
    pub fn take_completed(&mut self) -> Vec<Completion> {
        std::mem::take(&mut self.completed)
    }

    /// Samples the response of the current cycle at the clock edge and registers the
    /// signals for the next cycle.
    pub fn clock(&mut self, response: &SlaveSignals) {
        let Some(mut active) = self.active.take() else {
            // Start only after a cycle with `cyc` low.
            if self.signals.cyc {
                return;
            }
            if let Some(request) = self.queue.pop_front() {
                let active = Active {
                    beats: request.beats(),
                    acks: 0,
                    adr: request.start_address(),
                    data: Vec::new(),
                    request,
                };
                self.signals = self.beat_signals(&active);
                self.active = Some(active);
            }
            return;
        };

        if response.err {
            debug!(port = %self.name, adr = active.adr, "bus error");
            self.finish(active, Status::Err);
            return;
        }
        if response.ack {
            if !active.request.is_write() {
                active.data.push(response.dat_r);
            }
            active.acks += 1;
            if active.acks == active.beats {
                self.finish(active, Status::Ack);
                return;
            }
            active.adr = next_burst_address(active.adr, CycleType::IncrBurst, active.request.bte());
        }
        self.signals = self.beat_signals(&active);
        self.active = Some(active);
    }

    /// Drops queued and active requests and idles the port.
    pub fn reset(&mut self) {
        self.queue.clear();
        self.active = None;
        self.signals = MasterSignals::IDLE;
        self.completed.clear();
    }

    fn finish(&mut self, active: Active, status: Status) {
        self.signals = MasterSignals::IDLE;
        self.completed.push(Completion {
            request: active.request,
            status,
            data: active.data,
        });
    }

    fn beat_signals(&self, active: &Active) -> MasterSignals {
        let cti = if active.beats == 1 {
            CycleType::Classic
        } else if active.acks + 1 == active.beats {
            CycleType::EndOfBurst
        } else {
            CycleType::IncrBurst
        };
        let (dat_w, sel, we) = match &active.request {
            Request::Read { sel, .. } => (0, *sel, false),
            Request::Write { dat, sel, .. } => (*dat, *sel, true),
            Request::BurstRead { .. } => (0, self.full_sel, false),
            Request::BurstWrite { data, .. } => {
                let word = data.get(active.acks as usize).copied().unwrap_or_default();
                (word, self.full_sel, true)
            }
        };
        MasterSignals {
            cyc: true,
            stb: true,
            adr: active.adr,
            dat_w,
            sel,
            we,
            cti,
            bte: active.request.bte(),
        }
    }
}
