//! Bounded synchronous FIFO.
//!
//! Models a single-clock FIFO with one write port and one read port. Readiness is a
//! function of the level before the clock edge, so a write into a full FIFO is refused even
//! when a read happens on the same edge, and a read of an empty FIFO never sees the entry
//! written on that edge.

use std::collections::VecDeque;

use crate::common::ConfigError;

/// Fixed-depth first-in first-out queue with hardware-style ready flags.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyncFifo<T> {
    entries: VecDeque<T>,
    depth: usize,
}

impl<T: Copy> SyncFifo<T> {
    /// Creates an empty FIFO holding at most `depth` entries.
    pub fn new(depth: usize) -> Result<Self, ConfigError> {
        if depth == 0 {
            return Err(ConfigError::ZeroFifoDepth);
        }
        Ok(Self {
            entries: VecDeque::with_capacity(depth),
            depth,
        })
    }

    /// Maximum number of entries.
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Current number of entries.
    pub fn level(&self) -> usize {
        self.entries.len()
    }

    /// Write port ready: the FIFO is not full.
    pub fn w_rdy(&self) -> bool {
        self.entries.len() < self.depth
    }

    /// Read port ready: the FIFO is not empty.
    pub fn r_rdy(&self) -> bool {
        !self.entries.is_empty()
    }

    /// Read port data: the oldest entry, if any.
    pub fn r_data(&self) -> Option<T> {
        self.entries.front().copied()
    }

    /// Applies one clock edge to both ports.
    ///
    /// Both enables are qualified by the ready flags sampled before the edge.
    ///
    /// # Arguments
    ///
    /// * `w_data` - Entry to write, or `None` when the write enable is low.
    /// * `r_en` - Read enable.
    ///
    /// # Returns
    ///
    /// `(written, popped)`: whether the write was accepted and the entry removed by the read.
    pub fn clock(&mut self, w_data: Option<T>, r_en: bool) -> (bool, Option<T>) {
        let w_rdy = self.w_rdy();
        let r_rdy = self.r_rdy();

        let popped = if r_en && r_rdy {
            self.entries.pop_front()
        } else {
            None
        };
        let written = match w_data {
            Some(entry) if w_rdy => {
                self.entries.push_back(entry);
                true
            }
            _ => false,
        };
        (written, popped)
    }

    /// Empties the FIFO.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
