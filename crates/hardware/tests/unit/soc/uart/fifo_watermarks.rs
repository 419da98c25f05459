//! Synchronous FIFO tests.
//!
//! The level after each edge must equal the level before plus accepted writes
//! minus accepted reads, and entries must come out in the order they went in.

use std::collections::VecDeque;

use proptest::prelude::*;
use wbsoc_core::common::ConfigError;
use wbsoc_core::soc::devices::SyncFifo;

#[test]
fn zero_depth_rejected() {
    assert_eq!(SyncFifo::<u8>::new(0).unwrap_err(), ConfigError::ZeroFifoDepth);
}

#[test]
fn fresh_fifo_is_empty() {
    let fifo = SyncFifo::<u8>::new(4).unwrap();
    assert_eq!(fifo.depth(), 4);
    assert_eq!(fifo.level(), 0);
    assert!(fifo.w_rdy());
    assert!(!fifo.r_rdy());
    assert_eq!(fifo.r_data(), None);
}

#[test]
fn full_fifo_refuses_write_even_when_read_same_edge() {
    let mut fifo = SyncFifo::new(2).unwrap();
    fifo.clock(Some(1u8), false);
    fifo.clock(Some(2), false);
    assert!(!fifo.w_rdy());

    assert_eq!(fifo.clock(Some(3), true), (false, Some(1)));
    assert_eq!(fifo.level(), 1);
    assert_eq!(fifo.r_data(), Some(2));
}

#[test]
fn empty_fifo_read_does_not_see_same_edge_write() {
    let mut fifo = SyncFifo::new(2).unwrap();
    assert_eq!(fifo.clock(Some(9u8), true), (true, None));
    assert_eq!(fifo.level(), 1);
    assert_eq!(fifo.clock(None, true), (false, Some(9)));
}

#[test]
fn simultaneous_read_and_write_keep_level() {
    let mut fifo = SyncFifo::new(3).unwrap();
    fifo.clock(Some(1u8), false);
    assert_eq!(fifo.clock(Some(2), true), (true, Some(1)));
    assert_eq!(fifo.level(), 1);
    assert_eq!(fifo.r_data(), Some(2));
}

#[test]
fn clear_empties() {
    let mut fifo = SyncFifo::new(2).unwrap();
    fifo.clock(Some(1u8), false);
    fifo.clear();
    assert_eq!(fifo.level(), 0);
    assert!(!fifo.r_rdy());
}

proptest! {
    #[test]
    fn level_tracks_accepted_traffic(
        depth in 1usize..8,
        ops in prop::collection::vec((prop::option::of(any::<u8>()), any::<bool>()), 0..128),
    ) {
        let mut fifo = SyncFifo::new(depth).unwrap();
        let mut model = VecDeque::new();
        for (w_data, r_en) in ops {
            let before = fifo.level();
            let w_rdy = fifo.w_rdy();
            let r_rdy = fifo.r_rdy();

            let (written, popped) = fifo.clock(w_data, r_en);

            prop_assert_eq!(written, w_data.is_some() && w_rdy);
            prop_assert_eq!(popped.is_some(), r_en && r_rdy);
            if popped.is_some() {
                prop_assert_eq!(popped, model.pop_front());
            }
            if written {
                model.push_back(w_data.unwrap());
            }

            let k = usize::from(written);
            let j = usize::from(popped.is_some());
            prop_assert_eq!(fifo.level(), before + k - j);
            prop_assert!(fifo.level() <= depth);
            prop_assert_eq!(fifo.r_data(), model.front().copied());
        }
    }
}
