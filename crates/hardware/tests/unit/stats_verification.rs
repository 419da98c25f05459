//! Bus statistics tests.
//!
//! Feeds hand-built cycles into `BusStats` and checks the counters, the
//! utilization figure and both report formats.

use wbsoc_core::common::{MasterSignals, SlaveSignals};
use wbsoc_core::stats::BusStats;

const ACK: SlaveSignals = SlaveSignals {
    ack: true,
    err: false,
    dat_r: 0,
};

const ERR: SlaveSignals = SlaveSignals {
    ack: false,
    err: true,
    dat_r: 0,
};

fn strobing() -> MasterSignals {
    MasterSignals::read(0, 0xF)
}

#[test]
fn fresh_stats_are_zero() {
    let stats = BusStats::new(2);
    assert_eq!(stats.masters.len(), 2);
    assert_eq!(stats.cycles, 0);
    assert!(stats.utilization().abs() < f64::EPSILON);
}

#[test]
fn counts_acks_errors_and_waits_per_port() {
    let mut stats = BusStats::new(2);
    let masters = [strobing(), strobing()];

    stats.record(&masters, &[SlaveSignals::IDLE, SlaveSignals::IDLE], 0);
    stats.record(&masters, &[ACK, SlaveSignals::IDLE], 0);
    stats.record(&masters, &[SlaveSignals::IDLE, ERR], 1);

    assert_eq!(stats.cycles, 3);
    assert_eq!(stats.busy_cycles, 3);
    assert_eq!(stats.masters[0].acks, 1);
    assert_eq!(stats.masters[0].wait_cycles, 1);
    assert_eq!(stats.masters[0].grants, 1);
    assert_eq!(stats.masters[1].grants, 1);
    assert_eq!(stats.masters[1].errors, 1);
    assert_eq!(stats.masters[1].wait_cycles, 2);
}

#[test]
fn initial_grant_holder_is_counted() {
    let mut stats = BusStats::new(2);
    let masters = [strobing(), MasterSignals::IDLE];
    for _ in 0..4 {
        stats.record(&masters, &[SlaveSignals::IDLE, SlaveSignals::IDLE], 0);
    }
    assert_eq!(stats.masters[0].grants, 1);
    assert_eq!(stats.masters[1].grants, 0);
}

#[test]
fn every_cycle_opened_under_a_held_grant_counts() {
    let mut stats = BusStats::new(2);
    let idle = [SlaveSignals::IDLE, SlaveSignals::IDLE];
    stats.record(&[strobing(), MasterSignals::IDLE], &idle, 0);
    stats.record(&[MasterSignals::IDLE, MasterSignals::IDLE], &idle, 0);
    stats.record(&[strobing(), MasterSignals::IDLE], &idle, 0);
    stats.record(&[strobing(), MasterSignals::IDLE], &idle, 0);
    assert_eq!(stats.masters[0].grants, 2);
}

#[test]
fn idle_cycles_lower_utilization() {
    let mut stats = BusStats::new(1);
    stats.record(&[strobing()], &[SlaveSignals::IDLE], 0);
    stats.record(&[MasterSignals::IDLE], &[SlaveSignals::IDLE], 0);
    assert_eq!(stats.busy_cycles, 1);
    assert!((stats.utilization() - 0.5).abs() < f64::EPSILON);
    assert_eq!(stats.masters[0].wait_cycles, 1);
}

#[test]
fn json_report_carries_every_counter() {
    let mut stats = BusStats::new(2);
    stats.record(&[strobing(), MasterSignals::IDLE], &[ACK, SlaveSignals::IDLE], 0);
    stats.decode_misses = 3;
    stats.uart_tx_bytes = 7;

    let json: serde_json::Value = serde_json::from_str(&stats.to_json().unwrap()).unwrap();
    assert_eq!(json["cycles"], 1);
    assert_eq!(json["decode_misses"], 3);
    assert_eq!(json["uart_tx_bytes"], 7);
    assert_eq!(json["masters"][0]["acks"], 1);
    assert_eq!(json["masters"].as_array().unwrap().len(), 2);
}

#[test]
fn text_report_lists_ports() {
    let mut stats = BusStats::new(2);
    stats.record(&[strobing(), MasterSignals::IDLE], &[ACK, SlaveSignals::IDLE], 0);
    let report = stats.to_string();
    assert!(report.contains("BUS STATISTICS"));
    assert!(report.contains("sim_cycles               1"));
    assert!(report.contains("port0"));
    assert!(report.contains("port1"));
    assert!(report.contains("uart.tx_bytes"));
}
