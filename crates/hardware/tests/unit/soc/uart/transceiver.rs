//! Simulated transceiver tests.
//!
//! Checks frame timing for different line settings, the single-entry receive
//! holding register with overflow flagging, and transmitter busy time.

use rstest::rstest;
use wbsoc_core::common::ConfigError;
use wbsoc_core::soc::devices::{Parity, RxFrame, SimTransceiver, Transceiver};

fn phy(divisor: u32) -> SimTransceiver {
    SimTransceiver::new("phy0", divisor, 8, Parity::None).unwrap()
}

#[rstest]
#[case(1, 8, Parity::None, 10)]
#[case(1, 8, Parity::Even, 11)]
#[case(4, 7, Parity::Odd, 40)]
#[case(8, 5, Parity::None, 56)]
#[case(2, 8, Parity::Mark, 22)]
fn frame_time(
    #[case] divisor: u32,
    #[case] data_bits: u32,
    #[case] parity: Parity,
    #[case] cycles: u64,
) {
    let phy = SimTransceiver::new("p", divisor, data_bits, parity).unwrap();
    assert_eq!(phy.frame_cycles(), cycles);
}

#[test]
fn invalid_parameters_rejected() {
    assert_eq!(
        SimTransceiver::new("", 1, 8, Parity::None).unwrap_err(),
        ConfigError::EmptyName
    );
    assert_eq!(
        SimTransceiver::new("p", 0, 8, Parity::None).unwrap_err(),
        ConfigError::ZeroDivisor
    );
    assert_eq!(
        SimTransceiver::new("p", 1, 9, Parity::None).unwrap_err(),
        ConfigError::InvalidDataBits(9)
    );
}

#[test]
fn frame_arrives_after_one_frame_time() {
    let mut phy = phy(1);
    phy.inject(RxFrame::new(0x55));
    assert_eq!(phy.rx_in_flight(), 1);
    for _ in 0..9 {
        phy.tick();
    }
    assert_eq!(phy.rx_holding(), None);
    phy.tick();
    assert_eq!(phy.rx_holding(), Some(RxFrame::new(0x55)));
    assert_eq!(phy.rx_in_flight(), 0);
    assert_eq!(phy.try_receive(), Some(RxFrame::new(0x55)));
    assert_eq!(phy.try_receive(), None);
}

#[test]
fn uncollected_frame_flags_overflow_and_drops_successor() {
    let mut phy = phy(1);
    phy.inject_bytes(&[1, 2]);
    for _ in 0..20 {
        phy.tick();
    }
    let held = phy.try_receive().unwrap();
    assert_eq!(held.data, 1);
    assert!(held.overflow);
    assert_eq!(phy.try_receive(), None);
}

#[test]
fn injected_data_masked_to_data_bits() {
    let mut phy = SimTransceiver::new("p", 1, 5, Parity::None).unwrap();
    phy.inject(RxFrame {
        data: 0xFF,
        parity: true,
        ..RxFrame::default()
    });
    for _ in 0..phy.frame_cycles() {
        phy.tick();
    }
    let frame = phy.try_receive().unwrap();
    assert_eq!(frame.data, 0x1F);
    assert!(frame.parity);
}

#[test]
fn transmitter_busy_for_one_frame() {
    let mut phy = phy(2);
    assert!(phy.try_transmit(0x41));
    assert!(phy.tx_busy());
    assert!(!phy.try_transmit(0x42));
    for _ in 0..20 {
        phy.tick();
    }
    assert!(!phy.tx_busy());
    assert!(phy.try_transmit(0x42));
    assert_eq!(phy.transmitted(), &[0x41, 0x42]);
    assert_eq!(phy.take_transmitted(), vec![0x41, 0x42]);
    assert!(phy.transmitted().is_empty());
}

#[test]
fn divisor_change_rescales_frames() {
    let mut phy = phy(1);
    phy.set_divisor(3);
    assert_eq!(phy.divisor(), 3);
    assert_eq!(phy.frame_cycles(), 30);
    phy.set_divisor(0);
    assert_eq!(phy.frame_cycles(), 10);
}

#[test]
fn reset_idles_the_line() {
    let mut phy = phy(1);
    phy.inject_bytes(&[1, 2, 3]);
    phy.try_transmit(9);
    for _ in 0..10 {
        phy.tick();
    }
    phy.reset();
    assert_eq!(phy.rx_in_flight(), 0);
    assert_eq!(phy.rx_holding(), None);
    assert!(!phy.tx_busy());
    assert!(phy.transmitted().is_empty());
    assert_eq!(phy.id(), "phy0");
}
