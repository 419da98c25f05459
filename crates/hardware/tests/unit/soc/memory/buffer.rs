//! Word buffer tests.
//!
//! Verifies initialization, index wrapping and `sel`-granular writes at
//! several data widths and granularities.

use rstest::rstest;
use wbsoc_core::soc::memory::buffer::WordBuffer;

#[test]
fn init_fills_low_words_and_zeroes_the_rest() {
    let buf = WordBuffer::new(8, 32, 8, &[1, 2, 3]);
    assert_eq!(buf.len(), 8);
    assert!(!buf.is_empty());
    assert_eq!(buf.as_slice(), &[1, 2, 3, 0, 0, 0, 0, 0]);
    assert_eq!(buf[2], 3);
}

#[test]
fn init_words_truncated_to_data_width() {
    let buf = WordBuffer::new(2, 16, 8, &[0x1234_5678]);
    assert_eq!(buf.read(0), 0x5678);
}

#[test]
fn read_wraps_modulo_depth() {
    let buf = WordBuffer::new(4, 32, 8, &[10, 11, 12, 13]);
    assert_eq!(buf.read(4), 10);
    assert_eq!(buf.read(7), 13);
    assert_eq!(buf.read(0x1_0001), 11);
}

#[rstest]
#[case(32, 8, 0b0001, 0x1122_33DD)]
#[case(32, 8, 0b0101, 0x11BB_33DD)]
#[case(32, 8, 0b1111, 0xAABB_CCDD)]
#[case(32, 8, 0b0000, 0x1122_3344)]
#[case(32, 16, 0b01, 0x1122_CCDD)]
#[case(32, 16, 0b10, 0xAABB_3344)]
#[case(32, 32, 0b1, 0xAABB_CCDD)]
fn granular_write(
    #[case] data_width: u32,
    #[case] granularity: u32,
    #[case] sel: u8,
    #[case] expected: u64,
) {
    let mut buf = WordBuffer::new(4, data_width, granularity, &[0x1122_3344]);
    buf.write(0, 0xAABB_CCDD, sel);
    assert_eq!(buf.read(0), expected);
}

#[test]
fn sixty_four_bit_words_write_upper_lanes() {
    let mut buf = WordBuffer::new(2, 64, 8, &[0]);
    buf.write(1, 0xFFEE_DDCC_BBAA_9988, 0b1000_0000);
    assert_eq!(buf.read(1), 0xFF00_0000_0000_0000);
}
