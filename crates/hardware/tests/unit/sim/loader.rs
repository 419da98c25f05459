//! Memory image loader tests.

use std::io::Write;

use rstest::rstest;
use wbsoc_core::common::SimError;
use wbsoc_core::sim::loader::{load_image, pack_words};

#[rstest]
#[case(32, vec![0x13, 0x00, 0x00, 0x00, 0x93, 0x00], vec![0x13, 0x93])]
#[case(32, vec![0x78, 0x56, 0x34, 0x12], vec![0x1234_5678])]
#[case(16, vec![0x01, 0x02, 0x03], vec![0x0201, 0x03])]
#[case(8, vec![0xAA, 0xBB], vec![0xAA, 0xBB])]
#[case(64, vec![1, 2, 3, 4, 5, 6, 7, 8], vec![0x0807_0605_0403_0201])]
#[case(32, vec![], vec![])]
fn packs_little_endian(#[case] width: u32, #[case] bytes: Vec<u8>, #[case] words: Vec<u64>) {
    assert_eq!(pack_words(&bytes, width), words);
}

#[test]
fn loads_image_from_disk() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&[0x13, 0, 0, 0, 0x93, 0, 0, 0, 0x73]).unwrap();
    file.flush().unwrap();

    let words = load_image(file.path(), 32).unwrap();
    assert_eq!(words, vec![0x13, 0x93, 0x73]);
}

#[test]
fn missing_image_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.bin");
    let err = load_image(&path, 32).unwrap_err();
    assert!(matches!(err, SimError::Image { ref path, .. } if path.ends_with("absent.bin")));
    assert!(err.to_string().contains("absent.bin"));
}
