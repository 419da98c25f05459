//! Configuration parsing and validation tests.

use wbsoc_core::common::ConfigError;
use wbsoc_core::config::Config;
use wbsoc_core::soc::devices::Parity;

#[test]
fn defaults_describe_reference_soc() {
    let config = Config::default();
    assert_eq!(config.bus.addr_width, 30);
    assert_eq!(config.bus.data_width, 32);
    assert_eq!(config.bus.granularity, 8);
    assert_eq!(config.memory.name, "rom");
    assert_eq!(config.memory.base, 0);
    assert_eq!(config.memory.size, 4096);
    assert!(!config.memory.writable);
    assert_eq!(config.csr.base, 0x8000_0000);
    assert_eq!(config.csr.size(), 1 << 31);
    assert_eq!(config.serial.divisor, 8);
    assert_eq!(config.serial.rx_fifo_depth, 16);
    assert_eq!(config.serial.tx_fifo_depth, 16);
    assert_eq!(config.serial.registers.tx_data, 0x10);
    assert_eq!(config.validate(), Ok(()));
}

#[test]
fn empty_json_equals_default() {
    let config = Config::from_json("{}").unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn partial_json_overrides_named_fields_only() {
    let json = r#"{
        "general": { "trace_bus": true },
        "memory": { "size": 8192, "writable": true },
        "serial": { "parity": "even", "registers": { "tx_data": 20 } }
    }"#;
    let config = Config::from_json(json).unwrap();
    assert!(config.general.trace_bus);
    assert_eq!(config.memory.size, 8192);
    assert!(config.memory.writable);
    assert_eq!(config.memory.name, "rom");
    assert_eq!(config.serial.parity, Parity::Even);
    assert_eq!(config.serial.registers.tx_data, 20);
    assert_eq!(config.serial.registers.ctrl, 0);
    assert_eq!(config.validate(), Ok(()));
}

#[test]
fn malformed_json_is_rejected() {
    assert!(Config::from_json(r#"{ "bus": { "data_width": "wide" } }"#).is_err());
}

#[test]
fn overlapping_memory_and_csr_rejected() {
    let mut config = Config::default();
    config.memory.base = 0x8000_0000;
    assert_eq!(
        config.validate(),
        Err(ConfigError::OverlappingWindow {
            name: "csr".into(),
            other: "rom".into()
        })
    );
}

#[test]
fn memory_outside_address_space_rejected() {
    let mut config = Config::default();
    config.bus.addr_width = 9;
    config.csr.addr_width = 8;
    config.csr.base = 0x100;
    config.serial.addr_width = 5;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::WindowOutOfRange { ref name, .. }) if name == "rom"
    ));
}

#[test]
fn non_byte_granular_bus_rejected() {
    let mut config = Config::default();
    config.bus.granularity = 16;
    assert_eq!(config.validate(), Err(ConfigError::BridgeGranularity(16)));
}

#[test]
fn serial_parameters_checked() {
    let mut config = Config::default();
    config.serial.divisor = 0;
    assert_eq!(config.validate(), Err(ConfigError::ZeroDivisor));

    let mut config = Config::default();
    config.serial.tx_fifo_depth = 0;
    assert_eq!(config.validate(), Err(ConfigError::ZeroFifoDepth));

    let mut config = Config::default();
    config.serial.data_bits = 9;
    assert_eq!(config.validate(), Err(ConfigError::InvalidDataBits(9)));
}
