//! Control/status register (CSR) side of the fabric.
//!
//! This module implements the narrow 8-bit register bus. It provides:
//! 1. **Register files:** Named registers with access modes and atomic multi-byte access.
//! 2. **Decoder:** Routing of the narrow bus to register-mapped peripherals.
//! 3. **Bridge:** A system bus slave that serializes wide beats into byte accesses.

/// Wide-to-narrow bus bridge.
pub mod bridge;

/// CSR address decoder.
pub mod decoder;

/// Register file multiplexer.
pub mod register;

pub use bridge::WishboneCsrBridge;
pub use decoder::CsrDecoder;
pub use register::{Access, Register, RegisterFile, RegisterStrobe};
