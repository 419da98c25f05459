//! System bus interconnect.
//!
//! This module implements the shared fabric between the master ports and the slaves. It
//! provides:
//! 1. **Arbitration:** A round-robin arbiter serializing master ports onto one bus.
//! 2. **Decoding:** An address decoder routing each beat to exactly one slave, with an
//!    error responder for unmapped addresses.

/// Round-robin arbiter.
pub mod arbiter;

/// System bus address decoder.
pub mod decoder;

pub use arbiter::RoundRobinArbiter;
pub use decoder::AddressDecoder;
