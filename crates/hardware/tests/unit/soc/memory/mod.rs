//! Memory block tests.

/// Word buffer storage and granular writes.
pub mod buffer;
