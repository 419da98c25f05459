//! Common type tests.
//!
//! This module contains unit tests for the shared signal vocabulary and
//! address arithmetic of the fabric.
