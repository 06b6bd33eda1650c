//! Integration test utilities for rolebot
//!
//! Runs the whole stack (JSON binding store, binding manager, dispatcher
//! and command surface) against an in-memory platform.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
