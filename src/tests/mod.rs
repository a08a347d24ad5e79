//! Internal test modules - whitebox tests with crate access
//!
//! Scenario tests drive a mounted session through the acceptance harness;
//! the rest check cross-module invariants with access to crate internals.

mod acceptance_keyboard;

// Whitebox tests with internal access
mod listener_pairing;
mod publish_cadence;
