//! Shared test helpers for `wastewise-core` integration tests.
//!
//! Lightweight doubles for the payment ports so orchestrator tests can focus
//! on state transitions instead of wiring.

pub mod payments;
