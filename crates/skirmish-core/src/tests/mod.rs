//! Crate-level scenario tests.
//!
//! - `determinism.rs`: same seed and bots produce the same match
//! - `integration.rs`: full matches, lifecycle events, malfunctions, pacing
//!   and cancellation
//! - `properties.rs`: invariants under random action scripts
//! - `helpers.rs`: test bots and recording observers

mod helpers;
mod integration;
