//! `booking-cli` library crate.
//!
//! Holds configuration and the validate-and-report step so integration
//! tests can drive them without spawning the binary. The entrypoint lives
//! in `main.rs`.

pub mod config;
pub mod report;
