//! Shared E2E test helpers.
//!
//! Provides configuration builders and a host wrapper that injects faults
//! into the simulated browser.

pub mod assertions;
pub mod config;
pub mod faulty_host;
