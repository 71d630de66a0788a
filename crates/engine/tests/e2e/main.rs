//! E2E tests for mixguard-engine.
//!
//! These tests run whole scenario suites against the simulated browser and
//! check the run report, cleanup and fatal-error behaviour.
//!
//! # Test Structure
//!
//! - `helpers/` -- Shared test utilities (config builders, fault-injecting host)
//! - `scenarios/` -- Test files organized by scenario (S1-S6)
//!
//! # Running
//!
//! ```bash
//! cargo test -p mixguard-engine --test e2e
//! ```

mod helpers;
mod scenarios;
