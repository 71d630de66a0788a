//! E2E test scenarios.
//!
//! Each module corresponds to one scenario group (S1-S6).

mod cleanup;
mod degraded_steps;
mod fatal_errors;
mod recoverable_errors;
mod redirect_defect;
mod suite_run;
