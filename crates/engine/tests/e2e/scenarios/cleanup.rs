//! S3: Run cleanup E2E tests.
//!
//! Validates that the policy preference is restored and the test window is
//! closed whether the run completes or aborts.

use std::sync::Arc;

use crate::helpers::config::*;
use crate::helpers::faulty_host::FaultyHost;

use mixguard_core::config::DEFAULT_POLICY_PREF;
use mixguard_core::error::HostError;
use mixguard_core::host::{Preferences, TabStrip};
use mixguard_engine::{ScenarioRunner, ScenarioSuite};

/// Unset preference -> cleared again after the run.
#[tokio::test(start_paused = true)]
async fn test_e2e_unset_pref_is_cleared_after_run() {
    let config = test_config();
    let (browser, runner) = sim_runner(&config);
    let suite = ScenarioSuite::builtin().unwrap().filter(&["Test1"]).unwrap();

    runner.run(&suite).await.unwrap();

    assert_eq!(browser.bool_pref(DEFAULT_POLICY_PREF).await.unwrap(), None);
}

/// Explicit `false` -> restored to `false`, not cleared.
#[tokio::test(start_paused = true)]
async fn test_e2e_previous_pref_value_is_restored() {
    let config = test_config();
    let (browser, runner) = sim_runner(&config);
    browser.set_bool_pref(DEFAULT_POLICY_PREF, false).await.unwrap();
    let suite = ScenarioSuite::builtin().unwrap().filter(&["Test1"]).unwrap();

    runner.run(&suite).await.unwrap();

    assert_eq!(
        browser.bool_pref(DEFAULT_POLICY_PREF).await.unwrap(),
        Some(false)
    );
}

/// Completed run closes the test window.
#[tokio::test(start_paused = true)]
async fn test_e2e_window_closed_after_run() {
    let config = test_config();
    let (browser, runner) = sim_runner(&config);
    let suite = ScenarioSuite::builtin().unwrap();

    runner.run(&suite).await.unwrap();

    assert!(matches!(
        browser.tabs().await,
        Err(HostError::WindowUnavailable(_))
    ));
}

/// Aborted run still closes the window and restores the preference.
#[tokio::test(start_paused = true)]
async fn test_e2e_aborted_run_cleans_up() {
    // Given: The second scenario's seed link never reaches the main page
    let config = test_config();
    let host = Arc::new(FaultyHost::new(config.host.clone()).missing_link("linkForTest2"));
    host.set_bool_pref(DEFAULT_POLICY_PREF, false).await.unwrap();
    let runner = ScenarioRunner::new(Arc::clone(&host), &config.poller, &config.run);
    let suite = ScenarioSuite::builtin().unwrap();

    // When: Running the suite
    let result = runner.run(&suite).await;

    // Then: Run aborted, but nothing is left behind
    assert!(result.is_err());
    assert!(matches!(
        host.tabs().await,
        Err(HostError::WindowUnavailable(_))
    ));
    assert_eq!(
        host.bool_pref(DEFAULT_POLICY_PREF).await.unwrap(),
        Some(false)
    );
}

/// A run can be repeated on the same host after it completes.
#[tokio::test(start_paused = true)]
async fn test_e2e_repeated_runs_are_independent() {
    let config = test_config();
    let (browser, runner) = sim_runner(&config);
    let suite = ScenarioSuite::builtin().unwrap().filter(&["Test1", "Test2"]).unwrap();

    let first = runner.run(&suite).await.unwrap();
    let second = runner.run(&suite).await.unwrap();

    assert!(first.is_success());
    assert!(second.is_success());
    assert_ne!(first.run_id, second.run_id);
    assert_eq!(first.tally(), second.tally());
    assert_eq!(browser.bool_pref(DEFAULT_POLICY_PREF).await.unwrap(), None);
}
