//! S4: Fatal error E2E tests.
//!
//! Setup failures, missing elements and unresponsive gestures abort the
//! whole run instead of being recorded as assertion failures.

use std::sync::Arc;

use crate::helpers::config::*;
use crate::helpers::faulty_host::FaultyHost;

use mixguard_core::config::{DEFAULT_POLICY_PREF, MixguardConfig, RunConfig};
use mixguard_core::host::Preferences;
use mixguard_engine::{EngineError, ScenarioRunner, ScenarioSuite};
use mixguard_sim_browser::SimBrowser;

/// Window cannot be opened -> setup error, preference restored.
#[tokio::test(start_paused = true)]
async fn test_e2e_blocked_window_is_setup_error() {
    let config = test_config();
    let browser = Arc::new(SimBrowser::builder(config.host.clone()).block_windows().build());
    let runner = ScenarioRunner::new(Arc::clone(&browser), &config.poller, &config.run);
    let suite = ScenarioSuite::builtin().unwrap();

    let err = runner.run(&suite).await.unwrap_err();

    assert!(matches!(err, EngineError::Setup(_)), "got {err}");
    assert_eq!(browser.bool_pref(DEFAULT_POLICY_PREF).await.unwrap(), None);
}

/// Unknown policy preference -> setup error before any window is opened.
#[tokio::test(start_paused = true)]
async fn test_e2e_unknown_policy_pref_is_setup_error() {
    let config = MixguardConfig {
        run: RunConfig {
            policy_pref: "security.mixed_content.nonexistent".to_owned(),
            ..RunConfig::default()
        },
        ..test_config()
    };
    let (_browser, runner) = sim_runner(&config);
    let suite = ScenarioSuite::builtin().unwrap();

    let err = runner.run(&suite).await.unwrap_err();

    assert!(matches!(err, EngineError::Setup(_)));
    assert!(err.to_string().contains("nonexistent"));
}

/// Seed link missing from the main page -> element not found, run aborted.
#[tokio::test(start_paused = true)]
async fn test_e2e_missing_seed_link_aborts_run() {
    let config = test_config();
    let host = Arc::new(FaultyHost::new(config.host.clone()).missing_link("linkForTest3"));
    let runner = ScenarioRunner::new(Arc::clone(&host), &config.poller, &config.run);
    let suite = ScenarioSuite::builtin().unwrap();

    let err = runner.run(&suite).await.unwrap_err();

    match err {
        EngineError::ElementNotFound { element_id, .. } => assert_eq!(element_id, "linkForTest3"),
        other => panic!("expected ElementNotFound, got {other}"),
    }
}

/// Missing child link -> element not found on the seed tab.
#[tokio::test(start_paused = true)]
async fn test_e2e_missing_child_link_aborts_run() {
    let config = test_config();
    let host = Arc::new(FaultyHost::new(config.host.clone()).missing_link("Test1"));
    let runner = ScenarioRunner::new(Arc::clone(&host), &config.poller, &config.run);
    let suite = ScenarioSuite::builtin().unwrap();

    let err = runner.run(&suite).await.unwrap_err();

    assert!(matches!(
        err,
        EngineError::ElementNotFound { ref element_id, .. } if element_id == "Test1"
    ));
    assert!(err.is_fatal());
}

/// Click never reaches the interception point -> gesture timeout.
#[tokio::test(start_paused = true)]
async fn test_e2e_swallowed_click_is_gesture_timeout() {
    let config = test_config();
    let host = Arc::new(FaultyHost::new(config.host.clone()).swallow_clicks());
    let runner = ScenarioRunner::new(Arc::clone(&host), &config.poller, &config.run);
    let suite = ScenarioSuite::builtin().unwrap().filter(&["Test1"]).unwrap();

    let err = runner.run(&suite).await.unwrap_err();

    assert!(matches!(err, EngineError::GestureTimeout(_)), "got {err}");
    assert_eq!(host.bool_pref(DEFAULT_POLICY_PREF).await.unwrap(), None);
}
