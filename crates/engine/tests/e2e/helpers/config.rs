//! Test configuration builders.

use std::sync::Arc;

use mixguard_core::config::{HostConfig, MixguardConfig};
use mixguard_engine::ScenarioRunner;
use mixguard_sim_browser::SimBrowser;

/// Default configuration used by every scenario test.
#[allow(dead_code)]
pub fn test_config() -> MixguardConfig {
    MixguardConfig::default()
}

/// Simulated host configuration with the redirect defect fixed.
#[allow(dead_code)]
pub fn fixed_redirect_host() -> HostConfig {
    HostConfig {
        server_redirect_keeps_override: true,
        ..HostConfig::default()
    }
}

/// Builds a simulated browser and a runner driving it.
#[allow(dead_code)]
pub fn sim_runner(
    config: &MixguardConfig,
) -> (Arc<SimBrowser>, ScenarioRunner<SimBrowser>) {
    let browser = Arc::new(SimBrowser::new(config.host.clone()));
    let runner = ScenarioRunner::new(Arc::clone(&browser), &config.poller, &config.run);
    (browser, runner)
}
