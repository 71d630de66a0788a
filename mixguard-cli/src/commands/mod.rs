//! Command handlers -- one module per subcommand

use std::path::Path;

use tracing::{debug, info};

use mixguard_core::config::MixguardConfig;
use mixguard_core::error::MixguardError;
use mixguard_engine::ScenarioSuite;

use crate::error::CliError;

pub mod config;
pub mod run;
pub mod scenarios;

/// Load the effective configuration for `run` and `scenarios`.
///
/// A missing file falls back to defaults (with env overrides), so the
/// built-in suite runs without any setup. Parse and validation errors are
/// still reported.
pub async fn load_config(path: &Path) -> Result<MixguardConfig, CliError> {
    if tokio::fs::try_exists(path).await? {
        return Ok(MixguardConfig::load(path).await?);
    }

    debug!(path = %path.display(), "config file not found, using defaults");
    let mut config = MixguardConfig::default();
    config.apply_env_overrides();
    config.validate()?;
    Ok(config)
}

/// Resolve the scenario suite: explicit path, then `run.suite_path`, then built-in.
pub fn load_suite(path: Option<&Path>, config: &MixguardConfig) -> Result<ScenarioSuite, CliError> {
    let configured = (!config.run.suite_path.trim().is_empty())
        .then(|| Path::new(&config.run.suite_path));

    let suite = match path.or(configured) {
        Some(p) => {
            info!(path = %p.display(), "loading scenario suite");
            ScenarioSuite::load(p)
        }
        None => ScenarioSuite::builtin(),
    };
    suite.map_err(|e| CliError::Core(MixguardError::Suite(e)))
}

/// Human-readable source of the suite for output headers.
pub fn suite_source(path: Option<&Path>, config: &MixguardConfig) -> String {
    match path {
        Some(p) => p.display().to_string(),
        None if !config.run.suite_path.trim().is_empty() => config.run.suite_path.clone(),
        None => "<built-in>".to_owned(),
    }
}
