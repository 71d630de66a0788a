//! `mixguard run` command handler

use std::io::Write;
use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use mixguard_core::config::MixguardConfig;
use mixguard_core::error::MixguardError;
use mixguard_engine::{
    ActivationVariant, AssertionRecord, Outcome, RunReport, ScenarioRunner, Tally, VariantOutcome,
};
use mixguard_sim_browser::SimBrowser;

use crate::cli::RunArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `run` command.
///
/// Returns `CliError::RunFailed` (exit code 4) when the run completes with
/// failed assertions or unexpected passes.
pub async fn execute(
    args: RunArgs,
    config: &MixguardConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let suite = super::load_suite(args.suite.as_deref(), config)?;
    let suite = if args.only.is_empty() {
        suite
    } else {
        suite.filter(&args.only).map_err(MixguardError::from)?
    };

    let mut host_config = config.host.clone();
    if args.fixed_redirects {
        host_config.server_redirect_keeps_override = true;
    }

    info!(
        scenarios = suite.len(),
        source = %super::suite_source(args.suite.as_deref(), config),
        redirect_keeps_override = host_config.server_redirect_keeps_override,
        "running scenario suite"
    );

    let browser = Arc::new(SimBrowser::new(host_config));
    let runner = ScenarioRunner::new(browser, &config.poller, &config.run);
    let report = runner.run(&suite).await.map_err(MixguardError::from)?;

    let summary = RunSummary::from_report(report);
    writer.render(&summary)?;

    if !summary.success {
        return Err(CliError::RunFailed {
            failures: summary.failures.len(),
        });
    }
    Ok(())
}

/// Run result payload.
#[derive(Serialize)]
pub struct RunSummary {
    pub success: bool,
    pub tally: Tally,
    pub outcomes: Vec<VariantOutcome>,
    pub failures: Vec<AssertionRecord>,
    pub report: RunReport,
}

impl RunSummary {
    pub fn from_report(report: RunReport) -> Self {
        Self {
            success: report.is_success(),
            tally: report.tally(),
            outcomes: report.variant_outcomes(),
            failures: report.failures().cloned().collect(),
            report,
        }
    }

    fn outcome(&self, scenario: &str, variant: ActivationVariant) -> Option<Outcome> {
        self.outcomes
            .iter()
            .find(|o| o.scenario == scenario && o.variant == variant)
            .map(|o| o.outcome)
    }
}

fn colored_outcome(outcome: Option<Outcome>) -> colored::ColoredString {
    use colored::Colorize;

    match outcome {
        Some(Outcome::Pass) => "PASS".green(),
        Some(Outcome::ExpectedFail) => "XFAIL".yellow(),
        Some(Outcome::UnexpectedPass) => "XPASS".red().bold(),
        Some(Outcome::Fail) => "FAIL".red().bold(),
        None => "-".dimmed(),
    }
}

impl Render for RunSummary {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(
            w,
            "Run {} ({} ms)",
            self.report.run_id.to_string().bold(),
            self.report.duration_ms
        )?;
        writeln!(w)?;

        writeln!(w, "{:<16} {:<10} {:<10}", "Scenario", "Primary", "Secondary")?;
        writeln!(w, "{}", "-".repeat(38))?;
        for scenario in &self.report.scenarios {
            let primary = self.outcome(scenario, ActivationVariant::Primary);
            let secondary = self.outcome(scenario, ActivationVariant::Secondary);
            writeln!(
                w,
                "{:<16} {:<10} {:<10}",
                scenario,
                colored_outcome(primary),
                colored_outcome(secondary)
            )?;
        }
        writeln!(w)?;

        if !self.failures.is_empty() {
            writeln!(w, "{}", "Failures:".red().bold())?;
            for record in &self.failures {
                let variant = record
                    .variant
                    .map(|v| format!(" ({v})"))
                    .unwrap_or_default();
                writeln!(
                    w,
                    "  [{}] {}{} {}: {}",
                    record.outcome.as_str().red(),
                    record.scenario,
                    variant,
                    record.phase,
                    record.description
                )?;
                if let Some(ref detail) = record.detail {
                    writeln!(w, "      {}", detail.dimmed())?;
                }
            }
            writeln!(w)?;
        }

        let totals = format!(
            "{} passed, {} failed, {} expected failures, {} unexpected passes",
            self.tally.passed,
            self.tally.failed,
            self.tally.expected_failures,
            self.tally.unexpected_passes
        );
        if self.success {
            writeln!(w, "Result: {} ({})", "OK".green().bold(), totals)?;
        } else {
            writeln!(w, "Result: {} ({})", "FAILED".red().bold(), totals)?;
        }

        Ok(())
    }
}
