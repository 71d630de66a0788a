//! `mixguard scenarios` command handler

use std::io::Write;

use serde::Serialize;

use mixguard_core::config::MixguardConfig;
use mixguard_engine::Scenario;

use crate::cli::ScenariosArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `scenarios` command.
pub async fn execute(
    args: ScenariosArgs,
    config: &MixguardConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let suite = super::load_suite(args.suite.as_deref(), config)?;
    let list = ScenarioList {
        source: super::suite_source(args.suite.as_deref(), config),
        scenarios: suite.scenarios().to_vec(),
    };
    writer.render(&list)?;
    Ok(())
}

/// Scenario listing payload.
#[derive(Serialize)]
pub struct ScenarioList {
    pub source: String,
    pub scenarios: Vec<Scenario>,
}

impl Render for ScenarioList {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Suite: {} ({} scenarios)", self.source.bold(), self.scenarios.len())?;
        writeln!(w)?;
        writeln!(
            w,
            "{:<10} {:<13} {:<16} {:<24} Child",
            "ID", "Relation", "Navigation", "Expectation"
        )?;
        writeln!(w, "{}", "-".repeat(90))?;

        for s in &self.scenarios {
            let expectation = if s.expectation.is_known_defect() {
                s.expectation.as_str().yellow()
            } else {
                s.expectation.as_str().normal()
            };
            writeln!(
                w,
                "{:<10} {:<13} {:<16} {:<24} {}",
                s.id,
                s.relation.as_str(),
                s.navigation.as_str(),
                expectation,
                s.child_url
            )?;
            if let Some(ref defect) = s.known_defect {
                writeln!(w, "{:<10} {}", "", format!("known defect: {defect}").dimmed())?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use mixguard_engine::ScenarioSuite;

    use super::*;

    #[test]
    fn test_scenario_list_text_shows_all_builtin_scenarios() {
        colored::control::set_override(false);
        let list = ScenarioList {
            source: "<built-in>".to_owned(),
            scenarios: ScenarioSuite::builtin().unwrap().scenarios().to_vec(),
        };

        let mut buffer = Vec::new();
        list.render_text(&mut buffer).unwrap();
        let output = String::from_utf8(buffer).unwrap();

        assert!(output.contains("Suite: <built-in> (6 scenarios)"));
        for id in ["Test1", "Test2", "Test3", "Test4", "Test5", "Test6"] {
            assert!(output.contains(id), "missing {id}");
        }
        assert!(output.contains("server-redirect"));
        assert!(output.contains("known defect:"));
    }

    #[test]
    fn test_scenario_list_json_uses_kebab_case() {
        let list = ScenarioList {
            source: "<built-in>".to_owned(),
            scenarios: ScenarioSuite::builtin().unwrap().scenarios().to_vec(),
        };
        let json = serde_json::to_value(&list).unwrap();

        assert_eq!(json["scenarios"][4]["navigation"], "server-redirect");
        assert_eq!(json["scenarios"][4]["expectation"], "appears-but-should-not");
        assert_eq!(json["scenarios"][1]["relation"], "cross-origin");
    }
}
