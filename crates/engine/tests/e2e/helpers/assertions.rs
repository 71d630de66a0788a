//! Report assertion helpers.

use mixguard_engine::{ActivationVariant, Outcome, RunReport};

/// Outcome of one scenario/variant pair, panicking if it is missing.
#[allow(dead_code)]
pub fn variant_outcome(report: &RunReport, scenario: &str, variant: ActivationVariant) -> Outcome {
    report
        .variant_outcomes()
        .into_iter()
        .find(|v| v.scenario == scenario && v.variant == variant)
        .map(|v| v.outcome)
        .unwrap_or_else(|| panic!("no outcome for {scenario} ({variant})"))
}

/// Asserts that both activation variants of a scenario ended with `expected`.
#[allow(dead_code)]
pub fn assert_both_variants(report: &RunReport, scenario: &str, expected: Outcome) {
    for variant in ActivationVariant::ALL {
        assert_eq!(
            variant_outcome(report, scenario, variant),
            expected,
            "{scenario} ({variant}) should be {expected}"
        );
    }
}

/// Assertion records of one scenario with the given outcome.
#[allow(dead_code)]
pub fn count_records(report: &RunReport, scenario: &str, outcome: Outcome) -> usize {
    report
        .records
        .iter()
        .filter(|r| r.scenario == scenario && r.outcome == outcome)
        .count()
}
