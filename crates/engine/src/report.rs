//! 실행 보고서 -- 단언 기록과 집계
//!
//! 모든 단언은 [`AssertionRecord`] 하나로 남습니다. 알려진 결함 단언은
//! "todo" 규칙을 따릅니다. 조건이 거짓이면 [`Outcome::ExpectedFail`],
//! 참이면 [`Outcome::UnexpectedPass`]이고 후자는 실패로 셉니다.

use std::fmt;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use mixguard_core::metrics as m;

use crate::context::RunContext;
use crate::scenario::{ActivationVariant, ScenarioSuite};
use crate::step::StepPhase;

/// 단언 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Pass,
    Fail,
    /// 알려진 결함이 그대로 재현됨
    ExpectedFail,
    /// 알려진 결함이 더 이상 재현되지 않음
    UnexpectedPass,
}

impl Outcome {
    /// 조건 하나를 결과로 변환합니다.
    pub fn evaluate(condition: bool, known_defect: bool) -> Self {
        match (known_defect, condition) {
            (false, true) => Self::Pass,
            (false, false) => Self::Fail,
            (true, false) => Self::ExpectedFail,
            (true, true) => Self::UnexpectedPass,
        }
    }

    /// 실행 실패로 세는 결과인지
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Fail | Self::UnexpectedPass)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
            Self::ExpectedFail => "expected_fail",
            Self::UnexpectedPass => "unexpected_pass",
        }
    }

    // 여러 결과를 하나로 합칠 때의 우선순위
    fn severity(&self) -> u8 {
        match self {
            Self::Pass => 0,
            Self::ExpectedFail => 1,
            Self::UnexpectedPass => 2,
            Self::Fail => 3,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 단언 기록 하나
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssertionRecord {
    pub scenario: String,
    /// seed 단계 단언은 `None`
    pub variant: Option<ActivationVariant>,
    pub phase: StepPhase,
    pub description: String,
    pub outcome: Outcome,
    /// 실패 사유 등 부가 정보
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// 결과별 개수
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub passed: usize,
    pub failed: usize,
    pub expected_failures: usize,
    pub unexpected_passes: usize,
}

impl Tally {
    pub fn total(&self) -> usize {
        self.passed + self.failed + self.expected_failures + self.unexpected_passes
    }
}

/// 시나리오 × 활성화 방식 하나의 종합 결과
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariantOutcome {
    pub scenario: String,
    pub variant: ActivationVariant,
    pub outcome: Outcome,
}

/// 스위트 실행 보고서
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    /// 실행한 시나리오 id (순서대로)
    pub scenarios: Vec<String>,
    pub records: Vec<AssertionRecord>,
    pub duration_ms: u64,
}

impl RunReport {
    pub fn new(run_id: Uuid, suite: &ScenarioSuite) -> Self {
        Self {
            run_id,
            scenarios: suite.iter().map(|s| s.id.clone()).collect(),
            records: Vec::new(),
            duration_ms: 0,
        }
    }

    /// 현재 단계의 조건을 평가해 기록하고 결과를 돌려줍니다.
    pub fn assert(
        &mut self,
        ctx: &RunContext,
        description: impl Into<String>,
        condition: bool,
        known_defect: bool,
    ) -> Outcome {
        let outcome = Outcome::evaluate(condition, known_defect);
        self.push(ctx, description.into(), outcome, None);
        outcome
    }

    /// 현재 단계의 실패를 사유와 함께 기록합니다.
    pub fn fail(
        &mut self,
        ctx: &RunContext,
        description: impl Into<String>,
        detail: impl Into<String>,
    ) {
        self.push(ctx, description.into(), Outcome::Fail, Some(detail.into()));
    }

    fn push(
        &mut self,
        ctx: &RunContext,
        description: String,
        outcome: Outcome,
        detail: Option<String>,
    ) {
        let scenario = ctx.scenario().unwrap_or("-").to_owned();
        let variant = ctx.variant();
        let phase = ctx.phase();

        match outcome {
            Outcome::Pass => debug!(
                scenario = %scenario,
                variant = variant.map_or("-", |v| v.as_str()),
                phase = phase.as_str(),
                "PASS: {description}"
            ),
            Outcome::ExpectedFail => info!(
                scenario = %scenario,
                variant = variant.map_or("-", |v| v.as_str()),
                phase = phase.as_str(),
                "TODO (known defect): {description}"
            ),
            Outcome::Fail | Outcome::UnexpectedPass => warn!(
                scenario = %scenario,
                variant = variant.map_or("-", |v| v.as_str()),
                phase = phase.as_str(),
                outcome = outcome.as_str(),
                detail = detail.as_deref().unwrap_or(""),
                "{description}"
            ),
        }
        metrics::counter!(m::ASSERTIONS_TOTAL, m::LABEL_OUTCOME => outcome.as_str()).increment(1);

        self.records.push(AssertionRecord {
            scenario,
            variant,
            phase,
            description,
            outcome,
            detail,
        });
    }

    pub fn set_duration(&mut self, elapsed: Duration) {
        self.duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
    }

    pub fn tally(&self) -> Tally {
        let mut tally = Tally::default();
        for record in &self.records {
            match record.outcome {
                Outcome::Pass => tally.passed += 1,
                Outcome::Fail => tally.failed += 1,
                Outcome::ExpectedFail => tally.expected_failures += 1,
                Outcome::UnexpectedPass => tally.unexpected_passes += 1,
            }
        }
        tally
    }

    /// 시나리오마다 두 활성화 방식의 종합 결과를 돌려줍니다.
    ///
    /// 한 방식의 단언 중 가장 심각한 결과가 그 방식의 결과입니다. 단언이
    /// 하나도 없으면 (실행되지 못함) `Fail`입니다.
    pub fn variant_outcomes(&self) -> Vec<VariantOutcome> {
        let mut outcomes = Vec::with_capacity(self.scenarios.len() * ActivationVariant::ALL.len());
        for scenario in &self.scenarios {
            for variant in ActivationVariant::ALL {
                let outcome = self
                    .records
                    .iter()
                    .filter(|r| &r.scenario == scenario && r.variant == Some(variant))
                    .map(|r| r.outcome)
                    .max_by_key(Outcome::severity)
                    .unwrap_or(Outcome::Fail);
                outcomes.push(VariantOutcome {
                    scenario: scenario.clone(),
                    variant,
                    outcome,
                });
            }
        }
        outcomes
    }

    /// 실패한 단언
    pub fn failures(&self) -> impl Iterator<Item = &AssertionRecord> {
        self.records.iter().filter(|r| r.outcome.is_failure())
    }

    /// `Fail`도 `UnexpectedPass`도 없으면 성공입니다.
    pub fn is_success(&self) -> bool {
        self.failures().next().is_none()
    }
}
