//! 시나리오 러너 -- 스위트 전체를 순서대로 실행합니다.
//!
//! [`ScenarioRunner::run`]이 유일한 진입점입니다.
//!
//! 1. 정책 preference 저장 후 켜기
//! 2. 테스트 창 열기, seed 링크 주입
//! 3. 시나리오마다 seed 준비 → 활성화 방식 두 가지 → 탭 정리
//! 4. 창 닫기
//! 5. preference 복원 (치명적 에러로 중단된 경우에도)
//!
//! 치명적이지 않은 단계 에러는 현재 시나리오의 실패로 기록하고 다음
//! 시나리오로 넘어갑니다.

use std::sync::Arc;
use std::time::Instant;

use tracing::{error, info, warn};
use uuid::Uuid;

use mixguard_core::config::{PollerConfig, RunConfig};
use mixguard_core::host::{BrowserHost, TabStrip};
use mixguard_core::metrics as m;

use crate::context::RunContext;
use crate::error::EngineError;
use crate::poller::{ConditionPoller, PollOptions};
use crate::report::RunReport;
use crate::scenario::{ActivationVariant, Scenario, ScenarioSuite};
use crate::setup;
use crate::step::{ScenarioStep, SeedFlow};

/// 시나리오 러너
pub struct ScenarioRunner<H: BrowserHost> {
    host: Arc<H>,
    step: ScenarioStep<H>,
    policy_pref: String,
}

impl<H: BrowserHost> ScenarioRunner<H> {
    pub fn new(host: Arc<H>, poller: &PollerConfig, run: &RunConfig) -> Self {
        let step = ScenarioStep::new(
            Arc::clone(&host),
            ConditionPoller::new(PollOptions::from(poller)),
            run.load_timeout(),
            run.gesture_timeout(),
        );
        Self {
            host,
            step,
            policy_pref: run.policy_pref.clone(),
        }
    }

    /// 스위트를 실행하고 보고서를 돌려줍니다.
    ///
    /// # Errors
    /// 준비 실패, 요소 없음, 제스처 무반응 등 치명적 에러. 이 경우에도
    /// 창은 닫히고 preference는 복원됩니다.
    pub async fn run(&self, suite: &ScenarioSuite) -> Result<RunReport, EngineError> {
        let started = Instant::now();
        let run_id = Uuid::new_v4();
        info!(run_id = %run_id, scenarios = suite.len(), "starting scenario run");

        let saved = setup::enable_policy(self.host.as_ref(), &self.policy_pref).await?;
        let result = self.run_suite(run_id, suite).await;
        if result.is_err() {
            setup::close_test_window(self.host.as_ref()).await;
        }
        setup::restore_policy(self.host.as_ref(), &saved).await;

        let elapsed = started.elapsed();
        metrics::histogram!(m::RUN_DURATION_SECONDS).record(elapsed.as_secs_f64());

        match result {
            Ok(mut report) => {
                report.set_duration(elapsed);
                let tally = report.tally();
                info!(
                    run_id = %run_id,
                    passed = tally.passed,
                    failed = tally.failed,
                    expected_failures = tally.expected_failures,
                    unexpected_passes = tally.unexpected_passes,
                    duration_ms = report.duration_ms,
                    "scenario run finished"
                );
                Ok(report)
            }
            Err(e) => {
                error!(run_id = %run_id, error = %e, "scenario run aborted");
                Err(e)
            }
        }
    }

    async fn run_suite(
        &self,
        run_id: Uuid,
        suite: &ScenarioSuite,
    ) -> Result<RunReport, EngineError> {
        let main = setup::open_test_window(self.host.as_ref(), suite).await?;
        let mut ctx = RunContext::new(run_id, main);
        let mut report = RunReport::new(run_id, suite);

        for scenario in suite {
            ctx.begin_scenario(scenario);
            metrics::counter!(m::SCENARIOS_TOTAL).increment(1);
            info!(
                scenario = %scenario.id,
                relation = %scenario.relation,
                navigation = %scenario.navigation,
                expectation = %scenario.expectation,
                "running scenario"
            );

            match self.run_scenario(&mut ctx, scenario, &mut report).await {
                Ok(()) => {}
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    warn!(
                        scenario = %scenario.id,
                        phase = %ctx.phase(),
                        error = %e,
                        "step failed, moving on"
                    );
                    let description = format!("{} completed without host errors", scenario.id);
                    report.fail(&ctx, description, e.to_string());
                }
            }

            match self.step.cleanup_scenario(&mut ctx).await {
                Ok(()) => {}
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    warn!(scenario = %scenario.id, error = %e, "scenario cleanup failed");
                    report.fail(&ctx, format!("{} tabs cleaned up", scenario.id), e.to_string());
                }
            }
        }

        self.host.close_window().await?;
        info!("test window closed");
        Ok(report)
    }

    async fn run_scenario(
        &self,
        ctx: &mut RunContext,
        scenario: &Scenario,
        report: &mut RunReport,
    ) -> Result<(), EngineError> {
        if self.step.prepare_seed(ctx, scenario, report).await? == SeedFlow::Skip {
            warn!(scenario = %scenario.id, "seed tab not ready, skipping activation variants");
            return Ok(());
        }
        for variant in ActivationVariant::ALL {
            self.step.run_variant(ctx, scenario, variant, report).await?;
        }
        Ok(())
    }
}
