//! 시나리오 단계
//!
//! 시나리오 하나는 다음 상태를 순서대로 지납니다.
//!
//! ```text
//! seed-open ─▶ seed-prompt ─▶ seed-marker ─▶ inject-link
//!                                                 │
//!        ┌────────────────────────────────────────┘
//!        ▼            (활성화 방식마다 반복)
//! variant-open ─▶ variant-prompt ─▶ variant-marker ─▶ cleanup
//! ```
//!
//! - 로드 대기는 제스처 전에 등록하고, 리다이렉트 형태는 hop 수만큼 기다립니다.
//! - 기대 불일치는 기록만 하고 진행을 멈추지 않습니다.
//! - 로드 시간 초과는 실패로 기록하고 해당 활성화 방식의 정리 단계로 넘어갑니다.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{info, warn};

use mixguard_core::host::{BrowserHost, ContentAccess, TabStrip};
use mixguard_core::types::{
    LinkTarget, MARKER_ELEMENT_ID, MarkerState, PromptActionKind, PromptKind, TabId,
};

use crate::context::RunContext;
use crate::error::EngineError;
use crate::gesture::ActionSimulator;
use crate::load::LoadWaiter;
use crate::notification::NotificationObserver;
use crate::poller::{ConditionPoller, PollOutcome};
use crate::report::RunReport;
use crate::scenario::{ActivationVariant, Scenario};

/// 단계 이름 (진단과 보고서에 사용)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepPhase {
    /// 메인 페이지 링크로 seed 탭을 열고 로드를 기다림
    SeedOpen,
    /// seed 탭의 프롬프트를 확인하고 보호 해제를 실행
    SeedPrompt,
    /// 보호 해제 후 상태 표시가 "disabled"가 될 때까지 polling
    SeedMarker,
    /// seed 페이지에 자식 링크 주입
    InjectLink,
    /// 활성화 방식으로 자식 탭을 열고 로드를 기다림
    VariantOpen,
    /// 자식 탭의 프롬프트를 기대와 비교
    VariantPrompt,
    /// 자식 탭의 상태 표시를 기대와 비교
    VariantMarker,
    /// 탭 정리
    Cleanup,
}

impl StepPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SeedOpen => "seed-open",
            Self::SeedPrompt => "seed-prompt",
            Self::SeedMarker => "seed-marker",
            Self::InjectLink => "inject-link",
            Self::VariantOpen => "variant-open",
            Self::VariantPrompt => "variant-prompt",
            Self::VariantMarker => "variant-marker",
            Self::Cleanup => "cleanup",
        }
    }
}

impl fmt::Display for StepPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// seed 단계 이후 진행 여부
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedFlow {
    /// 자식 링크가 주입됨, 활성화 방식 실행
    Ready,
    /// seed 탭을 준비하지 못함, 정리로 건너뜀
    Skip,
}

/// 단계 실행기
///
/// 호스트 capability와 세 구성 요소(제스처, 프롬프트, poller)를 묶어
/// 시나리오 단계를 실행합니다.
pub struct ScenarioStep<H: BrowserHost> {
    host: Arc<H>,
    simulator: ActionSimulator<H>,
    observer: NotificationObserver<H>,
    poller: ConditionPoller,
    load_timeout: Duration,
}

impl<H: BrowserHost> ScenarioStep<H> {
    pub fn new(
        host: Arc<H>,
        poller: ConditionPoller,
        load_timeout: Duration,
        gesture_timeout: Duration,
    ) -> Self {
        Self {
            simulator: ActionSimulator::new(Arc::clone(&host), gesture_timeout),
            observer: NotificationObserver::new(Arc::clone(&host)),
            host,
            poller,
            load_timeout,
        }
    }

    /// seed 탭을 열고 보호를 해제한 뒤 자식 링크를 주입합니다.
    pub async fn prepare_seed(
        &self,
        ctx: &mut RunContext,
        scenario: &Scenario,
        report: &mut RunReport,
    ) -> Result<SeedFlow, EngineError> {
        // seed-open
        ctx.enter(StepPhase::SeedOpen);
        self.simulator
            .find_link(ctx.main_tab(), &scenario.seed_link_id)
            .await?;

        let loads = self.host.load_events();
        let seed = self.host.add_tab(&scenario.seed_url).await?;
        ctx.set_seed_tab(seed);
        self.host.select_tab(seed).await?;

        if let Err(err) = LoadWaiter::for_tab(loads, seed, 1)
            .wait(self.load_timeout)
            .await
        {
            report.fail(ctx, "seed page loaded", err.to_string());
            return Ok(SeedFlow::Skip);
        }

        // seed-prompt
        ctx.enter(StepPhase::SeedPrompt);
        let prompt = self
            .observer
            .get_prompt(PromptKind::MixedContentBlocked, seed)
            .await?;
        report.assert(
            ctx,
            format!("mixed content prompt appeared in {}", scenario.id),
            prompt.is_some(),
            false,
        );

        // seed-marker
        match prompt {
            Some(handle) => {
                // 리로드 리스너는 액션 실행 전에 등록
                let reload = LoadWaiter::for_tab(self.host.load_events(), seed, 1);
                self.observer
                    .commit(handle, PromptActionKind::DisableProtection)
                    .await?;
                ctx.enter(StepPhase::SeedMarker);
                if let Err(err) = reload.wait(self.load_timeout).await {
                    let description = "seed page reloaded after disabling protection";
                    report.fail(ctx, description, err.to_string());
                    return Ok(SeedFlow::Skip);
                }
            }
            None => {
                ctx.enter(StepPhase::SeedMarker);
                warn!(scenario = %scenario.id, "prompt missing on seed tab, skipping commit");
            }
        }

        let outcome = self
            .poll_marker(
                seed,
                MarkerState::Disabled,
                format!("waited too long for mixed script to run in {}", scenario.id),
            )
            .await;
        if let PollOutcome::TimedOut { reason, .. } = &outcome {
            report.fail(ctx, "mixed script ran after disabling protection", reason.clone());
        }
        let marker = self.marker(seed).await?;
        report.assert(
            ctx,
            format!("mixed content blocker is disabled in {}", scenario.id),
            marker == Some(MarkerState::Disabled),
            false,
        );

        // inject-link
        ctx.enter(StepPhase::InjectLink);
        let link = LinkTarget {
            element_id: scenario.child_link_id().to_owned(),
            href: scenario.child_url.clone(),
        };
        ctx.set_pending_link(link.clone());
        self.host.append_link(seed, &link).await?;
        info!(
            scenario = %scenario.id,
            link = %link.element_id,
            href = %link.href,
            "child link injected into seed page"
        );
        Ok(SeedFlow::Ready)
    }

    /// 활성화 방식 하나로 자식 탭을 열고 기대를 확인한 뒤 자식 탭을 닫습니다.
    pub async fn run_variant(
        &self,
        ctx: &mut RunContext,
        scenario: &Scenario,
        variant: ActivationVariant,
        report: &mut RunReport,
    ) -> Result<(), EngineError> {
        ctx.begin_variant(variant);
        let seed = ctx
            .seed_tab()
            .ok_or_else(|| EngineError::Setup("variant started without a seed tab".to_owned()))?;
        let element_id = ctx
            .pending_link()
            .map(|l| l.element_id.clone())
            .ok_or_else(|| EngineError::Setup("variant started without a child link".to_owned()))?;

        // variant-open
        self.host.select_tab(seed).await?;
        let target = self.simulator.find_link(seed, &element_id).await?;
        let known: HashSet<TabId> = self.host.tabs().await?.into_iter().collect();
        let hops = scenario.navigation.load_hops();
        let loads = LoadWaiter::for_new_tab(self.host.load_events(), known.iter().copied(), hops);

        self.simulator.activate(variant, &target).await?;
        let child = match loads.wait(self.load_timeout).await {
            Ok(done) => done.tab,
            Err(err) => {
                report.fail(ctx, format!("child tab loaded in {}", scenario.id), err.to_string());
                ctx.enter(StepPhase::Cleanup);
                self.close_tabs_except(&known).await?;
                self.host.select_tab(seed).await?;
                return Ok(());
            }
        };
        ctx.set_active_child(child);
        self.host.select_tab(child).await?;

        let expectation = scenario.expectation;
        let known_defect = expectation.is_known_defect();

        // variant-prompt
        ctx.enter(StepPhase::VariantPrompt);
        let shown = self
            .observer
            .get_prompt(PromptKind::MixedContentBlocked, child)
            .await?
            .is_some();
        let description = if expectation.prompt_should_appear() {
            format!("mixed content prompt appeared again in {} ({variant})", scenario.id)
        } else {
            format!("mixed content prompt did not appear again in {} ({variant})", scenario.id)
        };
        report.assert(
            ctx,
            description,
            shown == expectation.prompt_should_appear(),
            known_defect,
        );

        // variant-marker
        ctx.enter(StepPhase::VariantMarker);
        let expected = expectation.expected_marker();
        let actual = self.marker(child).await?;
        let description = match expected {
            MarkerState::Enabled => format!("blocked mixed script in {} ({variant})", scenario.id),
            MarkerState::Disabled => {
                format!("executed mixed script in {} ({variant})", scenario.id)
            }
        };
        report.assert(ctx, description, actual == Some(expected), known_defect);

        // 자식 탭이 선택된 상태에서 닫으면 선택이 seed 탭으로 돌아감
        ctx.enter(StepPhase::Cleanup);
        self.host.remove_current_tab().await?;
        ctx.clear_active_child();
        Ok(())
    }

    /// 시나리오 경계: 메인 탭만 남기고 메인 탭을 선택합니다.
    ///
    /// 정리에 실패해도 컨텍스트의 시나리오 상태는 비웁니다.
    pub async fn cleanup_scenario(&self, ctx: &mut RunContext) -> Result<(), EngineError> {
        ctx.enter(StepPhase::Cleanup);
        let result = self.keep_only(ctx.main_tab()).await;
        ctx.end_scenario();
        result
    }

    async fn keep_only(&self, main: TabId) -> Result<(), EngineError> {
        self.host.remove_all_tabs_but(main).await?;
        self.host.select_tab_at(0).await?;
        Ok(())
    }

    /// 제스처가 연 탭 중 로드가 끝나지 않은 것까지 모두 닫습니다.
    async fn close_tabs_except(&self, known: &HashSet<TabId>) -> Result<(), EngineError> {
        for tab in self.host.tabs().await? {
            if known.contains(&tab) {
                continue;
            }
            self.host.select_tab(tab).await?;
            self.host.remove_current_tab().await?;
            warn!(tab = %tab, "closed child tab left behind by a load timeout");
        }
        Ok(())
    }

    async fn poll_marker(&self, tab: TabId, expected: MarkerState, reason: String) -> PollOutcome {
        let host = &self.host;
        self.poller
            .poll_until(
                || async move {
                    matches!(
                        host.element_text(tab, MARKER_ELEMENT_ID).await,
                        Ok(Some(text)) if MarkerState::from_text(&text) == Some(expected)
                    )
                },
                reason,
            )
            .await
    }

    async fn marker(&self, tab: TabId) -> Result<Option<MarkerState>, EngineError> {
        let text = self.host.element_text(tab, MARKER_ELEMENT_ID).await?;
        Ok(text.as_deref().and_then(MarkerState::from_text))
    }
}
