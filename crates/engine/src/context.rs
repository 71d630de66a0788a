//! 실행 컨텍스트 -- 단계 사이에서 명시적으로 전달되는 가변 상태
//!
//! [`RunContext`]는 러너만 소유하며 동시에 쓰는 주체가 없습니다.
//! 프롬프트 핸들은 여기에 저장하지 않습니다. 핸들은 조회한 단계 안에서만
//! 유효합니다.

use tracing::debug;
use uuid::Uuid;

use mixguard_core::types::{LinkTarget, TabId};

use crate::scenario::{ActivationVariant, Scenario};
use crate::step::StepPhase;

/// 시나리오 실행 상태
#[derive(Debug, Clone)]
pub struct RunContext {
    run_id: Uuid,
    main_tab: TabId,
    /// 현재 시나리오의 seed 탭 (메인 페이지 링크로 연 탭)
    seed_tab: Option<TabId>,
    /// 현재 활성화 방식으로 연 자식 탭
    active_child: Option<TabId>,
    /// seed 페이지에 주입할(또는 주입된) 자식 링크
    pending_link: Option<LinkTarget>,
    scenario: Option<String>,
    variant: Option<ActivationVariant>,
    phase: StepPhase,
}

impl RunContext {
    pub fn new(run_id: Uuid, main_tab: TabId) -> Self {
        Self {
            run_id,
            main_tab,
            seed_tab: None,
            active_child: None,
            pending_link: None,
            scenario: None,
            variant: None,
            phase: StepPhase::SeedOpen,
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn main_tab(&self) -> TabId {
        self.main_tab
    }

    pub fn seed_tab(&self) -> Option<TabId> {
        self.seed_tab
    }

    pub fn active_child(&self) -> Option<TabId> {
        self.active_child
    }

    pub fn pending_link(&self) -> Option<&LinkTarget> {
        self.pending_link.as_ref()
    }

    pub fn scenario(&self) -> Option<&str> {
        self.scenario.as_deref()
    }

    pub fn variant(&self) -> Option<ActivationVariant> {
        self.variant
    }

    pub fn phase(&self) -> StepPhase {
        self.phase
    }

    /// 새 시나리오를 시작합니다. 이전 시나리오의 탭 상태는 모두 지웁니다.
    pub fn begin_scenario(&mut self, scenario: &Scenario) {
        self.scenario = Some(scenario.id.clone());
        self.variant = None;
        self.seed_tab = None;
        self.active_child = None;
        self.pending_link = None;
        self.enter(StepPhase::SeedOpen);
    }

    pub fn begin_variant(&mut self, variant: ActivationVariant) {
        self.variant = Some(variant);
        self.active_child = None;
        self.enter(StepPhase::VariantOpen);
    }

    /// 단계 전이를 기록합니다.
    pub fn enter(&mut self, phase: StepPhase) {
        self.phase = phase;
        debug!(
            run_id = %self.run_id,
            scenario = self.scenario.as_deref().unwrap_or("-"),
            variant = self.variant.map_or("-", |v| v.as_str()),
            phase = phase.as_str(),
            "step transition"
        );
    }

    pub fn set_seed_tab(&mut self, tab: TabId) {
        self.seed_tab = Some(tab);
    }

    pub fn set_pending_link(&mut self, link: LinkTarget) {
        self.pending_link = Some(link);
    }

    pub fn set_active_child(&mut self, tab: TabId) {
        self.active_child = Some(tab);
    }

    /// 자식 탭이 닫혔음을 기록합니다.
    pub fn clear_active_child(&mut self) -> Option<TabId> {
        self.active_child.take()
    }

    /// 시나리오 경계: 탭 상태를 메인 탭만 남은 상태로 되돌립니다.
    pub fn end_scenario(&mut self) {
        self.seed_tab = None;
        self.active_child = None;
        self.pending_link = None;
        self.variant = None;
    }
}
