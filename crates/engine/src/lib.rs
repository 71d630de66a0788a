//! mixguard 시나리오 엔진
//!
//! 혼합 콘텐츠 "보호 해제" 결정이 탭이나 세션이 아니라 콘텐츠의 origin 단위로
//! 유지되는지 검증하는 비동기 시나리오 오케스트레이션 엔진입니다.
//! 호스트(브라우저)는 `mixguard-core`의 capability trait으로 주입됩니다.
//!
//! # 구성 요소
//! - [`poller`]: 제한된 재시도 조건 polling
//! - [`gesture`]: 수정자 클릭 / 컨텍스트 메뉴 제스처 시뮬레이션
//! - [`notification`]: 프롬프트 조회와 액션 실행
//! - [`load`]: 일회성 로드 완료 대기
//! - [`step`]: 시나리오 단계 상태 기계
//! - [`runner`]: 스위트 실행 진입점
//! - [`scenario`]: 시나리오 정의, 기본 스위트, TOML 스위트 로딩
//! - [`report`]: 단언 기록과 집계
//!
//! # 사용 예시
//! ```ignore
//! let runner = ScenarioRunner::new(Arc::new(host), &config.poller, &config.run);
//! let report = runner.run(&ScenarioSuite::builtin()?).await?;
//! assert!(report.is_success());
//! ```

pub mod context;
pub mod error;
pub mod gesture;
pub mod load;
pub mod notification;
pub mod poller;
pub mod report;
pub mod runner;
pub mod scenario;
pub mod setup;
pub mod step;

pub use context::RunContext;
pub use error::EngineError;
pub use gesture::ActionSimulator;
pub use load::{LoadCompletion, LoadWaitError, LoadWaiter};
pub use notification::NotificationObserver;
pub use poller::{ConditionPoller, PollOptions, PollOutcome};
pub use report::{AssertionRecord, Outcome, RunReport, Tally, VariantOutcome};
pub use runner::ScenarioRunner;
pub use scenario::{
    ActivationVariant, NavigationShape, OriginRelation, PromptExpectation, Scenario, ScenarioSuite,
};
pub use step::{ScenarioStep, StepPhase};
