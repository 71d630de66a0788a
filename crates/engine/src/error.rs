//! 엔진 에러 타입
//!
//! [`EngineError`]는 시나리오 실행 중 발생하는 에러를 표현합니다.
//! `From<EngineError> for MixguardError` 변환이 구현되어 있어
//! 상위 레이어에서 `?` 연산자로 전파할 수 있습니다.
//!
//! 단언 불일치와 시간 초과는 에러가 아니라 [`RunReport`](crate::report::RunReport)의
//! 기록입니다. 이 타입은 단계를 더 진행할 수 없는 경우에만 사용됩니다.

use mixguard_core::error::{HostError, MixguardError, SuiteError};
use mixguard_core::types::{PromptKind, TabId};

/// 시나리오 엔진 에러
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// 창 준비, 링크 주입, preference 설정 실패
    #[error("setup failed: {0}")]
    Setup(String),

    /// 시나리오가 참조하는 요소가 문서에 없음 (하네스 설정 버그)
    #[error("element '{element_id}' not found in {tab}")]
    ElementNotFound {
        /// 요소를 찾은 탭
        tab: TabId,
        /// 찾으려던 요소 id
        element_id: String,
    },

    /// 호스트가 합성 입력에 반응하지 않음
    #[error("gesture timed out: {0}")]
    GestureTimeout(String),

    /// 프롬프트에 요청한 액션이 없음
    #[error("{kind} prompt has no action {action}")]
    InvalidPromptAction {
        /// 프롬프트 종류
        kind: PromptKind,
        /// 요청한 액션 (종류 또는 인덱스)
        action: String,
    },

    /// 그 밖의 호스트 호출 실패
    #[error("host error: {0}")]
    Host(#[from] HostError),

    /// 스위트 로딩/검증 실패
    #[error("suite error: {0}")]
    Suite(#[from] SuiteError),
}

impl EngineError {
    /// 요소 조회 에러를 변환합니다.
    ///
    /// 호스트의 `ElementNotFound`는 [`EngineError::ElementNotFound`]로 승격되고,
    /// 나머지는 [`EngineError::Host`]로 감쌉니다.
    pub fn from_lookup(err: HostError) -> Self {
        match err {
            HostError::ElementNotFound { tab, element_id } => {
                Self::ElementNotFound { tab, element_id }
            }
            other => Self::Host(other),
        }
    }

    /// 실행 전체를 중단해야 하는 에러인지 확인합니다.
    ///
    /// 치명적이지 않은 에러는 현재 시나리오의 실패로 기록되고 실행은
    /// 다음 시나리오로 넘어갑니다.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Setup(_)
            | Self::ElementNotFound { .. }
            | Self::GestureTimeout(_)
            | Self::InvalidPromptAction { .. }
            | Self::Suite(_) => true,
            Self::Host(err) => matches!(
                err,
                HostError::WindowUnavailable(_) | HostError::Closed(_) | HostError::UnknownPref(_)
            ),
        }
    }
}

impl From<EngineError> for MixguardError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Host(e) => MixguardError::Host(e),
            EngineError::Suite(e) => MixguardError::Suite(e),
            other => MixguardError::Engine(other.to_string()),
        }
    }
}
