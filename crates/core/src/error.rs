//! 에러 타입 -- 도메인별 에러 정의

use crate::types::{PromptKind, TabId};

/// mixguard 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum MixguardError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 호스트(브라우저) capability 호출 에러
    #[error("host error: {0}")]
    Host(#[from] HostError),

    /// 시나리오 스위트 로딩/검증 에러
    #[error("suite error: {0}")]
    Suite(#[from] SuiteError),

    /// 실행 엔진 에러 (치명적 설정 오류 등)
    #[error("engine error: {0}")]
    Engine(String),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 호스트 capability 에러
///
/// 호스트 구현체가 반환하는 에러입니다. 엔진은 이 중 일부(요소 없음, 창 없음)를
/// 치명적 설정 오류로 취급하고, 나머지는 해당 단계의 실패로 기록합니다.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// 호스트 창을 열 수 없거나 이미 닫힘
    #[error("host window unavailable: {0}")]
    WindowUnavailable(String),

    /// 존재하지 않는 탭
    #[error("tab not found: {0}")]
    TabNotFound(TabId),

    /// 탭 인덱스 범위 초과
    #[error("tab index {index} out of range (tabs: {len})")]
    TabIndexOutOfRange { index: usize, len: usize },

    /// 탭에 로드된 문서가 없음
    #[error("no document loaded in {0}")]
    NoDocument(TabId),

    /// 문서에 해당 id의 요소가 없음
    #[error("element '{element_id}' not found in {tab}")]
    ElementNotFound { tab: TabId, element_id: String },

    /// 링크가 아닌 요소에 링크 동작을 요청함
    #[error("element '{element_id}' is not a link")]
    NotALink { element_id: String },

    /// 프롬프트가 재생성되었거나 사라짐
    #[error("{kind} prompt on {tab} is stale")]
    StalePrompt { kind: PromptKind, tab: TabId },

    /// 프롬프트 액션 인덱스 범위 초과
    #[error("prompt action {index} out of range (actions: {available})")]
    ActionOutOfRange { index: usize, available: usize },

    /// 열린 컨텍스트 메뉴가 없음
    #[error("no context menu popup is open")]
    PopupNotOpen,

    /// 알 수 없는 설정(preference) 이름
    #[error("unknown preference: {0}")]
    UnknownPref(String),

    /// 호스트가 종료되어 채널이 닫힘
    #[error("host closed: {0}")]
    Closed(String),
}

/// 시나리오 스위트 에러
#[derive(Debug, thiserror::Error)]
pub enum SuiteError {
    /// 스위트 파일을 찾을 수 없음
    #[error("suite file not found: {path}")]
    FileNotFound { path: String },

    /// TOML 파싱 실패
    #[error("failed to parse suite: {reason}")]
    Parse { reason: String },

    /// 시나리오 정의가 유효하지 않음
    #[error("invalid scenario '{scenario}': {reason}")]
    Invalid { scenario: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display_names_field() {
        let err = ConfigError::InvalidValue {
            field: "poller.interval_ms".to_owned(),
            reason: "must be greater than 0".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "invalid config value for 'poller.interval_ms': must be greater than 0"
        );
    }

    #[test]
    fn host_error_converts_into_top_level() {
        let err: MixguardError = HostError::TabNotFound(TabId::new(7)).into();
        assert!(matches!(err, MixguardError::Host(HostError::TabNotFound(_))));
        assert_eq!(err.to_string(), "host error: tab not found: tab-7");
    }

    #[test]
    fn stale_prompt_display_includes_kind_and_tab() {
        let err = HostError::StalePrompt {
            kind: PromptKind::MixedContentBlocked,
            tab: TabId::new(2),
        };
        assert_eq!(err.to_string(), "mixed-content-blocked prompt on tab-2 is stale");
    }

    #[test]
    fn suite_error_display() {
        let err = SuiteError::Invalid {
            scenario: "Test5".to_owned(),
            reason: "known defect note is required".to_owned(),
        };
        assert!(err.to_string().contains("Test5"));
        let err: MixguardError = err.into();
        assert!(err.to_string().starts_with("suite error:"));
    }
}
