//! mixguard 공통 크레이트
//!
//! 혼합 콘텐츠 보호 해제 결정이 origin 단위로 유지되는지 검증하는 시나리오
//! 하네스의 공통 기반입니다. 엔진(`mixguard-engine`)과 호스트 구현
//! (`mixguard-sim-browser`)이 함께 사용하는 타입, capability trait, 에러, 설정을
//! 정의합니다.

pub mod config;
pub mod error;
pub mod host;
pub mod metrics;
pub mod types;

// --- 주요 타입 re-export ---
// 각 모듈의 핵심 타입을 크레이트 루트에서 바로 사용할 수 있도록 합니다.

// 에러
pub use error::{ConfigError, HostError, MixguardError, SuiteError};

// 설정
pub use config::MixguardConfig;

// 호스트 capability trait
pub use host::{BrowserHost, ContentAccess, GestureRouting, Preferences, PromptRegistry, TabStrip};

// 도메인 타입
pub use types::{
    ClickEvent, ElementRef, LinkTarget, LoadEvent, MarkerState, MenuCommand, MouseButton,
    MouseEventInit, MouseEventKind, Origin, PopupEvent, PromptAction, PromptActionKind,
    PromptHandle, PromptKind, TabId,
};
