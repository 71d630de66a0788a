//! 도메인 타입 -- 엔진과 호스트가 공유하는 공통 타입
//!
//! 탭, 문서 요소, 프롬프트, 합성 입력 이벤트, 로드 신호 등
//! 호스트 capability 경계를 넘나드는 데이터 구조를 정의합니다.

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

/// 혼합 콘텐츠 테스트 페이지의 상태 표시 요소 id
pub const MARKER_ELEMENT_ID: &str = "mctestdiv";

/// 첫 번째 테스트 origin의 픽스처 루트
pub const TEST_ROOT_1: &str = "https://test1.example.com/browser/mixed-content/";

/// 두 번째 테스트 origin의 픽스처 루트
pub const TEST_ROOT_2: &str = "https://test2.example.com/browser/mixed-content/";

/// 탭 식별자
///
/// 호스트가 탭을 열 때 발급하며, 같은 창 안에서 재사용되지 않습니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(u64);

impl TabId {
    /// 주어진 번호로 탭 id를 생성합니다.
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// 내부 번호를 반환합니다.
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tab-{}", self.0)
    }
}

/// 문서 origin (scheme + host + port)
///
/// 오버라이드 결정의 범위 키입니다. opaque origin(`about:blank`, `data:` 등)은
/// 표현하지 않으며 [`Origin::of`]가 `None`을 반환합니다. 따라서 opaque 문서는
/// 어떤 origin과도 같지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Origin(String);

impl Origin {
    /// URL의 tuple origin을 반환합니다. opaque origin이면 `None`.
    pub fn of(url: &Url) -> Option<Self> {
        let origin = url.origin();
        if origin.is_tuple() {
            Some(Self(origin.ascii_serialization()))
        } else {
            None
        }
    }

    /// 두 URL이 같은 tuple origin에 속하는지 확인합니다.
    pub fn same_origin(a: &Url, b: &Url) -> bool {
        match (Self::of(a), Self::of(b)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 탭 문서 안의 요소 참조
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementRef {
    /// 요소가 속한 탭
    pub tab: TabId,
    /// 요소 id 속성
    pub element_id: String,
}

impl ElementRef {
    pub fn new(tab: TabId, element_id: impl Into<String>) -> Self {
        Self {
            tab,
            element_id: element_id.into(),
        }
    }
}

impl fmt::Display for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} in {}", self.element_id, self.tab)
    }
}

/// 페이지에 주입하거나 클릭할 링크
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkTarget {
    /// `<a id=...>` 요소 id
    pub element_id: String,
    /// 링크 대상 URL
    pub href: Url,
}

/// 호스트 프롬프트 종류
///
/// 문자열 키 대신 타입으로 조회합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PromptKind {
    /// 혼합 콘텐츠 차단 알림
    MixedContentBlocked,
}

impl PromptKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MixedContentBlocked => "mixed-content-blocked",
        }
    }
}

impl fmt::Display for PromptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 프롬프트가 제공하는 액션 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptActionKind {
    /// 이 페이지에서 보호 해제 (오버라이드 결정)
    DisableProtection,
}

/// 프롬프트 액션 (라벨 + 종류)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptAction {
    pub kind: PromptActionKind,
    pub label: String,
}

/// 조회 시점의 프롬프트 핸들
///
/// 한 번의 조회에서만 유효합니다. 호스트가 프롬프트를 다시 만들면 generation이
/// 바뀌고, 이전 핸들로 액션을 호출하면 [`HostError::StalePrompt`]가 반환됩니다.
/// 의도적으로 `Clone`을 구현하지 않으며, 액션 호출 시 소비됩니다.
///
/// [`HostError::StalePrompt`]: crate::error::HostError::StalePrompt
#[derive(Debug)]
pub struct PromptHandle {
    kind: PromptKind,
    tab: TabId,
    generation: u64,
    actions: Vec<PromptAction>,
}

impl PromptHandle {
    /// 호스트 구현체가 프롬프트 레지스트리 조회 결과로 생성합니다.
    pub fn new(kind: PromptKind, tab: TabId, generation: u64, actions: Vec<PromptAction>) -> Self {
        Self {
            kind,
            tab,
            generation,
            actions,
        }
    }

    pub fn kind(&self) -> PromptKind {
        self.kind
    }

    pub fn tab(&self) -> TabId {
        self.tab
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn actions(&self) -> &[PromptAction] {
        &self.actions
    }

    /// 주어진 종류의 액션 인덱스를 찾습니다.
    pub fn position(&self, kind: PromptActionKind) -> Option<usize> {
        self.actions.iter().position(|a| a.kind == kind)
    }
}

/// 마우스 버튼
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseButton {
    Primary,
    Middle,
    Secondary,
}

impl MouseButton {
    /// DOM `MouseEvent.button` 값
    pub fn code(self) -> u8 {
        match self {
            Self::Primary => 0,
            Self::Middle => 1,
            Self::Secondary => 2,
        }
    }
}

/// 합성 마우스 이벤트 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseEventKind {
    Click,
    ContextMenu,
}

/// 합성 마우스 이벤트 초기값
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MouseEventInit {
    pub kind: MouseEventKind,
    pub button: MouseButton,
    /// 플랫폼 accel 키 (Ctrl / Cmd) 눌림 여부
    pub accel: bool,
}

impl MouseEventInit {
    /// 새 탭으로 여는 중간 버튼 + accel 클릭
    pub fn open_in_tab_click() -> Self {
        Self {
            kind: MouseEventKind::Click,
            button: MouseButton::Middle,
            accel: true,
        }
    }

    /// 컨텍스트 메뉴를 여는 보조 버튼 이벤트
    pub fn context_menu() -> Self {
        Self {
            kind: MouseEventKind::ContextMenu,
            button: MouseButton::Secondary,
            accel: false,
        }
    }

    /// 새 탭 열기 수정자(중간 버튼 또는 accel)가 있는지 확인합니다.
    pub fn opens_new_tab(&self) -> bool {
        self.button == MouseButton::Middle || self.accel
    }
}

/// 클릭 라우팅 지점에서 가로챈 클릭
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickEvent {
    /// 클릭된 링크 요소
    pub source: ElementRef,
    /// 링크 대상
    pub href: Url,
    pub button: MouseButton,
    pub accel: bool,
}

impl ClickEvent {
    pub fn opens_new_tab(&self) -> bool {
        self.button == MouseButton::Middle || self.accel
    }
}

/// 탭 로드 완료 신호
///
/// 리다이렉트 hop마다 별도로 발생합니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadEvent {
    pub tab: TabId,
    pub url: Url,
}

/// 컨텍스트 메뉴 팝업 상태 변경
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopupEvent {
    /// 팝업 표시됨 (메뉴를 연 대상 요소 포함)
    Shown { target: ElementRef },
    /// 팝업 닫힘
    Hidden,
}

/// 컨텍스트 메뉴 명령
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MenuCommand {
    /// 링크를 새 탭에서 열기
    OpenLinkInTab,
}

impl MenuCommand {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenLinkInTab => "context-openlinkintab",
        }
    }
}

/// 테스트 페이지 상태 표시 요소가 나타내는 정책 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerState {
    /// 혼합 스크립트 차단됨
    Enabled,
    /// 혼합 스크립트 실행됨 (보호 해제)
    Disabled,
}

impl MarkerState {
    /// 상태 표시 요소의 텍스트
    pub fn text(self) -> &'static str {
        match self {
            Self::Enabled => "Mixed Content Blocker enabled",
            Self::Disabled => "Mixed Content Blocker disabled",
        }
    }

    pub fn from_text(text: &str) -> Option<Self> {
        match text {
            "Mixed Content Blocker enabled" => Some(Self::Enabled),
            "Mixed Content Blocker disabled" => Some(Self::Disabled),
            _ => None,
        }
    }
}

impl fmt::Display for MarkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}
