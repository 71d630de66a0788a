//! mixguard 시뮬레이션 호스트
//!
//! 실제 브라우저 없이 시나리오 엔진을 구동하기 위한 결정적 브라우저입니다.
//! `mixguard-core`의 capability trait(`TabStrip`, `ContentAccess`,
//! `PromptRegistry`, `GestureRouting`, `Preferences`)을 모두 구현합니다.
//!
//! # 모듈 구성
//! - [`browser`]: 탭 스트립, 비동기 로드, 프롬프트, 제스처 라우팅
//! - [`fixtures`]: 두 테스트 origin에서 제공하는 픽스처 페이지
//! - [`policy`]: 보호 해제 오버라이드의 상속과 origin 범위 판정

pub mod browser;
mod document;
pub mod fixtures;
pub mod policy;

pub use browser::{SimBrowser, SimBrowserBuilder};
pub use fixtures::{Fixture, FixtureSite, Response, TEST_ROOT_1, TEST_ROOT_2};
