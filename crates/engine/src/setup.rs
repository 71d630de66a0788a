//! 실행 준비와 정리
//!
//! - 정책 preference의 원래 값을 저장하고 켭니다.
//! - 테스트 창을 열고 메인 페이지에 시나리오별 seed 링크를 주입합니다.
//! - 실행이 어떻게 끝나든 preference를 원래 값으로 되돌립니다.

use tracing::{debug, info, warn};

use mixguard_core::host::{BrowserHost, ContentAccess, Preferences, TabStrip};
use mixguard_core::types::{LinkTarget, TabId};

use crate::error::EngineError;
use crate::scenario::ScenarioSuite;

/// 실행 전 preference 값
///
/// 정리 단계에서 [`restore_policy`]에 넘겨 원래 상태로 되돌립니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedPref {
    pub name: String,
    /// 사용자 값이 없었으면 `None`
    pub original: Option<bool>,
}

/// 정책 preference를 저장하고 켭니다.
pub async fn enable_policy<H: BrowserHost>(host: &H, name: &str) -> Result<SavedPref, EngineError> {
    let original = host
        .bool_pref(name)
        .await
        .map_err(|e| EngineError::Setup(format!("failed to read preference '{name}': {e}")))?;
    host.set_bool_pref(name, true)
        .await
        .map_err(|e| EngineError::Setup(format!("failed to set preference '{name}': {e}")))?;

    info!(pref = name, original = ?original, "mixed content blocking enabled for the run");
    Ok(SavedPref {
        name: name.to_owned(),
        original,
    })
}

/// preference를 실행 전 값으로 되돌립니다.
///
/// 정리 경로에서 호출되므로 실패는 경고로만 남깁니다.
pub async fn restore_policy<H: BrowserHost>(host: &H, saved: &SavedPref) {
    let result = match saved.original {
        Some(value) => host.set_bool_pref(&saved.name, value).await,
        None => host.clear_pref(&saved.name).await,
    };
    match result {
        Ok(()) => debug!(pref = %saved.name, original = ?saved.original, "preference restored"),
        Err(e) => warn!(pref = %saved.name, error = %e, "failed to restore preference"),
    }
}

/// 테스트 창을 열고 메인 페이지에 seed 링크를 주입합니다.
///
/// 반환값은 메인 탭입니다.
pub async fn open_test_window<H: BrowserHost>(
    host: &H,
    suite: &ScenarioSuite,
) -> Result<TabId, EngineError> {
    let main = host
        .open_window()
        .await
        .map_err(|e| EngineError::Setup(format!("failed to open test window: {e}")))?;
    info!(main_tab = %main, "browser window opened");

    for scenario in suite {
        let link = LinkTarget {
            element_id: scenario.seed_link_id.clone(),
            href: scenario.seed_url.clone(),
        };
        host.append_link(main, &link).await.map_err(|e| {
            EngineError::Setup(format!("failed to inject link '{}': {e}", link.element_id))
        })?;
    }
    host.select_tab(main).await?;

    debug!(links = suite.len(), "seed links injected into main page");
    Ok(main)
}

/// 테스트 창을 닫습니다. 이미 닫혀 있으면 무시합니다.
pub async fn close_test_window<H: BrowserHost>(host: &H) {
    if let Err(e) = host.close_window().await {
        debug!(error = %e, "test window already closed");
    }
}
