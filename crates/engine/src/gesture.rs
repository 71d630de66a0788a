//! 사용자 제스처 시뮬레이션
//!
//! 두 입력 방식이 같은 결과(새 백그라운드 탭 하나와 그 로드 신호)로
//! 수렴해야 합니다.
//!
//! - primary: 클릭 라우팅 지점에서 다음 클릭을 한 번 가로채고, 중간 버튼 +
//!   accel 클릭을 요소 중앙에 합성한 뒤, 가로챈 이벤트를 콘텐츠 영역 클릭
//!   처리로 넘깁니다. 가로채기는 전달 전에 해제되므로 일반 라우팅이 다시
//!   살아 있습니다.
//! - secondary: popup-shown을 먼저 구독하고 `contextmenu` 이벤트를 합성한 뒤,
//!   팝업이 뜨면 "새 탭에서 링크 열기" 명령을 실행하고 팝업을 닫습니다.
//!
//! 호출자는 제스처 **전에** 로드 리스너를 등록해야 합니다.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tracing::{debug, warn};

use mixguard_core::error::HostError;
use mixguard_core::host::{BrowserHost, ContentAccess, GestureRouting};
use mixguard_core::metrics as m;
use mixguard_core::types::{ElementRef, MenuCommand, MouseEventInit, PopupEvent, TabId};

use crate::error::EngineError;
use crate::scenario::ActivationVariant;

/// 제스처 시뮬레이터
pub struct ActionSimulator<H: BrowserHost> {
    host: Arc<H>,
    /// 가로챈 클릭 / popup-shown 대기 한도
    gesture_timeout: Duration,
}

impl<H: BrowserHost> ActionSimulator<H> {
    pub fn new(host: Arc<H>, gesture_timeout: Duration) -> Self {
        Self {
            host,
            gesture_timeout,
        }
    }

    /// 탭 문서에서 링크 요소를 찾습니다.
    ///
    /// 요소가 없으면 [`EngineError::ElementNotFound`]를 반환합니다.
    pub async fn find_link(&self, tab: TabId, element_id: &str) -> Result<ElementRef, EngineError> {
        self.host
            .find_element(tab, element_id)
            .await
            .map_err(EngineError::from_lookup)
    }

    /// 활성화 방식에 따라 링크를 새 탭으로 엽니다.
    pub async fn activate(
        &self,
        variant: ActivationVariant,
        target: &ElementRef,
    ) -> Result<(), EngineError> {
        match variant {
            ActivationVariant::Primary => self.simulate_primary_activation(target).await?,
            ActivationVariant::Secondary => self.simulate_secondary_activation(target).await?,
        }
        metrics::counter!(m::GESTURES_TOTAL, m::LABEL_VARIANT => variant.as_str()).increment(1);
        Ok(())
    }

    /// 수정자 클릭으로 링크를 새 탭에서 엽니다.
    pub async fn simulate_primary_activation(
        &self,
        target: &ElementRef,
    ) -> Result<(), EngineError> {
        // 요소가 없으면 가로채기를 걸지 않음
        self.find_link(target.tab, &target.element_id).await?;
        let intercepted = self.host.intercept_next_click().await?;

        if let Err(e) = self
            .host
            .synthesize_mouse_at_center(target, MouseEventInit::open_in_tab_click())
            .await
        {
            // 수신자를 버려 가로채기를 해제
            drop(intercepted);
            return Err(EngineError::from_lookup(e));
        }

        let click = match tokio::time::timeout(self.gesture_timeout, intercepted).await {
            Ok(Ok(click)) => click,
            Ok(Err(_)) => {
                return Err(EngineError::Host(HostError::Closed(
                    "click interception dropped before delivery".to_owned(),
                )));
            }
            Err(_elapsed) => {
                return Err(EngineError::GestureTimeout(format!(
                    "no click intercepted for {target} within {}ms",
                    self.gesture_timeout.as_millis()
                )));
            }
        };

        debug!(target = %target, href = %click.href, "click intercepted, routing to content area");
        self.host.route_content_click(click).await?;
        Ok(())
    }

    /// 컨텍스트 메뉴로 링크를 새 탭에서 엽니다.
    pub async fn simulate_secondary_activation(
        &self,
        target: &ElementRef,
    ) -> Result<(), EngineError> {
        // 이벤트 합성 전에 구독해야 popup-shown을 놓치지 않음
        let mut popups = self.host.popup_events();

        self.host
            .synthesize_mouse_at_center(target, MouseEventInit::context_menu())
            .await
            .map_err(EngineError::from_lookup)?;

        let shown = wait_for_popup(&mut popups, target);
        match tokio::time::timeout(self.gesture_timeout, shown).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => return Err(err),
            Err(_elapsed) => {
                return Err(EngineError::GestureTimeout(format!(
                    "context menu for {target} not shown within {}ms",
                    self.gesture_timeout.as_millis()
                )));
            }
        }
        drop(popups);

        debug!(
            target = %target,
            command = MenuCommand::OpenLinkInTab.as_str(),
            "context menu shown"
        );
        self.host.do_menu_command(MenuCommand::OpenLinkInTab).await?;
        self.host.hide_popup().await?;
        Ok(())
    }
}

async fn wait_for_popup(
    popups: &mut broadcast::Receiver<PopupEvent>,
    target: &ElementRef,
) -> Result<(), EngineError> {
    loop {
        match popups.recv().await {
            Ok(PopupEvent::Shown { target: shown }) if shown == *target => return Ok(()),
            Ok(other) => debug!(event = ?other, "ignoring unrelated popup event"),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(skipped, "popup listener lagged");
            }
            Err(broadcast::error::RecvError::Closed) => {
                return Err(EngineError::Host(HostError::Closed(
                    "popup signal channel closed".to_owned(),
                )));
            }
        }
    }
}
