//! 프롬프트 관찰 -- 탭의 알림 프롬프트를 조회하고 액션을 실행합니다.
//!
//! 조회는 레지스트리 한 번 읽기이며 polling 하지 않습니다. 프롬프트가 없는
//! 것도 유효한 상태입니다.
//!
//! [`PromptHandle`]은 조회한 단계 안에서만 유효합니다. `commit_action`이 핸들을
//! 값으로 받으므로 없는 프롬프트에 액션을 실행하는 코드는 작성할 수 없고,
//! 이미 사용한 핸들을 다시 쓸 수도 없습니다.

use std::sync::Arc;

use tracing::info;

use mixguard_core::host::{BrowserHost, PromptRegistry};
use mixguard_core::types::{PromptActionKind, PromptHandle, PromptKind, TabId};

use crate::error::EngineError;

/// 프롬프트 관찰자
pub struct NotificationObserver<H: BrowserHost> {
    host: Arc<H>,
}

impl<H: BrowserHost> NotificationObserver<H> {
    pub fn new(host: Arc<H>) -> Self {
        Self { host }
    }

    /// 탭의 프롬프트를 한 번 조회합니다.
    pub async fn get_prompt(
        &self,
        kind: PromptKind,
        tab: TabId,
    ) -> Result<Option<PromptHandle>, EngineError> {
        Ok(self.host.prompt(kind, tab).await?)
    }

    /// 프롬프트의 `index`번째 액션을 실행합니다.
    ///
    /// # Errors
    /// - `EngineError::InvalidPromptAction`: 액션 인덱스가 범위를 벗어남
    /// - `EngineError::Host(StalePrompt)`: 조회 이후 프롬프트가 사라지거나 재생성됨
    pub async fn commit_action(
        &self,
        handle: PromptHandle,
        index: usize,
    ) -> Result<(), EngineError> {
        let Some(action) = handle.actions().get(index) else {
            return Err(EngineError::InvalidPromptAction {
                kind: handle.kind(),
                action: format!("#{index} (available: {})", handle.actions().len()),
            });
        };
        info!(
            prompt = handle.kind().as_str(),
            tab = %handle.tab(),
            action = %action.label,
            "committing prompt action"
        );
        self.host.invoke_prompt_action(handle, index).await?;
        Ok(())
    }

    /// 종류로 액션을 찾아 실행합니다.
    pub async fn commit(
        &self,
        handle: PromptHandle,
        action: PromptActionKind,
    ) -> Result<(), EngineError> {
        let index = handle
            .position(action)
            .ok_or_else(|| EngineError::InvalidPromptAction {
                kind: handle.kind(),
                action: format!("{action:?}"),
            })?;
        self.commit_action(handle, index).await
    }
}
