//! 로드 완료 대기
//!
//! [`LoadWaiter`]는 제스처 **이전에** 구독한 `broadcast::Receiver` 하나를 소유하고,
//! `wait`가 소비하면서 함께 해제됩니다. 그래서 리스너는 최대 한 번만 완료되고
//! 이후 비동기 작업 전에 반드시 제거됩니다.

use std::collections::HashSet;
use std::time::Duration;

use tokio::sync::broadcast;
use tracing::{debug, warn};
use url::Url;

use mixguard_core::types::{LoadEvent, TabId};

/// 기다릴 탭
#[derive(Debug)]
enum LoadTarget {
    /// 이미 알고 있는 탭
    Tab(TabId),
    /// 제스처로 새로 열릴 탭. `known`에 없는 탭의 첫 로드가 대상을 고정합니다.
    NewTab { known: HashSet<TabId> },
}

/// 완료된 로드
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadCompletion {
    /// 로드된 탭
    pub tab: TabId,
    /// hop마다 로드된 URL (순서대로)
    pub urls: Vec<Url>,
}

impl LoadCompletion {
    /// 마지막 hop의 URL
    pub fn final_url(&self) -> Option<&Url> {
        self.urls.last()
    }
}

/// 로드 대기 실패
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadWaitError {
    /// 제한 시간 안에 필요한 로드 수를 받지 못함
    #[error("timed out after {timeout_ms}ms waiting for {expected} load(s) in {tab}, saw {seen}")]
    TimedOut {
        /// 고정된 대상 탭 (새 탭이 아직 로드되지 않았으면 `"new tab"`)
        tab: String,
        expected: u32,
        seen: u32,
        timeout_ms: u64,
    },

    /// 호스트의 로드 신호 채널이 닫힘
    #[error("load signal channel closed")]
    Closed,
}

/// 일회성 로드 리스너
#[derive(Debug)]
pub struct LoadWaiter {
    rx: broadcast::Receiver<LoadEvent>,
    target: LoadTarget,
    hops: u32,
}

impl LoadWaiter {
    /// 알고 있는 탭에서 `hops`번의 로드 완료를 기다립니다.
    pub fn for_tab(rx: broadcast::Receiver<LoadEvent>, tab: TabId, hops: u32) -> Self {
        Self {
            rx,
            target: LoadTarget::Tab(tab),
            hops: hops.max(1),
        }
    }

    /// `known`에 없는 새 탭에서 `hops`번의 로드 완료를 기다립니다.
    pub fn for_new_tab(
        rx: broadcast::Receiver<LoadEvent>,
        known: impl IntoIterator<Item = TabId>,
        hops: u32,
    ) -> Self {
        Self {
            rx,
            target: LoadTarget::NewTab {
                known: known.into_iter().collect(),
            },
            hops: hops.max(1),
        }
    }

    /// 로드를 기다리고 리스너를 해제합니다.
    pub async fn wait(mut self, timeout: Duration) -> Result<LoadCompletion, LoadWaitError> {
        let mut locked: Option<TabId> = match &self.target {
            LoadTarget::Tab(tab) => Some(*tab),
            LoadTarget::NewTab { .. } => None,
        };
        let mut urls: Vec<Url> = Vec::new();

        let waited = tokio::time::timeout(timeout, async {
            loop {
                let event = match self.rx.recv().await {
                    Ok(event) => event,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "load listener lagged");
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => return Err(LoadWaitError::Closed),
                };

                match (&self.target, locked) {
                    (_, Some(tab)) if event.tab != tab => continue,
                    (LoadTarget::NewTab { known }, None) => {
                        if known.contains(&event.tab) {
                            continue;
                        }
                        debug!(tab = %event.tab, "new tab detected");
                        locked = Some(event.tab);
                    }
                    _ => {}
                }

                debug!(tab = %event.tab, url = %event.url, hop = urls.len() + 1, "load observed");
                urls.push(event.url);
                if urls.len() as u32 >= self.hops {
                    return Ok(event.tab);
                }
            }
        })
        .await;

        match waited {
            Ok(Ok(tab)) => Ok(LoadCompletion { tab, urls }),
            Ok(Err(err)) => Err(err),
            Err(_elapsed) => Err(LoadWaitError::TimedOut {
                tab: locked.map_or_else(|| "new tab".to_owned(), |t| t.to_string()),
                expected: self.hops,
                seen: urls.len() as u32,
                timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            }),
        }
    }
}
