//! 조건 polling -- 언젠가 참이 되는 조건을 제한된 횟수만큼 확인합니다.
//!
//! [`ConditionPoller`]는 `tokio::time::interval` 하나로 조건을 반복 평가합니다.
//! 첫 평가는 호출 후 한 간격이 지난 시점이고, 성공 또는 시도 소진 중
//! 먼저 일어나는 쪽에서 타이머를 해제하고 결과를 돌려줍니다.
//!
//! 시간 초과는 에러가 아니라 [`PollOutcome::TimedOut`]입니다. 호출자는
//! 실패를 기록하고 다음 단계로 넘어갑니다.

use std::future::Future;
use std::time::Duration;

use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, warn};

use mixguard_core::config::PollerConfig;
use mixguard_core::metrics as m;

/// polling 옵션
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollOptions {
    /// 평가 간격
    pub interval: Duration,
    /// 최대 평가 횟수
    pub max_attempts: u32,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(100),
            max_attempts: 30,
        }
    }
}

impl From<&PollerConfig> for PollOptions {
    fn from(config: &PollerConfig) -> Self {
        Self {
            interval: config.interval(),
            max_attempts: config.max_attempts,
        }
    }
}

/// polling 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// 조건이 참이 됨
    Satisfied {
        /// 참이 될 때까지의 평가 횟수
        attempts: u32,
    },
    /// 시도를 모두 소진함
    TimedOut {
        /// 수행한 평가 횟수
        attempts: u32,
        /// 호출자가 제공한 설명과 시도 횟수를 담은 사유
        reason: String,
    },
}

impl PollOutcome {
    pub fn is_satisfied(&self) -> bool {
        matches!(self, Self::Satisfied { .. })
    }

    pub fn attempts(&self) -> u32 {
        match self {
            Self::Satisfied { attempts } | Self::TimedOut { attempts, .. } => *attempts,
        }
    }
}

/// 제한된 재시도 조건 poller
#[derive(Debug, Clone, Copy)]
pub struct ConditionPoller {
    options: PollOptions,
}

impl ConditionPoller {
    pub fn new(options: PollOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> PollOptions {
        self.options
    }

    /// 조건이 참이 되거나 시도를 소진할 때까지 평가합니다.
    ///
    /// # Arguments
    /// - `predicate`: 매 tick마다 호출되는 비동기 조건
    /// - `reason`: 시간 초과 시 사유에 들어갈 설명
    pub async fn poll_until<F, Fut>(
        &self,
        mut predicate: F,
        reason: impl Into<String>,
    ) -> PollOutcome
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = bool>,
    {
        let PollOptions {
            interval,
            max_attempts,
        } = self.options;

        let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        for attempt in 1..=max_attempts {
            ticker.tick().await;
            if predicate().await {
                debug!(attempts = attempt, "condition satisfied");
                return PollOutcome::Satisfied { attempts: attempt };
            }
        }
        drop(ticker);

        let reason = format!("{} (gave up after {max_attempts} attempts)", reason.into());
        warn!(
            attempts = max_attempts,
            interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX),
            reason = %reason,
            "condition poll timed out"
        );
        metrics::counter!(m::POLL_TIMEOUTS_TOTAL).increment(1);

        PollOutcome::TimedOut {
            attempts: max_attempts,
            reason,
        }
    }

    /// continuation 형태의 polling
    ///
    /// `on_success` 또는 `on_timeout` 중 정확히 하나를 한 번 호출하고 그 결과를
    /// 돌려줍니다.
    pub async fn poll_then<F, Fut, S, T, R>(
        &self,
        predicate: F,
        on_success: S,
        on_timeout: T,
        reason: impl Into<String>,
    ) -> R
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = bool>,
        S: FnOnce(u32) -> R,
        T: FnOnce(String) -> R,
    {
        match self.poll_until(predicate, reason).await {
            PollOutcome::Satisfied { attempts } => on_success(attempts),
            PollOutcome::TimedOut { reason, .. } => on_timeout(reason),
        }
    }
}

impl Default for ConditionPoller {
    fn default() -> Self {
        Self::new(PollOptions::default())
    }
}
