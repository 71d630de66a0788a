//! 설정 관리 -- mixguard.toml 파싱 및 런타임 설정
//!
//! [`MixguardConfig`]는 엔진, 시뮬레이션 호스트, CLI 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`MIXGUARD_POLLER_INTERVAL_MS=50` 형식)
//! 3. 설정 파일 (`mixguard.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), mixguard_core::error::MixguardError> {
//! use mixguard_core::config::MixguardConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = MixguardConfig::load("mixguard.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = MixguardConfig::parse("[poller]\nmax_attempts = 50")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, MixguardError};

/// 정책 기능을 켜는 기본 preference 이름
pub const DEFAULT_POLICY_PREF: &str = "security.mixed_content.block_active_content";

/// poller 간격 상한 (밀리초)
const MAX_POLL_INTERVAL_MS: u64 = 60_000;

/// poller 시도 횟수 상한
const MAX_POLL_ATTEMPTS: u32 = 10_000;

/// mixguard 통합 설정
///
/// `mixguard.toml` 파일의 최상위 구조를 나타냅니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MixguardConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 조건 polling 설정
    #[serde(default)]
    pub poller: PollerConfig,
    /// 시나리오 실행 설정
    #[serde(default)]
    pub run: RunConfig,
    /// 시뮬레이션 호스트 설정
    #[serde(default)]
    pub host: HostConfig,
}

impl MixguardConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, MixguardError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, MixguardError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                MixguardError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                MixguardError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, MixguardError> {
        toml::from_str(toml_str).map_err(|e| {
            MixguardError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `MIXGUARD_{SECTION}_{FIELD}`
    /// 예: `MIXGUARD_HOST_SERVER_REDIRECT_KEEPS_OVERRIDE=true`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "MIXGUARD_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "MIXGUARD_GENERAL_LOG_FORMAT");

        // Poller
        override_u64(&mut self.poller.interval_ms, "MIXGUARD_POLLER_INTERVAL_MS");
        override_u32(&mut self.poller.max_attempts, "MIXGUARD_POLLER_MAX_ATTEMPTS");

        // Run
        override_u64(&mut self.run.load_timeout_ms, "MIXGUARD_RUN_LOAD_TIMEOUT_MS");
        override_u64(
            &mut self.run.gesture_timeout_ms,
            "MIXGUARD_RUN_GESTURE_TIMEOUT_MS",
        );
        override_string(&mut self.run.policy_pref, "MIXGUARD_RUN_POLICY_PREF");
        override_string(&mut self.run.suite_path, "MIXGUARD_RUN_SUITE_PATH");

        // Host
        override_u64(&mut self.host.load_latency_ms, "MIXGUARD_HOST_LOAD_LATENCY_MS");
        override_u64(
            &mut self.host.meta_refresh_delay_ms,
            "MIXGUARD_HOST_META_REFRESH_DELAY_MS",
        );
        override_u64(
            &mut self.host.override_script_delay_ms,
            "MIXGUARD_HOST_OVERRIDE_SCRIPT_DELAY_MS",
        );
        override_bool(
            &mut self.host.server_redirect_keeps_override,
            "MIXGUARD_HOST_SERVER_REDIRECT_KEEPS_OVERRIDE",
        );
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), MixguardError> {
        // log_level 검증
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        // log_format 검증
        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        // poller 검증
        if self.poller.interval_ms == 0 || self.poller.interval_ms > MAX_POLL_INTERVAL_MS {
            return Err(ConfigError::InvalidValue {
                field: "poller.interval_ms".to_owned(),
                reason: format!("must be between 1 and {MAX_POLL_INTERVAL_MS}"),
            }
            .into());
        }
        if self.poller.max_attempts == 0 || self.poller.max_attempts > MAX_POLL_ATTEMPTS {
            return Err(ConfigError::InvalidValue {
                field: "poller.max_attempts".to_owned(),
                reason: format!("must be between 1 and {MAX_POLL_ATTEMPTS}"),
            }
            .into());
        }

        // run 검증
        if self.run.load_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "run.load_timeout_ms".to_owned(),
                reason: "must be greater than 0".to_owned(),
            }
            .into());
        }
        if self.run.gesture_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "run.gesture_timeout_ms".to_owned(),
                reason: "must be greater than 0".to_owned(),
            }
            .into());
        }
        if self.run.policy_pref.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "run.policy_pref".to_owned(),
                reason: "preference name must not be empty".to_owned(),
            }
            .into());
        }

        Ok(())
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "pretty".to_owned(),
        }
    }
}

/// 조건 polling 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollerConfig {
    /// 조건 평가 간격 (밀리초)
    pub interval_ms: u64,
    /// 최대 평가 횟수
    pub max_attempts: u32,
}

impl PollerConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval_ms: 100,
            max_attempts: 30,
        }
    }
}

/// 시나리오 실행 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// 로드 완료 신호 대기 한도 (밀리초)
    pub load_timeout_ms: u64,
    /// 클릭 가로채기 / 팝업 표시 대기 한도 (밀리초)
    pub gesture_timeout_ms: u64,
    /// 실행 동안 true로 설정했다가 복원할 preference
    pub policy_pref: String,
    /// 시나리오 스위트 TOML 경로 (비어 있으면 내장 스위트)
    pub suite_path: String,
}

impl RunConfig {
    pub fn load_timeout(&self) -> Duration {
        Duration::from_millis(self.load_timeout_ms)
    }

    pub fn gesture_timeout(&self) -> Duration {
        Duration::from_millis(self.gesture_timeout_ms)
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            load_timeout_ms: 10_000,
            gesture_timeout_ms: 5_000,
            policy_pref: DEFAULT_POLICY_PREF.to_owned(),
            suite_path: String::new(),
        }
    }
}

/// 시뮬레이션 호스트 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// navigation hop 하나의 로드 지연 (밀리초)
    pub load_latency_ms: u64,
    /// meta refresh 페이지가 다음 navigation을 시작하기까지의 지연 (밀리초)
    pub meta_refresh_delay_ms: u64,
    /// 보호 해제 후 재로드에서 혼합 스크립트가 표시 요소를 갱신하기까지의 지연 (밀리초)
    pub override_script_delay_ms: u64,
    /// 서버 리다이렉트가 상속된 오버라이드를 유지하는지 여부
    ///
    /// `false`가 현재 알려진 결함(같은 origin 리다이렉트에서 프롬프트 재표시)을 재현합니다.
    pub server_redirect_keeps_override: bool,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            load_latency_ms: 5,
            meta_refresh_delay_ms: 10,
            override_script_delay_ms: 250,
            server_redirect_keeps_override: false,
        }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_bool(target: &mut bool, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<bool>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse bool from env var, ignoring"
            ),
        }
    }
}

fn override_u32(target: &mut u32, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u32>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u32 from env var, ignoring"
            ),
        }
    }
}

fn override_u64(target: &mut u64, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u64>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u64 from env var, ignoring"
            ),
        }
    }
}
