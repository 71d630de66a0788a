//! 메트릭 상수 및 설명 등록
//!
//! 모든 메트릭의 이름과 설명을 중앙에서 정의합니다.
//! 엔진은 이 상수를 사용하여 `metrics::counter!()` 매크로를 호출합니다.
//! recorder가 설치되지 않으면 기록은 무시됩니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `mixguard_`
//! - 접미어: `_total` (counter), `_seconds` (histogram)

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 단언 결과 레이블 키 (pass, fail, expected_fail, unexpected_pass)
pub const LABEL_OUTCOME: &str = "outcome";

/// 활성화 방식 레이블 키 (primary, secondary)
pub const LABEL_VARIANT: &str = "variant";

// ─── 엔진 메트릭 ────────────────────────────────────────────────────

/// 기록된 단언 수 (counter, label: outcome)
pub const ASSERTIONS_TOTAL: &str = "mixguard_assertions_total";

/// 실행된 시나리오 수 (counter)
pub const SCENARIOS_TOTAL: &str = "mixguard_scenarios_total";

/// 시간 초과로 끝난 조건 polling 수 (counter)
pub const POLL_TIMEOUTS_TOTAL: &str = "mixguard_poll_timeouts_total";

/// 시뮬레이션된 제스처 수 (counter, label: variant)
pub const GESTURES_TOTAL: &str = "mixguard_gestures_total";

/// 전체 실행 소요 시간 (histogram, 초)
pub const RUN_DURATION_SECONDS: &str = "mixguard_run_duration_seconds";

/// 모든 메트릭 이름
pub const ALL_METRIC_NAMES: &[&str] = &[
    ASSERTIONS_TOTAL,
    SCENARIOS_TOTAL,
    POLL_TIMEOUTS_TOTAL,
    GESTURES_TOTAL,
    RUN_DURATION_SECONDS,
];

/// 모든 메트릭의 설명을 등록합니다.
///
/// recorder 설치 직후 한 번 호출합니다.
pub fn describe_all() {
    use metrics::{describe_counter, describe_histogram};

    describe_counter!(ASSERTIONS_TOTAL, "Scenario assertions recorded, by outcome");
    describe_counter!(SCENARIOS_TOTAL, "Scenarios executed");
    describe_counter!(
        POLL_TIMEOUTS_TOTAL,
        "Condition polls that exhausted their attempts"
    );
    describe_counter!(GESTURES_TOTAL, "Simulated user gestures, by variant");
    describe_histogram!(RUN_DURATION_SECONDS, "Wall time of a full suite run");
}
