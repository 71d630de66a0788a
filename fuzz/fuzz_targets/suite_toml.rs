#![no_main]

use libfuzzer_sys::fuzz_target;
use mixguard_engine::ScenarioSuite;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        if let Ok(suite) = ScenarioSuite::from_toml_str(content) {
            // 검증을 통과한 스위트는 비어 있지 않고 id가 유일함
            assert!(!suite.is_empty());
            for scenario in &suite {
                assert!(suite.get(&scenario.id).is_some());
            }
        }
    }
});
